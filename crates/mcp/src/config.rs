// Environment-backed server configuration, read once at startup.
// Nothing else in the process touches the environment; components get
// the assembled config passed in explicitly.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Public endpoint of the FRED API.
pub const DEFAULT_API_ENDPOINT: &str = "https://api.stlouisfed.org/fred/";

/// Configuration errors are fatal: the process refuses to start rather
/// than serve requests it cannot authenticate or parse limits for.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("FRED_API_KEY is not set; a FRED API key is required")]
    MissingApiKey,

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Server configuration assembled from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// FRED API key, forwarded on every upstream request.
    pub api_key: String,
    /// Base URL of the FRED API.
    pub api_endpoint: String,
    /// Client-side rate limit: requests per period.
    pub rate_limit: u32,
    /// Rate limit window.
    pub rate_limit_period: Duration,
    /// Upstream request timeout.
    pub request_timeout: Duration,
    /// Default log filter when RUST_LOG is not set.
    pub log_level: String,
    /// Append logs to this file instead of stderr when set.
    pub log_file: Option<PathBuf>,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("FRED_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let api_endpoint =
            lookup("FRED_API_ENDPOINT").unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string());

        let rate_limit = parse_var(&lookup, "FRED_RATE_LIMIT", 120)?;
        let rate_limit_period =
            Duration::from_secs(parse_var(&lookup, "FRED_RATE_LIMIT_PERIOD_SECS", 60)?);
        let request_timeout =
            Duration::from_secs(parse_var(&lookup, "FRED_REQUEST_TIMEOUT_SECS", 30)?);

        let log_level = lookup("FRED_LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        let log_file = lookup("FRED_LOG_FILE")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            api_key,
            api_endpoint,
            rate_limit,
            rate_limit_period,
            request_timeout,
            log_level,
            log_file,
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
            name,
            value,
        }),
    }
}
