//! Error types for the FRED client.

use serde::Deserialize;

/// Result type for FRED client operations.
pub type FredResult<T> = Result<T, FredError>;

/// Errors that can occur when talking to the FRED API.
#[derive(Debug, thiserror::Error)]
pub enum FredError {
    /// HTTP request failed at the transport level.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status.
    #[error("FRED API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body was not the JSON we expected.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A field in an otherwise well-formed response could not be decoded.
    #[error("unexpected response shape: {0}")]
    Decode(String),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The requested series does not exist.
    #[error("Series not found: {0}")]
    SeriesNotFound(String),
}

impl FredError {
    /// Check if this error is worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Create an API error from a status code and response body.
    ///
    /// FRED error bodies look like `{"error_code":400,"error_message":"..."}`;
    /// anything else is reduced to its first line.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(parsed) => parsed.error_message,
            Err(_) => body.trim().lines().next().unwrap_or_default().to_string(),
        };
        Self::Api { status, message }
    }
}

/// Error body returned by the FRED API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_response_parses_fred_error_body() {
        let err = FredError::from_response(
            400,
            r#"{"error_code":400,"error_message":"Bad Request. The series does not exist."}"#,
        );
        match err {
            FredError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Bad Request. The series does not exist.");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn from_response_falls_back_to_first_line() {
        let err = FredError::from_response(502, "Bad Gateway\nupstream unreachable\n");
        match err {
            FredError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn api_5xx_is_retryable() {
        assert!(FredError::from_response(500, "").is_retryable());
        assert!(FredError::from_response(429, "").is_retryable());
        assert!(!FredError::from_response(404, "").is_retryable());
        assert!(!FredError::SeriesNotFound("GDP".into()).is_retryable());
    }
}
