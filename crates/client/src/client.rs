//! Main client for the FRED API.

use crate::api;
use crate::api::ObservationQuery;
use crate::config::{ClientConfig, RateLimitConfig, RetryConfig};
use crate::error::{FredError, FredResult};
use crate::transport::HttpTransport;
use async_trait::async_trait;
use fred_core::{Release, SeriesInfo, SeriesObservation};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// The FRED operations the tool layer depends on.
///
/// Implemented by [`FredClient`]; tests substitute stubs so dispatch
/// behavior can be checked without the network.
#[async_trait]
pub trait FredApi: Send + Sync {
    /// Search series by keywords.
    async fn search_series(
        &self,
        text: &str,
        limit: u32,
        order_by: Option<&str>,
    ) -> FredResult<Vec<SeriesInfo>>;

    /// Fetch metadata for one series.
    async fn series_info(&self, series_id: &str) -> FredResult<SeriesInfo>;

    /// Fetch the observations of a series, oldest first.
    async fn observations(
        &self,
        series_id: &str,
        query: &ObservationQuery,
    ) -> FredResult<Vec<SeriesObservation>>;

    /// List the series filed under a category.
    async fn category_series(
        &self,
        category_id: i64,
        limit: u32,
        offset: u32,
    ) -> FredResult<Vec<SeriesInfo>>;

    /// List economic data releases.
    async fn releases(&self, limit: u32, offset: u32) -> FredResult<Vec<Release>>;
}

/// Client for the FRED REST API.
#[derive(Debug)]
pub struct FredClient {
    http: HttpTransport,
}

impl FredClient {
    /// Create a new client builder.
    pub fn builder() -> FredClientBuilder {
        FredClientBuilder::new()
    }

    /// Create a client from configuration.
    pub fn from_config(config: ClientConfig) -> FredResult<Self> {
        let http = HttpTransport::new(Arc::new(config))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl FredApi for FredClient {
    async fn search_series(
        &self,
        text: &str,
        limit: u32,
        order_by: Option<&str>,
    ) -> FredResult<Vec<SeriesInfo>> {
        api::search::series(&self.http, text, limit, order_by).await
    }

    async fn series_info(&self, series_id: &str) -> FredResult<SeriesInfo> {
        api::series::info(&self.http, series_id).await
    }

    async fn observations(
        &self,
        series_id: &str,
        query: &ObservationQuery,
    ) -> FredResult<Vec<SeriesObservation>> {
        api::series::observations(&self.http, series_id, query).await
    }

    async fn category_series(
        &self,
        category_id: i64,
        limit: u32,
        offset: u32,
    ) -> FredResult<Vec<SeriesInfo>> {
        api::categories::series(&self.http, category_id, limit, offset).await
    }

    async fn releases(&self, limit: u32, offset: u32) -> FredResult<Vec<Release>> {
        api::releases::list(&self.http, limit, offset).await
    }
}

/// Builder for creating a [`FredClient`].
pub struct FredClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Duration,
    retry: RetryConfig,
    rate_limit: RateLimitConfig,
}

impl FredClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }

    /// Set the base URL of the FRED API.
    ///
    /// Defaults to the public endpoint when not set.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry configuration.
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set the client-side rate limit.
    pub fn rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Build the client.
    pub fn build(self) -> FredResult<FredClient> {
        let api_key = self
            .api_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| FredError::Config("api_key is required".to_string()))?;

        let mut base = self
            .base_url
            .unwrap_or_else(|| crate::DEFAULT_BASE_URL.to_string());
        // Url::join drops the last path segment without this.
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        FredClient::from_config(ClientConfig {
            base_url,
            api_key,
            timeout: self.timeout,
            retry: self.retry,
            rate_limit: self.rate_limit,
        })
    }
}

impl Default for FredClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
