//! HTTP transport layer for the FRED client.
//!
//! GET-only: every FRED endpoint is a read. Authentication rides along as
//! the `api_key` query parameter, and `file_type=json` is forced so the
//! API never answers in its legacy XML format.

use crate::config::{ClientConfig, RateLimitConfig};
use crate::error::{FredError, FredResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

/// HTTP transport for making FRED API requests.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
    limiter: SlidingWindow,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<ClientConfig>) -> FredResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        let limiter = SlidingWindow::new(&config.rate_limit);

        Ok(Self {
            client,
            config,
            limiter,
        })
    }

    /// Build a URL for the given endpoint path.
    fn build_url(&self, path: &str) -> FredResult<url::Url> {
        self.config.base_url.join(path).map_err(FredError::from)
    }

    /// Execute a GET request against an endpoint, decoding the JSON body.
    ///
    /// Waits on the rate limiter before each send and retries retryable
    /// statuses and transport timeouts with exponential backoff.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> FredResult<T> {
        let url = self.build_url(path)?;
        let retry = &self.config.retry;
        let mut attempts = 0;

        loop {
            self.limiter.acquire().await;
            debug!(url = %url, attempt = attempts, "GET request");

            let request = self
                .client
                .get(url.clone())
                .query(query)
                .query(&[
                    ("api_key", self.config.api_key.as_str()),
                    ("file_type", "json"),
                ]);

            match request.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();

                    if response.status().is_success() {
                        let body = response.text().await?;
                        return serde_json::from_str(&body).map_err(FredError::from);
                    }

                    if attempts < retry.max_retries && retry.should_retry_status(status) {
                        let backoff = retry.backoff_for_attempt(attempts);
                        warn!(
                            status,
                            attempt = attempts + 1,
                            backoff_ms = backoff.as_millis() as u64,
                            "request failed, retrying"
                        );
                        tokio::time::sleep(backoff).await;
                        attempts += 1;
                        continue;
                    }

                    let body = response.text().await.unwrap_or_default();
                    return Err(FredError::from_response(status, &body));
                }
                Err(e) => {
                    if attempts < retry.max_retries && (e.is_timeout() || e.is_connect()) {
                        let backoff = retry.backoff_for_attempt(attempts);
                        warn!(
                            attempt = attempts + 1,
                            backoff_ms = backoff.as_millis() as u64,
                            "request timed out, retrying"
                        );
                        tokio::time::sleep(backoff).await;
                        attempts += 1;
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }
    }
}

/// Sliding-window rate limiter.
///
/// Tracks send instants over the configured period and sleeps until the
/// oldest one ages out when the window is full.
#[derive(Debug)]
struct SlidingWindow {
    max_requests: usize,
    period: std::time::Duration,
    sent: Mutex<VecDeque<Instant>>,
}

impl SlidingWindow {
    fn new(config: &RateLimitConfig) -> Self {
        Self {
            max_requests: config.max_requests as usize,
            period: config.period,
            sent: Mutex::new(VecDeque::new()),
        }
    }

    async fn acquire(&self) {
        // max_requests == 0 means the limiter is disabled
        if self.max_requests == 0 {
            return;
        }

        loop {
            let wait = {
                let mut sent = self.sent.lock().await;
                let now = Instant::now();
                while let Some(front) = sent.front() {
                    if now.duration_since(*front) >= self.period {
                        sent.pop_front();
                    } else {
                        break;
                    }
                }

                match sent.front() {
                    Some(front) if sent.len() >= self.max_requests => {
                        self.period - now.duration_since(*front)
                    }
                    _ => {
                        sent.push_back(now);
                        return;
                    }
                }
            };
            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;
    use serde::Deserialize;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize)]
    struct TestResponse {
        message: String,
    }

    fn create_config(base_url: &str) -> Arc<ClientConfig> {
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Arc::new(ClientConfig {
            base_url: url::Url::parse(&base).unwrap(),
            api_key: "test-key".to_string(),
            timeout: Duration::from_secs(5),
            retry: RetryConfig::no_retry(),
            rate_limit: RateLimitConfig::unlimited(),
        })
    }

    #[tokio::test]
    async fn get_appends_api_key_and_file_type() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/series"))
            .and(query_param("api_key", "test-key"))
            .and(query_param("file_type", "json"))
            .and(query_param("series_id", "GDP"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": "ok"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();
        let result: TestResponse = transport
            .get("series", &[("series_id", "GDP".to_string())])
            .await
            .unwrap();
        assert_eq!(result.message, "ok");
    }

    #[tokio::test]
    async fn non_success_status_maps_to_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/series"))
            .respond_with(ResponseTemplate::new(400).set_body_json(
                serde_json::json!({"error_code": 400, "error_message": "Bad Request"}),
            ))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();
        let result: FredResult<TestResponse> = transport.get("series", &[]).await;
        match result {
            Err(FredError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Bad Request");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_json_maps_to_json_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/series"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();
        let result: FredResult<TestResponse> = transport.get("series", &[]).await;
        assert!(matches!(result, Err(FredError::Json(_))));
    }

    #[tokio::test]
    async fn retries_retryable_status_until_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/releases"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/releases"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": "ok"})),
            )
            .mount(&server)
            .await;

        let mut config = (*create_config(&server.uri())).clone();
        config.retry = RetryConfig {
            max_retries: 3,
            initial_backoff: Duration::from_millis(1),
            ..Default::default()
        };
        let transport = HttpTransport::new(Arc::new(config)).unwrap();

        let result: TestResponse = transport.get("releases", &[]).await.unwrap();
        assert_eq!(result.message, "ok");
    }

    #[tokio::test]
    async fn exhausted_retries_surface_last_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/releases"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut config = (*create_config(&server.uri())).clone();
        config.retry = RetryConfig {
            max_retries: 1,
            initial_backoff: Duration::from_millis(1),
            ..Default::default()
        };
        let transport = HttpTransport::new(Arc::new(config)).unwrap();

        let result: FredResult<TestResponse> = transport.get("releases", &[]).await;
        match result {
            Err(FredError::Api { status, .. }) => assert_eq!(status, 500),
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn limiter_delays_when_window_is_full() {
        let limiter = SlidingWindow::new(&RateLimitConfig {
            max_requests: 2,
            period: Duration::from_secs(1),
        });

        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        // Window full: the third acquire must wait for the first to age out.
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn disabled_limiter_never_waits() {
        let limiter = SlidingWindow::new(&RateLimitConfig::unlimited());
        for _ in 0..100 {
            limiter.acquire().await;
        }
    }
}
