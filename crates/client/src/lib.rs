//! # fred-client
//!
//! Async client for the FRED (Federal Reserve Economic Data) REST API.
//!
//! ```rust,no_run
//! use fred_client::{FredApi, FredClient};
//!
//! # async fn example() -> fred_client::FredResult<()> {
//! let client = FredClient::builder()
//!     .api_key("abcdefghijklmnopqrstuvwxyz123456")
//!     .build()?;
//!
//! let results = client.search_series("unemployment", 5, None).await?;
//! for series in results {
//!     println!("{}: {}", series.id, series.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;

/// Public endpoint of the FRED API.
pub const DEFAULT_BASE_URL: &str = "https://api.stlouisfed.org/fred/";

pub use api::ObservationQuery;
pub use client::{FredApi, FredClient, FredClientBuilder};
pub use config::{ClientConfig, RateLimitConfig, RetryConfig};
pub use error::{FredError, FredResult};

// Re-export the domain types callers get back
pub use fred_core::{Release, SeriesInfo, SeriesObservation};
