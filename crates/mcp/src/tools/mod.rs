// FRED tool implementations

use crate::protocol::CallToolResult;
use chrono::NaiveDate;
use fred_client::FredError;

pub mod analysis;
pub mod data;
mod registry;
pub mod search;

pub use analysis::{CalculateStatisticsTool, CompareSeriesTool, DetectTrendsTool};
pub use data::{GetCategorySeriesTool, GetReleasesTool, GetSeriesDataTool, GetSeriesMetadataTool};
pub use registry::{
    json_schema_array, json_schema_integer, json_schema_object, json_schema_string, Tool,
    ToolRegistry,
};
pub use search::SearchSeriesTool;

/// Default page size for listing tools.
pub(crate) const DEFAULT_LIMIT: u32 = 10;

/// Largest accepted page size (FRED caps its own at 1000).
pub(crate) const MAX_LIMIT: i64 = 1000;

/// Tool output larger than this is cut off with a marker line.
pub(crate) const MAX_OUTPUT_LEN: usize = 100_000;

/// Aggregation frequency codes FRED accepts.
pub(crate) const FREQUENCIES: &[&str] = &["d", "w", "bw", "m", "q", "sa", "a"];

/// Units transformation codes FRED accepts.
pub(crate) const UNITS: &[&str] = &["lin", "chg", "ch1", "pch", "pc1", "pca", "cch", "cca", "log"];

/// Validate an optional limit argument, falling back to a default.
pub(crate) fn parse_limit(value: Option<i64>, default: u32) -> Result<u32, String> {
    match value {
        None => Ok(default),
        Some(v) if v <= 0 => Err(format!("limit must be positive, got {}", v)),
        Some(v) if v > MAX_LIMIT => Err(format!("limit must be at most {}, got {}", MAX_LIMIT, v)),
        Some(v) => Ok(v as u32),
    }
}

/// Validate an optional offset argument.
pub(crate) fn parse_offset(value: Option<i64>) -> Result<u32, String> {
    match value {
        None => Ok(0),
        Some(v) if v < 0 => Err(format!("offset must not be negative, got {}", v)),
        Some(v) => Ok(v as u32),
    }
}

/// Parse a YYYY-MM-DD date argument.
pub(crate) fn parse_date(name: &str, value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("{} must be a YYYY-MM-DD date, got {:?}", name, value))
}

/// Parse an optional observation date range, rejecting inverted ranges.
pub(crate) fn parse_date_range(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), String> {
    let start = start
        .map(|s| parse_date("observation_start", s))
        .transpose()?;
    let end = end.map(|s| parse_date("observation_end", s)).transpose()?;
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(format!(
                "observation_start {} is after observation_end {}",
                start, end
            ));
        }
    }
    Ok((start, end))
}

/// Validate an optional enumeration argument against FRED's accepted codes.
pub(crate) fn parse_code(
    name: &str,
    value: Option<&str>,
    allowed: &[&str],
) -> Result<Option<String>, String> {
    match value {
        None => Ok(None),
        Some(v) if allowed.contains(&v) => Ok(Some(v.to_string())),
        Some(v) => Err(format!(
            "{} must be one of [{}], got {:?}",
            name,
            allowed.join(", "),
            v
        )),
    }
}

/// Map an upstream failure into an error-flagged result.
///
/// `FredError`'s display already carries the HTTP status for API errors
/// and stays on a single line.
pub(crate) fn upstream_error(e: FredError) -> CallToolResult {
    CallToolResult::error(e.to_string())
}

/// Cut off oversized output with a marker, like large web fetches.
pub(crate) fn truncate_output(mut text: String) -> String {
    if text.len() > MAX_OUTPUT_LEN {
        text.truncate(MAX_OUTPUT_LEN);
        text.push_str("\n... (truncated, content too large)");
    }
    text
}

/// Render an observation value, "." for missing.
pub(crate) fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}", v),
        None => ".".to_string(),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use fred_client::{FredApi, FredError, FredResult, ObservationQuery};
    use fred_core::{Release, SeriesInfo, SeriesObservation};
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub(crate) fn sample_info(id: &str, title: &str) -> SeriesInfo {
        SeriesInfo {
            id: id.to_string(),
            title: title.to_string(),
            units: "Percent".to_string(),
            frequency: "Monthly".to_string(),
            seasonal_adjustment: "Seasonally Adjusted".to_string(),
            observation_start: "1948-01-01".to_string(),
            observation_end: "2025-06-01".to_string(),
            last_updated: "2025-07-03 07:44:03-05".to_string(),
            popularity: Some(90),
            notes: None,
        }
    }

    /// FredApi stub that counts upstream calls and can fail on demand.
    pub(crate) struct StubFred {
        calls: AtomicUsize,
        fail_status: Option<u16>,
        observations: Vec<SeriesObservation>,
    }

    impl StubFred {
        pub(crate) fn new() -> Self {
            let observations = (1..=5)
                .map(|i| SeriesObservation::new(date(2020, i, 1), Some(i as f64)))
                .collect();
            Self {
                calls: AtomicUsize::new(0),
                fail_status: None,
                observations,
            }
        }

        pub(crate) fn with_observations(observations: Vec<SeriesObservation>) -> Self {
            Self {
                observations,
                ..Self::new()
            }
        }

        pub(crate) fn failing(status: u16) -> Self {
            Self {
                fail_status: Some(status),
                ..Self::new()
            }
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn record_call(&self) -> FredResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.fail_status {
                Some(status) => Err(FredError::Api {
                    status,
                    message: "Internal Server Error".to_string(),
                }),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl FredApi for StubFred {
        async fn search_series(
            &self,
            _text: &str,
            _limit: u32,
            _order_by: Option<&str>,
        ) -> FredResult<Vec<SeriesInfo>> {
            self.record_call()?;
            Ok(vec![sample_info(
                "CPIAUCSL",
                "Consumer Price Index for All Urban Consumers",
            )])
        }

        async fn series_info(&self, series_id: &str) -> FredResult<SeriesInfo> {
            self.record_call()?;
            Ok(sample_info(series_id, "Test Series"))
        }

        async fn observations(
            &self,
            _series_id: &str,
            _query: &ObservationQuery,
        ) -> FredResult<Vec<SeriesObservation>> {
            self.record_call()?;
            Ok(self.observations.clone())
        }

        async fn category_series(
            &self,
            _category_id: i64,
            _limit: u32,
            _offset: u32,
        ) -> FredResult<Vec<SeriesInfo>> {
            self.record_call()?;
            Ok(vec![sample_info("BOPGSTB", "Trade Balance")])
        }

        async fn releases(&self, _limit: u32, _offset: u32) -> FredResult<Vec<Release>> {
            self.record_call()?;
            Ok(vec![Release {
                id: 10,
                name: "Consumer Price Index".to_string(),
                press_release: true,
                link: Some("https://www.bls.gov/cpi/".to_string()),
                realtime_start: None,
                realtime_end: None,
            }])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_limit_defaults_and_bounds() {
        assert_eq!(parse_limit(None, 10), Ok(10));
        assert_eq!(parse_limit(Some(25), 10), Ok(25));
        assert!(parse_limit(Some(0), 10).is_err());
        assert!(parse_limit(Some(-5), 10).is_err());
        assert!(parse_limit(Some(5000), 10).is_err());
    }

    #[test]
    fn parse_offset_rejects_negative() {
        assert_eq!(parse_offset(None), Ok(0));
        assert_eq!(parse_offset(Some(30)), Ok(30));
        assert!(parse_offset(Some(-1)).is_err());
    }

    #[test]
    fn parse_date_requires_iso_format() {
        assert!(parse_date("observation_start", "2020-01-01").is_ok());
        assert!(parse_date("observation_start", "01/01/2020").is_err());
        assert!(parse_date("observation_start", "2020-13-01").is_err());
    }

    #[test]
    fn parse_date_range_rejects_inverted() {
        let result = parse_date_range(Some("2021-01-01"), Some("2020-01-01"));
        assert!(result.is_err());
    }

    #[test]
    fn parse_code_checks_membership() {
        assert_eq!(
            parse_code("frequency", Some("m"), FREQUENCIES),
            Ok(Some("m".to_string()))
        );
        assert!(parse_code("frequency", Some("z"), FREQUENCIES).is_err());
        assert_eq!(parse_code("units", None, UNITS), Ok(None));
    }

    #[test]
    fn truncate_output_marks_cut() {
        let long = "x".repeat(MAX_OUTPUT_LEN + 10);
        let truncated = truncate_output(long);
        assert!(truncated.ends_with("(truncated, content too large)"));
    }

    #[tokio::test]
    async fn dispatch_with_missing_required_args_never_calls_upstream() {
        use super::testing::StubFred;
        use std::sync::Arc;

        let stub = Arc::new(StubFred::new());
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(SearchSeriesTool::new(stub.clone())));
        registry.register(Arc::new(GetSeriesDataTool::new(stub.clone())));
        registry.register(Arc::new(GetSeriesMetadataTool::new(stub.clone())));
        registry.register(Arc::new(GetCategorySeriesTool::new(stub.clone())));
        registry.register(Arc::new(CompareSeriesTool::new(stub.clone())));
        registry.register(Arc::new(CalculateStatisticsTool::new(stub.clone())));
        registry.register(Arc::new(DetectTrendsTool::new(stub.clone())));

        // Every tool with a required argument, called with none of them.
        for name in [
            "search_fred_series",
            "fred_get_series_data",
            "fred_get_series_metadata",
            "fred_get_category_series",
            "fred_compare_series",
            "fred_calculate_statistics",
            "fred_detect_trends",
        ] {
            let result = registry.dispatch(name, serde_json::json!({})).await;
            assert!(result.is_error(), "{} accepted empty arguments", name);
        }
        assert_eq!(stub.call_count(), 0);
    }
}
