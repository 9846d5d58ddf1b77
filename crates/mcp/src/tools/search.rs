// Series search tool

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    json_schema_integer, json_schema_object, json_schema_string, parse_limit, upstream_error,
    Tool, DEFAULT_LIMIT,
};
use anyhow::Result;
use fred_client::FredApi;
use serde::Deserialize;
use std::fmt::Write as _;
use std::sync::Arc;

/// Tool to search FRED series by keywords.
pub struct SearchSeriesTool {
    api: Arc<dyn FredApi>,
}

impl SearchSeriesTool {
    pub fn new(api: Arc<dyn FredApi>) -> Self {
        Self { api }
    }
}

#[derive(Debug, Deserialize)]
struct SearchSeriesArgs {
    query: String,
    #[serde(default)]
    limit: Option<i64>,
    #[serde(default)]
    order_by: Option<String>,
}

#[async_trait::async_trait]
impl Tool for SearchSeriesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "search_fred_series".to_string(),
            description: "Search for FRED data series by keywords".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "query": json_schema_string("Search query for FRED series"),
                    "limit": json_schema_integer("Maximum number of results to return (default: 10)"),
                    "order_by": json_schema_string("How to order results (search_rank, popularity, title, ...)")
                }),
                vec!["query"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: SearchSeriesArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => {
                return Ok(CallToolResult::error(format!(
                    "Invalid arguments for search_fred_series: {}",
                    e
                )))
            }
        };

        if args.query.trim().is_empty() {
            return Ok(CallToolResult::error("query must not be empty"));
        }
        let limit = match parse_limit(args.limit, DEFAULT_LIMIT) {
            Ok(limit) => limit,
            Err(message) => return Ok(CallToolResult::error(message)),
        };
        let order_by = args.order_by.as_deref().unwrap_or("popularity");

        let results = match self
            .api
            .search_series(args.query.trim(), limit, Some(order_by))
            .await
        {
            Ok(results) => results,
            Err(e) => return Ok(upstream_error(e)),
        };

        let mut out = format!(
            "Search results for {:?}: {} match(es)\n",
            args.query.trim(),
            results.len()
        );
        for series in &results {
            let _ = write!(
                out,
                "\n{}: {}\n  frequency: {} | units: {} | seasonal adjustment: {}\n  observations: {} to {}\n",
                series.id,
                series.title,
                series.frequency,
                series.units,
                series.seasonal_adjustment,
                series.observation_start,
                series.observation_end
            );
        }

        Ok(CallToolResult::text(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::StubFred;

    #[tokio::test]
    async fn missing_query_is_a_validation_error_without_upstream_call() {
        let stub = Arc::new(StubFred::new());
        let tool = SearchSeriesTool::new(stub.clone());

        let result = tool
            .execute(serde_json::json!({"limit": 5}))
            .await
            .unwrap();
        assert!(result.is_error());
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn negative_limit_is_rejected_before_any_call() {
        let stub = Arc::new(StubFred::new());
        let tool = SearchSeriesTool::new(stub.clone());

        let result = tool
            .execute(serde_json::json!({"query": "gdp", "limit": -1}))
            .await
            .unwrap();
        assert!(result.is_error());
        assert!(result.content[0].as_text().contains("limit"));
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn search_formats_matches() {
        let stub = Arc::new(StubFred::new());
        let tool = SearchSeriesTool::new(stub.clone());

        let result = tool
            .execute(serde_json::json!({"query": "inflation"}))
            .await
            .unwrap();
        assert!(!result.is_error());
        let text = result.content[0].as_text();
        assert!(text.contains("CPIAUCSL"));
        assert!(text.contains("Consumer Price Index"));
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn upstream_failure_surfaces_status() {
        let stub = Arc::new(StubFred::failing(500));
        let tool = SearchSeriesTool::new(stub.clone());

        let result = tool
            .execute(serde_json::json!({"query": "inflation"}))
            .await
            .unwrap();
        assert!(result.is_error());
        assert!(result.content[0].as_text().contains("500"));
    }
}
