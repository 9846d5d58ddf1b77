// Analysis tools: comparison, statistics, trend detection

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    format_value, json_schema_array, json_schema_object, json_schema_string, parse_date_range,
    truncate_output, upstream_error, Tool,
};
use anyhow::Result;
use chrono::NaiveDate;
use fred_client::{FredApi, ObservationQuery};
use fred_core::stats;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;

/// Tool to compare two or more series over a shared window.
pub struct CompareSeriesTool {
    api: Arc<dyn FredApi>,
}

impl CompareSeriesTool {
    pub fn new(api: Arc<dyn FredApi>) -> Self {
        Self { api }
    }
}

#[derive(Debug, Deserialize)]
struct CompareSeriesArgs {
    series_ids: Vec<String>,
    #[serde(default)]
    observation_start: Option<String>,
    #[serde(default)]
    observation_end: Option<String>,
}

#[async_trait::async_trait]
impl Tool for CompareSeriesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "fred_compare_series".to_string(),
            description: "Compare multiple FRED data series over a shared date range".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "series_ids": json_schema_array(
                        json_schema_string("FRED series ID"),
                        "Series IDs to compare (at least 2)"
                    ),
                    "observation_start": json_schema_string("Start date (YYYY-MM-DD)"),
                    "observation_end": json_schema_string("End date (YYYY-MM-DD)")
                }),
                vec!["series_ids"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: CompareSeriesArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => {
                return Ok(CallToolResult::error(format!(
                    "Invalid arguments for fred_compare_series: {}",
                    e
                )))
            }
        };

        if args.series_ids.len() < 2 {
            return Ok(CallToolResult::error(format!(
                "fred_compare_series needs at least 2 series_ids, got {}",
                args.series_ids.len()
            )));
        }
        let (start, end) = match parse_date_range(
            args.observation_start.as_deref(),
            args.observation_end.as_deref(),
        ) {
            Ok(range) => range,
            Err(message) => return Ok(CallToolResult::error(message)),
        };

        let query = ObservationQuery {
            start,
            end,
            ..Default::default()
        };

        let mut titles = Vec::with_capacity(args.series_ids.len());
        let mut columns = Vec::with_capacity(args.series_ids.len());
        for series_id in &args.series_ids {
            let info = match self.api.series_info(series_id).await {
                Ok(info) => info,
                Err(e) => return Ok(upstream_error(e)),
            };
            let observations = match self.api.observations(series_id, &query).await {
                Ok(observations) => observations,
                Err(e) => return Ok(upstream_error(e)),
            };
            titles.push(info);
            columns.push(observations);
        }

        // Align by date: one row per date seen in any series, in date order.
        let mut rows: BTreeMap<NaiveDate, Vec<Option<f64>>> = BTreeMap::new();
        for (idx, observations) in columns.iter().enumerate() {
            for obs in observations {
                rows.entry(obs.date)
                    .or_insert_with(|| vec![None; args.series_ids.len()])[idx] = obs.value;
            }
        }

        let mut out = format!("Comparing {} series\n", args.series_ids.len());
        for info in &titles {
            let _ = writeln!(out, "{}: {} ({})", info.id, info.title, info.units);
        }

        let _ = writeln!(out, "\ndate        {}", args.series_ids.join("  "));
        for (date, values) in &rows {
            let cells: Vec<String> = values.iter().map(|v| format_value(*v)).collect();
            let _ = writeln!(out, "{}  {}", date, cells.join("  "));
        }

        out.push_str("\nsummary:\n");
        for (idx, info) in titles.iter().enumerate() {
            let values = stats::numeric_values(&columns[idx]);
            match (stats::mean(&values), stats::percent_change(&values)) {
                (Ok(mean), Ok(change)) => {
                    let _ = writeln!(
                        out,
                        "{}: {} numeric observations, mean {:.4}, change {:+.2}%",
                        info.id,
                        values.len(),
                        mean,
                        change
                    );
                }
                _ => {
                    let _ = writeln!(
                        out,
                        "{}: {} numeric observations (not enough data to summarize)",
                        info.id,
                        values.len()
                    );
                }
            }
        }

        Ok(CallToolResult::text(truncate_output(out)))
    }
}

/// Tool to compute descriptive statistics for a series window.
pub struct CalculateStatisticsTool {
    api: Arc<dyn FredApi>,
}

impl CalculateStatisticsTool {
    pub fn new(api: Arc<dyn FredApi>) -> Self {
        Self { api }
    }
}

#[derive(Debug, Deserialize)]
struct CalculateStatisticsArgs {
    series_id: String,
    #[serde(default)]
    observation_start: Option<String>,
    #[serde(default)]
    observation_end: Option<String>,
}

#[async_trait::async_trait]
impl Tool for CalculateStatisticsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "fred_calculate_statistics".to_string(),
            description: "Calculate basic statistics for a FRED series".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "series_id": json_schema_string("FRED series ID"),
                    "observation_start": json_schema_string("Start date (YYYY-MM-DD)"),
                    "observation_end": json_schema_string("End date (YYYY-MM-DD)")
                }),
                vec!["series_id"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: CalculateStatisticsArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => {
                return Ok(CallToolResult::error(format!(
                    "Invalid arguments for fred_calculate_statistics: {}",
                    e
                )))
            }
        };

        let (start, end) = match parse_date_range(
            args.observation_start.as_deref(),
            args.observation_end.as_deref(),
        ) {
            Ok(range) => range,
            Err(message) => return Ok(CallToolResult::error(message)),
        };

        let info = match self.api.series_info(&args.series_id).await {
            Ok(info) => info,
            Err(e) => return Ok(upstream_error(e)),
        };
        let query = ObservationQuery {
            start,
            end,
            ..Default::default()
        };
        let observations = match self.api.observations(&args.series_id, &query).await {
            Ok(observations) => observations,
            Err(e) => return Ok(upstream_error(e)),
        };

        let values = stats::numeric_values(&observations);
        let summary = match stats::describe(&values) {
            Ok(summary) => summary,
            Err(e) => return Ok(CallToolResult::error(e.to_string())),
        };

        let mut out = format!("Statistics for {}: {}\n", info.id, info.title);
        if !observations.is_empty() {
            let _ = writeln!(
                out,
                "window: {} to {} ({} observations, {} numeric)",
                observations[0].date,
                observations[observations.len() - 1].date,
                observations.len(),
                summary.count
            );
        }
        let _ = writeln!(out, "count: {}", summary.count);
        let _ = writeln!(out, "mean: {:.4}", summary.mean);
        let _ = writeln!(out, "std dev: {:.4}", summary.std_dev);
        let _ = writeln!(out, "min: {}", summary.min);
        let _ = writeln!(out, "max: {}", summary.max);

        Ok(CallToolResult::text(out))
    }
}

/// Tool to classify the direction of a series window.
pub struct DetectTrendsTool {
    api: Arc<dyn FredApi>,
}

impl DetectTrendsTool {
    pub fn new(api: Arc<dyn FredApi>) -> Self {
        Self { api }
    }
}

#[derive(Debug, Deserialize)]
struct DetectTrendsArgs {
    series_id: String,
    #[serde(default)]
    observation_start: Option<String>,
    #[serde(default)]
    observation_end: Option<String>,
}

#[async_trait::async_trait]
impl Tool for DetectTrendsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "fred_detect_trends".to_string(),
            description: "Identify the trend direction of a FRED series".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "series_id": json_schema_string("FRED series ID"),
                    "observation_start": json_schema_string("Start date (YYYY-MM-DD)"),
                    "observation_end": json_schema_string("End date (YYYY-MM-DD)")
                }),
                vec!["series_id"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: DetectTrendsArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => {
                return Ok(CallToolResult::error(format!(
                    "Invalid arguments for fred_detect_trends: {}",
                    e
                )))
            }
        };

        let (start, end) = match parse_date_range(
            args.observation_start.as_deref(),
            args.observation_end.as_deref(),
        ) {
            Ok(range) => range,
            Err(message) => return Ok(CallToolResult::error(message)),
        };

        let info = match self.api.series_info(&args.series_id).await {
            Ok(info) => info,
            Err(e) => return Ok(upstream_error(e)),
        };
        let query = ObservationQuery {
            start,
            end,
            ..Default::default()
        };
        let observations = match self.api.observations(&args.series_id, &query).await {
            Ok(observations) => observations,
            Err(e) => return Ok(upstream_error(e)),
        };

        let summary = match stats::trend(&observations) {
            Ok(summary) => summary,
            Err(e) => return Ok(CallToolResult::error(e.to_string())),
        };

        let first_date = observations.iter().find(|o| o.value.is_some());
        let last_date = observations.iter().rev().find(|o| o.value.is_some());

        let mut out = format!("Trend analysis for {}: {}\n", info.id, info.title);
        if let (Some(first), Some(last)) = (first_date, last_date) {
            let _ = writeln!(
                out,
                "window: {} to {} ({} numeric observations)",
                first.date, last.date, summary.count
            );
        }
        let _ = writeln!(out, "direction: {}", summary.direction);
        let _ = writeln!(out, "slope: {:.6} per observation", summary.slope);
        match summary.percent_change {
            Some(change) => {
                let _ = writeln!(out, "percent change: {:+.2}%", change);
            }
            None => out.push_str("percent change: n/a (zero baseline)\n"),
        }
        let _ = writeln!(out, "first: {} | last: {}", summary.first, summary.last);

        Ok(CallToolResult::text(out))
    }
}
