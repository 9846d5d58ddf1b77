// Data retrieval tools: observations, metadata, categories, releases

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    format_value, json_schema_integer, json_schema_object, json_schema_string, parse_code,
    parse_date_range, parse_limit, parse_offset, truncate_output, upstream_error, Tool,
    DEFAULT_LIMIT, FREQUENCIES, UNITS,
};
use anyhow::Result;
use fred_client::{FredApi, ObservationQuery};
use fred_core::SeriesInfo;
use serde::Deserialize;
use std::fmt::Write as _;
use std::sync::Arc;

fn series_header(info: &SeriesInfo) -> String {
    format!(
        "{}: {}\nunits: {} | frequency: {} | seasonal adjustment: {}\n",
        info.id, info.title, info.units, info.frequency, info.seasonal_adjustment
    )
}

/// Tool to retrieve the observations of a series.
pub struct GetSeriesDataTool {
    api: Arc<dyn FredApi>,
}

impl GetSeriesDataTool {
    pub fn new(api: Arc<dyn FredApi>) -> Self {
        Self { api }
    }
}

#[derive(Debug, Deserialize)]
struct GetSeriesDataArgs {
    series_id: String,
    #[serde(default)]
    observation_start: Option<String>,
    #[serde(default)]
    observation_end: Option<String>,
    #[serde(default)]
    frequency: Option<String>,
    #[serde(default)]
    units: Option<String>,
}

#[async_trait::async_trait]
impl Tool for GetSeriesDataTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "fred_get_series_data".to_string(),
            description: "Retrieve time series data for a specific FRED series".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "series_id": json_schema_string("FRED series ID (e.g., 'GDP', 'UNRATE')"),
                    "observation_start": json_schema_string("Start date (YYYY-MM-DD)"),
                    "observation_end": json_schema_string("End date (YYYY-MM-DD)"),
                    "frequency": json_schema_string("Data frequency (d, w, bw, m, q, sa, a)"),
                    "units": json_schema_string("Units transformation (lin, chg, pch, ...)")
                }),
                vec!["series_id"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: GetSeriesDataArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => {
                return Ok(CallToolResult::error(format!(
                    "Invalid arguments for fred_get_series_data: {}",
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
        let frequency = match parse_code("frequency", args.frequency.as_deref(), FREQUENCIES) {
            Ok(frequency) => frequency,
            Err(message) => return Ok(CallToolResult::error(message)),
        };
        let units = match parse_code("units", args.units.as_deref(), UNITS) {
            Ok(units) => units,
            Err(message) => return Ok(CallToolResult::error(message)),
        };

        let info = match self.api.series_info(&args.series_id).await {
            Ok(info) => info,
            Err(e) => return Ok(upstream_error(e)),
        };
        let query = ObservationQuery {
            start,
            end,
            frequency,
            units,
        };
        let observations = match self.api.observations(&args.series_id, &query).await {
            Ok(observations) => observations,
            Err(e) => return Ok(upstream_error(e)),
        };

        let mut out = series_header(&info);
        if observations.is_empty() {
            out.push_str("no observations in the requested range\n");
            return Ok(CallToolResult::text(out));
        }

        let _ = writeln!(
            out,
            "{} observations from {} to {}\n",
            observations.len(),
            observations[0].date,
            observations[observations.len() - 1].date
        );
        out.push_str("date        value\n");
        for obs in &observations {
            let _ = writeln!(out, "{}  {}", obs.date, format_value(obs.value));
        }

        Ok(CallToolResult::text(truncate_output(out)))
    }
}

/// Tool to fetch series metadata.
pub struct GetSeriesMetadataTool {
    api: Arc<dyn FredApi>,
}

impl GetSeriesMetadataTool {
    pub fn new(api: Arc<dyn FredApi>) -> Self {
        Self { api }
    }
}

#[derive(Debug, Deserialize)]
struct GetSeriesMetadataArgs {
    series_id: String,
}

#[async_trait::async_trait]
impl Tool for GetSeriesMetadataTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "fred_get_series_metadata".to_string(),
            description: "Get metadata for a specific FRED series".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "series_id": json_schema_string("FRED series ID (e.g., 'GDP', 'UNRATE')")
                }),
                vec!["series_id"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: GetSeriesMetadataArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => {
                return Ok(CallToolResult::error(format!(
                    "Invalid arguments for fred_get_series_metadata: {}",
                    e
                )))
            }
        };

        let info = match self.api.series_info(&args.series_id).await {
            Ok(info) => info,
            Err(e) => return Ok(upstream_error(e)),
        };

        let mut out = String::new();
        let _ = writeln!(out, "id: {}", info.id);
        let _ = writeln!(out, "title: {}", info.title);
        let _ = writeln!(out, "units: {}", info.units);
        let _ = writeln!(out, "frequency: {}", info.frequency);
        let _ = writeln!(out, "seasonal adjustment: {}", info.seasonal_adjustment);
        let _ = writeln!(out, "observation start: {}", info.observation_start);
        let _ = writeln!(out, "observation end: {}", info.observation_end);
        let _ = writeln!(out, "last updated: {}", info.last_updated);
        if let Some(popularity) = info.popularity {
            let _ = writeln!(out, "popularity: {}", popularity);
        }
        if let Some(ref notes) = info.notes {
            let _ = writeln!(out, "notes: {}", notes);
        }

        Ok(CallToolResult::text(truncate_output(out)))
    }
}

/// Tool to list the series filed under a category.
pub struct GetCategorySeriesTool {
    api: Arc<dyn FredApi>,
}

impl GetCategorySeriesTool {
    pub fn new(api: Arc<dyn FredApi>) -> Self {
        Self { api }
    }
}

#[derive(Debug, Deserialize)]
struct GetCategorySeriesArgs {
    category_id: i64,
    #[serde(default)]
    limit: Option<i64>,
    #[serde(default)]
    offset: Option<i64>,
}

#[async_trait::async_trait]
impl Tool for GetCategorySeriesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "fred_get_category_series".to_string(),
            description: "List series in a FRED category".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "category_id": json_schema_integer("FRED category ID"),
                    "limit": json_schema_integer("Maximum number of results to return (default: 10)"),
                    "offset": json_schema_integer("Number of results to skip (default: 0)")
                }),
                vec!["category_id"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: GetCategorySeriesArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => {
                return Ok(CallToolResult::error(format!(
                    "Invalid arguments for fred_get_category_series: {}",
                    e
                )))
            }
        };

        if args.category_id < 0 {
            return Ok(CallToolResult::error(format!(
                "category_id must not be negative, got {}",
                args.category_id
            )));
        }
        let limit = match parse_limit(args.limit, DEFAULT_LIMIT) {
            Ok(limit) => limit,
            Err(message) => return Ok(CallToolResult::error(message)),
        };
        let offset = match parse_offset(args.offset) {
            Ok(offset) => offset,
            Err(message) => return Ok(CallToolResult::error(message)),
        };

        let series = match self
            .api
            .category_series(args.category_id, limit, offset)
            .await
        {
            Ok(series) => series,
            Err(e) => return Ok(upstream_error(e)),
        };

        let mut out = format!(
            "Category {}: {} series (offset {})\n",
            args.category_id,
            series.len(),
            offset
        );
        for info in &series {
            let _ = write!(
                out,
                "\n{}: {}\n  frequency: {} | units: {}\n",
                info.id, info.title, info.frequency, info.units
            );
        }

        Ok(CallToolResult::text(truncate_output(out)))
    }
}

/// Tool to list economic data releases.
pub struct GetReleasesTool {
    api: Arc<dyn FredApi>,
}

impl GetReleasesTool {
    pub fn new(api: Arc<dyn FredApi>) -> Self {
        Self { api }
    }
}

#[derive(Debug, Deserialize)]
struct GetReleasesArgs {
    #[serde(default)]
    limit: Option<i64>,
    #[serde(default)]
    offset: Option<i64>,
}

#[async_trait::async_trait]
impl Tool for GetReleasesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "fred_get_releases".to_string(),
            description: "Get economic data releases from FRED".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "limit": json_schema_integer("Maximum number of results to return (default: 10)"),
                    "offset": json_schema_integer("Number of results to skip (default: 0)")
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        // Both arguments are optional; a null/absent object is fine.
        let args: GetReleasesArgs = if arguments.is_null() {
            GetReleasesArgs {
                limit: None,
                offset: None,
            }
        } else {
            match serde_json::from_value(arguments) {
                Ok(args) => args,
                Err(e) => {
                    return Ok(CallToolResult::error(format!(
                        "Invalid arguments for fred_get_releases: {}",
                        e
                    )))
                }
            }
        };

        let limit = match parse_limit(args.limit, DEFAULT_LIMIT) {
            Ok(limit) => limit,
            Err(message) => return Ok(CallToolResult::error(message)),
        };
        let offset = match parse_offset(args.offset) {
            Ok(offset) => offset,
            Err(message) => return Ok(CallToolResult::error(message)),
        };

        let releases = match self.api.releases(limit, offset).await {
            Ok(releases) => releases,
            Err(e) => return Ok(upstream_error(e)),
        };

        let mut out = format!("{} release(s) (offset {})\n", releases.len(), offset);
        for release in &releases {
            let _ = write!(out, "\n{}: {}", release.id, release.name);
            if release.press_release {
                out.push_str(" [press release]");
            }
            out.push('\n');
            if let Some(ref link) = release.link {
                let _ = writeln!(out, "  link: {}", link);
            }
        }

        Ok(CallToolResult::text(truncate_output(out)))
    }
}
