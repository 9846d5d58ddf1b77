//! Series metadata and observation endpoints.

use crate::error::{FredError, FredResult};
use crate::transport::HttpTransport;
use chrono::NaiveDate;
use fred_core::{SeriesInfo, SeriesObservation};
use serde::Deserialize;

/// Optional filters for an observations request.
#[derive(Debug, Clone, Default)]
pub struct ObservationQuery {
    /// Earliest observation date to include (YYYY-MM-DD).
    pub start: Option<NaiveDate>,
    /// Latest observation date to include (YYYY-MM-DD).
    pub end: Option<NaiveDate>,
    /// Aggregation frequency code (d, w, bw, m, q, sa, a).
    pub frequency: Option<String>,
    /// Units transformation code (lin, chg, pch, ...).
    pub units: Option<String>,
}

/// Series metadata as FRED returns it: a one-element `seriess` array.
#[derive(Debug, Deserialize)]
struct SeriesResponse {
    #[serde(default)]
    seriess: Vec<SeriesInfoWire>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SeriesInfoWire {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    units: String,
    #[serde(default)]
    frequency: String,
    #[serde(default)]
    seasonal_adjustment: String,
    #[serde(default)]
    observation_start: String,
    #[serde(default)]
    observation_end: String,
    #[serde(default)]
    last_updated: String,
    #[serde(default)]
    popularity: Option<i64>,
    #[serde(default)]
    notes: Option<String>,
}

impl From<SeriesInfoWire> for SeriesInfo {
    fn from(wire: SeriesInfoWire) -> Self {
        SeriesInfo {
            id: wire.id,
            title: wire.title,
            units: wire.units,
            frequency: wire.frequency,
            seasonal_adjustment: wire.seasonal_adjustment,
            observation_start: wire.observation_start,
            observation_end: wire.observation_end,
            last_updated: wire.last_updated,
            popularity: wire.popularity,
            notes: wire.notes,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    #[serde(default)]
    observations: Vec<ObservationWire>,
}

/// One observation on the wire. Both fields are strings; the value is
/// "." when the data point is missing.
#[derive(Debug, Deserialize)]
struct ObservationWire {
    date: String,
    value: String,
}

impl ObservationWire {
    fn into_domain(self) -> FredResult<SeriesObservation> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|_| FredError::Decode(format!("bad observation date {:?}", self.date)))?;
        // "." is FRED's missing sentinel; any other unparsable value is
        // likewise treated as missing rather than zero.
        let value = self.value.parse::<f64>().ok();
        Ok(SeriesObservation::new(date, value))
    }
}

/// Fetch metadata for one series.
pub(crate) async fn info(transport: &HttpTransport, series_id: &str) -> FredResult<SeriesInfo> {
    let response: SeriesResponse = transport
        .get("series", &[("series_id", series_id.to_string())])
        .await?;
    response
        .seriess
        .into_iter()
        .next()
        .map(SeriesInfo::from)
        .ok_or_else(|| FredError::SeriesNotFound(series_id.to_string()))
}

/// Fetch the observations of a series, oldest first.
pub(crate) async fn observations(
    transport: &HttpTransport,
    series_id: &str,
    query: &ObservationQuery,
) -> FredResult<Vec<SeriesObservation>> {
    let mut params = vec![("series_id", series_id.to_string())];
    if let Some(start) = query.start {
        params.push(("observation_start", start.format("%Y-%m-%d").to_string()));
    }
    if let Some(end) = query.end {
        params.push(("observation_end", end.format("%Y-%m-%d").to_string()));
    }
    if let Some(ref frequency) = query.frequency {
        params.push(("frequency", frequency.clone()));
    }
    if let Some(ref units) = query.units {
        params.push(("units", units.clone()));
    }

    let response: ObservationsResponse = transport.get("series/observations", &params).await?;
    response
        .observations
        .into_iter()
        .map(ObservationWire::into_domain)
        .collect()
}
