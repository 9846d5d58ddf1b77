use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single dated observation in an economic time series.
///
/// FRED reports missing values as the string "."; those arrive here as
/// `None` and are excluded from every computation. Observation sequences
/// are ascending by date as delivered by the API and are never reordered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesObservation {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl SeriesObservation {
    pub fn new(date: NaiveDate, value: Option<f64>) -> Self {
        Self { date, value }
    }
}

/// Descriptive metadata for a FRED series.
///
/// Date and timestamp fields are kept as the API's own strings; they are
/// display-only and FRED's `last_updated` format is not a clean RFC 3339
/// timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesInfo {
    pub id: String,
    pub title: String,
    pub units: String,
    pub frequency: String,
    pub seasonal_adjustment: String,
    pub observation_start: String,
    pub observation_end: String,
    pub last_updated: String,
    #[serde(default)]
    pub popularity: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A node in FRED's category hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
}

/// An economic data release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub press_release: bool,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub realtime_start: Option<String>,
    #[serde(default)]
    pub realtime_end: Option<String>,
}

/// Direction of a series over an analysis window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Flat,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Flat => "flat",
        };
        write!(f, "{}", s)
    }
}

/// Descriptive statistics over the non-missing values of a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Trend classification over an analysis window.
///
/// `percent_change` is `None` when the first value of the window is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub direction: TrendDirection,
    pub slope: f64,
    pub percent_change: Option<f64>,
    pub first: f64,
    pub last: f64,
    pub count: usize,
}
