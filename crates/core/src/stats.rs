// Descriptive statistics and trend classification over observation windows.
// Pure functions, no I/O; missing observations are excluded, never zeroed.

use crate::types::{SeriesObservation, SeriesStats, TrendDirection, TrendSummary};
use thiserror::Error;

/// Slope magnitudes at or below this threshold classify as flat.
pub const TREND_EPSILON: f64 = 1e-9;

/// Errors from statistics over too-small or degenerate samples.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("not enough data points: need at least {needed}, got {got}")]
    NotEnoughData { needed: usize, got: usize },

    #[error("percent change is undefined from a zero baseline")]
    ZeroBaseline,
}

/// The non-missing values of an observation window, in their original order.
pub fn numeric_values(observations: &[SeriesObservation]) -> Vec<f64> {
    observations.iter().filter_map(|o| o.value).collect()
}

/// Arithmetic mean. Errors on an empty sample.
pub fn mean(values: &[f64]) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::NotEnoughData { needed: 1, got: 0 });
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (divisor n - 1). Errors when fewer than 2 points.
pub fn std_dev(values: &[f64]) -> Result<f64, StatsError> {
    if values.len() < 2 {
        return Err(StatsError::NotEnoughData {
            needed: 2,
            got: values.len(),
        });
    }
    let m = mean(values)?;
    let variance =
        values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64;
    Ok(variance.sqrt())
}

/// Smallest value. Errors on an empty sample.
pub fn min(values: &[f64]) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::NotEnoughData { needed: 1, got: 0 });
    }
    Ok(values.iter().copied().fold(f64::INFINITY, f64::min))
}

/// Largest value. Errors on an empty sample.
pub fn max(values: &[f64]) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::NotEnoughData { needed: 1, got: 0 });
    }
    Ok(values.iter().copied().fold(f64::NEG_INFINITY, f64::max))
}

/// Percent change from the first to the last value of the window.
pub fn percent_change(values: &[f64]) -> Result<f64, StatsError> {
    if values.len() < 2 {
        return Err(StatsError::NotEnoughData {
            needed: 2,
            got: values.len(),
        });
    }
    let first = values[0];
    let last = values[values.len() - 1];
    if first == 0.0 {
        return Err(StatsError::ZeroBaseline);
    }
    Ok((last - first) / first.abs() * 100.0)
}

/// Count, mean, sample standard deviation, min, and max for a window.
///
/// Requires at least 2 points; below that the standard deviation is
/// undefined and the whole summary is refused.
pub fn describe(values: &[f64]) -> Result<SeriesStats, StatsError> {
    if values.len() < 2 {
        return Err(StatsError::NotEnoughData {
            needed: 2,
            got: values.len(),
        });
    }
    Ok(SeriesStats {
        count: values.len(),
        mean: mean(values)?,
        std_dev: std_dev(values)?,
        min: min(values)?,
        max: max(values)?,
    })
}

/// Least-squares slope of values against their 0-based index.
fn slope(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / n;
    let mut num = 0.0;
    let mut den = 0.0;
    for (i, v) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        num += dx * (v - mean_y);
        den += dx * dx;
    }
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// Classify the direction of an observation window.
///
/// Fits a least-squares line over the non-missing values and classifies by
/// the sign of its slope against [`TREND_EPSILON`]. Deterministic for a
/// given ordered input; requires at least 2 numeric points.
pub fn trend(observations: &[SeriesObservation]) -> Result<TrendSummary, StatsError> {
    let values = numeric_values(observations);
    if values.len() < 2 {
        return Err(StatsError::NotEnoughData {
            needed: 2,
            got: values.len(),
        });
    }

    let slope = slope(&values);
    let direction = if slope > TREND_EPSILON {
        TrendDirection::Increasing
    } else if slope < -TREND_EPSILON {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Flat
    };

    let first = values[0];
    let last = values[values.len() - 1];
    let percent_change = if first == 0.0 {
        None
    } else {
        Some((last - first) / first.abs() * 100.0)
    };

    Ok(TrendSummary {
        direction,
        slope,
        percent_change,
        first,
        last,
        count: values.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(values: &[Option<f64>]) -> Vec<SeriesObservation> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let date = NaiveDate::from_ymd_opt(2020, 1, 1)
                    .unwrap()
                    .checked_add_days(chrono::Days::new(i as u64))
                    .unwrap();
                SeriesObservation::new(date, *v)
            })
            .collect()
    }

    #[test]
    fn mean_of_empty_sample_fails() {
        assert_eq!(
            mean(&[]),
            Err(StatsError::NotEnoughData { needed: 1, got: 0 })
        );
    }

    #[test]
    fn std_dev_of_single_point_fails() {
        assert_eq!(
            std_dev(&[5.0]),
            Err(StatsError::NotEnoughData { needed: 2, got: 1 })
        );
    }

    #[test]
    fn std_dev_known_sample() {
        // Known sample standard deviation: ~2.13809
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let sd = std_dev(&values).unwrap();
        assert!((sd - 2.13809).abs() < 1e-4, "got {}", sd);
    }

    #[test]
    fn describe_matches_individual_functions() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let stats = describe(&values).unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, 2.5);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.std_dev, std_dev(&values).unwrap());
    }

    #[test]
    fn percent_change_from_zero_baseline_fails() {
        assert_eq!(percent_change(&[0.0, 5.0]), Err(StatsError::ZeroBaseline));
    }

    #[test]
    fn percent_change_basic() {
        assert_eq!(percent_change(&[100.0, 150.0]).unwrap(), 50.0);
        assert_eq!(percent_change(&[100.0, 50.0]).unwrap(), -50.0);
    }

    #[test]
    fn trend_increasing() {
        let summary = trend(&obs(&[
            Some(1.0),
            Some(2.0),
            Some(3.0),
            Some(4.0),
            Some(5.0),
        ]))
        .unwrap();
        assert_eq!(summary.direction, TrendDirection::Increasing);
        assert!(summary.slope > 0.0);
        assert_eq!(summary.percent_change, Some(400.0));
    }

    #[test]
    fn trend_decreasing() {
        let summary = trend(&obs(&[
            Some(5.0),
            Some(4.0),
            Some(3.0),
            Some(2.0),
            Some(1.0),
        ]))
        .unwrap();
        assert_eq!(summary.direction, TrendDirection::Decreasing);
        assert!(summary.slope < 0.0);
    }

    #[test]
    fn trend_flat() {
        let summary = trend(&obs(&[Some(3.0), Some(3.0), Some(3.0), Some(3.0)])).unwrap();
        assert_eq!(summary.direction, TrendDirection::Flat);
        assert_eq!(summary.slope, 0.0);
        assert_eq!(summary.percent_change, Some(0.0));
    }

    #[test]
    fn trend_excludes_missing_observations() {
        // Missing points must be dropped, not treated as zero.
        let summary = trend(&obs(&[Some(1.0), None, Some(2.0), None, Some(3.0)])).unwrap();
        assert_eq!(summary.direction, TrendDirection::Increasing);
        assert_eq!(summary.count, 3);
    }

    #[test]
    fn trend_needs_two_numeric_points() {
        assert_eq!(
            trend(&obs(&[Some(1.0), None, None])),
            Err(StatsError::NotEnoughData { needed: 2, got: 1 })
        );
    }

    #[test]
    fn numeric_values_preserves_order() {
        let values = numeric_values(&obs(&[Some(3.0), None, Some(1.0), Some(2.0)]));
        assert_eq!(values, vec![3.0, 1.0, 2.0]);
    }
}
