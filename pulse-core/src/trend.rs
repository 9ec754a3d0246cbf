//! Trend normalization: turn a raw measurement history into a chart-ready
//! series of [0,1] fractions.

use crate::kpi::Measurement;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrendError {
    /// Trend requested with zero data points; callers render a distinct
    /// "no data" state instead of an empty chart.
    #[error("no measurements recorded for this metric")]
    EmptyHistory,
}

/// One normalized point. Fractions are in [0,1]; scaling to pixels or
/// terminal cells is the caller's concern.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendPoint {
    pub fraction_x: f64,
    pub fraction_y: f64,
    pub value: f64,
    pub measured_at: DateTime<Utc>,
}

/// A chart-ready series: points in ascending date order plus the value
/// extrema for axis labeling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendSeries {
    pub points: Vec<TrendPoint>,
    pub min_value: f64,
    pub max_value: f64,
}

impl TrendSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&TrendPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&TrendPoint> {
        self.points.last()
    }
}

/// Build a normalized trend series from a measurement history.
///
/// The input need not be sorted; a copy is sorted ascending by date with
/// ties keeping their original order. The input itself is never mutated.
/// Horizontal positions are i/(n-1), 0 for a single point. Vertical
/// positions are (value - min)/(max - min), or 0.5 for every point when
/// all values are equal.
pub fn build_trend(history: &[Measurement]) -> Result<TrendSeries, TrendError> {
    if history.is_empty() {
        return Err(TrendError::EmptyHistory);
    }

    let mut sorted: Vec<&Measurement> = history.iter().collect();
    sorted.sort_by_key(|m| m.measured_at);

    let min_value = sorted.iter().map(|m| m.value).fold(f64::INFINITY, f64::min);
    let max_value = sorted
        .iter()
        .map(|m| m.value)
        .fold(f64::NEG_INFINITY, f64::max);
    let range = max_value - min_value;

    let n = sorted.len();
    let points = sorted
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let fraction_x = if n == 1 { 0.0 } else { i as f64 / (n - 1) as f64 };
            let fraction_y = if range == 0.0 {
                0.5
            } else {
                (m.value - min_value) / range
            };
            TrendPoint {
                fraction_x,
                fraction_y,
                value: m.value,
                measured_at: m.measured_at,
            }
        })
        .collect();

    Ok(TrendSeries {
        points,
        min_value,
        max_value,
    })
}
