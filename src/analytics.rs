//! Series summary statistics

use serde::{Deserialize, Serialize};

use crate::measurement::MeasurementDataPoint;

/// Smallest and largest value of a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

/// Mean value of a series (0 when empty)
pub fn average(points: &[MeasurementDataPoint]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let sum: f64 = points.iter().map(|p| p.value).sum();
    sum / points.len() as f64
}

/// Value of the last point; series are kept oldest first
pub fn latest_value(points: &[MeasurementDataPoint]) -> Option<f64> {
    points.last().map(|p| p.value)
}

pub fn range(points: &[MeasurementDataPoint]) -> Option<ValueRange> {
    let first = points.first()?.value;
    Some(points.iter().fold(
        ValueRange {
            min: first,
            max: first,
        },
        |acc, p| ValueRange {
            min: acc.min.min(p.value),
            max: acc.max.max(p.value),
        },
    ))
}
