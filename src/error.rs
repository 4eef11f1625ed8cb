//! Error types for vitalbench

use thiserror::Error;

/// Errors that can occur while loading reference data or processing measurements.
///
/// A comparison that cannot be made (unsupported metric or age) is not an error;
/// it is reported as `None` by the comparator.
#[derive(Debug, Error)]
pub enum BenchmarkError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid benchmark table: {0}")]
    InvalidBenchmark(String),

    #[error("Unknown metric type: {0}")]
    UnknownMetric(String),

    #[error("Invalid measurement: {0}")]
    InvalidMeasurement(String),

    #[error("Invalid birthdate: {0}")]
    InvalidBirthdate(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}
