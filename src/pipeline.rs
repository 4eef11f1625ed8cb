//! Pipeline orchestration
//!
//! This module provides the public string-in/string-out API for vitalbench.
//! It runs measurements through series grouping, benchmark comparison and
//! report encoding.

use std::sync::Arc;

use crate::benchmark::BenchmarkTable;
use crate::comparison::BenchmarkComparator;
use crate::encoder::ReportEncoder;
use crate::error::BenchmarkError;
use crate::measurement::{self, group_into_series, MeasurementResponse};
use crate::types::{ComparisonReport, Gender, MetricType, UserComparison};

/// Compare a single value against the bundled benchmark table.
///
/// # Arguments
/// * `metric` - Metric wire name (e.g. "VO2_MAX")
/// * `value` - Raw measurement in the metric's natural unit
/// * `age` - User age in whole years
///
/// # Returns
/// The comparison as JSON, or `null` when no comparison is available
///
/// # Example
/// ```ignore
/// let json = compare_json("RESTING_HEART_RATE", 58.0, 34)?;
/// ```
pub fn compare_json(metric: &str, value: f64, age: u32) -> Result<String, BenchmarkError> {
    let metric: MetricType = metric.parse()?;
    let table = BenchmarkTable::builtin();
    let comparison = BenchmarkComparator::new(&table).compare(metric, value, age);
    serde_json::to_string_pretty(&comparison)
        .map_err(|e| BenchmarkError::EncodingError(e.to_string()))
}

/// Convert a JSON array of measurements into a comparison report.
///
/// # Arguments
/// * `measurements_json` - JSON array of backend measurement records
/// * `age` - User age in whole years
///
/// # Returns
/// Report JSON with one entry per metric type
pub fn measurements_to_report(
    measurements_json: String,
    age: u32,
) -> Result<String, BenchmarkError> {
    BenchmarkProcessor::new().report_json(&measurements_json, age)
}

/// Stateful processor holding a benchmark table and encoder.
///
/// The table is shared behind an `Arc` and never mutated, so a processor's
/// table can be handed to other threads; `load_table` swaps in a new one.
pub struct BenchmarkProcessor {
    table: Arc<BenchmarkTable>,
    encoder: ReportEncoder,
    gender: Option<Gender>,
}

impl Default for BenchmarkProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl BenchmarkProcessor {
    /// Create a processor over the bundled benchmark table
    pub fn new() -> Self {
        Self::with_table(Arc::new(BenchmarkTable::builtin()))
    }

    /// Create a processor over a specific benchmark table
    pub fn with_table(table: Arc<BenchmarkTable>) -> Self {
        Self {
            table,
            encoder: ReportEncoder::new(),
            gender: None,
        }
    }

    /// Prefer benchmarks collected for `gender`
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    /// Use a fixed encoder instance id
    pub fn with_instance_id(mut self, instance_id: String) -> Self {
        self.encoder = ReportEncoder::with_instance_id(instance_id);
        self
    }

    pub fn table(&self) -> &Arc<BenchmarkTable> {
        &self.table
    }

    /// Replace the benchmark table with one loaded from JSON
    pub fn load_table(&mut self, json: &str) -> Result<(), BenchmarkError> {
        self.table = Arc::new(BenchmarkTable::from_json(json)?);
        Ok(())
    }

    /// Save the benchmark table to JSON
    pub fn save_table(&self) -> Result<String, BenchmarkError> {
        self.table
            .to_json()
            .map_err(|e| BenchmarkError::EncodingError(e.to_string()))
    }

    /// Compare a single value
    pub fn compare(&self, metric: MetricType, value: f64, age: u32) -> Option<UserComparison> {
        BenchmarkComparator::new(&self.table)
            .try_compare(metric, value, age, self.gender)
            .ok()
    }

    /// Build a report comparing the latest measurement of every metric type
    pub fn report(&self, measurements: &[MeasurementResponse], age: u32) -> ComparisonReport {
        let comparator = BenchmarkComparator::new(&self.table);
        let outcomes = group_into_series(measurements)
            .iter()
            .map(|series| {
                (
                    series.measurement_type,
                    comparator.compare_series(series, age, self.gender),
                )
            })
            .collect();

        self.encoder.encode(age, outcomes)
    }

    /// Parse a JSON array of measurements and encode its report to JSON
    pub fn report_json(&self, measurements_json: &str, age: u32) -> Result<String, BenchmarkError> {
        let measurements = measurement::parse_array(measurements_json)?;
        let report = self.report(&measurements, age);
        serde_json::to_string_pretty(&report)
            .map_err(|e| BenchmarkError::EncodingError(e.to_string()))
    }
}
