//! Report encoding
//!
//! This module encodes comparison outcomes into the report payload consumed by
//! the presentation layer. Unavailable comparisons are kept as explicit
//! "insufficient data" entries so they can be displayed rather than dropped.

use crate::comparison::Unavailable;
use crate::error::BenchmarkError;
use crate::types::{ComparisonReport, MetricType, ReportEntry, ReportProducer, UserComparison};
use crate::{PRODUCER_NAME, VITALBENCH_VERSION};
use chrono::Utc;
use uuid::Uuid;

/// Current report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Outcome of comparing one metric
pub type ComparisonOutcome = (MetricType, Result<UserComparison, Unavailable>);

/// Report encoder producing report payloads
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Encode comparison outcomes for a user of `age`
    pub fn encode(&self, age: u32, outcomes: Vec<ComparisonOutcome>) -> ComparisonReport {
        let producer = ReportProducer {
            name: PRODUCER_NAME.to_string(),
            version: VITALBENCH_VERSION.to_string(),
            instance_id: self.instance_id.clone(),
        };

        let entries = outcomes
            .into_iter()
            .map(|(metric, outcome)| match outcome {
                Ok(comparison) => ReportEntry::Available {
                    metric_label: metric.label().to_string(),
                    rating_label: comparison.rating.label().to_string(),
                    comparison,
                },
                Err(reason) => ReportEntry::InsufficientData {
                    metric_type: metric,
                    metric_label: metric.label().to_string(),
                    reason,
                },
            })
            .collect();

        ComparisonReport {
            report_version: REPORT_VERSION.to_string(),
            producer,
            age,
            computed_at_utc: Utc::now().to_rfc3339(),
            entries,
        }
    }

    /// Encode to JSON string
    pub fn encode_to_json(
        &self,
        age: u32,
        outcomes: Vec<ComparisonOutcome>,
    ) -> Result<String, BenchmarkError> {
        let report = self.encode(age, outcomes);
        serde_json::to_string_pretty(&report)
            .map_err(|e| BenchmarkError::EncodingError(e.to_string()))
    }
}
