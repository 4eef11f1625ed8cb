//! Core types for vitalbench
//!
//! This module defines the metric vocabulary, the population reference data
//! layout, and the comparison record handed to callers.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::comparison::Unavailable;
use crate::error::BenchmarkError;

/// Physiological metric tracked by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricType {
    HeartRate,
    RestingHeartRate,
    #[serde(rename = "VO2_MAX")]
    Vo2Max,
    Steps,
}

impl MetricType {
    /// Every supported metric, in display order
    pub const ALL: [MetricType; 4] = [
        MetricType::HeartRate,
        MetricType::RestingHeartRate,
        MetricType::Vo2Max,
        MetricType::Steps,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::HeartRate => "HEART_RATE",
            MetricType::RestingHeartRate => "RESTING_HEART_RATE",
            MetricType::Vo2Max => "VO2_MAX",
            MetricType::Steps => "STEPS",
        }
    }

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            MetricType::HeartRate => "Heart Rate",
            MetricType::RestingHeartRate => "Resting Heart Rate",
            MetricType::Vo2Max => "VO2 Max",
            MetricType::Steps => "Steps",
        }
    }

    /// Natural unit of raw values
    pub fn unit(&self) -> &'static str {
        match self {
            MetricType::HeartRate | MetricType::RestingHeartRate => "bpm",
            MetricType::Vo2Max => "ml/kg/min",
            MetricType::Steps => "steps",
        }
    }

    /// Series color used by the presentation layer
    pub fn color(&self) -> &'static str {
        match self {
            MetricType::HeartRate => "#ef4444",
            MetricType::RestingHeartRate => "#f97316",
            MetricType::Vo2Max => "#3b82f6",
            MetricType::Steps => "#10b981",
        }
    }

    /// Whether a smaller raw value indicates better health
    pub fn is_lower_better(&self) -> bool {
        match self {
            MetricType::RestingHeartRate => true,
            MetricType::HeartRate | MetricType::Vo2Max | MetricType::Steps => false,
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricType {
    type Err = BenchmarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        MetricType::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| BenchmarkError::UnknownMetric(s.to_string()))
    }
}

/// Population a benchmark table was collected from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    All,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::All => "all",
        }
    }
}

/// Five-tier qualitative rating of a normalized percentile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rating {
    Poor,
    BelowAverage,
    Average,
    Good,
    Excellent,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Poor => "poor",
            Rating::BelowAverage => "below-average",
            Rating::Average => "average",
            Rating::Good => "good",
            Rating::Excellent => "excellent",
        }
    }

    /// Badge text shown to the user
    pub fn label(&self) -> &'static str {
        match self {
            Rating::Poor => "Needs Improvement",
            Rating::BelowAverage => "Below Average",
            Rating::Average => "Average",
            Rating::Good => "Good",
            Rating::Excellent => "Excellent",
        }
    }

    /// Badge color
    pub fn color(&self) -> &'static str {
        match self {
            Rating::Poor => "#ef4444",
            Rating::BelowAverage => "#f97316",
            Rating::Average => "#f59e0b",
            Rating::Good => "#3b82f6",
            Rating::Excellent => "#10b981",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Population distribution anchors for one age bracket.
///
/// Values are in the metric's natural unit and must be non-decreasing:
/// `p10 <= p25 <= p50 <= p75 <= p90`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
}

impl Percentiles {
    pub fn new(p10: f64, p25: f64, p50: f64, p75: f64, p90: f64) -> Self {
        Self {
            p10,
            p25,
            p50,
            p75,
            p90,
        }
    }

    /// Anchors in ascending percentile order
    pub fn as_array(&self) -> [f64; 5] {
        [self.p10, self.p25, self.p50, self.p75, self.p90]
    }

    pub fn is_finite(&self) -> bool {
        self.as_array().iter().all(|v| v.is_finite())
    }

    pub fn is_non_decreasing(&self) -> bool {
        self.as_array().windows(2).all(|pair| pair[0] <= pair[1])
    }
}

/// Benchmark row for one age bracket of a metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeGroupBenchmark {
    /// Display label, e.g. "30-39"
    pub age_group: String,
    /// Inclusive lower bound
    pub age_min: u32,
    /// Inclusive upper bound
    pub age_max: u32,
    pub percentiles: Percentiles,
    /// Representative central value (not necessarily p50)
    pub average: f64,
    pub unit: String,
}

impl AgeGroupBenchmark {
    pub fn contains(&self, age: u32) -> bool {
        age >= self.age_min && age <= self.age_max
    }
}

/// All age brackets for one metric and population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricBenchmark {
    pub metric_type: MetricType,
    pub metric_name: String,
    #[serde(default)]
    pub gender: Gender,
    pub age_groups: Vec<AgeGroupBenchmark>,
}

impl MetricBenchmark {
    /// Find the bracket containing `age` (inclusive on both ends)
    pub fn age_group(&self, age: u32) -> Option<&AgeGroupBenchmark> {
        self.age_groups.iter().find(|group| group.contains(age))
    }
}

/// Result of comparing one user value against its age bracket.
///
/// `difference_percentage` is non-finite when the bracket average is zero
/// (infinity, or NaN when the difference is zero too). JSON carries it as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserComparison {
    pub metric_type: MetricType,
    pub user_value: f64,
    pub age_group: String,
    /// Direction-normalized percentile (0-100, higher is healthier)
    pub percentile: f64,
    pub percentiles: Percentiles,
    pub average: f64,
    pub difference: f64,
    #[serde(deserialize_with = "nullable_f64")]
    pub difference_percentage: f64,
    pub rating: Rating,
}

/// Reads `null` back as NaN, the inverse of how serde_json writes non-finite floats
fn nullable_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// Report producer metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// One metric's outcome within a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportEntry {
    /// A comparison was made
    Available {
        metric_label: String,
        rating_label: String,
        comparison: UserComparison,
    },
    /// Displayed as "insufficient data" rather than an error
    InsufficientData {
        metric_type: MetricType,
        metric_label: String,
        reason: Unavailable,
    },
}

impl ReportEntry {
    pub fn metric_type(&self) -> MetricType {
        match self {
            ReportEntry::Available { comparison, .. } => comparison.metric_type,
            ReportEntry::InsufficientData { metric_type, .. } => *metric_type,
        }
    }

    pub fn comparison(&self) -> Option<&UserComparison> {
        match self {
            ReportEntry::Available { comparison, .. } => Some(comparison),
            ReportEntry::InsufficientData { .. } => None,
        }
    }
}

/// Complete comparison report for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub report_version: String,
    pub producer: ReportProducer,
    pub age: u32,
    pub computed_at_utc: String,
    pub entries: Vec<ReportEntry>,
}
