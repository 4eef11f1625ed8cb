//! Direction normalization
//!
//! Raw percentiles rank by raw value. For metrics where a smaller value is
//! healthier the ranking is inverted, so a normalized percentile always reads
//! as "how good you are" relative to the population.

use crate::types::MetricType;

/// Normalizer for converting raw percentiles to health-oriented percentiles
pub struct DirectionNormalizer;

impl DirectionNormalizer {
    /// Whether lower raw values are better for `metric`
    pub fn is_lower_better(metric: MetricType) -> bool {
        metric.is_lower_better()
    }

    /// Invert `raw_percentile` for lower-is-better metrics, pass it through otherwise
    pub fn normalize_percentile(raw_percentile: f64, metric: MetricType) -> f64 {
        if Self::is_lower_better(metric) {
            100.0 - raw_percentile
        } else {
            raw_percentile
        }
    }
}
