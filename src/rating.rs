//! Rating classification
//!
//! Maps a normalized percentile onto one of five rating tiers. Direction has
//! already been resolved by the normalizer, so the same thresholds apply to
//! every metric.

use crate::types::Rating;

/// Lower bound (inclusive) of the excellent tier
pub const EXCELLENT_THRESHOLD: f64 = 75.0;

/// Lower bound (inclusive) of the good tier
pub const GOOD_THRESHOLD: f64 = 60.0;

/// Lower bound (inclusive) of the average tier
pub const AVERAGE_THRESHOLD: f64 = 40.0;

/// Lower bound (inclusive) of the below-average tier
pub const BELOW_AVERAGE_THRESHOLD: f64 = 25.0;

/// Classifier for normalized percentiles
pub struct RatingClassifier;

impl RatingClassifier {
    /// Classify a normalized percentile. Input is clamped to 0-100 first; NaN rates as poor.
    pub fn classify(normalized_percentile: f64) -> Rating {
        let p = normalized_percentile.clamp(0.0, 100.0);

        if p >= EXCELLENT_THRESHOLD {
            Rating::Excellent
        } else if p >= GOOD_THRESHOLD {
            Rating::Good
        } else if p >= AVERAGE_THRESHOLD {
            Rating::Average
        } else if p >= BELOW_AVERAGE_THRESHOLD {
            Rating::BelowAverage
        } else {
            Rating::Poor
        }
    }
}
