//! Percentile estimation
//!
//! Places a raw measurement within a population distribution described by five
//! anchors (p10, p25, p50, p75, p90) using piecewise-linear interpolation.
//! The result is a raw percentile: it assumes a higher raw value ranks higher,
//! regardless of whether that is healthier for the metric.

use crate::types::Percentiles;

/// Lowest percentile the estimator reports
pub const FLOOR_PERCENTILE: f64 = 10.0;

/// Highest percentile the estimator reports
pub const CEILING_PERCENTILE: f64 = 100.0;

/// Largest contribution extrapolation may add above p90
const MAX_EXTRAPOLATION: f64 = 10.0;

/// Estimator for raw percentiles
pub struct PercentileEstimator;

impl PercentileEstimator {
    /// Estimate the raw percentile of `value` against `anchors`.
    ///
    /// - `value <= p10` yields 10.
    /// - Between two anchors the percentile is interpolated linearly.
    /// - Above p90 it grows by `(value - p90) / p90 * 10`, capped at 100.
    ///
    /// A value exactly on p50 always yields 50, even when lower anchors are tied
    /// with p50. Zero-width segments behave as a step to their upper percentile.
    /// NaN input yields NaN.
    pub fn estimate_raw(value: f64, anchors: &Percentiles) -> f64 {
        debug_assert!(
            anchors.is_non_decreasing(),
            "percentile anchors must be non-decreasing: {anchors:?}"
        );

        if value.is_nan() {
            return f64::NAN;
        }

        let Percentiles {
            p10,
            p25,
            p50,
            p75,
            p90,
        } = *anchors;

        if value == p50 {
            return 50.0;
        }
        if value <= p10 {
            return FLOOR_PERCENTILE;
        }
        if value <= p25 {
            return interpolate(value, (p10, 10.0), (p25, 25.0));
        }
        if value <= p50 {
            return interpolate(value, (p25, 25.0), (p50, 50.0));
        }
        if value <= p75 {
            return interpolate(value, (p50, 50.0), (p75, 75.0));
        }
        if value <= p90 {
            return interpolate(value, (p75, 75.0), (p90, 90.0));
        }
        extrapolate(value, p90)
    }
}

/// Linear interpolation between two (anchor value, percentile) points
fn interpolate(value: f64, (lo, p_lo): (f64, f64), (hi, p_hi): (f64, f64)) -> f64 {
    let width = hi - lo;
    if width <= 0.0 {
        return p_hi;
    }
    p_lo + ((value - lo) / width) * (p_hi - p_lo)
}

/// Growth above p90, relative to p90 itself
fn extrapolate(value: f64, p90: f64) -> f64 {
    // A non-positive p90 gives no scale to measure against; any value above it
    // is treated as far beyond the population.
    if p90 <= 0.0 {
        return CEILING_PERCENTILE;
    }
    let overshoot = ((value - p90) / p90) * MAX_EXTRAPOLATION;
    (90.0 + overshoot.min(MAX_EXTRAPOLATION)).min(CEILING_PERCENTILE)
}
