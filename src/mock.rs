//! Demo measurement generator
//!
//! Produces a month of plausible daily measurements showing a typical training
//! improvement, for demos and for exercising the pipeline without a backend.
//! Day-to-day variation follows a fixed oscillation so output is reproducible.

use chrono::{DateTime, Duration, Utc};

use crate::measurement::MeasurementResponse;
use crate::types::MetricType;

/// Number of daily points generated per metric
pub const MOCK_DAYS: u32 = 30;

/// Demo user id
pub const MOCK_USER_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

/// Demo device id
pub const MOCK_SOURCE_ID: &str = "mock-device";

/// Starting level, day-to-day spread, and change over the whole period
struct MockProfile {
    base: f64,
    variance: f64,
    improvement: f64,
}

fn profile(metric: MetricType) -> MockProfile {
    match metric {
        // Untrained adult dropping toward a well-trained resting rate
        MetricType::RestingHeartRate => MockProfile {
            base: 75.0,
            variance: 8.0,
            improvement: -15.0,
        },
        MetricType::Vo2Max => MockProfile {
            base: 38.0,
            variance: 4.0,
            improvement: 8.0,
        },
        // Sedentary to moderately active
        MetricType::Steps => MockProfile {
            base: 4000.0,
            variance: 1000.0,
            improvement: 4000.0,
        },
        MetricType::HeartRate => MockProfile {
            base: 72.0,
            variance: 6.0,
            improvement: 0.0,
        },
    }
}

/// Generator for demo measurements
#[derive(Debug, Clone)]
pub struct MockDataGenerator {
    user_id: String,
    source_id: String,
}

impl Default for MockDataGenerator {
    fn default() -> Self {
        Self::new(MOCK_USER_ID, MOCK_SOURCE_ID)
    }
}

impl MockDataGenerator {
    pub fn new(user_id: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            source_id: source_id.into(),
        }
    }

    /// Daily measurements for `metric`, oldest first, the last one recorded at `now`
    pub fn generate(&self, metric: MetricType, now: DateTime<Utc>) -> Vec<MeasurementResponse> {
        self.generate_from(metric, now, 0)
    }

    /// Measurements for every metric type, with ids unique across the whole set
    pub fn generate_all(&self, now: DateTime<Utc>) -> Vec<MeasurementResponse> {
        let mut all = Vec::with_capacity(MetricType::ALL.len() * MOCK_DAYS as usize);
        for metric in MetricType::ALL {
            let first_id = all.len() as u64;
            all.extend(self.generate_from(metric, now, first_id));
        }
        all
    }

    fn generate_from(
        &self,
        metric: MetricType,
        now: DateTime<Utc>,
        first_id: u64,
    ) -> Vec<MeasurementResponse> {
        let profile = profile(metric);
        let last_day = MOCK_DAYS - 1;

        (0..MOCK_DAYS)
            .map(|day| {
                let recorded_at = now - Duration::days(i64::from(last_day - day));
                let progress = f64::from(day) / f64::from(last_day);
                let variation = (f64::from(day) * 1.7).sin() * profile.variance * 0.25;
                let value = (profile.base + profile.improvement * progress + variation).round();

                MeasurementResponse {
                    id: first_id + u64::from(day),
                    user_id: self.user_id.clone(),
                    measurement_type: metric,
                    value,
                    unit: metric.unit().to_string(),
                    recorded_at,
                    source_id: self.source_id.clone(),
                    created_at: recorded_at,
                    updated_at: recorded_at,
                }
            })
            .collect()
    }
}
