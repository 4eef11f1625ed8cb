//! Comparison orchestration
//!
//! Looks up the benchmark bracket for a metric and age, then runs the value
//! through estimation, direction normalization, and rating classification.
//!
//! An unsupported metric or age is an expected outcome, not an error: the
//! comparator reports it as `None` (or an [`Unavailable`] reason).

use serde::{Deserialize, Serialize};

use crate::benchmark::BenchmarkTable;
use crate::measurement::MetricSeries;
use crate::normalizer::DirectionNormalizer;
use crate::percentile::PercentileEstimator;
use crate::rating::RatingClassifier;
use crate::types::{AgeGroupBenchmark, Gender, MetricBenchmark, MetricType, UserComparison};

/// Why no comparison could be made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unavailable {
    /// The series holds no measurements
    NoMeasurements,
    /// No benchmark table exists for the metric
    UnsupportedMetric,
    /// No bracket of the metric contains the age
    UnsupportedAge,
    /// The user value is NaN or infinite
    InvalidValue,
}

impl Unavailable {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unavailable::NoMeasurements => "no_measurements",
            Unavailable::UnsupportedMetric => "unsupported_metric",
            Unavailable::UnsupportedAge => "unsupported_age",
            Unavailable::InvalidValue => "invalid_value",
        }
    }
}

/// Compares user values against a benchmark table
#[derive(Debug, Clone, Copy)]
pub struct BenchmarkComparator<'a> {
    table: &'a BenchmarkTable,
}

impl<'a> BenchmarkComparator<'a> {
    pub fn new(table: &'a BenchmarkTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a BenchmarkTable {
        self.table
    }

    /// Compare `value` against the mixed-gender benchmark for `metric` at `age`
    pub fn compare(&self, metric: MetricType, value: f64, age: u32) -> Option<UserComparison> {
        self.try_compare(metric, value, age, None).ok()
    }

    /// Compare against the benchmark for `gender`, falling back to the mixed-gender one
    pub fn compare_with_gender(
        &self,
        metric: MetricType,
        value: f64,
        age: u32,
        gender: Gender,
    ) -> Option<UserComparison> {
        self.try_compare(metric, value, age, Some(gender)).ok()
    }

    /// Compare and report why a comparison is unavailable
    pub fn try_compare(
        &self,
        metric: MetricType,
        value: f64,
        age: u32,
        gender: Option<Gender>,
    ) -> Result<UserComparison, Unavailable> {
        let benchmark: &MetricBenchmark = match gender {
            Some(gender) => self.table.metric_for(metric, gender),
            None => self.table.metric(metric),
        }
        .ok_or_else(|| {
            log::debug!("No benchmark table for {metric}");
            Unavailable::UnsupportedMetric
        })?;

        let group = benchmark.age_group(age).ok_or_else(|| {
            log::debug!("No {metric} age group contains age {age}");
            Unavailable::UnsupportedAge
        })?;

        if !value.is_finite() {
            log::debug!("Skipping non-finite {metric} value {value}");
            return Err(Unavailable::InvalidValue);
        }

        Ok(build_comparison(metric, value, group))
    }

    /// Compare the latest value of every non-empty series.
    ///
    /// Series without an available comparison are left out.
    pub fn compare_latest(&self, series: &[MetricSeries], age: u32) -> Vec<UserComparison> {
        series
            .iter()
            .filter_map(|s| self.compare_series(s, age, None).ok())
            .collect()
    }

    /// Compare the latest value of one series
    pub fn compare_series(
        &self,
        series: &MetricSeries,
        age: u32,
        gender: Option<Gender>,
    ) -> Result<UserComparison, Unavailable> {
        let latest = series.latest().ok_or(Unavailable::NoMeasurements)?;
        self.try_compare(series.measurement_type, latest.value, age, gender)
    }
}

/// Estimate, normalize and rate a value once its bracket is known
fn build_comparison(metric: MetricType, value: f64, group: &AgeGroupBenchmark) -> UserComparison {
    let raw = PercentileEstimator::estimate_raw(value, &group.percentiles);
    let percentile = DirectionNormalizer::normalize_percentile(raw, metric);
    let rating = RatingClassifier::classify(percentile);

    let difference = value - group.average;
    // Zero average yields infinity (or NaN for a zero difference); kept as-is
    let difference_percentage = (difference / group.average) * 100.0;

    UserComparison {
        metric_type: metric,
        user_value: value,
        age_group: group.age_group.clone(),
        percentile,
        percentiles: group.percentiles,
        average: group.average,
        difference,
        difference_percentage,
        rating,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::MeasurementDataPoint;
    use crate::types::{Percentiles, Rating};
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn bracket(average: f64, anchors: Percentiles, unit: &str) -> AgeGroupBenchmark {
        AgeGroupBenchmark {
            age_group: "0-120".to_string(),
            age_min: 0,
            age_max: 120,
            percentiles: anchors,
            average,
            unit: unit.to_string(),
        }
    }

    fn test_table() -> BenchmarkTable {
        BenchmarkTable::new(vec![
            MetricBenchmark {
                metric_type: MetricType::RestingHeartRate,
                metric_name: "Resting Heart Rate".to_string(),
                gender: Gender::All,
                age_groups: vec![bracket(
                    66.0,
                    Percentiles::new(52.0, 58.0, 65.0, 72.0, 80.0),
                    "bpm",
                )],
            },
            MetricBenchmark {
                metric_type: MetricType::Vo2Max,
                metric_name: "VO2 Max".to_string(),
                gender: Gender::All,
                age_groups: vec![bracket(
                    40.0,
                    Percentiles::new(30.0, 35.0, 40.0, 45.0, 50.0),
                    "ml/kg/min",
                )],
            },
            MetricBenchmark {
                metric_type: MetricType::Vo2Max,
                metric_name: "VO2 Max".to_string(),
                gender: Gender::Female,
                age_groups: vec![bracket(
                    35.0,
                    Percentiles::new(25.0, 30.0, 35.0, 40.0, 45.0),
                    "ml/kg/min",
                )],
            },
            MetricBenchmark {
                metric_type: MetricType::Steps,
                metric_name: "Steps".to_string(),
                gender: Gender::All,
                age_groups: vec![bracket(0.0, Percentiles::new(0.0, 0.0, 0.0, 0.0, 0.0), "steps")],
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_resting_heart_rate_at_p10_is_excellent() {
        let table = test_table();
        let comparison = BenchmarkComparator::new(&table)
            .compare(MetricType::RestingHeartRate, 52.0, 35)
            .unwrap();

        assert_eq!(comparison.percentile, 90.0);
        assert_eq!(comparison.rating, Rating::Excellent);
        assert_eq!(comparison.age_group, "0-120");
        assert_eq!(comparison.difference, -14.0);
    }

    #[test]
    fn test_resting_heart_rate_at_median_is_average() {
        let table = test_table();
        let comparison = BenchmarkComparator::new(&table)
            .compare(MetricType::RestingHeartRate, 65.0, 35)
            .unwrap();

        assert_eq!(comparison.percentile, 50.0);
        assert_eq!(comparison.rating, Rating::Average);
    }

    #[test]
    fn test_vo2_max_between_p75_and_p90_is_excellent() {
        let table = test_table();
        let comparison = BenchmarkComparator::new(&table)
            .compare(MetricType::Vo2Max, 47.0, 35)
            .unwrap();

        assert!((comparison.percentile - 81.0).abs() < 1e-9);
        assert_eq!(comparison.rating, Rating::Excellent);
        assert_eq!(comparison.percentiles, Percentiles::new(30.0, 35.0, 40.0, 45.0, 50.0));
        assert_eq!(comparison.difference, 7.0);
        assert!((comparison.difference_percentage - 17.5).abs() < 1e-9);
    }

    #[test]
    fn test_age_outside_brackets_is_unavailable() {
        let table = test_table();
        let comparator = BenchmarkComparator::new(&table);

        assert!(comparator.compare(MetricType::Vo2Max, 47.0, 200).is_none());
        assert_eq!(
            comparator.try_compare(MetricType::Vo2Max, 47.0, 200, None),
            Err(Unavailable::UnsupportedAge)
        );
    }

    #[test]
    fn test_metric_without_table_is_unavailable() {
        let table = test_table();
        let comparator = BenchmarkComparator::new(&table);

        assert!(comparator.compare(MetricType::HeartRate, 70.0, 30).is_none());
        assert_eq!(
            comparator.try_compare(MetricType::HeartRate, 70.0, 30, None),
            Err(Unavailable::UnsupportedMetric)
        );
    }

    #[test]
    fn test_zero_average_gives_non_finite_percentage() {
        let table = test_table();
        let comparator = BenchmarkComparator::new(&table);

        let above = comparator.compare(MetricType::Steps, 500.0, 30).unwrap();
        assert_eq!(above.difference_percentage, f64::INFINITY);
        assert_eq!(above.percentile, 100.0);

        let equal = comparator.compare(MetricType::Steps, 0.0, 30).unwrap();
        assert!(equal.difference_percentage.is_nan());
    }

    #[test]
    fn test_non_finite_value_is_unavailable() {
        let table = test_table();
        let comparator = BenchmarkComparator::new(&table);

        assert_eq!(
            comparator.try_compare(MetricType::Vo2Max, f64::NAN, 30, None),
            Err(Unavailable::InvalidValue)
        );
        assert!(comparator.compare(MetricType::Vo2Max, f64::INFINITY, 30).is_none());
    }

    #[test]
    fn test_gendered_comparison() {
        let table = test_table();
        let comparator = BenchmarkComparator::new(&table);

        let female = comparator
            .compare_with_gender(MetricType::Vo2Max, 40.0, 30, Gender::Female)
            .unwrap();
        assert_eq!(female.percentile, 75.0);

        let male = comparator
            .compare_with_gender(MetricType::Vo2Max, 40.0, 30, Gender::Male)
            .unwrap();
        assert_eq!(male.percentile, 50.0);
    }

    #[test]
    fn test_compare_latest_skips_unavailable_series() {
        let table = test_table();
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let point = |day: i64, value: f64| MeasurementDataPoint {
            timestamp: start + Duration::days(day),
            value,
            unit: String::new(),
        };

        let series = vec![
            MetricSeries {
                measurement_type: MetricType::Vo2Max,
                label: "VO2 Max".to_string(),
                color: String::new(),
                data: vec![point(0, 38.0), point(1, 47.0)],
            },
            MetricSeries {
                measurement_type: MetricType::HeartRate,
                label: "Heart Rate".to_string(),
                color: String::new(),
                data: vec![point(0, 70.0)],
            },
            MetricSeries {
                measurement_type: MetricType::RestingHeartRate,
                label: "Resting Heart Rate".to_string(),
                color: String::new(),
                data: vec![],
            },
        ];

        let comparator = BenchmarkComparator::new(&table);
        let comparisons = comparator.compare_latest(&series, 30);
        assert_eq!(comparisons.len(), 1);
        assert_eq!(comparisons[0].user_value, 47.0);

        assert_eq!(
            comparator.compare_series(&series[2], 30, None),
            Err(Unavailable::NoMeasurements)
        );
    }

    #[test]
    fn test_builtin_table_comparison() {
        let table = BenchmarkTable::builtin();
        let comparison = BenchmarkComparator::new(&table)
            .compare(MetricType::RestingHeartRate, 58.0, 25)
            .unwrap();

        // Raw 25th percentile inverts to 75
        assert_eq!(comparison.percentile, 75.0);
        assert_eq!(comparison.rating, Rating::Excellent);
        assert_eq!(comparison.age_group, "18-29");
    }
}
