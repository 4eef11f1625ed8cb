//! Validated benchmark table

use std::collections::HashSet;

use super::data::builtin_benchmarks;
use crate::error::BenchmarkError;
use crate::types::{AgeGroupBenchmark, Gender, MetricBenchmark, MetricType};

/// Immutable, validated collection of metric benchmarks.
///
/// Every table upholds, per metric benchmark:
/// - at least one age bracket, each with `age_min <= age_max`
/// - brackets that are gapless and non-overlapping once sorted by `age_min`
/// - finite, non-decreasing percentile anchors and a finite average
///
/// and `(metric_type, gender)` pairs are unique across the table.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkTable {
    benchmarks: Vec<MetricBenchmark>,
}

impl Default for BenchmarkTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl BenchmarkTable {
    /// Validate and build a table. Brackets are stored sorted by age.
    pub fn new(mut benchmarks: Vec<MetricBenchmark>) -> Result<Self, BenchmarkError> {
        let mut seen = HashSet::new();

        for benchmark in &mut benchmarks {
            if !seen.insert((benchmark.metric_type, benchmark.gender)) {
                return Err(BenchmarkError::InvalidBenchmark(format!(
                    "duplicate benchmark for {} ({})",
                    benchmark.metric_type,
                    benchmark.gender.as_str()
                )));
            }
            benchmark.age_groups.sort_by_key(|group| group.age_min);
            validate_metric(benchmark)?;
        }

        log::info!(
            "Loaded benchmark table with {} metric benchmarks",
            benchmarks.len()
        );

        Ok(Self { benchmarks })
    }

    /// The bundled reference table
    pub fn builtin() -> Self {
        Self {
            benchmarks: builtin_benchmarks(),
        }
    }

    /// Load and validate a table from a JSON array of metric benchmarks
    pub fn from_json(json: &str) -> Result<Self, BenchmarkError> {
        let benchmarks: Vec<MetricBenchmark> = serde_json::from_str(json)?;
        Self::new(benchmarks)
    }

    /// Serialize the table to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.benchmarks)
    }

    /// Benchmark for `metric`, preferring the mixed-gender population
    pub fn metric(&self, metric: MetricType) -> Option<&MetricBenchmark> {
        self.find(metric, Gender::All).or_else(|| {
            self.benchmarks
                .iter()
                .find(|benchmark| benchmark.metric_type == metric)
        })
    }

    /// Benchmark for `metric` and `gender`, falling back to the mixed-gender population
    pub fn metric_for(&self, metric: MetricType, gender: Gender) -> Option<&MetricBenchmark> {
        self.find(metric, gender)
            .or_else(|| self.find(metric, Gender::All))
    }

    /// Bracket containing `age` for `metric`
    pub fn age_group(&self, metric: MetricType, age: u32) -> Option<&AgeGroupBenchmark> {
        self.metric(metric)?.age_group(age)
    }

    pub fn metrics(&self) -> impl Iterator<Item = &MetricBenchmark> {
        self.benchmarks.iter()
    }

    pub fn len(&self) -> usize {
        self.benchmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.benchmarks.is_empty()
    }

    fn find(&self, metric: MetricType, gender: Gender) -> Option<&MetricBenchmark> {
        self.benchmarks
            .iter()
            .find(|benchmark| benchmark.metric_type == metric && benchmark.gender == gender)
    }
}

/// Check one metric benchmark; brackets must already be sorted by `age_min`
fn validate_metric(benchmark: &MetricBenchmark) -> Result<(), BenchmarkError> {
    let invalid = |detail: String| {
        BenchmarkError::InvalidBenchmark(format!("{}: {}", benchmark.metric_type, detail))
    };

    if benchmark.age_groups.is_empty() {
        return Err(invalid("no age groups".to_string()));
    }

    for group in &benchmark.age_groups {
        if group.age_min > group.age_max {
            return Err(invalid(format!(
                "age group '{}' has min {} above max {}",
                group.age_group, group.age_min, group.age_max
            )));
        }
        if !group.percentiles.is_finite() || !group.average.is_finite() {
            return Err(invalid(format!(
                "age group '{}' has non-finite values",
                group.age_group
            )));
        }
        if !group.percentiles.is_non_decreasing() {
            return Err(invalid(format!(
                "age group '{}' percentiles are not non-decreasing",
                group.age_group
            )));
        }
    }

    for pair in benchmark.age_groups.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.age_min <= prev.age_max {
            return Err(invalid(format!(
                "age groups '{}' and '{}' overlap",
                prev.age_group, next.age_group
            )));
        }
        if next.age_min != prev.age_max + 1 {
            return Err(invalid(format!(
                "gap between age groups '{}' and '{}'",
                prev.age_group, next.age_group
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Percentiles;
    use pretty_assertions::assert_eq;

    fn group(label: &str, age_min: u32, age_max: u32, anchors: [f64; 5]) -> AgeGroupBenchmark {
        AgeGroupBenchmark {
            age_group: label.to_string(),
            age_min,
            age_max,
            percentiles: Percentiles::new(
                anchors[0], anchors[1], anchors[2], anchors[3], anchors[4],
            ),
            average: anchors[2],
            unit: "bpm".to_string(),
        }
    }

    fn benchmark(
        metric: MetricType,
        gender: Gender,
        groups: Vec<AgeGroupBenchmark>,
    ) -> MetricBenchmark {
        MetricBenchmark {
            metric_type: metric,
            metric_name: metric.label().to_string(),
            gender,
            age_groups: groups,
        }
    }

    const ANCHORS: [f64; 5] = [52.0, 58.0, 65.0, 72.0, 80.0];

    #[test]
    fn test_builtin_table_is_valid() {
        let builtin = BenchmarkTable::builtin();
        let validated = BenchmarkTable::new(builtin_benchmarks()).unwrap();
        assert_eq!(builtin, validated);
        assert_eq!(builtin.len(), 3);
        assert!(builtin.metric(MetricType::HeartRate).is_none());
    }

    #[test]
    fn test_brackets_are_sorted_on_load() {
        let table = BenchmarkTable::new(vec![benchmark(
            MetricType::RestingHeartRate,
            Gender::All,
            vec![group("40-120", 40, 120, ANCHORS), group("0-39", 0, 39, ANCHORS)],
        )])
        .unwrap();

        let labels: Vec<&str> = table
            .metric(MetricType::RestingHeartRate)
            .unwrap()
            .age_groups
            .iter()
            .map(|g| g.age_group.as_str())
            .collect();
        assert_eq!(labels, vec!["0-39", "40-120"]);
    }

    #[test]
    fn test_overlapping_brackets_rejected() {
        let result = BenchmarkTable::new(vec![benchmark(
            MetricType::Vo2Max,
            Gender::All,
            vec![group("18-30", 18, 30, ANCHORS), group("30-39", 30, 39, ANCHORS)],
        )]);
        assert!(matches!(
            result,
            Err(BenchmarkError::InvalidBenchmark(msg)) if msg.contains("overlap")
        ));
    }

    #[test]
    fn test_gapped_brackets_rejected() {
        let result = BenchmarkTable::new(vec![benchmark(
            MetricType::Vo2Max,
            Gender::All,
            vec![group("18-29", 18, 29, ANCHORS), group("31-39", 31, 39, ANCHORS)],
        )]);
        assert!(matches!(
            result,
            Err(BenchmarkError::InvalidBenchmark(msg)) if msg.contains("gap")
        ));
    }

    #[test]
    fn test_decreasing_anchors_rejected() {
        let result = BenchmarkTable::new(vec![benchmark(
            MetricType::Steps,
            Gender::All,
            vec![group("18-29", 18, 29, [5.0, 4.0, 6.0, 7.0, 8.0])],
        )]);
        assert!(result.is_err());
    }

    #[test]
    fn test_inverted_bracket_and_empty_rejected() {
        let inverted = BenchmarkTable::new(vec![benchmark(
            MetricType::Steps,
            Gender::All,
            vec![group("bad", 40, 30, ANCHORS)],
        )]);
        assert!(inverted.is_err());

        let empty = BenchmarkTable::new(vec![benchmark(MetricType::Steps, Gender::All, vec![])]);
        assert!(empty.is_err());
    }

    #[test]
    fn test_duplicate_metric_gender_rejected() {
        let result = BenchmarkTable::new(vec![
            benchmark(MetricType::Steps, Gender::All, vec![group("all", 0, 120, ANCHORS)]),
            benchmark(MetricType::Steps, Gender::All, vec![group("all", 0, 120, ANCHORS)]),
        ]);
        assert!(matches!(
            result,
            Err(BenchmarkError::InvalidBenchmark(msg)) if msg.contains("duplicate")
        ));
    }

    #[test]
    fn test_gender_lookup_falls_back_to_all() {
        let table = BenchmarkTable::new(vec![
            benchmark(MetricType::Vo2Max, Gender::Female, vec![group("f", 0, 120, ANCHORS)]),
            benchmark(MetricType::Vo2Max, Gender::All, vec![group("a", 0, 120, ANCHORS)]),
            benchmark(MetricType::Steps, Gender::Male, vec![group("m", 0, 120, ANCHORS)]),
        ])
        .unwrap();

        assert_eq!(table.metric(MetricType::Vo2Max).unwrap().gender, Gender::All);
        assert_eq!(
            table.metric_for(MetricType::Vo2Max, Gender::Female).unwrap().gender,
            Gender::Female
        );
        assert_eq!(
            table.metric_for(MetricType::Vo2Max, Gender::Male).unwrap().gender,
            Gender::All
        );
        // Only a gendered table exists; the plain lookup still finds it
        assert_eq!(table.metric(MetricType::Steps).unwrap().gender, Gender::Male);
        assert!(table.metric_for(MetricType::Steps, Gender::Female).is_none());
    }

    #[test]
    fn test_age_group_lookup() {
        let table = BenchmarkTable::builtin();
        assert_eq!(
            table.age_group(MetricType::Vo2Max, 35).unwrap().age_group,
            "30-39"
        );
        assert_eq!(
            table.age_group(MetricType::Vo2Max, 120).unwrap().age_group,
            "70+"
        );
        assert!(table.age_group(MetricType::Vo2Max, 17).is_none());
        assert!(table.age_group(MetricType::Vo2Max, 121).is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let table = BenchmarkTable::builtin();
        let json = table.to_json().unwrap();
        assert!(json.contains("\"ageGroups\""));
        assert!(json.contains("\"RESTING_HEART_RATE\""));

        let loaded = BenchmarkTable::from_json(&json).unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_from_json_defaults_gender() {
        let json = r#"[{
            "metricType": "STEPS",
            "metricName": "Daily Steps",
            "ageGroups": [{
                "ageGroup": "All ages",
                "ageMin": 0,
                "ageMax": 120,
                "percentiles": { "p10": 3000, "p25": 5000, "p50": 7000, "p75": 9000, "p90": 11000 },
                "average": 7100,
                "unit": "steps"
            }]
        }]"#;

        let table = BenchmarkTable::from_json(json).unwrap();
        assert_eq!(table.metric(MetricType::Steps).unwrap().gender, Gender::All);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            BenchmarkTable::from_json("not json"),
            Err(BenchmarkError::JsonError(_))
        ));
    }
}
