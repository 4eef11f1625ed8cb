//! Bundled reference table
//!
//! Mixed-gender population figures by age bracket. Heart rate during activity
//! has no population benchmark and is intentionally absent.

use crate::types::{AgeGroupBenchmark, Gender, MetricBenchmark, MetricType, Percentiles};

/// Age brackets shared by every bundled metric: (label, min, max)
const AGE_BRACKETS: [(&str, u32, u32); 6] = [
    ("18-29", 18, 29),
    ("30-39", 30, 39),
    ("40-49", 40, 49),
    ("50-59", 50, 59),
    ("60-69", 60, 69),
    ("70+", 70, 120),
];

/// Resting heart rate (bpm): p10, p25, p50, p75, p90, average
const RESTING_HEART_RATE: [[f64; 6]; 6] = [
    [52.0, 58.0, 65.0, 72.0, 80.0, 66.0],
    [53.0, 59.0, 66.0, 73.0, 81.0, 67.0],
    [54.0, 60.0, 67.0, 74.0, 82.0, 68.0],
    [55.0, 61.0, 68.0, 75.0, 83.0, 69.0],
    [55.0, 61.0, 68.0, 75.0, 82.0, 68.0],
    [56.0, 62.0, 69.0, 76.0, 83.0, 69.0],
];

/// VO2 max (ml/kg/min)
const VO2_MAX: [[f64; 6]; 6] = [
    [33.0, 38.0, 43.0, 48.0, 54.0, 43.0],
    [31.0, 36.0, 41.0, 46.0, 51.0, 41.0],
    [28.0, 33.0, 38.0, 43.0, 48.0, 38.0],
    [25.0, 30.0, 35.0, 40.0, 45.0, 35.0],
    [22.0, 26.0, 31.0, 36.0, 41.0, 31.0],
    [19.0, 23.0, 27.0, 32.0, 37.0, 28.0],
];

/// Daily steps
const STEPS: [[f64; 6]; 6] = [
    [4000.0, 6000.0, 8000.0, 10500.0, 13000.0, 8200.0],
    [3800.0, 5800.0, 7700.0, 10000.0, 12500.0, 7900.0],
    [3500.0, 5500.0, 7500.0, 9700.0, 12000.0, 7600.0],
    [3000.0, 5000.0, 7000.0, 9000.0, 11000.0, 7100.0],
    [2500.0, 4300.0, 6200.0, 8000.0, 10000.0, 6300.0],
    [1800.0, 3300.0, 5000.0, 6800.0, 8500.0, 5100.0],
];

/// Build the bundled benchmarks (unvalidated; see `BenchmarkTable::builtin`)
pub fn builtin_benchmarks() -> Vec<MetricBenchmark> {
    vec![
        metric_benchmark(MetricType::RestingHeartRate, &RESTING_HEART_RATE),
        metric_benchmark(MetricType::Vo2Max, &VO2_MAX),
        metric_benchmark(MetricType::Steps, &STEPS),
    ]
}

fn metric_benchmark(metric: MetricType, rows: &[[f64; 6]; 6]) -> MetricBenchmark {
    let age_groups = AGE_BRACKETS
        .iter()
        .zip(rows.iter())
        .map(|(&(label, age_min, age_max), row)| AgeGroupBenchmark {
            age_group: label.to_string(),
            age_min,
            age_max,
            percentiles: Percentiles::new(row[0], row[1], row[2], row[3], row[4]),
            average: row[5],
            unit: metric.unit().to_string(),
        })
        .collect();

    MetricBenchmark {
        metric_type: metric,
        metric_name: metric.label().to_string(),
        gender: Gender::All,
        age_groups,
    }
}
