//! Measurement records and chart-ready series
//!
//! Measurements arrive from the backend (or the mock generator) as flat records.
//! The dashboard works on one time-ordered series per metric type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::BenchmarkError;
use crate::types::MetricType;

/// New measurement to be recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementRequest {
    pub measurement_type: MetricType,
    pub value: f64,
    pub recorded_at: DateTime<Utc>,
    pub source_id: String,
}

impl MeasurementRequest {
    /// Create a request stamped with `recorded_at` (now when absent) and a fresh source id
    pub fn new(
        measurement_type: MetricType,
        value: f64,
        recorded_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            measurement_type,
            value,
            recorded_at: recorded_at.unwrap_or_else(Utc::now),
            source_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), BenchmarkError> {
        validate_value(self.measurement_type, self.value)
    }
}

/// Measurement as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementResponse {
    pub id: u64,
    pub user_id: String,
    pub measurement_type: MetricType,
    pub value: f64,
    pub unit: String,
    pub recorded_at: DateTime<Utc>,
    pub source_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MeasurementResponse {
    pub fn validate(&self) -> Result<(), BenchmarkError> {
        validate_value(self.measurement_type, self.value)
    }
}

fn validate_value(metric: MetricType, value: f64) -> Result<(), BenchmarkError> {
    if !value.is_finite() || value < 0.0 {
        return Err(BenchmarkError::InvalidMeasurement(format!(
            "{metric} value must be a finite, non-negative number (got {value})"
        )));
    }
    Ok(())
}

/// One point of a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementDataPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub unit: String,
}

/// All measurements of one metric type, oldest first, with display metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSeries {
    pub measurement_type: MetricType,
    pub label: String,
    pub color: String,
    pub data: Vec<MeasurementDataPoint>,
}

impl MetricSeries {
    /// Build the series for `metric` from `measurements`.
    ///
    /// Measurements of other metric types are ignored.
    pub fn from_measurements(metric: MetricType, measurements: &[MeasurementResponse]) -> Self {
        let mut data: Vec<MeasurementDataPoint> = measurements
            .iter()
            .filter(|m| m.measurement_type == metric)
            .map(|m| MeasurementDataPoint {
                timestamp: m.recorded_at,
                value: m.value,
                unit: m.unit.clone(),
            })
            .collect();

        // Stable, so same-instant points keep arrival order
        data.sort_by_key(|point| point.timestamp);

        Self {
            measurement_type: metric,
            label: metric.label().to_string(),
            color: metric.color().to_string(),
            data,
        }
    }

    /// Most recent point
    pub fn latest(&self) -> Option<&MeasurementDataPoint> {
        self.data.last()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// One series per metric type, in `MetricType::ALL` order (empty series included)
pub fn group_into_series(measurements: &[MeasurementResponse]) -> Vec<MetricSeries> {
    MetricType::ALL
        .iter()
        .map(|&metric| MetricSeries::from_measurements(metric, measurements))
        .collect()
}

/// Parse a JSON array of measurements, rejecting invalid values
pub fn parse_array(json: &str) -> Result<Vec<MeasurementResponse>, BenchmarkError> {
    let measurements: Vec<MeasurementResponse> = serde_json::from_str(json)?;
    for (index, measurement) in measurements.iter().enumerate() {
        measurement.validate().map_err(|e| {
            BenchmarkError::InvalidMeasurement(format!("measurement {index}: {e}"))
        })?;
    }
    Ok(measurements)
}

/// Parse newline-delimited JSON measurements, rejecting invalid values
pub fn parse_ndjson(ndjson: &str) -> Result<Vec<MeasurementResponse>, BenchmarkError> {
    let mut measurements = Vec::new();
    for (line_num, line) in ndjson.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let measurement: MeasurementResponse = serde_json::from_str(trimmed).map_err(|e| {
            BenchmarkError::InvalidMeasurement(format!(
                "Failed to parse line {}: {}",
                line_num + 1,
                e
            ))
        })?;
        measurement.validate()?;
        measurements.push(measurement);
    }
    Ok(measurements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn measurement(id: u64, metric: MetricType, value: f64, day: u32) -> MeasurementResponse {
        let at = Utc.with_ymd_and_hms(2024, 1, day, 8, 0, 0).unwrap();
        MeasurementResponse {
            id,
            user_id: "user-1".to_string(),
            measurement_type: metric,
            value,
            unit: metric.unit().to_string(),
            recorded_at: at,
            source_id: "test-device".to_string(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_series_sorted_by_timestamp() {
        let measurements = vec![
            measurement(1, MetricType::Vo2Max, 42.0, 3),
            measurement(2, MetricType::Vo2Max, 40.0, 1),
            measurement(3, MetricType::Steps, 9000.0, 2),
            measurement(4, MetricType::Vo2Max, 41.0, 2),
        ];

        let series = MetricSeries::from_measurements(MetricType::Vo2Max, &measurements);
        let values: Vec<f64> = series.data.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![40.0, 41.0, 42.0]);
        assert_eq!(series.label, "VO2 Max");
        assert_eq!(series.color, "#3b82f6");
        assert_eq!(series.latest().unwrap().value, 42.0);
    }

    #[test]
    fn test_group_into_series_covers_every_metric() {
        let measurements = vec![measurement(1, MetricType::Steps, 9000.0, 2)];
        let series = group_into_series(&measurements);

        let metrics: Vec<MetricType> = series.iter().map(|s| s.measurement_type).collect();
        assert_eq!(metrics, MetricType::ALL.to_vec());
        assert_eq!(series.iter().filter(|s| !s.is_empty()).count(), 1);
    }

    #[test]
    fn test_request_defaults() {
        let request = MeasurementRequest::new(MetricType::RestingHeartRate, 58.0, None);
        assert!(Uuid::parse_str(&request.source_id).is_ok());
        assert!(request.validate().is_ok());

        let other = MeasurementRequest::new(MetricType::RestingHeartRate, 58.0, None);
        assert_ne!(request.source_id, other.source_id);
    }

    #[test]
    fn test_request_rejects_bad_values() {
        assert!(MeasurementRequest::new(MetricType::Steps, -1.0, None)
            .validate()
            .is_err());
        assert!(MeasurementRequest::new(MetricType::Steps, f64::NAN, None)
            .validate()
            .is_err());
    }

    #[test]
    fn test_parse_array_camel_case() {
        let json = r#"[{
            "id": 7,
            "userId": "user-1",
            "measurementType": "RESTING_HEART_RATE",
            "value": 61,
            "unit": "bpm",
            "recordedAt": "2024-01-15T07:30:00Z",
            "sourceId": "watch",
            "createdAt": "2024-01-15T07:30:00Z",
            "updatedAt": "2024-01-15T07:30:00Z"
        }]"#;

        let parsed = parse_array(json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].measurement_type, MetricType::RestingHeartRate);
        assert_eq!(parsed[0].value, 61.0);
    }

    #[test]
    fn test_parse_ndjson_reports_line() {
        let good = serde_json::to_string(&measurement(1, MetricType::Steps, 100.0, 1)).unwrap();
        let input = format!("{good}\n\n{{ not json }}\n");

        let err = parse_ndjson(&input).unwrap_err();
        assert!(err.to_string().contains("line 3"));

        let parsed = parse_ndjson(&format!("{good}\n{good}\n")).unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_parse_rejects_negative_value() {
        let bad = measurement(1, MetricType::Steps, -5.0, 1);
        let json = serde_json::to_string(&vec![bad]).unwrap();
        assert!(matches!(
            parse_array(&json),
            Err(BenchmarkError::InvalidMeasurement(_))
        ));
    }
}
