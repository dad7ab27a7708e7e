use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ExampleData;

/// Payload of `GET /api/analytics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalyticsReport {
    pub summary: TripSummary,
    pub charts: ChartData,
    #[serde(default)]
    pub trips: Vec<TripRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TripSummary {
    pub total_trips: u64,
    pub total_distance_km: f64,
    pub total_time_hours: f64,
    pub avg_speed_kmh: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChartData {
    pub distance_bins: Series,
    pub duration_bins: Series,
    pub speed_bins: Series,
    pub hourly: Series,
}

/// Pre-binned chart data, `labels[i]` belongs to `values[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Series {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TripRecord {
    pub vehicle_id: Option<String>,
    pub date: String,
    /// km
    pub distance: f64,
    /// minutes
    pub duration: f64,
    /// km/h
    pub speed: f64,
    pub status: Option<String>,
}

impl ExampleData for AnalyticsReport {
    fn example_data() -> Self {
        let series = |labels: &[&str], values: &[f64]| Series {
            labels: labels.iter().map(|label| label.to_string()).collect(),
            values: values.to_vec(),
        };
        Self {
            summary: TripSummary {
                total_trips: 2,
                total_distance_km: 14.5,
                total_time_hours: 0.6,
                avg_speed_kmh: 24.2,
            },
            charts: ChartData {
                distance_bins: series(
                    &["0-5 km", "5-10 km", "10-15 km", "15-20 km", "20+ km"],
                    &[1.0, 1.0, 0.0, 0.0, 0.0],
                ),
                duration_bins: series(
                    &["0-10 min", "10-20 min", "20-30 min", "30-40 min", "40+ min"],
                    &[0.0, 1.0, 1.0, 0.0, 0.0],
                ),
                speed_bins: series(
                    &["0-20", "20-40", "40-60", "60-80", "80+"],
                    &[1.0, 1.0, 0.0, 0.0, 0.0],
                ),
                hourly: series(
                    &["00:00", "03:00", "06:00", "09:00", "12:00", "15:00", "18:00", "21:00"],
                    &[0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0],
                ),
            },
            trips: vec![
                TripRecord {
                    vehicle_id: Some("VEH-001".to_owned()),
                    date: "2024-05-01 09:12".to_owned(),
                    distance: 4.5,
                    duration: 14.0,
                    speed: 19.29,
                    status: Some("completed".to_owned()),
                },
                TripRecord {
                    vehicle_id: None,
                    date: "2024-05-01 12:40".to_owned(),
                    distance: 10.0,
                    duration: 22.0,
                    speed: 27.27,
                    status: Some("cancelled".to_owned()),
                },
            ],
        }
    }
}
