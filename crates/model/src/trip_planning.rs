use chrono::{DateTime, Local};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::{geo::LatLng, serde::epoch_millis};

use crate::vehicle::VehicleId;

/// Start and end of a trip, as sent to `/api/predict`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RouteRequest {
    pub start_lat: f64,
    pub start_lon: f64,
    pub end_lat: f64,
    pub end_lon: f64,
}

impl RouteRequest {
    pub fn new(start: LatLng, end: LatLng) -> Self {
        Self {
            start_lat: start.latitude,
            start_lon: start.longitude,
            end_lat: end.latitude,
            end_lon: end.longitude,
        }
    }

    /// The page treats an empty or zero coordinate field as missing.
    pub fn is_complete(&self) -> bool {
        [self.start_lat, self.start_lon, self.end_lat, self.end_lon]
            .iter()
            .all(|value| value.is_finite() && *value != 0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionResponse {
    #[serde(default)]
    pub success: bool,
    pub distance_km: Option<f64>,
    pub duration_minutes: Option<f64>,
    pub duration_seconds: Option<f64>,
    pub avg_speed_kmh: Option<f64>,
    #[serde(default, deserialize_with = "epoch_millis::deserialize_option")]
    pub eta: Option<DateTime<Local>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub avg_speed_kmh: f64,
    pub eta: DateTime<Local>,
}

impl PredictionResponse {
    /// `None` unless the server reported success with every field present.
    pub fn into_prediction(self) -> Option<Prediction> {
        if !self.success {
            return None;
        }
        Some(Prediction {
            distance_km: self.distance_km?,
            duration_minutes: self.duration_minutes?,
            avg_speed_kmh: self.avg_speed_kmh?,
            eta: self.eta?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationRequest {
    pub vehicle_id: VehicleId,
    #[serde(flatten)]
    pub route: RouteRequest,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResponse {
    #[serde(default)]
    pub success: bool,
    pub vehicle_id: Option<String>,
    pub total_points: Option<u32>,
    /// minutes
    pub estimated_duration: Option<f64>,
    pub message: Option<String>,
}
