//! Trip planning forms: route prediction and starting a simulated trip.

use model::{
    preset,
    trip_planning::{Prediction, RouteRequest, SimulationRequest, SimulationResponse},
    vehicle::{next_vehicle_id, VehicleId, INITIAL_VEHICLE_ID},
    ExampleData,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::Id;

use crate::common::RouteErrorResponse;

pub const MISSING_LOCATION_ALERT: &str = "Please fill in all location fields";
pub const MISSING_FIELD_ALERT: &str = "Please fill in all fields";
pub const PREDICTION_FAILED_ALERT: &str = "Error getting prediction. Please try again.";
pub const SIMULATION_FAILED_ALERT: &str = "Error starting tracking. Please try again.";

/// Route fields as typed into the form. A preset fills in all four
/// coordinates at once.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RouteForm {
    pub preset: Option<String>,
    pub start_lat: Option<f64>,
    pub start_lon: Option<f64>,
    pub end_lat: Option<f64>,
    pub end_lon: Option<f64>,
}

impl RouteForm {
    /// `None` if a coordinate is missing or zero, or the preset is unknown.
    pub fn route(&self) -> Option<RouteRequest> {
        if let Some(key) = &self.preset {
            return preset::find(key).map(|preset| preset.route());
        }
        let route = RouteRequest {
            start_lat: self.start_lat?,
            start_lon: self.start_lon?,
            end_lat: self.end_lat?,
            end_lon: self.end_lon?,
        };
        route.is_complete().then_some(route)
    }

    pub fn validate(&self) -> Result<RouteRequest, RouteErrorResponse> {
        self.route()
            .ok_or_else(|| RouteErrorResponse::invalid_input(MISSING_LOCATION_ALERT))
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SimulationForm {
    pub vehicle_id: Option<String>,
    #[serde(flatten)]
    pub route: RouteForm,
}

impl SimulationForm {
    pub fn validate(&self) -> Result<SimulationRequest, RouteErrorResponse> {
        let vehicle_id = self
            .vehicle_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty());
        match (vehicle_id, self.route.route()) {
            (Some(vehicle_id), Some(route)) => Ok(SimulationRequest {
                vehicle_id: Id::from(vehicle_id),
                route,
            }),
            _ => Err(RouteErrorResponse::invalid_input(MISSING_FIELD_ALERT)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictionView {
    pub distance: String,
    pub duration: String,
    pub speed: String,
    /// Local time of day.
    pub eta: String,
}

impl From<&Prediction> for PredictionView {
    fn from(prediction: &Prediction) -> Self {
        Self {
            distance: format!("{:.2} km", prediction.distance_km),
            duration: format!("{:.1} min", prediction.duration_minutes),
            speed: format!("{:.1} km/h", prediction.avg_speed_kmh),
            eta: prediction.eta.format("%H:%M:%S").to_string(),
        }
    }
}

impl ExampleData for PredictionView {
    fn example_data() -> Self {
        Self {
            distance: "2.05 km".to_owned(),
            duration: "7.4 min".to_owned(),
            speed: "16.6 km/h".to_owned(),
            eta: "10:22:31".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimulationStarted {
    pub vehicle_id: VehicleId,
    pub message: String,
    /// Suggested id for the next trip form.
    pub next_vehicle_id: VehicleId,
    pub total_points: Option<u32>,
}

impl SimulationStarted {
    /// `None` unless the server reported success.
    pub fn new(vehicle_id: &VehicleId, response: &SimulationResponse) -> Option<Self> {
        if !response.success {
            return None;
        }
        let estimated = response.estimated_duration.unwrap_or_default();
        Some(Self {
            vehicle_id: vehicle_id.clone(),
            message: format!(
                "Tracking started for {}!\nEstimated duration: {:.1} minutes",
                vehicle_id, estimated
            ),
            next_vehicle_id: next_vehicle_id(vehicle_id),
            total_points: response.total_points,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanningDefaults {
    pub vehicle_id: VehicleId,
    pub presets: Vec<preset::RoutePreset>,
}

impl Default for PlanningDefaults {
    fn default() -> Self {
        Self {
            vehicle_id: Id::from(INITIAL_VEHICLE_ID),
            presets: preset::PRESETS.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use chrono::{Local, TimeZone};

    use super::*;

    fn form(start_lat: f64, start_lon: f64, end_lat: f64, end_lon: f64) -> RouteForm {
        RouteForm {
            preset: None,
            start_lat: Some(start_lat),
            start_lon: Some(start_lon),
            end_lat: Some(end_lat),
            end_lon: Some(end_lon),
        }
    }

    #[test]
    fn route_needs_all_non_zero_coordinates() {
        assert!(form(41.1, -8.6, 41.2, -8.7).validate().is_ok());

        let error = form(41.1, 0.0, 41.2, -8.7).validate().unwrap_err();
        assert_eq!(error.status_code, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error.alert.as_deref(), Some(MISSING_LOCATION_ALERT));

        let partial = RouteForm {
            end_lon: None,
            ..form(41.1, -8.6, 41.2, -8.7)
        };
        assert!(partial.route().is_none());
    }

    #[test]
    fn preset_fills_in_route() {
        let form = RouteForm {
            preset: Some("porto2".to_owned()),
            ..RouteForm::default()
        };
        let route = form.route().unwrap();
        assert_eq!(route.start_lat, 41.2481);
        assert_eq!(route.end_lon, -8.6531);

        let unknown = RouteForm {
            preset: Some("lisbon".to_owned()),
            ..RouteForm::default()
        };
        assert!(unknown.route().is_none());
    }

    #[test]
    fn simulation_needs_vehicle_id() {
        let blank = SimulationForm {
            vehicle_id: Some("  ".to_owned()),
            route: form(41.1, -8.6, 41.2, -8.7),
        };
        let error = blank.validate().unwrap_err();
        assert_eq!(error.alert.as_deref(), Some(MISSING_FIELD_ALERT));

        let filled = SimulationForm {
            vehicle_id: Some("VEH-004".to_owned()),
            ..blank
        };
        let request = filled.validate().unwrap();
        assert_eq!(request.vehicle_id, Id::from("VEH-004"));
    }

    #[test]
    fn simulation_form_is_flat() {
        let form: SimulationForm = serde_json::from_str(
            r#"{"vehicle_id": "VEH-001", "start_lat": 41.1, "start_lon": -8.6,
                "end_lat": 41.2, "end_lon": -8.7}"#,
        )
        .unwrap();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn started_message_and_next_id() {
        let response = SimulationResponse {
            success: true,
            vehicle_id: Some("VEH-009".to_owned()),
            total_points: Some(120),
            estimated_duration: Some(12.345),
            message: None,
        };
        let started = SimulationStarted::new(&Id::from("VEH-009"), &response).unwrap();
        assert_eq!(
            started.message,
            "Tracking started for VEH-009!\nEstimated duration: 12.3 minutes"
        );
        assert_eq!(started.next_vehicle_id, Id::from("VEH-010"));

        let failed = SimulationResponse {
            success: false,
            ..response
        };
        assert!(SimulationStarted::new(&Id::from("VEH-009"), &failed).is_none());
    }

    #[test]
    fn prediction_view_formats() {
        let prediction = Prediction {
            distance_km: 2.046,
            duration_minutes: 7.44,
            avg_speed_kmh: 16.55,
            eta: Local.with_ymd_and_hms(2024, 5, 1, 10, 22, 31).unwrap(),
        };
        let view = PredictionView::from(&prediction);
        assert_eq!(view.distance, "2.05 km");
        assert_eq!(view.duration, "7.4 min");
        assert_eq!(view.eta, "10:22:31");
    }
}
