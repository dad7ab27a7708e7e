use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::{
    geo::LatLng,
    id::{HasId, Id},
};

pub type VehicleId = Id<VehicleState>;

/// Suggested id for the first simulation started from the dashboard.
pub const INITIAL_VEHICLE_ID: &str = "VEH-001";

/// One GPS sample pushed by the server for a simulated vehicle.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VehicleUpdate {
    pub vehicle_id: VehicleId,
    pub latitude: f64,
    pub longitude: f64,
    /// km/h
    pub speed: f64,
    /// Percentage of the route driven, 0 to 100.
    pub progress: f64,
    /// km
    #[serde(default)]
    pub distance_covered: f64,
    /// seconds
    #[serde(default)]
    pub elapsed_time: f64,
    pub timestamp: Option<NaiveDateTime>,
}

impl VehicleUpdate {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum VehicleStatus {
    Active,
    Completed,
}

impl VehicleStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }
}

/// Last known display state of one tracked vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleState {
    pub id: VehicleId,
    pub last_position: LatLng,
    /// Every received position in arrival order. Only ever appended to.
    pub path: Vec<LatLng>,
    pub status: VehicleStatus,
    pub speed: f64,
    pub progress: f64,
    pub distance_covered: f64,
    pub elapsed_time: f64,
}

impl HasId for VehicleState {
    type IdType = String;
}

impl VehicleState {
    pub fn from_update(update: &VehicleUpdate) -> Self {
        let position = update.position();
        Self {
            id: update.vehicle_id.clone(),
            last_position: position,
            path: vec![position],
            status: VehicleStatus::Active,
            speed: update.speed,
            progress: update.progress.clamp(0.0, 100.0),
            distance_covered: update.distance_covered,
            elapsed_time: update.elapsed_time,
        }
    }

    pub fn apply(&mut self, update: &VehicleUpdate) {
        let position = update.position();
        self.last_position = position;
        self.path.push(position);
        self.speed = update.speed;
        self.progress = update.progress.clamp(0.0, 100.0);
        self.distance_covered = update.distance_covered;
        self.elapsed_time = update.elapsed_time;
    }

    pub fn is_active(&self) -> bool {
        self.status == VehicleStatus::Active
    }
}

/// Suggests the id following `current` in the `VEH-nnn` sequence. Only the
/// leading digits after the first `-` count. Ids that do not carry a number,
/// or whose successor does not fit, continue at `VEH-002`.
pub fn next_vehicle_id(current: &VehicleId) -> VehicleId {
    let next = current
        .raw_ref::<str>()
        .split('-')
        .nth(1)
        .and_then(|num| {
            let num = num.trim_start();
            let end = num
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(num.len());
            num[..end].parse::<u64>().ok()
        })
        .filter(|num| *num != 0)
        .and_then(|num| num.checked_add(1))
        .unwrap_or(2);
    Id::new(format!("VEH-{:03}", next))
}
