use indexmap::IndexMap;
use model::vehicle::{VehicleId, VehicleState, VehicleStatus};
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{json, Value};
use utility::{format, geo::LatLng};

pub const PATH_COLOR: &str = "#2563eb";
pub const PATH_WEIGHT: u8 = 4;
pub const PATH_OPACITY: f64 = 0.7;

/// Contents of the popup bound to a vehicle marker, already formatted for
/// display.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Popup {
    pub title: String,
    pub speed: String,
    pub progress: String,
    pub distance: String,
    pub time: String,
}

impl Popup {
    pub fn for_vehicle(vehicle: &VehicleState) -> Self {
        Self {
            title: vehicle.id.to_string(),
            speed: format!("{:.2} km/h", vehicle.speed),
            progress: format!("{:.1}%", vehicle.progress),
            distance: format::kilometers(vehicle.distance_covered),
            time: format::elapsed(vehicle.elapsed_time),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub position: LatLng,
    pub label: String,
    pub status: VehicleStatus,
    pub popup: Popup,
    pub popup_open: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PathOverlay {
    pub points: Vec<LatLng>,
}

/// Everything drawn on the live map, keyed by vehicle.
#[derive(Debug, Clone, Default)]
pub struct MapLayers {
    markers: IndexMap<VehicleId, Marker>,
    overlays: IndexMap<VehicleId, PathOverlay>,
}

impl MapLayers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marker(&self, id: &VehicleId) -> Option<&Marker> {
        self.markers.get(id)
    }

    pub fn overlay(&self, id: &VehicleId) -> Option<&PathOverlay> {
        self.overlays.get(id)
    }

    pub fn markers(&self) -> impl Iterator<Item = (&VehicleId, &Marker)> {
        self.markers.iter()
    }

    pub fn overlays(&self) -> impl Iterator<Item = (&VehicleId, &PathOverlay)> {
        self.overlays.iter()
    }

    pub fn marker_positions(&self) -> Vec<LatLng> {
        self.markers.values().map(|marker| marker.position).collect()
    }

    /// Opens the popup of `id` and closes every other one. Returns the marker
    /// position, or `None` if there is no such marker.
    pub fn open_popup(&mut self, id: &VehicleId) -> Option<LatLng> {
        let position = self.markers.get(id)?.position;
        for (marker_id, marker) in self.markers.iter_mut() {
            marker.popup_open = marker_id == id;
        }
        Some(position)
    }

    /// The layers as a GeoJSON `FeatureCollection`: one `Point` per marker and
    /// one `LineString` per path overlay.
    pub fn to_geojson(&self) -> Value {
        let markers = self.markers.iter().map(|(id, marker)| {
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": marker.position.to_geojson(),
                },
                "properties": {
                    "kind": "marker",
                    "vehicleId": id,
                    "label": marker.label,
                    "status": marker.status,
                    "popup": marker.popup,
                    "popupOpen": marker.popup_open,
                },
            })
        });
        let overlays = self.overlays.iter().map(|(id, overlay)| {
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "LineString",
                    "coordinates": overlay
                        .points
                        .iter()
                        .map(LatLng::to_geojson)
                        .collect::<Vec<_>>(),
                },
                "properties": {
                    "kind": "path",
                    "vehicleId": id,
                    "color": PATH_COLOR,
                    "weight": PATH_WEIGHT,
                    "opacity": PATH_OPACITY,
                },
            })
        });

        json!({
            "type": "FeatureCollection",
            "features": overlays.chain(markers).collect::<Vec<_>>(),
        })
    }
}

/// Brings the layers of `vehicle` up to date after an update was applied to
/// it: creates marker, popup and path overlay on first sight, otherwise moves
/// the marker, refreshes the popup and extends the path by the newest
/// position.
pub fn render_upsert(layers: &mut MapLayers, vehicle: &VehicleState) {
    let popup = Popup::for_vehicle(vehicle);
    match layers.markers.get_mut(&vehicle.id) {
        Some(marker) => {
            marker.position = vehicle.last_position;
            marker.status = vehicle.status;
            marker.popup = popup;
        }
        None => {
            layers.markers.insert(
                vehicle.id.clone(),
                Marker {
                    position: vehicle.last_position,
                    label: vehicle.id.to_string(),
                    status: vehicle.status,
                    popup,
                    popup_open: false,
                },
            );
        }
    }

    layers
        .overlays
        .entry(vehicle.id.clone())
        .or_default()
        .points
        .push(vehicle.last_position);
}

/// Reflects a status change without touching position or path.
pub fn render_status(layers: &mut MapLayers, vehicle: &VehicleState) {
    if let Some(marker) = layers.markers.get_mut(&vehicle.id) {
        marker.status = vehicle.status;
    }
}

pub fn render_removal(layers: &mut MapLayers, id: &VehicleId) {
    if layers.markers.shift_remove(id).is_none() {
        log::debug!("no marker to detach for vehicle {}", id);
    }
    layers.overlays.shift_remove(id);
}

pub fn render_clear(layers: &mut MapLayers) {
    layers.markers.clear();
    layers.overlays.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::vehicle::VehicleUpdate;
    use utility::id::Id;

    fn update(lat: f64, lon: f64) -> VehicleUpdate {
        VehicleUpdate {
            vehicle_id: Id::from("VEH-001"),
            latitude: lat,
            longitude: lon,
            speed: 12.346,
            progress: 42.26,
            distance_covered: 1.5,
            elapsed_time: 75.0,
            timestamp: None,
        }
    }

    #[test]
    fn popup_is_formatted() {
        let vehicle = VehicleState::from_update(&update(41.0, -8.0));
        let popup = Popup::for_vehicle(&vehicle);
        assert_eq!(popup.title, "VEH-001");
        assert_eq!(popup.speed, "12.35 km/h");
        assert_eq!(popup.progress, "42.3%");
        assert_eq!(popup.distance, "1.50 km");
        assert_eq!(popup.time, "1m 15s");
    }

    #[test]
    fn upsert_moves_marker_and_extends_path() {
        let mut layers = MapLayers::new();
        let mut vehicle = VehicleState::from_update(&update(41.0, -8.0));
        render_upsert(&mut layers, &vehicle);

        vehicle.apply(&update(41.1, -8.1));
        render_upsert(&mut layers, &vehicle);

        let marker = layers.marker(&vehicle.id).unwrap();
        assert_eq!(marker.position, LatLng::new(41.1, -8.1));
        assert_eq!(layers.overlay(&vehicle.id).unwrap().points, vehicle.path);
    }

    #[test]
    fn removal_detaches_marker_and_overlay() {
        let mut layers = MapLayers::new();
        let vehicle = VehicleState::from_update(&update(41.0, -8.0));
        render_upsert(&mut layers, &vehicle);
        render_removal(&mut layers, &vehicle.id);

        assert!(layers.marker(&vehicle.id).is_none());
        assert!(layers.overlay(&vehicle.id).is_none());
    }

    #[test]
    fn geojson_uses_lon_lat_order() {
        let mut layers = MapLayers::new();
        let vehicle = VehicleState::from_update(&update(41.0, -8.0));
        render_upsert(&mut layers, &vehicle);

        let geojson = layers.to_geojson();
        let features = geojson["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0]["geometry"]["type"], "LineString");
        assert_eq!(features[1]["geometry"]["coordinates"][0], -8.0);
        assert_eq!(features[1]["geometry"]["coordinates"][1], 41.0);
        assert_eq!(features[1]["properties"]["popup"]["speed"], "12.35 km/h");
    }

    #[test]
    fn only_one_popup_is_open() {
        let mut layers = MapLayers::new();
        let first = VehicleState::from_update(&update(41.0, -8.0));
        let mut other = update(41.2, -8.2);
        other.vehicle_id = Id::from("VEH-002");
        let second = VehicleState::from_update(&other);
        render_upsert(&mut layers, &first);
        render_upsert(&mut layers, &second);

        layers.open_popup(&first.id);
        assert_eq!(
            layers.open_popup(&second.id),
            Some(LatLng::new(41.2, -8.2))
        );
        assert!(!layers.marker(&first.id).unwrap().popup_open);
        assert!(layers.marker(&second.id).unwrap().popup_open);
        assert_eq!(layers.open_popup(&Id::from("VEH-404")), None);
    }
}
