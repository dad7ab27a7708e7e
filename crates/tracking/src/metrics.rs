use schemars::JsonSchema;
use serde::Serialize;
use utility::{format, geo};

use crate::{map::MapLayers, table::VehicleTable};

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// Vehicles still driving.
    pub active_vehicles: usize,
    /// Vehicles on the map, including completed ones waiting for removal.
    pub tracked_vehicles: usize,
    pub total_distance_km: f64,
    pub total_distance_label: String,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            active_vehicles: 0,
            tracked_vehicles: 0,
            total_distance_km: 0.0,
            total_distance_label: format::kilometers(0.0),
        }
    }
}

/// Recomputes the rollups from scratch. Walks every point of every path
/// overlay once.
pub fn aggregate(table: &VehicleTable, layers: &MapLayers) -> Metrics {
    let total_distance_km = layers
        .overlays()
        .map(|(_, overlay)| geo::path_length(&overlay.points))
        .sum();

    Metrics {
        active_vehicles: table.active_count(),
        tracked_vehicles: table.len(),
        total_distance_km,
        total_distance_label: format::kilometers(total_distance_km),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::render_upsert;
    use model::vehicle::VehicleUpdate;
    use utility::id::Id;

    fn update(id: &str, lat: f64) -> VehicleUpdate {
        VehicleUpdate {
            vehicle_id: Id::from(id),
            latitude: lat,
            longitude: 0.0,
            speed: 0.0,
            progress: 0.0,
            distance_covered: 0.0,
            elapsed_time: 0.0,
            timestamp: None,
        }
    }

    #[test]
    fn distance_sums_all_overlays() {
        let mut table = VehicleTable::new();
        let mut layers = MapLayers::new();
        for (id, lat) in [("V1", 0.0), ("V1", 1.0), ("V2", 10.0), ("V2", 11.0)] {
            let update = update(id, lat);
            table.upsert(&update);
            render_upsert(&mut layers, table.get(&update.vehicle_id).unwrap());
        }

        let metrics = aggregate(&table, &layers);
        let one_degree = geo::haversine_distance(0.0, 0.0, 1.0, 0.0);
        assert_eq!(metrics.tracked_vehicles, 2);
        assert_eq!(metrics.active_vehicles, 2);
        assert!((metrics.total_distance_km - 2.0 * one_degree).abs() < 1e-9);
        assert_eq!(metrics.total_distance_label, "222.39 km");
    }

    #[test]
    fn empty_map_has_no_distance() {
        let metrics = aggregate(&VehicleTable::new(), &MapLayers::new());
        assert_eq!(metrics, Metrics::default());
        assert_eq!(metrics.total_distance_label, "0.00 km");
    }
}
