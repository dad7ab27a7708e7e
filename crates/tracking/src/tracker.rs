use std::time::Duration;

use model::{
    event::{Connected, PushEvent, VehicleCompleted},
    vehicle::{VehicleId, VehicleState, VehicleUpdate},
};
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;

use crate::{
    map::{self, MapLayers},
    metrics::{self, Metrics},
    sidebar::{self, Sidebar},
    table::{RemovalTicket, Upsert, VehicleTable},
    view::MapView,
    REMOVAL_GRACE_PERIOD,
};

/// Everything that can change the live map.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    Push(PushEvent),
    /// The grace period of a completed vehicle is over.
    Expire(RemovalTicket),
    Focus(VehicleId),
    CenterMap,
    Clear,
}

impl From<PushEvent> for TrackerEvent {
    fn from(event: PushEvent) -> Self {
        TrackerEvent::Push(event)
    }
}

/// Work the tracker asks its owner to do after an event was processed.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ScheduleRemoval {
        ticket: RemovalTicket,
        after: Duration,
    },
}

/// A read-only copy of the tracker state, as served to viewers.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackerSnapshot {
    /// Increases with every processed event.
    pub revision: u64,
    pub vehicles: Vec<VehicleState>,
    pub sidebar: Sidebar,
    pub metrics: Metrics,
    pub view: MapView,
    /// GeoJSON `FeatureCollection` of markers and paths.
    pub map: Value,
}

/// Owns the vehicle table together with everything rendered from it. All
/// changes go through [`Tracker::update`].
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    table: VehicleTable,
    layers: MapLayers,
    view: MapView,
    sidebar: Sidebar,
    metrics: Metrics,
    revision: u64,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> &VehicleTable {
        &self.table
    }

    pub fn layers(&self) -> &MapLayers {
        &self.layers
    }

    pub fn view(&self) -> &MapView {
        &self.view
    }

    pub fn sidebar(&self) -> &Sidebar {
        &self.sidebar
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn update(&mut self, event: TrackerEvent) -> Vec<Effect> {
        self.revision += 1;
        match event {
            TrackerEvent::Push(PushEvent::GpsUpdate(update)) => {
                self.on_gps_update(&update);
                vec![]
            }
            TrackerEvent::Push(PushEvent::VehicleCompleted(VehicleCompleted {
                vehicle_id,
            })) => self.on_completed(&vehicle_id),
            TrackerEvent::Push(PushEvent::Connected(Connected { data })) => {
                log::info!("push channel: {}", data);
                vec![]
            }
            TrackerEvent::Expire(ticket) => {
                self.on_expire(&ticket);
                vec![]
            }
            TrackerEvent::Focus(vehicle_id) => {
                if !self.view.focus(&mut self.layers, &vehicle_id) {
                    log::debug!("can not focus vehicle {}, it is not on the map", vehicle_id);
                }
                vec![]
            }
            TrackerEvent::CenterMap => {
                self.view.center_on_markers(&self.layers);
                vec![]
            }
            TrackerEvent::Clear => {
                let cleared = self.table.clear();
                map::render_clear(&mut self.layers);
                self.refresh();
                log::info!("cleared {} vehicles from the map", cleared.len());
                vec![]
            }
        }
    }

    fn on_gps_update(&mut self, update: &VehicleUpdate) {
        match self.table.upsert(update) {
            Upsert::Created | Upsert::Updated => {
                if let Some(vehicle) = self.table.get(&update.vehicle_id) {
                    map::render_upsert(&mut self.layers, vehicle);
                }
                self.refresh();
            }
            Upsert::Ignored => {
                log::debug!(
                    "ignoring update for completed vehicle {}",
                    update.vehicle_id
                );
            }
        }
    }

    fn on_completed(&mut self, vehicle_id: &VehicleId) -> Vec<Effect> {
        let Some(ticket) = self.table.complete(vehicle_id) else {
            log::debug!("completion for unknown or finished vehicle {}", vehicle_id);
            return vec![];
        };
        if let Some(vehicle) = self.table.get(vehicle_id) {
            map::render_status(&mut self.layers, vehicle);
        }
        self.refresh();
        log::info!("vehicle {} completed its trip", vehicle_id);

        vec![Effect::ScheduleRemoval {
            ticket,
            after: REMOVAL_GRACE_PERIOD,
        }]
    }

    fn on_expire(&mut self, ticket: &RemovalTicket) {
        if let Some(vehicle) = self.table.expire(ticket) {
            map::render_removal(&mut self.layers, &vehicle.id);
            self.refresh();
            log::debug!("removed vehicle {} from the map", vehicle.id);
        }
    }

    fn refresh(&mut self) {
        self.sidebar = sidebar::project(&self.table);
        self.metrics = metrics::aggregate(&self.table, &self.layers);
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot {
            revision: self.revision,
            vehicles: self.table.iter().cloned().collect(),
            sidebar: self.sidebar.clone(),
            metrics: self.metrics.clone(),
            view: self.view.clone(),
            map: self.layers.to_geojson(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use utility::id::Id;

    fn gps(id: &str, lat: f64, lon: f64, progress: f64) -> TrackerEvent {
        PushEvent::GpsUpdate(VehicleUpdate {
            vehicle_id: Id::from(id),
            latitude: lat,
            longitude: lon,
            speed: 5.0,
            progress,
            distance_covered: 0.0,
            elapsed_time: 0.0,
            timestamp: None,
        })
        .into()
    }

    fn completed(id: &str) -> TrackerEvent {
        PushEvent::VehicleCompleted(VehicleCompleted {
            vehicle_id: Id::from(id),
        })
        .into()
    }

    fn removal_ticket(effects: Vec<Effect>) -> RemovalTicket {
        match effects.as_slice() {
            [Effect::ScheduleRemoval { ticket, after }] => {
                assert_eq!(*after, REMOVAL_GRACE_PERIOD);
                ticket.clone()
            }
            other => panic!("expected one removal, got {other:?}"),
        }
    }

    #[test]
    fn first_update_makes_one_active_vehicle() {
        let mut tracker = Tracker::new();
        let effects = tracker.update(gps("V1", 10.0, 20.0, 50.0));

        assert!(effects.is_empty());
        assert_eq!(tracker.metrics().active_vehicles, 1);
        assert_eq!(tracker.sidebar().entries[0].progress, 50.0);

        tracker.update(gps("V1", 10.1, 20.1, 60.0));
        assert_eq!(tracker.metrics().active_vehicles, 1);
    }

    #[test]
    fn completion_keeps_vehicle_until_expiry() {
        let mut tracker = Tracker::new();
        tracker.update(gps("V1", 10.0, 20.0, 50.0));
        let ticket = removal_ticket(tracker.update(completed("V1")));

        assert_eq!(tracker.metrics().active_vehicles, 0);
        assert_eq!(tracker.metrics().tracked_vehicles, 1);
        assert!(tracker.layers().marker(&Id::from("V1")).is_some());

        tracker.update(TrackerEvent::Expire(ticket));
        assert_eq!(tracker.metrics().tracked_vehicles, 0);
        assert!(tracker.layers().marker(&Id::from("V1")).is_none());
        assert!(tracker.layers().overlay(&Id::from("V1")).is_none());
        assert_eq!(tracker.sidebar(), &Sidebar::default());
    }

    #[test]
    fn completing_unknown_vehicle_schedules_nothing() {
        let mut tracker = Tracker::new();
        assert!(tracker.update(completed("ghost")).is_empty());
    }

    #[test]
    fn clear_removes_everything_and_disarms_tickets() {
        let mut tracker = Tracker::new();
        tracker.update(gps("V1", 10.0, 20.0, 10.0));
        tracker.update(gps("V2", 11.0, 21.0, 10.0));
        let ticket = removal_ticket(tracker.update(completed("V1")));

        tracker.update(TrackerEvent::Clear);
        assert_eq!(tracker.metrics(), &Metrics::default());
        assert_eq!(tracker.layers().markers().count(), 0);

        tracker.update(gps("V1", 12.0, 22.0, 5.0));
        tracker.update(TrackerEvent::Expire(ticket));
        assert_eq!(tracker.metrics().active_vehicles, 1);
    }

    #[test]
    fn focus_and_center_update_the_view() {
        let mut tracker = Tracker::new();
        tracker.update(gps("V1", 41.1, -8.6, 10.0));
        tracker.update(TrackerEvent::Focus(Id::from("V1")));
        assert!(matches!(tracker.view(), MapView::Center { zoom: 15, .. }));

        tracker.update(TrackerEvent::CenterMap);
        assert!(matches!(tracker.view(), MapView::FitBounds { .. }));
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut tracker = Tracker::new();
        tracker.update(gps("V1", 41.1, -8.6, 10.0));
        tracker.update(gps("V1", 41.2, -8.7, 20.0));

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.revision, 2);
        assert_eq!(snapshot.vehicles.len(), 1);
        assert_eq!(snapshot.vehicles[0].path.len(), 2);
        assert_eq!(snapshot.map["features"].as_array().unwrap().len(), 2);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["metrics"]["activeVehicles"], 1);
        assert_eq!(json["view"]["mode"], "center");
    }
}
