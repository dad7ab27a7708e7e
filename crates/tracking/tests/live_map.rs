use std::time::Duration;

use model::{
    event::{PushEvent, VehicleCompleted},
    vehicle::VehicleUpdate,
};
use tracking::{runtime, Tracker, TrackerEvent, REMOVAL_GRACE_PERIOD};
use utility::id::Id;

fn gps(id: &str, step: usize) -> PushEvent {
    PushEvent::GpsUpdate(VehicleUpdate {
        vehicle_id: Id::from(id),
        latitude: 41.15 + step as f64 * 0.001,
        longitude: -8.62 - step as f64 * 0.001,
        speed: 30.0,
        progress: step as f64,
        distance_covered: step as f64 * 0.1,
        elapsed_time: step as f64 * 0.5,
        timestamp: None,
    })
}

fn completed(id: &str) -> PushEvent {
    PushEvent::VehicleCompleted(VehicleCompleted {
        vehicle_id: Id::from(id),
    })
}

#[test]
fn rendered_path_has_one_point_per_update_before_completion() {
    for updates in [1, 2, 7, 50] {
        let mut tracker = Tracker::new();
        for step in 0..updates {
            tracker.update(gps("V1", step).into());
            tracker.update(gps("V2", step).into());
        }
        tracker.update(completed("V1").into());
        // late updates for a finished vehicle are not drawn
        tracker.update(gps("V1", updates).into());

        let overlay = tracker.layers().overlay(&Id::from("V1")).unwrap();
        assert_eq!(overlay.points.len(), updates);
        let vehicle = tracker.table().get(&Id::from("V1")).unwrap();
        assert_eq!(vehicle.path.len(), updates);
        assert_eq!(
            tracker.layers().overlay(&Id::from("V2")).unwrap().points.len(),
            updates
        );
    }
}

#[test]
fn total_distance_never_decreases_while_driving() {
    let mut tracker = Tracker::new();
    let mut last = 0.0;
    for step in 0..20 {
        tracker.update(TrackerEvent::from(gps("V1", step)));
        let total = tracker.metrics().total_distance_km;
        assert!(total >= last);
        last = total;
    }
    assert!(last > 0.0);
}

#[tokio::test(start_paused = true)]
async fn active_count_stays_one_until_completion() {
    let handle = runtime::spawn(Tracker::new());
    handle
        .dispatch(PushEvent::GpsUpdate(VehicleUpdate {
            vehicle_id: Id::from("V1"),
            latitude: 10.0,
            longitude: 20.0,
            speed: 5.0,
            progress: 50.0,
            distance_covered: 0.0,
            elapsed_time: 0.0,
            timestamp: None,
        }))
        .await
        .unwrap();
    assert_eq!(handle.snapshot().await.unwrap().metrics.active_vehicles, 1);

    for step in 1..5 {
        handle.dispatch(gps("V1", step)).await.unwrap();
        tokio::time::advance(Duration::from_millis(500)).await;
        assert_eq!(handle.snapshot().await.unwrap().metrics.active_vehicles, 1);
    }

    handle.dispatch(completed("V1")).await.unwrap();
    assert_eq!(handle.snapshot().await.unwrap().metrics.active_vehicles, 0);
}

#[tokio::test(start_paused = true)]
async fn completed_vehicle_is_removed_after_grace_period_not_before() {
    let handle = runtime::spawn(Tracker::new());
    handle.dispatch(gps("V1", 0)).await.unwrap();
    handle.dispatch(completed("V1")).await.unwrap();

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.metrics.tracked_vehicles, 1);

    tokio::time::advance(REMOVAL_GRACE_PERIOD - Duration::from_millis(1)).await;
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.metrics.tracked_vehicles, 1);
    assert_eq!(snapshot.vehicles.len(), 1);

    tokio::time::advance(Duration::from_millis(1)).await;
    let mut removed = false;
    for _ in 0..10 {
        tokio::task::yield_now().await;
        if handle.snapshot().await.unwrap().vehicles.is_empty() {
            removed = true;
            break;
        }
    }
    assert!(removed, "vehicle should be gone once the grace period is over");
}

#[tokio::test(start_paused = true)]
async fn removal_happens_exactly_at_the_end_of_the_grace_period() {
    let handle = runtime::spawn(Tracker::new());
    let mut snapshots = handle.subscribe();
    handle.dispatch(gps("V1", 0)).await.unwrap();
    handle.dispatch(completed("V1")).await.unwrap();
    let completed_at = tokio::time::Instant::now();

    loop {
        snapshots.changed().await.unwrap();
        if snapshots.borrow_and_update().metrics.tracked_vehicles == 0 {
            break;
        }
    }
    assert_eq!(completed_at.elapsed(), REMOVAL_GRACE_PERIOD);
}

#[tokio::test]
async fn snapshot_sees_every_event_dispatched_before() {
    let handle = runtime::spawn(Tracker::new());
    for step in 0..10 {
        handle.dispatch(gps("V1", step)).await.unwrap();
    }
    handle.dispatch(TrackerEvent::Focus(Id::from("V1"))).await.unwrap();

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.revision, 11);
    assert_eq!(snapshot.vehicles[0].path.len(), 10);
    assert_eq!(snapshot.sidebar.entries[0].progress, 9.0);
}
