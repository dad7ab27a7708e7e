use futures::{Stream, StreamExt};
use model::event::PushEvent;
use ride_api::{ApiError, PushChannel};
use tracking::{TrackerError, TrackerHandle};

/// Hands every push event to the tracker in arrival order. Returns when the
/// stream ends or the tracker stops.
pub async fn forward<S>(events: S, tracker: &TrackerHandle) -> Result<(), TrackerError>
where
    S: Stream<Item = Result<PushEvent, ApiError>>,
{
    let mut events = std::pin::pin!(events);
    while let Some(event) = events.next().await {
        match event {
            Ok(PushEvent::Connected(connected)) => {
                log::info!("Server says: {}", connected.data);
            }
            Ok(event) => tracker.dispatch(event).await?,
            Err(why) => log::warn!("dropping push event: {}", why),
        }
    }
    Ok(())
}

/// Connects once and feeds the tracker until the server hangs up. There is
/// no reconnect.
pub fn spawn(channel: PushChannel, tracker: TrackerHandle) {
    tokio::spawn(async move {
        let events = match channel.connect().await {
            Ok(events) => events,
            Err(why) => {
                log::error!("could not connect to '{}': {}", channel.url(), why);
                return;
            }
        };
        match forward(events, &tracker).await {
            Ok(()) => log::info!("Disconnected from server"),
            Err(why) => log::error!("stopped forwarding push events: {}", why),
        }
    });
}

#[cfg(test)]
mod tests {
    use futures::stream;
    use model::{
        event::{Connected, VehicleCompleted},
        vehicle::VehicleUpdate,
    };
    use tracking::{runtime, Tracker};
    use utility::id::Id;

    use super::*;

    fn gps(progress: f64) -> PushEvent {
        PushEvent::GpsUpdate(VehicleUpdate {
            vehicle_id: Id::from("VEH-001"),
            latitude: 41.15,
            longitude: -8.62 + progress / 1000.0,
            speed: 20.0,
            progress,
            distance_covered: 0.0,
            elapsed_time: 0.0,
            timestamp: None,
        })
    }

    #[tokio::test]
    async fn forwards_in_order_and_skips_bad_payloads() {
        let tracker = runtime::spawn(Tracker::new());
        let events = stream::iter(vec![
            Ok(PushEvent::Connected(Connected {
                data: "Connected to GPS tracking server".to_owned(),
            })),
            Ok(gps(10.0)),
            Err(ApiError::Other("broken frame".to_owned())),
            Ok(gps(20.0)),
        ]);
        forward(events, &tracker).await.unwrap();

        let snapshot = tracker.snapshot().await.unwrap();
        assert_eq!(snapshot.revision, 2);
        assert_eq!(snapshot.vehicles[0].path.len(), 2);
        assert_eq!(snapshot.sidebar.entries[0].progress, 20.0);
    }

    #[tokio::test]
    async fn completion_reaches_the_tracker() {
        let tracker = runtime::spawn(Tracker::new());
        let events = stream::iter(vec![
            Ok(gps(100.0)),
            Ok(PushEvent::VehicleCompleted(VehicleCompleted {
                vehicle_id: Id::from("VEH-001"),
            })),
        ]);
        forward(events, &tracker).await.unwrap();

        let snapshot = tracker.snapshot().await.unwrap();
        assert_eq!(snapshot.metrics.active_vehicles, 0);
        assert_eq!(snapshot.metrics.tracked_vehicles, 1);
    }
}
