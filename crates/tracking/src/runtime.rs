use std::sync::Arc;

use tokio::{
    sync::{mpsc, oneshot, watch},
    time::sleep,
};

use crate::{Effect, Tracker, TrackerError, TrackerEvent, TrackerSnapshot};

const MAILBOX_SIZE: usize = 256;

enum Command {
    Event(TrackerEvent),
    Snapshot(oneshot::Sender<Arc<TrackerSnapshot>>),
}

/// Cheap to clone handle to a running tracker.
#[derive(Clone)]
pub struct TrackerHandle {
    sender: mpsc::Sender<Command>,
    snapshots: watch::Receiver<Arc<TrackerSnapshot>>,
}

impl TrackerHandle {
    /// Queues an event. Events are processed one at a time in the order they
    /// were dispatched.
    pub async fn dispatch<E: Into<TrackerEvent>>(&self, event: E) -> Result<(), TrackerError> {
        self.sender
            .send(Command::Event(event.into()))
            .await
            .map_err(|_| TrackerError::Stopped)
    }

    /// Snapshot taken after every event dispatched before this call has been
    /// processed.
    pub async fn snapshot(&self) -> Result<Arc<TrackerSnapshot>, TrackerError> {
        let (response_tx, response_rx) = oneshot::channel();
        self.sender
            .send(Command::Snapshot(response_tx))
            .await
            .map_err(|_| TrackerError::Stopped)?;
        Ok(response_rx.await?)
    }

    /// Receiver that is notified whenever a new snapshot is published.
    pub fn subscribe(&self) -> watch::Receiver<Arc<TrackerSnapshot>> {
        self.snapshots.clone()
    }
}

/// Moves the tracker into its own task and returns a handle to it. The task
/// is the only writer of the tracker state and stops once every handle has
/// been dropped.
pub fn spawn(mut tracker: Tracker) -> TrackerHandle {
    let (tx, mut rx) = mpsc::channel::<Command>(MAILBOX_SIZE);
    let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(tracker.snapshot()));
    let scheduler = tx.downgrade();

    tokio::spawn(async move {
        while let Some(command) = rx.recv().await {
            match command {
                Command::Event(event) => {
                    for effect in tracker.update(event) {
                        match effect {
                            Effect::ScheduleRemoval { ticket, after } => {
                                let scheduler = scheduler.clone();
                                tokio::spawn(async move {
                                    sleep(after).await;
                                    // all handles gone means nobody cares anymore
                                    if let Some(sender) = scheduler.upgrade() {
                                        let _ = sender
                                            .send(Command::Event(TrackerEvent::Expire(ticket)))
                                            .await;
                                    }
                                });
                            }
                        }
                    }
                    snapshot_tx.send_replace(Arc::new(tracker.snapshot()));
                }
                Command::Snapshot(respond_to) => {
                    respond_to
                        .send(Arc::new(tracker.snapshot()))
                        .unwrap_or_else(|_| log::warn!("snapshot requester went away"));
                }
            }
        }
        log::info!("tracker stopped");
    });

    TrackerHandle {
        sender: tx,
        snapshots: snapshot_rx,
    }
}
