use std::{error, fmt, time::Duration};

use tokio::sync::oneshot;

pub mod map;
pub mod metrics;
pub mod runtime;
pub mod sidebar;
pub mod table;
pub mod tracker;
pub mod view;

pub use runtime::TrackerHandle;
pub use tracker::{Effect, Tracker, TrackerEvent, TrackerSnapshot};

/// How long a completed vehicle stays on the map before it is removed.
pub const REMOVAL_GRACE_PERIOD: Duration = Duration::from_secs(3);

#[derive(Debug)]
pub enum TrackerError {
    /// The tracker task is gone, so nothing can be dispatched to it anymore.
    Stopped,
    NoResponse(oneshot::error::RecvError),
}

impl error::Error for TrackerError {}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TrackerError::Stopped => write!(f, "tracker is not running"),
            TrackerError::NoResponse(why) => {
                write!(f, "tracker did not respond: {}", why)
            }
        }
    }
}

impl From<oneshot::error::RecvError> for TrackerError {
    fn from(why: oneshot::error::RecvError) -> Self {
        TrackerError::NoResponse(why)
    }
}
