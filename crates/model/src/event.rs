use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::vehicle::{VehicleId, VehicleUpdate};

pub const GPS_UPDATE: &str = "gps_update";
pub const VEHICLE_COMPLETED: &str = "vehicle_completed";
pub const CONNECTED: &str = "connected";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VehicleCompleted {
    pub vehicle_id: VehicleId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Connected {
    pub data: String,
}

/// A message received on the push channel.
#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    GpsUpdate(VehicleUpdate),
    VehicleCompleted(VehicleCompleted),
    Connected(Connected),
}

impl PushEvent {
    /// Decodes the payload of the event called `name`. Events this client does
    /// not know are `Ok(None)`.
    pub fn decode(name: &str, data: &str) -> Result<Option<Self>, serde_json::Error> {
        let event = match name {
            GPS_UPDATE => Self::GpsUpdate(serde_json::from_str(data)?),
            VEHICLE_COMPLETED => Self::VehicleCompleted(serde_json::from_str(data)?),
            CONNECTED => Self::Connected(serde_json::from_str(data)?),
            _ => return Ok(None),
        };
        Ok(Some(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_completion() {
        let event = PushEvent::decode(VEHICLE_COMPLETED, r#"{"vehicle_id":"VEH-007"}"#)
            .unwrap()
            .unwrap();
        match event {
            PushEvent::VehicleCompleted(VehicleCompleted { vehicle_id }) => {
                assert_eq!(vehicle_id.raw_ref::<str>(), "VEH-007")
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn unknown_events_are_skipped() {
        assert_eq!(PushEvent::decode("heartbeat", "{}").unwrap(), None);
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(PushEvent::decode(GPS_UPDATE, r#"{"vehicle_id":"V1"}"#).is_err());
    }
}
