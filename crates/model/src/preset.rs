use schemars::JsonSchema;
use serde::Serialize;
use utility::geo::LatLng;

use crate::trip_planning::RouteRequest;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoutePreset {
    pub key: &'static str,
    pub start: LatLng,
    pub end: LatLng,
}

impl RoutePreset {
    pub fn route(&self) -> RouteRequest {
        RouteRequest::new(self.start, self.end)
    }
}

/// Map center used before any vehicle shows up.
pub const DEFAULT_CENTER: LatLng = LatLng {
    latitude: 41.1579,
    longitude: -8.6291,
};

pub const PRESETS: [RoutePreset; 3] = [
    RoutePreset {
        key: "porto1",
        start: DEFAULT_CENTER,
        end: LatLng {
            latitude: 41.1496,
            longitude: -8.6109,
        },
    },
    RoutePreset {
        key: "porto2",
        start: LatLng {
            latitude: 41.2481,
            longitude: -8.6814,
        },
        end: LatLng {
            latitude: 41.1621,
            longitude: -8.6531,
        },
    },
    RoutePreset {
        key: "porto3",
        start: LatLng {
            latitude: 41.1773,
            longitude: -8.5960,
        },
        end: DEFAULT_CENTER,
    },
];

pub fn find(key: &str) -> Option<&'static RoutePreset> {
    PRESETS.iter().find(|preset| preset.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_presets_by_key() {
        let preset = find("porto2").unwrap();
        assert_eq!(preset.route().start_lat, 41.2481);
        assert_eq!(preset.route().end_lon, -8.6531);
        assert!(find("lisbon").is_none());
    }
}
