use itertools::Itertools;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// A WGS84 coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLng {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in kilometers.
    pub fn distance_to(&self, other: &LatLng) -> f64 {
        haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }

    /// GeoJSON orders coordinates as `[longitude, latitude]`.
    pub fn to_geojson(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = to_radians(latitude_1);
    let lon1_rad = to_radians(longitude_1);
    let lat2_rad = to_radians(latitude_2);
    let lon2_rad = to_radians(longitude_2);

    let dlat = lat2_rad - lat1_rad;
    let dlon = lon2_rad - lon1_rad;

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Sum of the great-circle lengths of consecutive segments, in kilometers.
pub fn path_length<'a, I>(points: I) -> f64
where
    I: IntoIterator<Item = &'a LatLng>,
{
    points
        .into_iter()
        .tuple_windows()
        .map(|(a, b)| a.distance_to(b))
        .sum()
}

/// Axis aligned box spanning a set of coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    /// Returns `None` for an empty set of points.
    pub fn of<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a LatLng>,
    {
        points.into_iter().fold(None, |bounds, point| {
            Some(match bounds {
                None => Bounds {
                    south_west: *point,
                    north_east: *point,
                },
                Some(Bounds {
                    south_west,
                    north_east,
                }) => Bounds {
                    south_west: LatLng::new(
                        south_west.latitude.min(point.latitude),
                        south_west.longitude.min(point.longitude),
                    ),
                    north_east: LatLng::new(
                        north_east.latitude.max(point.latitude),
                        north_east.longitude.max(point.longitude),
                    ),
                },
            })
        })
    }
}
