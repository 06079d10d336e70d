//! Geographic coordinates used as graph vertex identities

use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// A latitude/longitude pair in degrees (WGS84)
///
/// Coordinates are compared by value: equality, hashing and ordering all go
/// through [`OrderedFloat`], so they can key a `HashMap` or `BTreeMap`.
/// Ordering is latitude first, then longitude.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    #[inline]
    fn key(&self) -> (OrderedFloat<f64>, OrderedFloat<f64>) {
        (OrderedFloat(self.latitude), OrderedFloat(self.longitude))
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Coordinate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coordinate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl From<gpx::Waypoint> for Coordinate {
    fn from(waypoint: gpx::Waypoint) -> Self {
        Self::from(&waypoint)
    }
}

impl From<&gpx::Waypoint> for Coordinate {
    fn from(waypoint: &gpx::Waypoint) -> Self {
        // gpx stores points as (x = lon, y = lat)
        let point = waypoint.point();
        Self::new(point.y(), point.x())
    }
}

/// A track point with its elevation in meters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoordinateWithElevation {
    pub coordinate: Coordinate,
    pub elevation: OrderedFloat<f64>,
}

impl CoordinateWithElevation {
    pub fn new(coordinate: Coordinate, elevation: f64) -> Self {
        Self {
            coordinate,
            elevation: OrderedFloat(elevation),
        }
    }
}
