//! Web Mercator projection helpers used by the projected distance metric
//! and the presenter's bounding region

use crate::Coordinate;
use geo::{Coord, Rect};

/// Web Mercator bounds in meters (EPSG:3857)
pub const EARTH_MERCATOR_MAX: f64 = 20037508.34;
pub const EARTH_MERCATOR_MIN: f64 = -20037508.34;

/// Maximum latitude that can be represented in Web Mercator
pub const MAX_LATITUDE: f64 = 85.05112878;

/// Precomputed constant: EARTH_MERCATOR_MAX / 180.0
const LON_TO_X_FACTOR: f64 = EARTH_MERCATOR_MAX / 180.0;

/// Precomputed constant: EARTH_MERCATOR_MAX / PI
const Y_FACTOR: f64 = EARTH_MERCATOR_MAX / std::f64::consts::PI;

/// Precomputed constant: 180.0 / EARTH_MERCATOR_MAX
const X_TO_LON_FACTOR: f64 = 180.0 / EARTH_MERCATOR_MAX;

/// Precomputed constant: PI / EARTH_MERCATOR_MAX
const Y_TO_LAT_FACTOR: f64 = std::f64::consts::PI / EARTH_MERCATOR_MAX;

/// Project a coordinate to Web Mercator (x, y) in meters
///
/// Latitude is clamped to the representable range, so the poles map to the
/// edge of the projected plane instead of infinity.
#[inline(always)]
pub fn to_mercator(coordinate: Coordinate) -> Coord<f64> {
    let lat = coordinate
        .latitude()
        .clamp(-MAX_LATITUDE, MAX_LATITUDE)
        .to_radians();
    Coord {
        x: coordinate.longitude() * LON_TO_X_FACTOR,
        y: (lat.tan() + (1.0 / lat.cos())).ln() * Y_FACTOR,
    }
}

/// Inverse of [`to_mercator`]
#[inline(always)]
pub fn from_mercator(point: Coord<f64>) -> Coordinate {
    let longitude = point.x * X_TO_LON_FACTOR;
    let latitude = (std::f64::consts::PI / 2.0
        - 2.0 * ((-point.y * Y_TO_LAT_FACTOR).exp()).atan())
    .to_degrees();
    Coordinate::new(latitude, longitude)
}

/// Ratio of ground meters to projected meters at a latitude (degrees)
#[inline]
pub fn mercator_scale_factor(latitude: f64) -> f64 {
    latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians().cos()
}

/// Smallest rectangle covering both inputs
pub fn union_rect(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        Coord {
            x: a.min().x.min(b.min().x),
            y: a.min().y.min(b.min().y),
        },
        Coord {
            x: a.max().x.max(b.max().x),
            y: a.max().y.max(b.max().y),
        },
    )
}
