//! Point-to-point distance, chosen by point type
//!
//! Screen points use plain Euclidean distance. Geographic coordinates are
//! measured in the Web Mercator plane and scaled back to ground meters at the
//! mean latitude of the pair. That is a flat-map approximation, not a geodesic:
//! it ranks nearby points correctly over a small area, which is all the graph
//! weights and the nearest-point resolver rely on.

use crate::{Coordinate, Vector2, utils};
use geo::{Coord, CoordFloat};

/// A distance function over points of one coordinate space
pub trait Metric: Vector2 {
    /// Distance between `self` and `other`, never negative
    fn distance(&self, other: &Self) -> Self::Component;
}

impl<T: CoordFloat> Metric for Coord<T> {
    #[inline]
    fn distance(&self, other: &Self) -> T {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

impl Metric for Coordinate {
    /// Approximate ground distance in meters
    #[inline]
    fn distance(&self, other: &Self) -> f64 {
        let a = utils::to_mercator(*self);
        let b = utils::to_mercator(*other);
        let mean_latitude = (self.latitude() + other.latitude()) / 2.0;
        a.distance(&b) * utils::mercator_scale_factor(mean_latitude)
    }
}
