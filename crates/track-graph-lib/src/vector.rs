//! Generic 2D vector kernel
//!
//! [`Vector2`] is implemented by screen-space points ([`geo::Coord`]) and by
//! geographic [`Coordinate`]s, so the same projection code serves hit testing
//! in pixels and nearest-point work on the map.

use crate::{Coordinate, DataError, Result};
use geo::{Coord, CoordFloat, CoordNum};
use num_traits::{One, Zero};

/// A point in a 2D vector space with numeric components
pub trait Vector2: Copy {
    type Component: CoordNum;

    fn x(&self) -> Self::Component;

    fn y(&self) -> Self::Component;

    fn from_xy(x: Self::Component, y: Self::Component) -> Self;

    #[inline]
    fn dot(&self, other: &Self) -> Self::Component {
        self.x() * other.x() + self.y() * other.y()
    }

    #[inline]
    fn subtract(&self, other: &Self) -> Self {
        Self::from_xy(self.x() - other.x(), self.y() - other.y())
    }

    #[inline]
    fn add(&self, other: &Self) -> Self {
        Self::from_xy(self.x() + other.x(), self.y() + other.y())
    }

    #[inline]
    fn scale(&self, factor: Self::Component) -> Self {
        Self::from_xy(factor * self.x(), factor * self.y())
    }

    /// Project `self` onto the infinite line through `segment.0` and `segment.1`
    ///
    /// The projection parameter is not clamped, so the result may lie outside
    /// the segment; see [`Vector2::closest_point_clamped`] for that.
    ///
    /// # Errors
    /// [`DataError::DegenerateSegment`] if both segment points coincide.
    fn closest_point_on_segment(&self, segment: (Self, Self)) -> Result<Self>
    where
        Self::Component: CoordFloat,
    {
        let (direction, lambda) = projection_parameter(self, segment)?;
        Ok(segment.0.add(&direction.scale(lambda)))
    }

    /// Like [`Vector2::closest_point_on_segment`], with the result kept between
    /// `segment.0` and `segment.1`
    fn closest_point_clamped(&self, segment: (Self, Self)) -> Result<Self>
    where
        Self::Component: CoordFloat,
    {
        let (direction, lambda) = projection_parameter(self, segment)?;
        let zero = Self::Component::zero();
        let one = Self::Component::one();
        let lambda = if lambda < zero {
            zero
        } else if lambda > one {
            one
        } else {
            lambda
        };
        Ok(segment.0.add(&direction.scale(lambda)))
    }
}

/// Direction of the line and the parameter of the unclamped projection of `point`
fn projection_parameter<V>(point: &V, line: (V, V)) -> Result<(V, V::Component)>
where
    V: Vector2,
    V::Component: CoordFloat,
{
    let (start, end) = line;
    let direction = end.subtract(&start);
    let length_squared = direction.dot(&direction);
    if length_squared.is_zero() {
        return Err(DataError::DegenerateSegment);
    }
    Ok((direction, direction.dot(&point.subtract(&start)) / length_squared))
}

impl<T: CoordNum> Vector2 for Coord<T> {
    type Component = T;

    #[inline]
    fn x(&self) -> T {
        self.x
    }

    #[inline]
    fn y(&self) -> T {
        self.y
    }

    #[inline]
    fn from_xy(x: T, y: T) -> Self {
        Coord { x, y }
    }
}

// Not a euclidean space, but close enough over the extent of a single park.
impl Vector2 for Coordinate {
    type Component = f64;

    #[inline]
    fn x(&self) -> f64 {
        self.longitude()
    }

    #[inline]
    fn y(&self) -> f64 {
        self.latitude()
    }

    #[inline]
    fn from_xy(x: f64, y: f64) -> Self {
        Coordinate::new(y, x)
    }
}
