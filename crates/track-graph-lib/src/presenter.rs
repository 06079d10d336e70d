//! Presenter - track shapes, their bounding region and nearest-point queries
//!
//! The presenter owns the tracks shown on the map. Each added track becomes a
//! closed polygon in Web Mercator meters, addressed by an opaque
//! [`ShapeHandle`]. Nearest-point resolution scans every track point (no
//! spatial index: track and point counts are small), and [`Presenter::hit_test`]
//! turns a screen position into a match when it lands close enough to a track.

use crate::{Config, Coordinate, DataError, Metric, Result, Track, utils};
use geo::{BoundingRect, Coord, LineString, Polygon, Rect};

/// Opaque reference to a shape added to a [`Presenter`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeHandle(usize);

/// The track point nearest to a query
#[derive(Clone, Copy, Debug)]
pub struct ClosestMatch<'a> {
    pub handle: ShapeHandle,
    pub track: &'a Track,
    pub coordinate: Coordinate,
    /// Projected distance to the query, in meters
    pub distance: f64,
}

/// Conversion between map coordinates and screen pixels
pub trait ScreenProjection {
    fn to_screen(&self, coordinate: Coordinate) -> Coord<f64>;

    fn to_coordinate(&self, screen: Coord<f64>) -> Coordinate;
}

/// A Web Mercator viewport drawn onto a screen of a given size
///
/// Screen pixels grow right and down, with (0, 0) at the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MercatorViewport {
    viewport: Rect<f64>,
    screen_size: (f64, f64),
}

/// Smallest zoom step, so a single-point region still maps to a usable viewport
const MIN_METERS_PER_PIXEL: f64 = 0.01;

impl MercatorViewport {
    pub fn new(viewport: Rect<f64>, screen_size: (f64, f64)) -> Self {
        Self {
            viewport,
            screen_size,
        }
    }

    /// Viewport showing all of `region` with `padding_px` of margin on every side
    pub fn fit(region: Rect<f64>, screen_size: (f64, f64), padding_px: f64) -> Self {
        let usable_width = (screen_size.0 - 2.0 * padding_px).max(1.0);
        let usable_height = (screen_size.1 - 2.0 * padding_px).max(1.0);
        let meters_per_pixel = (region.width() / usable_width)
            .max(region.height() / usable_height)
            .max(MIN_METERS_PER_PIXEL);

        let center = region.center();
        let half = Coord {
            x: screen_size.0 * meters_per_pixel / 2.0,
            y: screen_size.1 * meters_per_pixel / 2.0,
        };
        Self::new(Rect::new(center - half, center + half), screen_size)
    }

    /// Visible area in Web Mercator meters
    pub fn viewport(&self) -> Rect<f64> {
        self.viewport
    }
}

impl ScreenProjection for MercatorViewport {
    fn to_screen(&self, coordinate: Coordinate) -> Coord<f64> {
        let m = utils::to_mercator(coordinate);
        Coord {
            x: (m.x - self.viewport.min().x) / self.viewport.width() * self.screen_size.0,
            y: (self.viewport.max().y - m.y) / self.viewport.height() * self.screen_size.1,
        }
    }

    fn to_coordinate(&self, screen: Coord<f64>) -> Coordinate {
        utils::from_mercator(Coord {
            x: self.viewport.min().x + screen.x / self.screen_size.0 * self.viewport.width(),
            y: self.viewport.max().y - screen.y / self.screen_size.1 * self.viewport.height(),
        })
    }
}

#[derive(Clone, Debug)]
struct Shape {
    track: Track,
    polygon: Polygon<f64>,
}

impl Shape {
    fn new(track: Track) -> Self {
        let ring: LineString<f64> = track.coordinates().map(utils::to_mercator).collect();
        Self {
            polygon: Polygon::new(ring, Vec::new()),
            track,
        }
    }
}

/// Tracks on display, with nearest-point resolution for hit testing
#[derive(Clone, Debug, Default)]
pub struct Presenter {
    shapes: Vec<Shape>,
    config: Config,
    /// Union of all shape bounds in Web Mercator (None if empty)
    bounding_region: Option<Rect<f64>>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Presenter {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            shapes: Vec::new(),
            config,
            bounding_region: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Add a track and return the handle of its shape
    ///
    /// Adding a track equal to one already present replaces that shape and
    /// returns its existing handle.
    pub fn add(&mut self, track: Track) -> ShapeHandle {
        let shape = Shape::new(track);
        if let Some(index) = self.shapes.iter().position(|s| s.track == shape.track) {
            self.shapes[index] = shape;
            self.rebuild_bounding_region();
            return ShapeHandle(index);
        }

        if let Some(bounds) = shape.polygon.bounding_rect() {
            self.bounding_region = Some(match self.bounding_region {
                Some(region) => utils::union_rect(region, bounds),
                None => bounds,
            });
        }
        self.shapes.push(shape);
        ShapeHandle(self.shapes.len() - 1)
    }

    /// The track drawn by `handle`
    #[inline]
    pub fn track_for(&self, handle: ShapeHandle) -> Option<&Track> {
        self.shapes.get(handle.0).map(|s| &s.track)
    }

    /// The polygon drawn for `handle`, in Web Mercator meters
    #[inline]
    pub fn shape(&self, handle: ShapeHandle) -> Option<&Polygon<f64>> {
        self.shapes.get(handle.0).map(|s| &s.polygon)
    }

    /// All tracks in insertion order, with their handles
    pub fn tracks(&self) -> impl Iterator<Item = (ShapeHandle, &Track)> {
        self.shapes
            .iter()
            .enumerate()
            .map(|(i, s)| (ShapeHandle(i), &s.track))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Union of all shape bounds in Web Mercator meters
    ///
    /// This is O(1) as the region is updated incrementally.
    #[inline]
    pub fn bounding_region(&self) -> Option<Rect<f64>> {
        self.bounding_region
    }

    /// The bounding region as (south-west, north-east) corners
    pub fn bounding_region_wgs84(&self) -> Option<(Coordinate, Coordinate)> {
        let region = self.bounding_region?;
        Some((
            utils::from_mercator(region.min()),
            utils::from_mercator(region.max()),
        ))
    }

    /// Find the track point nearest to `query`
    ///
    /// Tracks are scanned in insertion order and points in track order; on a
    /// tie the first point scanned wins.
    ///
    /// # Errors
    /// [`DataError::EmptyCollection`] if no track was added.
    pub fn closest(&self, query: Coordinate) -> Result<ClosestMatch<'_>> {
        let mut best: Option<ClosestMatch<'_>> = None;
        for (index, shape) in self.shapes.iter().enumerate() {
            for coordinate in shape.track.coordinates() {
                let distance = coordinate.distance(&query);
                if best.as_ref().is_none_or(|b| distance < b.distance) {
                    best = Some(ClosestMatch {
                        handle: ShapeHandle(index),
                        track: &shape.track,
                        coordinate,
                        distance,
                    });
                }
            }
        }
        best.ok_or(DataError::EmptyCollection)
    }

    /// Resolve a tap at `screen` to the nearest track point within the hit radius
    ///
    /// Returns `Ok(None)` when the nearest point is drawn further than
    /// [`Config::hit_radius_px`] from the tap.
    ///
    /// # Errors
    /// [`DataError::EmptyCollection`] if no track was added.
    pub fn hit_test(
        &self,
        screen: Coord<f64>,
        projection: &impl ScreenProjection,
    ) -> Result<Option<ClosestMatch<'_>>> {
        let found = self.closest(projection.to_coordinate(screen))?;
        let pixels = projection.to_screen(found.coordinate).distance(&screen);
        if pixels < self.config.hit_radius_px {
            tracing::debug!(track = found.track.name(), pixels, "Tap hit track");
            Ok(Some(found))
        } else {
            tracing::trace!(pixels, "Tap too far from any track");
            Ok(None)
        }
    }

    /// Rebuild the bounding region from scratch
    fn rebuild_bounding_region(&mut self) {
        self.bounding_region = self
            .shapes
            .iter()
            .filter_map(|s| s.polygon.bounding_rect())
            .reduce(utils::union_rect);
    }
}
