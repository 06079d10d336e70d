//! Track Graph Library - Loop Graphs and Nearest-Point Queries for GPX Tracks
//!
//! This library turns a fixed set of GPX tracks into a directed graph whose edges
//! connect consecutive track points (each track closed into a loop), walks that
//! graph in breadth-first "waves" to drive an animated reveal, and answers
//! nearest-track-point queries for hit testing.
//!
//! # Architecture
//!
//! - **[`Vector2`]**: Generic 2D vector kernel with closest-point projection
//! - **[`Metric`]**: Planar distance for screen points, projected distance for coordinates
//! - **[`Track`]**: Immutable track points plus label, color and number
//! - **[`Graph`]**: Directed adjacency built once by [`build_graph`], traversed by
//!   [`Graph::connected_waves`]
//! - **[`WaveCursor`]**: Time-sliced, cancellable consumption of traversal waves
//! - **[`Presenter`]**: Track shapes, bounding region and nearest-point resolution
//!
//! # Performance Characteristics
//!
//! - **Build Time**: O(N) over all track points
//! - **Traversal**: O(V + E) from a start vertex
//! - **Nearest Point**: O(T × P) linear scan (no spatial index)

pub mod animation;
mod config;
mod coordinate;
pub mod graph;
pub mod loader;
mod metric;
pub mod pipeline;
mod presenter;
mod track;
pub mod utils;
mod vector;

// Public API exports
pub use animation::{AnimationOutcome, WaveCursor, WaveSink, animate_waves};
pub use config::Config;
pub use coordinate::{Coordinate, CoordinateWithElevation};
pub use graph::{Destination, Graph, Wave, build_graph};
pub use metric::Metric;
pub use presenter::{ClosestMatch, MercatorViewport, Presenter, ScreenProjection, ShapeHandle};
pub use track::{Track, TrackColor};
pub use vector::Vector2;

/// Error types for the track graph library
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("GPX parsing error: {0}")]
    GpxParse(#[from] gpx::errors::GpxError),

    #[error("Degenerate segment: closest point is undefined for a zero-length segment")]
    DegenerateSegment,

    #[error("No tracks to query")]
    EmptyCollection,

    #[error("Empty track")]
    EmptyTrack,

    #[error("GPX document has no track")]
    MissingTrack,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Background(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, DataError>;
