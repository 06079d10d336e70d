//! Background work on the tokio runtime
//!
//! Loading and graph construction are CPU-bound, so they run on tokio's
//! blocking pool and the caller awaits the result. Nothing is shared while a
//! job runs: the inputs move into the job and the result moves back out.

use crate::loader::{self, TrackSource};
use crate::{Config, Graph, Result, Track, build_graph};
use std::sync::Arc;

/// Build the graph of `tracks` off the async executor
///
/// # Errors
/// [`crate::DataError::Background`] if the job panicked or was cancelled.
pub async fn build_graph_async(tracks: Arc<[Track]>) -> Result<Graph> {
    let graph = tokio::task::spawn_blocking(move || {
        #[cfg(feature = "profiling")]
        profiling::scope!("pipeline::build_graph_async");
        build_graph(&tracks)
    })
    .await?;
    Ok(graph)
}

/// Load tracks off the async executor, see [`loader::load_tracks`]
pub async fn load_tracks_async(sources: Vec<TrackSource>, config: Config) -> Result<Vec<Track>> {
    tokio::task::spawn_blocking(move || {
        #[cfg(feature = "profiling")]
        profiling::scope!("pipeline::load_tracks_async");
        loader::load_tracks(&sources, &config)
    })
    .await?
}

/// Load tracks, then build their graph, both off the async executor
///
/// The loaded tracks are returned alongside the graph so callers can feed
/// them to a [`crate::Presenter`] as well.
pub async fn load_graph_async(
    sources: Vec<TrackSource>,
    config: Config,
) -> Result<(Arc<[Track]>, Graph)> {
    let tracks: Arc<[Track]> = load_tracks_async(sources, config).await?.into();
    let graph = build_graph_async(Arc::clone(&tracks)).await?;
    tracing::info!(
        tracks = tracks.len(),
        vertices = graph.vertex_count(),
        "Track graph ready"
    );
    Ok((tracks, graph))
}
