//! GPX loading
//!
//! Turns GPX documents into [`Track`]s. Only points that carry an elevation
//! are kept, and the configured prefix is stripped from the track name.
//! Bulk loading reads and parses files in parallel.

use crate::{Config, Coordinate, CoordinateWithElevation, DataError, Result, Track, TrackColor};
use rayon::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Where to read one track from, and the metadata to attach to it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackSource {
    pub path: PathBuf,
    pub color: TrackColor,
    pub number: u32,
}

/// Build a track from a parsed GPX document
///
/// Points of every `<trk>` and segment are concatenated in document order.
/// When several tracks are named, the last name wins.
///
/// # Errors
/// - [`DataError::MissingTrack`] if the document has no track
/// - [`DataError::EmptyTrack`] if no point has an elevation
pub fn track_from_gpx(
    gpx: &gpx::Gpx,
    color: TrackColor,
    number: u32,
    name_prefix: &str,
) -> Result<Track> {
    if gpx.tracks.is_empty() {
        return Err(DataError::MissingTrack);
    }

    let mut skipped = 0usize;
    let points: Vec<CoordinateWithElevation> = gpx
        .tracks
        .iter()
        .flat_map(|track| &track.segments)
        .flat_map(|segment| &segment.points)
        .filter_map(|waypoint| match waypoint.elevation {
            Some(elevation) => Some(CoordinateWithElevation::new(
                Coordinate::from(waypoint),
                elevation,
            )),
            None => {
                skipped += 1;
                None
            }
        })
        .collect();

    if skipped > 0 {
        tracing::warn!(skipped, "Skipping track points without elevation");
    }

    let name = gpx
        .tracks
        .iter()
        .rev()
        .find_map(|track| track.name.as_deref())
        .unwrap_or_default()
        .trim();
    let name = name.strip_prefix(name_prefix).unwrap_or(name);

    Track::new(points, color, number, name)
}

/// Parse one GPX document from `reader`
pub fn parse_track<R: Read>(
    reader: R,
    color: TrackColor,
    number: u32,
    config: &Config,
) -> Result<Track> {
    let gpx = gpx::read(reader)?;
    track_from_gpx(&gpx, color, number, &config.name_prefix)
}

/// Read and parse the GPX file of `source`
pub fn read_track(source: &TrackSource, config: &Config) -> Result<Track> {
    #[cfg(feature = "profiling")]
    profiling::scope!("loader::read_track");

    let file = std::fs::File::open(&source.path)?;
    let reader = std::io::BufReader::new(file);
    parse_track(reader, source.color, source.number, config)
}

/// Load all sources in parallel, failing on the first error
///
/// The returned tracks keep the order of `sources`.
pub fn load_tracks(sources: &[TrackSource], config: &Config) -> Result<Vec<Track>> {
    #[cfg(feature = "profiling")]
    profiling::scope!("loader::load_tracks");

    let tracks: Result<Vec<Track>> = sources
        .par_iter()
        .map(|source| read_track(source, config))
        .collect();
    let tracks = tracks?;
    tracing::info!(count = tracks.len(), "Loaded tracks");
    Ok(tracks)
}

/// Load all sources in parallel, skipping the ones that fail
pub fn load_tracks_lossy(sources: &[TrackSource], config: &Config) -> Vec<Track> {
    let tracks: Vec<Track> = sources
        .par_iter()
        .filter_map(|source| match read_track(source, config) {
            Ok(track) => Some(track),
            Err(e) => {
                tracing::warn!("Skipping {}: {}", source.path.display(), e);
                None
            }
        })
        .collect();
    tracing::info!(
        count = tracks.len(),
        skipped = sources.len() - tracks.len(),
        "Loaded tracks"
    );
    tracks
}

/// Which tracks exist per color
///
/// A color with a count of `n > 0` has tracks numbered `1..=n`; a count of
/// zero means a single, unnumbered track (number 0).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    definitions: Vec<(TrackColor, u32)>,
}

impl Catalog {
    pub fn new(definitions: Vec<(TrackColor, u32)>) -> Self {
        Self { definitions }
    }

    /// The trail network of Laufpark Stechlin
    pub fn stechlin() -> Self {
        use TrackColor::*;
        Self::new(vec![
            (Red, 4),
            (Turquoise, 5),
            (BrightGreen, 7),
            (Beige, 2),
            (Green, 4),
            (Purple, 3),
            (Violet, 4),
            (Blue, 3),
            (Brown, 4),
            (Yellow, 4),
            (Gray, 0),
            (LightBlue, 4),
            (LightBrown, 5),
            (Orange, 0),
            (Pink, 4),
            (LightPink, 6),
        ])
    }

    /// Keep only the definitions of `color`
    pub fn only(&self, color: TrackColor) -> Self {
        Self::new(
            self.definitions
                .iter()
                .copied()
                .filter(|(c, _)| *c == color)
                .collect(),
        )
    }

    /// Track sources below `directory`, in definition order
    pub fn sources(&self, directory: &Path) -> Vec<TrackSource> {
        self.definitions
            .iter()
            .flat_map(|&(color, count)| {
                let first = if count == 0 { 0 } else { 1 };
                (first..=count).map(move |number| TrackSource {
                    path: directory.join(format!("wabe {}-strecke {}.gpx", color.name(), number)),
                    color,
                    number,
                })
            })
            .collect()
    }
}
