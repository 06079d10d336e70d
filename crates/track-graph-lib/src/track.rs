//! Track storage
//!
//! This module provides the `Track` struct: an immutable, non-empty sequence
//! of track points plus the metadata used to label it on the map.

use crate::{Coordinate, CoordinateWithElevation, DataError, Result};

/// Color category of a track, as printed on the trail signs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackColor {
    Red,
    Turquoise,
    BrightGreen,
    Violet,
    Purple,
    Green,
    Beige,
    Blue,
    Brown,
    Yellow,
    Gray,
    LightBlue,
    LightBrown,
    Orange,
    Pink,
    LightPink,
}

impl TrackColor {
    pub fn all() -> &'static [Self] {
        &[
            Self::Red,
            Self::Turquoise,
            Self::BrightGreen,
            Self::Violet,
            Self::Purple,
            Self::Green,
            Self::Beige,
            Self::Blue,
            Self::Brown,
            Self::Yellow,
            Self::Gray,
            Self::LightBlue,
            Self::LightBrown,
            Self::Orange,
            Self::Pink,
            Self::LightPink,
        ]
    }

    /// German color name, as used in the GPX file names
    pub fn name(&self) -> &'static str {
        match self {
            Self::Red => "rot",
            Self::Turquoise => "tuerkis",
            Self::BrightGreen => "hellgruen",
            Self::Violet => "violett",
            Self::Purple => "lila",
            Self::Green => "gruen",
            Self::Beige => "beige",
            Self::Blue => "blau",
            Self::Brown => "braun",
            Self::Yellow => "gelb",
            Self::Gray => "grau",
            Self::LightBlue => "hellblau",
            Self::LightBrown => "hellbraun",
            Self::Orange => "orange",
            Self::Pink => "pink",
            Self::LightPink => "rosa",
        }
    }

    /// Stroke color as (r, g, b)
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Self::Red => (255, 0, 0),
            Self::Turquoise => (0, 159, 159),
            Self::BrightGreen => (104, 195, 12),
            Self::Violet => (174, 165, 213),
            Self::Purple => (135, 27, 138),
            Self::Green => (0, 132, 70),
            Self::Beige => (227, 177, 151),
            Self::Blue => (0, 92, 181),
            Self::Brown => (126, 50, 55),
            Self::Yellow => (255, 244, 0),
            Self::Gray => (174, 165, 213),
            Self::LightBlue => (0, 166, 198),
            Self::LightBrown => (190, 135, 90),
            Self::Orange => (255, 122, 36),
            Self::Pink => (255, 0, 94),
            Self::LightPink => (255, 122, 183),
        }
    }

    /// Whether labels on this color need dark text to stay readable
    pub fn text_is_dark(&self) -> bool {
        matches!(self, Self::Yellow | Self::Gray | Self::Beige)
    }
}

/// A single track: ordered points, never empty, closed into a loop
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    coordinates: Vec<CoordinateWithElevation>,
    color: TrackColor,
    number: u32,
    name: String,
}

impl Track {
    /// Create a new track
    ///
    /// # Errors
    /// [`DataError::EmptyTrack`] if `coordinates` is empty.
    pub fn new(
        coordinates: Vec<CoordinateWithElevation>,
        color: TrackColor,
        number: u32,
        name: impl Into<String>,
    ) -> Result<Self> {
        if coordinates.is_empty() {
            return Err(DataError::EmptyTrack);
        }
        Ok(Self {
            coordinates,
            color,
            number,
            name: name.into(),
        })
    }

    /// Create a track from bare coordinates, with zero elevation
    pub fn from_coordinates(
        coordinates: impl IntoIterator<Item = Coordinate>,
        color: TrackColor,
        number: u32,
        name: impl Into<String>,
    ) -> Result<Self> {
        let coordinates = coordinates
            .into_iter()
            .map(|c| CoordinateWithElevation::new(c, 0.0))
            .collect();
        Self::new(coordinates, color, number, name)
    }

    #[inline]
    pub fn points(&self) -> &[CoordinateWithElevation] {
        &self.coordinates
    }

    /// Iterate over the track's coordinates in order
    #[inline]
    pub fn coordinates(&self) -> impl ExactSizeIterator<Item = Coordinate> + Clone + '_ {
        self.coordinates.iter().map(|p| p.coordinate)
    }

    /// Consecutive coordinate pairs, including the closing pair (last, first)
    ///
    /// A track of N points yields exactly N pairs; a single point pairs with itself.
    pub fn loop_pairs(&self) -> impl Iterator<Item = (Coordinate, Coordinate)> + '_ {
        self.coordinates()
            .zip(self.coordinates().cycle().skip(1))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    /// Always false: empty tracks are rejected on construction
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    #[inline]
    pub fn color(&self) -> TrackColor {
        self.color
    }

    #[inline]
    pub fn number(&self) -> u32 {
        self.number
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Short label for the stage numbers covered by this track
    ///
    /// The last word of the name is split on `/`: "Wabe 3" gives "3",
    /// "Wabe 1/2/4" gives "1-4".
    pub fn numbers(&self) -> String {
        let Some(last) = self.name.split_whitespace().last() else {
            return String::new();
        };
        let parts: Vec<&str> = last.split('/').collect();
        match parts.as_slice() {
            [single] => single.to_string(),
            [first, .., last] => format!("{first}-{last}"),
            [] => String::new(),
        }
    }
}
