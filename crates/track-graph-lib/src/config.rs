//! Configuration shared by the loader, the presenter and the wave animation

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Library configuration
///
/// None of these values change the graph itself; they tune how tracks are
/// read and how results are presented.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Maximum screen distance, in pixels, between a tap and the nearest
    /// track point for the tap to count as a hit. Half of a 44 px touch target.
    pub hit_radius_px: f64,
    /// Delay between two drawn traversal waves
    pub wave_interval: Duration,
    /// Prefix removed from GPX track names before they are stored
    pub name_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hit_radius_px: 44.0 / 2.0,
            wave_interval: Duration::from_micros(100),
            name_prefix: "Laufpark Stechlin - Wabe ".to_string(),
        }
    }
}
