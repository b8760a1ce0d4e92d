//! Core types for playback coordination

use std::path::PathBuf;
use std::time::Duration;

/// The concrete track the service picked for an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackSelection {
    /// Track file handed to the backend
    pub path: PathBuf,

    /// Whether this is the shared fallback track
    pub is_fallback: bool,

    /// Position the track was started from
    ///
    /// Non-zero only for a fallback track resuming where it previously
    /// paused; cleared once the fallback finishes naturally.
    pub saved_position: Duration,
}

impl TrackSelection {
    /// Selection for an item-specific track
    pub fn track(path: PathBuf) -> Self {
        Self {
            path,
            is_fallback: false,
            saved_position: Duration::ZERO,
        }
    }

    /// Selection for the fallback track, resuming from `position`
    pub fn fallback(path: PathBuf, position: Duration) -> Self {
        Self {
            path,
            is_fallback: true,
            saved_position: position,
        }
    }
}
