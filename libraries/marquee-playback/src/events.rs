//! Preview events
//!
//! Event-based communication for UI synchronization. The host drains the
//! queue after delivering its own events and ticks, typically to refresh a
//! "now playing" display.

use marquee_core::ItemId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Events emitted by the preview engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PreviewEvent {
    /// A track became audible (its fade-in just began)
    TrackStarted {
        /// Path of the track now playing
        path: PathBuf,
        /// Whether this is the shared fallback track
        is_fallback: bool,
    },

    /// The current track reached its natural end
    TrackFinished {
        /// Path of the finished track
        path: PathBuf,
    },

    /// Playback stopped (item deselected, gating, or settings change)
    PlaybackStopped,

    /// Playback paused in place (e.g. a video started)
    PlaybackPaused,

    /// Playback resumed from its paused position
    PlaybackResumed,

    /// The selected item has no music and no fallback is available
    NothingToPlay {
        /// The item that had nothing to play
        item: ItemId,
    },
}
