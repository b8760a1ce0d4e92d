//! Core types for the preview engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Library item identifier
///
/// Identifies one entry in the host's library (typically a game). The host
/// assigns these; the engine only compares and stores them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create a new item ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Host application mode
///
/// Used for mode gating: the host may restrict previews to its full-screen
/// browsing mode and keep the desktop/management mode silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppMode {
    /// Full-screen library browsing
    Fullscreen,

    /// Windowed/management mode
    Desktop,
}

/// Preview settings snapshot
///
/// Owned and persisted by the host's configuration store. The engine holds a
/// copy and receives a fresh snapshot through
/// `Coordinator::settings_changed` whenever the user edits settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewSettings {
    /// Master enable for soundtrack previews
    pub enabled: bool,

    /// Target playback volume (0.0 to 1.0)
    pub volume: f32,

    /// Fade-in duration when a track becomes audible
    pub fade_in: Duration,

    /// Fade-out duration when a track is silenced
    pub fade_out: Duration,

    /// Only play previews while the host is in this mode (None = any mode)
    pub gate_mode: Option<AppMode>,

    /// Suppress the very first selection after startup or a mode switch
    ///
    /// Some hosts auto-select an item while building their UI; this keeps
    /// that synthetic selection silent.
    pub skip_first_selection: bool,

    /// Host shows a login/splash screen at startup; previews stay silent
    /// until the dismissal signal arrives
    pub login_gate: bool,

    /// Delay between login dismissal and playback resuming, letting the
    /// surrounding UI finish its own transition
    pub login_settle_delay: Duration,

    /// Track played when the selected item has no music of its own
    pub fallback_track: Option<PathBuf>,

    /// Whether the fallback track is used at all
    pub fallback_enabled: bool,

    /// Pick a random track on item selection instead of the first one
    pub randomize_on_select: bool,

    /// Pick a new random track when the current one finishes naturally
    pub randomize_on_end: bool,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 0.5,
            fade_in: Duration::from_millis(1500),
            fade_out: Duration::from_millis(800),
            gate_mode: None,
            skip_first_selection: false,
            login_gate: false,
            login_settle_delay: Duration::from_millis(250),
            fallback_track: None,
            fallback_enabled: false,
            randomize_on_select: false,
            randomize_on_end: false,
        }
    }
}
