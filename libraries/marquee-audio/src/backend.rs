//! Audio backend capability surface and backend selection

use crate::error::{AudioError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Uniform capability surface over a concrete audio player
///
/// One logical playback slot plus one preload slot. Callers above this trait
/// (the fade engine, the playback service) never branch on which concrete
/// backend is active and never touch raw resources.
///
/// Implementations are not required to be `Send`: the engine runs on a single
/// UI-affined thread, and native output streams are frequently thread-bound.
pub trait AudioBackend {
    /// Make `path` the active track, paused at the start
    ///
    /// If `path` was preloaded, the prepared resource is promoted without
    /// touching the filesystem again. Any previously active resource is
    /// released once the replacement is in place.
    fn load(&mut self, path: &Path) -> Result<()>;

    /// Prepare `path` in the inactive slot while the active track keeps
    /// playing, so a later `load` of the same path is effectively instant
    ///
    /// Preloading the path that is already prepared is a cheap no-op.
    fn preload(&mut self, path: &Path) -> Result<()>;

    /// Start playback of the loaded track
    fn play(&mut self) -> Result<()>;

    /// Pause playback, preserving the current position
    fn pause(&mut self) -> Result<()>;

    /// Resume playback from the paused position
    fn resume(&mut self) -> Result<()>;

    /// Stop playback and discard the queued audio, keeping the backend usable
    fn stop(&mut self) -> Result<()>;

    /// Release the active and preloaded resources
    fn close(&mut self);

    /// Seek the loaded track to `position`
    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Set playback volume (0.0 to 1.0); retained across `load`
    fn set_volume(&mut self, volume: f32) -> Result<()>;

    /// Elapsed position of the loaded track (zero when nothing is loaded)
    fn position(&self) -> Duration;

    /// Whether an active resource exists (true for a paused or finished
    /// track; false only before the first `load` or after `close`)
    fn is_loaded(&self) -> bool;

    /// Whether audio is currently advancing (loaded, started, not paused,
    /// not yet finished)
    fn is_playing(&self) -> bool;
}

/// Concrete backend selection
///
/// Chosen once at construction; everything above the [`AudioBackend`] trait
/// is backend-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Native mixer output (rodio)
    #[cfg(feature = "mixer")]
    Mixer,

    /// Clock-modeled playback without an audio device
    ///
    /// Keeps selection, gating and transition logic fully functional in
    /// environments where no native mixer is available (headless hosts, CI).
    Timeline,
}

impl BackendKind {
    /// Get human-readable name of the backend
    pub fn name(&self) -> &'static str {
        match self {
            #[cfg(feature = "mixer")]
            Self::Mixer => "Mixer",
            Self::Timeline => "Timeline",
        }
    }
}

/// Construct the selected backend
///
/// # Errors
/// Returns [`AudioError::DeviceUnavailable`] when the native mixer cannot
/// open an output stream.
pub fn create_backend(kind: BackendKind) -> Result<Box<dyn AudioBackend>> {
    match kind {
        #[cfg(feature = "mixer")]
        BackendKind::Mixer => Ok(Box::new(crate::mixer::MixerBackend::new()?)),
        BackendKind::Timeline => Ok(Box::new(crate::timeline::TimelineBackend::new())),
    }
}

/// Probe a track file's duration without decoding audio
///
/// Returns `None` when the container is unrecognized; the track then plays
/// until explicitly stopped.
pub(crate) fn probe_duration(path: &Path) -> Result<Option<Duration>> {
    if !path.exists() {
        return Err(AudioError::TrackNotFound(path.to_path_buf()));
    }

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            use lofty::AudioFile;
            Ok(Some(tagged.properties().duration()))
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), err = %e, "duration probe failed");
            Ok(None)
        }
    }
}
