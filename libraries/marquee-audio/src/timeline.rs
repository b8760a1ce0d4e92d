//! Clock-modeled playback backend
//!
//! Models the full capability surface over a monotonic clock instead of an
//! audio device. Positions advance in wall-clock time while "playing" and a
//! track "finishes" once its probed duration elapses, so everything above the
//! trait (gating, selection, transitions, end-of-track handling) behaves
//! exactly as it would with real output. Used where no native mixer exists.

use crate::backend::{probe_duration, AudioBackend};
use crate::error::{AudioError, Result};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// State of the active timeline track
#[derive(Debug, Clone)]
struct TimelineTrack {
    path: PathBuf,
    /// Probed length; `None` means unknown (the track never self-finishes)
    duration: Option<Duration>,
    /// Position accumulated before `running_since`
    base: Duration,
    /// Set while the clock is advancing
    running_since: Option<Instant>,
}

impl TimelineTrack {
    fn position_at(&self, now: Instant) -> Duration {
        let running = self
            .running_since
            .map(|since| now.saturating_duration_since(since))
            .unwrap_or(Duration::ZERO);
        let position = self.base + running;

        match self.duration {
            Some(total) => position.min(total),
            None => position,
        }
    }

    fn finished_at(&self, now: Instant) -> bool {
        match self.duration {
            Some(total) => self.position_at(now) >= total,
            None => false,
        }
    }
}

/// Audio backend without audio: a managed timeline over a monotonic clock
pub struct TimelineBackend {
    track: Option<TimelineTrack>,
    /// Prepared next track: path plus its probed duration
    preloaded: Option<(PathBuf, Option<Duration>)>,
    volume: f32,
}

impl TimelineBackend {
    /// Create an idle timeline backend
    pub fn new() -> Self {
        Self {
            track: None,
            preloaded: None,
            volume: 1.0,
        }
    }

    /// Current volume setting
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Path of the active track, if one is loaded
    pub fn loaded_path(&self) -> Option<&Path> {
        self.track.as_ref().map(|t| t.path.as_path())
    }

    fn load_track(&mut self, path: &Path) -> Result<()> {
        // A stale preload (different path) is discarded by the take
        let duration = match self.preloaded.take() {
            Some((ready, duration)) if ready == path => duration,
            _ => probe_duration(path)?,
        };

        self.track = Some(TimelineTrack {
            path: path.to_path_buf(),
            duration,
            base: Duration::ZERO,
            running_since: None,
        });
        Ok(())
    }

    fn play_at(&mut self, now: Instant) -> Result<()> {
        let track = self.track.as_mut().ok_or(AudioError::NoTrackLoaded)?;
        if track.running_since.is_none() {
            track.running_since = Some(now);
        }
        Ok(())
    }

    fn pause_at(&mut self, now: Instant) -> Result<()> {
        let track = self.track.as_mut().ok_or(AudioError::NoTrackLoaded)?;
        track.base = track.position_at(now);
        track.running_since = None;
        Ok(())
    }

    fn seek_at(&mut self, position: Duration, now: Instant) -> Result<()> {
        let track = self.track.as_mut().ok_or(AudioError::NoTrackLoaded)?;
        track.base = match track.duration {
            Some(total) => position.min(total),
            None => position,
        };
        if track.running_since.is_some() {
            track.running_since = Some(now);
        }
        Ok(())
    }

    fn position_at(&self, now: Instant) -> Duration {
        self.track
            .as_ref()
            .map(|t| t.position_at(now))
            .unwrap_or(Duration::ZERO)
    }

    fn is_playing_at(&self, now: Instant) -> bool {
        self.track
            .as_ref()
            .is_some_and(|t| t.running_since.is_some() && !t.finished_at(now))
    }
}

impl Default for TimelineBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioBackend for TimelineBackend {
    fn load(&mut self, path: &Path) -> Result<()> {
        self.load_track(path)
    }

    fn preload(&mut self, path: &Path) -> Result<()> {
        if self.preloaded.as_ref().is_some_and(|(p, _)| p == path) {
            return Ok(());
        }
        let duration = probe_duration(path)?;
        self.preloaded = Some((path.to_path_buf(), duration));
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.play_at(Instant::now())
    }

    fn pause(&mut self) -> Result<()> {
        self.pause_at(Instant::now())
    }

    fn resume(&mut self) -> Result<()> {
        self.play_at(Instant::now())
    }

    fn stop(&mut self) -> Result<()> {
        let track = self.track.as_mut().ok_or(AudioError::NoTrackLoaded)?;
        track.base = Duration::ZERO;
        track.running_since = None;
        Ok(())
    }

    fn close(&mut self) {
        self.track = None;
        self.preloaded = None;
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        self.seek_at(position, Instant::now())
    }

    fn set_volume(&mut self, volume: f32) -> Result<()> {
        self.volume = volume.clamp(0.0, 1.0);
        Ok(())
    }

    fn position(&self) -> Duration {
        self.position_at(Instant::now())
    }

    fn is_loaded(&self) -> bool {
        self.track.is_some()
    }

    fn is_playing(&self) -> bool {
        self.is_playing_at(Instant::now())
    }
}
