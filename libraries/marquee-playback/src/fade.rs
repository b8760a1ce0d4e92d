//! Fade transition engine
//!
//! Moves the backend's volume toward a target over a configured duration on
//! every host timer tick, and performs the pending transition action exactly
//! once at the silence point of a fade-out. The stop → promote-preload →
//! play → fade-in sequence all happens within a single tick, so a track
//! switch never leaves an audible gap.
//!
//! Tick spacing is measured, not assumed: the host's timer may fire
//! irregularly under load, so elapsed fade time accumulates from the actual
//! wall-clock interval between consecutive ticks. A fixed-rate assumption
//! under a slow timer would produce steps too small to hear.

use crate::error::Result;
use marquee_audio::{AudioBackend, AudioError};
use std::mem;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::warn;

/// Volume at or below this is treated as silent, tolerating float drift
const SILENCE_THRESHOLD: f32 = 0.01;

/// Lower clamp for configured fade durations
const MIN_FADE: Duration = Duration::from_millis(10);

/// Fade timing and level configuration
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FadeSettings {
    /// Fade-in duration
    pub fade_in: Duration,

    /// Fade-out duration
    pub fade_out: Duration,

    /// Steady-state playback volume (0.0 to 1.0)
    pub target_volume: f32,
}

impl FadeSettings {
    /// Build settings, clamping invalid values to safe ones
    pub fn new(fade_in: Duration, fade_out: Duration, target_volume: f32) -> Self {
        if fade_in < MIN_FADE || fade_out < MIN_FADE {
            warn!(
                fade_in_ms = fade_in.as_millis() as u64,
                fade_out_ms = fade_out.as_millis() as u64,
                "fade duration below minimum, clamping"
            );
        }
        Self {
            fade_in: fade_in.max(MIN_FADE),
            fade_out: fade_out.max(MIN_FADE),
            target_volume: target_volume.clamp(0.0, 1.0),
        }
    }
}

impl Default for FadeSettings {
    fn default() -> Self {
        Self::new(Duration::from_millis(1500), Duration::from_millis(800), 0.5)
    }
}

/// Current leg of the volume curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FadeDirection {
    /// No transition in progress
    Idle,

    /// Volume descending toward the silence point
    FadingOut,

    /// Volume ascending toward the target
    FadingIn,
}

/// What to do when the fade-out reaches silence
///
/// Carried in the engine and consumed exactly once; a new transition request
/// replaces (never runs) a pending action.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PendingAction {
    /// Nothing pending (transition already triggered, only curve continues)
    None,

    /// Stop and release the outgoing track
    Stop,

    /// Pause in place, preserving the backend position
    Pause,

    /// Stop the outgoing track, start `path`, and fade back in
    Switch {
        /// Track to start
        path: PathBuf,
        /// Seek offset for a fallback track resuming where it left off
        resume_from: Option<Duration>,
    },
}

/// What a tick crossed, if anything
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FadeOutcome {
    /// No boundary crossed this tick
    None,

    /// The silence point was crossed and the pending action ran;
    /// `started` carries the track that began playing, if any
    Swapped { started: Option<PathBuf> },

    /// A fade-in reached the target volume
    FadeInComplete,
}

/// Timer-driven volume transition engine
///
/// All methods must be called from the single host event-loop thread; a tick
/// never runs concurrently with a transition request.
pub(crate) struct FadeEngine {
    settings: FadeSettings,
    direction: FadeDirection,
    /// Fade time accumulated from measured tick intervals
    elapsed: Duration,
    /// Previous tick timestamp; `None` right after a new fade begins
    last_tick: Option<Instant>,
    current_volume: f32,
    pending: PendingAction,
}

impl FadeEngine {
    pub fn new(settings: FadeSettings) -> Self {
        Self {
            settings,
            direction: FadeDirection::Idle,
            elapsed: Duration::ZERO,
            last_tick: None,
            current_volume: 0.0,
            pending: PendingAction::None,
        }
    }

    pub fn set_settings(&mut self, settings: FadeSettings) {
        self.settings = settings;
    }

    pub fn is_idle(&self) -> bool {
        self.direction == FadeDirection::Idle
    }

    /// Begin a fade-out that performs `action` at the silence point
    ///
    /// Starts from whatever the current volume is, so an in-flight fade-in is
    /// cut short and descends smoothly. Any previously pending action is
    /// discarded, not invoked. For a `Switch`, the incoming track is
    /// preloaded now, while the outgoing one is still audible.
    pub fn begin(&mut self, backend: &mut dyn AudioBackend, action: PendingAction) {
        if let PendingAction::Switch { path, .. } = &action {
            if let Err(e) = backend.preload(path) {
                warn!(
                    path = %path.display(),
                    err = %e,
                    "preload failed, the swap will load from disk"
                );
            }
        }

        self.direction = FadeDirection::FadingOut;
        self.elapsed = self.fade_out_elapsed_for(self.current_volume);
        self.last_tick = None;
        self.pending = action;
    }

    /// Start `path` immediately at zero volume and fade in
    ///
    /// The direct path for starting from silence (cold start, natural track
    /// end): no fade-out leg is needed.
    pub fn begin_fade_in(
        &mut self,
        backend: &mut dyn AudioBackend,
        path: PathBuf,
        resume_from: Option<Duration>,
    ) -> Result<PathBuf> {
        self.write_volume(backend, 0.0);
        let started = start_track(backend, path, resume_from)?;

        self.direction = FadeDirection::FadingIn;
        self.elapsed = Duration::ZERO;
        self.last_tick = None;
        self.pending = PendingAction::None;
        Ok(started)
    }

    /// Resume a paused backend from silence and fade in
    pub fn resume(&mut self, backend: &mut dyn AudioBackend) -> Result<()> {
        self.write_volume(backend, 0.0);
        backend.resume()?;

        self.direction = FadeDirection::FadingIn;
        self.elapsed = Duration::ZERO;
        self.last_tick = None;
        self.pending = PendingAction::None;
        Ok(())
    }

    /// Advance the curve by the wall-clock time since the previous tick
    pub fn tick(&mut self, now: Instant, backend: &mut dyn AudioBackend) -> FadeOutcome {
        if self.direction == FadeDirection::Idle {
            return FadeOutcome::None;
        }

        let interval = match self.last_tick {
            Some(prev) => now.saturating_duration_since(prev),
            None => Duration::ZERO,
        };
        self.last_tick = Some(now);
        self.elapsed = self.elapsed.saturating_add(interval);

        match self.direction {
            FadeDirection::FadingOut => {
                let p = progress(self.elapsed, self.settings.fade_out);
                let volume = self.settings.target_volume * (1.0 - p) * (1.0 - p);
                self.write_volume(backend, volume);

                if volume <= SILENCE_THRESHOLD {
                    self.cross_silence(backend)
                } else {
                    FadeOutcome::None
                }
            }
            FadeDirection::FadingIn => {
                let p = progress(self.elapsed, self.settings.fade_in);
                let volume = self.settings.target_volume * p * p;
                self.write_volume(backend, volume);

                if p >= 1.0 {
                    self.direction = FadeDirection::Idle;
                    FadeOutcome::FadeInComplete
                } else {
                    FadeOutcome::None
                }
            }
            FadeDirection::Idle => FadeOutcome::None,
        }
    }

    /// Run the pending action at the silence point and flip to fading in
    ///
    /// Fires at most once per fade-out; everything here happens inside the
    /// tick that crossed the threshold, so the stop → promote → play → fade-in
    /// sequence has no gap.
    fn cross_silence(&mut self, backend: &mut dyn AudioBackend) -> FadeOutcome {
        self.write_volume(backend, 0.0);

        match mem::replace(&mut self.pending, PendingAction::None) {
            PendingAction::None => {
                self.direction = FadeDirection::Idle;
                FadeOutcome::Swapped { started: None }
            }
            PendingAction::Stop => {
                if let Err(e) = backend.stop() {
                    warn!(err = %e, "stop at silence point failed");
                }
                backend.close();
                self.direction = FadeDirection::Idle;
                FadeOutcome::Swapped { started: None }
            }
            PendingAction::Pause => {
                if let Err(e) = backend.pause() {
                    warn!(err = %e, "pause at silence point failed");
                }
                self.direction = FadeDirection::Idle;
                FadeOutcome::Swapped { started: None }
            }
            PendingAction::Switch { path, resume_from } => {
                if backend.is_loaded() {
                    if let Err(e) = backend.stop() {
                        warn!(err = %e, "stop at silence point failed");
                    }
                }
                match start_track(backend, path, resume_from) {
                    Ok(started) => {
                        self.direction = FadeDirection::FadingIn;
                        self.elapsed = Duration::ZERO;
                        FadeOutcome::Swapped {
                            started: Some(started),
                        }
                    }
                    Err(e) => {
                        warn!(err = %e, "track swap failed, staying silent");
                        self.direction = FadeDirection::Idle;
                        FadeOutcome::Swapped { started: None }
                    }
                }
            }
        }
    }

    /// Map a starting volume back onto the fade-out curve
    ///
    /// Interrupting a fade-in at volume v continues down the fade-out curve
    /// from the equivalent point instead of jumping to its start.
    fn fade_out_elapsed_for(&self, volume: f32) -> Duration {
        let target = self.settings.target_volume;
        if target <= 0.0 {
            return self.settings.fade_out;
        }
        let ratio = (volume / target).clamp(0.0, 1.0);
        let p = 1.0 - ratio.sqrt();
        self.settings.fade_out.mul_f64(f64::from(p))
    }

    fn write_volume(&mut self, backend: &mut dyn AudioBackend, volume: f32) {
        self.current_volume = volume;
        if let Err(e) = backend.set_volume(volume) {
            // Transient: keep ticking, the next write usually lands
            warn!(err = %e, "volume write failed");
        }
    }
}

impl Default for FadeEngine {
    fn default() -> Self {
        Self::new(FadeSettings::default())
    }
}

/// Load (promoting any preload), optionally seek, and start playing
fn start_track(
    backend: &mut dyn AudioBackend,
    path: PathBuf,
    resume_from: Option<Duration>,
) -> std::result::Result<PathBuf, AudioError> {
    backend.load(&path)?;
    if let Some(position) = resume_from {
        if let Err(e) = backend.seek(position) {
            warn!(
                position_ms = position.as_millis() as u64,
                err = %e,
                "resume seek failed, starting from the top"
            );
        }
    }
    backend.play()?;
    Ok(path)
}

fn progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
}
