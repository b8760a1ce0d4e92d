//! Playback service - track selection and transition orchestration
//!
//! Given a selected item, decides which concrete track file to hand to the
//! fade engine: a designated primary track on the item's first exposure,
//! random or stable-order rotation afterwards, and a shared fallback track
//! when the item has no music of its own. The fallback behaves like a single
//! continuously-running stream: it pauses (by remembered position) whenever
//! item-specific music takes over and resumes exactly where it left off.

use crate::error::{PreviewError, Result};
use crate::events::PreviewEvent;
use crate::fade::{FadeEngine, FadeOutcome, FadeSettings, PendingAction};
use crate::types::TrackSelection;
use marquee_audio::AudioBackend;
use marquee_core::{ItemId, PreviewSettings, TrackCatalog};
use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::mem;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// Track selection and playback orchestration
///
/// Owns the audio backend and the fade engine; the coordinator decides
/// *whether* to play, this service decides *what* and performs the
/// transitions. All failures are absorbed here: a track that cannot be
/// loaded is skipped in favor of the next candidate, and the worst outcome
/// is silence.
pub struct PlaybackService {
    catalog: Box<dyn TrackCatalog>,
    backend: Box<dyn AudioBackend>,
    fade: FadeEngine,
    settings: PreviewSettings,

    current: Option<TrackSelection>,
    current_item: Option<ItemId>,
    /// Items already exposed this session (primary track plays only once)
    seen_items: HashSet<ItemId>,
    /// Most recently started track, excluded from the next random draw
    last_started: Option<PathBuf>,
    /// Where the fallback track paused, so it can resume instead of restart
    fallback_position: Duration,
    paused: bool,

    pending_events: Vec<PreviewEvent>,
}

impl PlaybackService {
    /// Create a new playback service
    pub fn new(
        catalog: Box<dyn TrackCatalog>,
        backend: Box<dyn AudioBackend>,
        settings: PreviewSettings,
    ) -> Self {
        let fade = FadeEngine::new(FadeSettings::new(
            settings.fade_in,
            settings.fade_out,
            settings.volume,
        ));
        Self {
            catalog,
            backend,
            fade,
            settings,
            current: None,
            current_item: None,
            seen_items: HashSet::new(),
            last_started: None,
            fallback_position: Duration::ZERO,
            paused: false,
            pending_events: Vec::new(),
        }
    }

    /// Refresh the settings snapshot
    pub fn update_settings(&mut self, settings: PreviewSettings) {
        self.fade.set_settings(FadeSettings::new(
            settings.fade_in,
            settings.fade_out,
            settings.volume,
        ));
        self.settings = settings;
    }

    // ===== Playback Control =====

    /// Select and start music for `item`
    ///
    /// Selection priority: keep an already-valid track untouched, the item's
    /// primary track on first exposure, a random track (never the previous
    /// one) when randomize-on-select is on, the first track in catalog
    /// order, then the fallback track, then nothing.
    pub fn play_item(&mut self, item: &ItemId) {
        let tracks = self.catalog.tracks(item);

        if tracks.is_empty() {
            self.current_item = Some(item.clone());
            self.play_fallback_or_nothing(item);
            return;
        }

        // Redundant re-selection of the same item: no restart
        if self.current_item.as_ref() == Some(item)
            && self.backend.is_loaded()
            && self.current.as_ref().is_some_and(|c| !c.is_fallback)
        {
            trace!(item = %item, "item already playing, leaving track untouched");
            return;
        }

        let first_exposure = !self.seen_items.contains(item);
        let chosen = match self.catalog.primary_track(item) {
            Some(primary) if first_exposure => primary,
            _ => {
                if self.settings.randomize_on_select && tracks.len() > 1 {
                    pick_random(&tracks, self.last_started.as_deref())
                } else {
                    tracks[0].clone()
                }
            }
        };
        self.seen_items.insert(item.clone());
        self.current_item = Some(item.clone());

        // Candidate order: the chosen track, then the rest in catalog order
        let rest: Vec<PathBuf> = tracks.iter().filter(|t| **t != chosen).cloned().collect();
        let candidates: Vec<PathBuf> = std::iter::once(chosen).chain(rest).collect();

        if self.start_first_available(&candidates, false, None).is_err() {
            debug!(item = %item, "no item track could be loaded, using fallback");
            self.play_fallback_or_nothing(item);
        }
    }

    /// Fade out and pause in place, preserving the backend position
    pub fn pause(&mut self) {
        if self.paused || !self.backend.is_loaded() {
            return;
        }
        self.paused = true;
        self.fade.begin(self.backend.as_mut(), PendingAction::Pause);
        self.emit(PreviewEvent::PlaybackPaused);
    }

    /// Resume from the paused position and fade back in
    pub fn resume(&mut self) {
        if !self.paused {
            return;
        }
        self.paused = false;
        if !self.backend.is_loaded() {
            return;
        }
        if let Err(e) = self.fade.resume(self.backend.as_mut()) {
            warn!(err = %e, "resume failed");
            return;
        }
        self.emit(PreviewEvent::PlaybackResumed);
    }

    /// Fade out, stop, and forget the selected item
    pub fn stop(&mut self) {
        if self.current.is_some() || self.backend.is_loaded() || !self.fade.is_idle() {
            self.fade_out_and_stop();
            self.emit(PreviewEvent::PlaybackStopped);
        }
        self.current_item = None;
    }

    /// Advance the fade curve and watch for natural track end
    ///
    /// Must be called from the host's timer on the event-loop thread.
    pub fn tick(&mut self, now: Instant) {
        match self.fade.tick(now, self.backend.as_mut()) {
            FadeOutcome::Swapped {
                started: Some(path),
            } => {
                let is_fallback = self.current.as_ref().is_some_and(|c| c.is_fallback);
                self.emit(PreviewEvent::TrackStarted { path, is_fallback });
            }
            FadeOutcome::Swapped { started: None }
            | FadeOutcome::FadeInComplete
            | FadeOutcome::None => {}
        }

        self.detect_track_end();
    }

    // ===== Status =====

    /// Whether the backend has a track loaded
    pub fn is_loaded(&self) -> bool {
        self.backend.is_loaded()
    }

    /// Path of the current selection, for "now playing" display
    pub fn current_track_path(&self) -> Option<&Path> {
        self.current.as_ref().map(|c| c.path.as_path())
    }

    /// The current selection, if any
    pub fn current_selection(&self) -> Option<&TrackSelection> {
        self.current.as_ref()
    }

    /// Drain queued UI events
    pub fn take_events(&mut self) -> Vec<PreviewEvent> {
        mem::take(&mut self.pending_events)
    }

    // ===== Internals =====

    /// Validate `path` and begin the transition to it
    ///
    /// Returns false when the track is unavailable so the caller can move on
    /// to the next candidate.
    fn try_start(&mut self, path: &Path, is_fallback: bool, resume_from: Option<Duration>) -> bool {
        if let Err(e) = self.backend.preload(path) {
            warn!(
                path = %path.display(),
                err = %e,
                "track unavailable, trying next candidate"
            );
            return false;
        }

        self.remember_fallback_position();
        self.paused = false;

        if self.backend.is_playing() || !self.fade.is_idle() {
            // Something is audible (or mid-fade): go through the fade-out
            self.fade.begin(
                self.backend.as_mut(),
                PendingAction::Switch {
                    path: path.to_path_buf(),
                    resume_from,
                },
            );
            // TrackStarted is emitted when the swap happens on a tick
        } else {
            // Cold start: nothing audible, fade straight in
            match self
                .fade
                .begin_fade_in(self.backend.as_mut(), path.to_path_buf(), resume_from)
            {
                Ok(started) => self.emit(PreviewEvent::TrackStarted {
                    path: started,
                    is_fallback,
                }),
                Err(e) => {
                    warn!(path = %path.display(), err = %e, "failed to start track");
                    return false;
                }
            }
        }

        self.current = Some(if is_fallback {
            TrackSelection::fallback(path.to_path_buf(), resume_from.unwrap_or(Duration::ZERO))
        } else {
            TrackSelection::track(path.to_path_buf())
        });
        self.last_started = Some(path.to_path_buf());
        true
    }

    /// Walk the candidate list in order, settling on the first loadable one
    fn start_first_available(
        &mut self,
        candidates: &[PathBuf],
        is_fallback: bool,
        resume_from: Option<Duration>,
    ) -> Result<()> {
        for path in candidates {
            if self.try_start(path, is_fallback, resume_from) {
                return Ok(());
            }
        }
        Err(PreviewError::NoPlayableTrack)
    }

    fn play_fallback_or_nothing(&mut self, item: &ItemId) {
        if self.settings.fallback_enabled {
            if let Some(fallback) = self.settings.fallback_track.clone() {
                // Both the old and the new item lack music: the fallback
                // keeps running untouched
                if self.current.as_ref().is_some_and(|c| c.is_fallback)
                    && self.backend.is_loaded()
                {
                    return;
                }

                let resume =
                    (!self.fallback_position.is_zero()).then_some(self.fallback_position);
                if self
                    .start_first_available(&[fallback.clone()], true, resume)
                    .is_ok()
                {
                    return;
                }
                warn!(path = %fallback.display(), "fallback track unavailable");
            }
        }
        self.emit(PreviewEvent::NothingToPlay { item: item.clone() });
        self.fade_out_and_stop();
    }

    fn fade_out_and_stop(&mut self) {
        self.remember_fallback_position();
        if self.backend.is_playing() || !self.fade.is_idle() {
            self.fade.begin(self.backend.as_mut(), PendingAction::Stop);
        } else if self.backend.is_loaded() {
            self.backend.close();
        }
        self.current = None;
        self.paused = false;
    }

    /// Record where the fallback track is before something replaces it
    fn remember_fallback_position(&mut self) {
        if self.current.as_ref().is_some_and(|c| c.is_fallback) && self.backend.is_loaded() {
            self.fallback_position = self.backend.position();
            trace!(
                position_ms = self.fallback_position.as_millis() as u64,
                "fallback position saved"
            );
        }
    }

    /// React to the loaded track reaching its natural end
    fn detect_track_end(&mut self) {
        if !self.fade.is_idle() || self.paused {
            return;
        }
        let Some(finished) = self.current.clone() else {
            return;
        };
        if !self.backend.is_loaded() || self.backend.is_playing() {
            return;
        }

        self.emit(PreviewEvent::TrackFinished {
            path: finished.path.clone(),
        });
        self.current = None;

        if finished.is_fallback {
            // The fallback ran all the way through: the saved position is
            // spent, restart it from the top
            self.fallback_position = Duration::ZERO;
            self.try_start(&finished.path, true, None);
            return;
        }

        let Some(item) = self.current_item.clone() else {
            self.backend.close();
            return;
        };
        let tracks = self.catalog.tracks(&item);
        let next = if self.settings.randomize_on_end && tracks.len() > 1 {
            pick_random(&tracks, Some(finished.path.as_path()))
        } else {
            // Keep the preview going while the item stays selected
            finished.path.clone()
        };
        self.try_start(&next, false, None);
    }

    fn emit(&mut self, event: PreviewEvent) {
        self.pending_events.push(event);
    }
}

/// Uniform random pick, excluding the immediately previous track unless it
/// is the only one available
fn pick_random(tracks: &[PathBuf], exclude: Option<&Path>) -> PathBuf {
    let mut rng = rand::thread_rng();
    let candidates: Vec<&PathBuf> = tracks
        .iter()
        .filter(|p| exclude != Some(p.as_path()))
        .collect();

    candidates
        .choose(&mut rng)
        .map(|p| (*p).clone())
        .unwrap_or_else(|| tracks[0].clone())
}
