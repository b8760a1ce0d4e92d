//! Coordinator - the single source of truth for "may audio play now"
//!
//! All externally observable events (item selection, login dismissal, video
//! playback, mode and settings changes) land here. The coordinator combines
//! the transient suppressors into one side-effect-free gate and, when
//! playback is permitted, delegates track selection to the playback service.
//!
//! Every handler is best-effort: internal failures are logged and degrade to
//! "do not play"; nothing propagates to the host.

use crate::events::PreviewEvent;
use crate::service::PlaybackService;
use marquee_core::{AppMode, HostAudioSuppressor, ItemId, PreviewSettings};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, trace};

/// Transient gating state, owned exclusively by the coordinator
///
/// Mutated only through the single-purpose methods below, one per
/// transition, so every state change has exactly one call site shape.
/// Constructible directly for deterministic tests via
/// [`Coordinator::with_state`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorState {
    /// True until the very first selection event has been processed
    /// (re-armed by an explicit switch into the gated mode)
    pub first_selection_pending: bool,

    /// A login/splash screen is up; playback stays silent until dismissal
    pub login_gate_active: bool,

    /// A background video is playing
    pub video_playing: bool,

    /// The currently selected item
    pub current_item: Option<ItemId>,
}

impl CoordinatorState {
    /// Fresh session state
    pub fn new() -> Self {
        Self {
            first_selection_pending: true,
            login_gate_active: false,
            video_playing: false,
            current_item: None,
        }
    }

    fn select(&mut self, item: Option<ItemId>) {
        self.current_item = item;
    }

    fn consume_first_selection(&mut self) {
        self.first_selection_pending = false;
    }

    fn rearm_first_selection(&mut self) {
        self.first_selection_pending = true;
    }

    fn arm_login_gate(&mut self) {
        self.login_gate_active = true;
    }

    fn clear_login_gate(&mut self) {
        self.login_gate_active = false;
    }

    fn set_video(&mut self, playing: bool) {
        self.video_playing = playing;
    }
}

impl Default for CoordinatorState {
    fn default() -> Self {
        Self::new()
    }
}

/// Event dispatcher and playback gate
pub struct Coordinator {
    state: CoordinatorState,
    service: PlaybackService,
    settings: PreviewSettings,
    mode: AppMode,
    suppressor: Option<Box<dyn HostAudioSuppressor>>,
    /// Host shows a login screen and has not dismissed it yet
    login_gate_pending: bool,
    /// Login was just dismissed; the settle delay starts on the next tick
    settle_pending: bool,
    /// When the settle delay elapses and playback re-evaluates
    settle_deadline: Option<Instant>,
    /// Whether we currently hold the host's audio suppressed
    host_suppressed: bool,
}

impl Coordinator {
    /// Create a coordinator around a configured playback service
    pub fn new(service: PlaybackService, settings: PreviewSettings, mode: AppMode) -> Self {
        Self::with_state(service, settings, mode, CoordinatorState::new())
    }

    /// Create a coordinator with explicit initial gating state
    pub fn with_state(
        service: PlaybackService,
        settings: PreviewSettings,
        mode: AppMode,
        state: CoordinatorState,
    ) -> Self {
        let login_gate_pending = settings.login_gate;
        let mut coordinator = Self {
            state,
            service,
            settings: settings.clone(),
            mode,
            suppressor: None,
            login_gate_pending,
            settle_pending: false,
            settle_deadline: None,
            host_suppressed: false,
        };
        coordinator.service.update_settings(settings);
        coordinator
    }

    /// Wire up suppression of the host's own background audio
    pub fn set_suppressor(&mut self, suppressor: Box<dyn HostAudioSuppressor>) {
        self.suppressor = Some(suppressor);
    }

    // ===== Gate =====

    /// Whether playback is currently permitted
    ///
    /// Idempotent and side-effect-free: this is called both to decide and,
    /// separately, to probe, so evaluating it must never mutate state.
    pub fn should_play(&self) -> bool {
        self.settings.enabled
            && self.settings.volume > 0.0
            && !self.state.video_playing
            && !self.state.login_gate_active
            && !(self.settings.skip_first_selection && self.state.first_selection_pending)
            && self.settings.gate_mode.map_or(true, |m| m == self.mode)
    }

    // ===== Host events =====

    /// An item was selected (or deselected, with `None`)
    pub fn item_selected(&mut self, item: Option<ItemId>) {
        let Some(item) = item else {
            self.state.select(None);
            self.service.stop();
            self.restore_host_audio();
            return;
        };

        self.state.select(Some(item));

        if self.login_gate_pending {
            // First selection arrives while the login screen is still up:
            // go silent until the dismissal signal, without touching the
            // catalog
            self.login_gate_pending = false;
            self.state.arm_login_gate();
            debug!("login gate armed, preview stays silent");
        } else if self.should_play() {
            self.play_current();
        } else {
            trace!("preview suppressed for this selection");
        }

        // The decision above must still see the flag; only the next
        // selection sees it cleared.
        self.state.consume_first_selection();
    }

    /// The login/splash screen was dismissed
    ///
    /// Playback resumes after a short settle delay, giving the surrounding
    /// UI time to finish its own transition. The delay is driven by `tick`,
    /// never a blocking sleep.
    pub fn login_dismissed(&mut self) {
        self.login_gate_pending = false;
        if self.state.login_gate_active {
            self.state.clear_login_gate();
            self.settle_pending = true;
            debug!("login gate cleared, settle delay armed");
        }
    }

    /// A background video started or stopped
    pub fn video_state_changed(&mut self, is_playing: bool) {
        self.state.set_video(is_playing);

        if is_playing {
            // Fade out, then pause in place so we can pick up where we left
            self.service.pause();
        } else if self.should_play() && self.state.current_item.is_some() {
            if self.service.is_loaded() {
                self.service.resume();
            } else {
                // Backend lost its track meanwhile: reload from scratch
                self.play_current();
            }
        }
    }

    /// The host application switched modes
    pub fn mode_changed(&mut self, mode: AppMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;

        match self.settings.gate_mode {
            Some(gated) if gated == mode => {
                // Entering the gated mode behaves like a fresh session start
                self.state.rearm_first_selection();
            }
            Some(_) => {
                self.service.stop();
                self.restore_host_audio();
            }
            None => {}
        }
    }

    /// A fresh settings snapshot arrived from the configuration store
    pub fn settings_changed(&mut self, settings: PreviewSettings) {
        let was_permitted = self.should_play();
        self.settings = settings.clone();
        self.service.update_settings(settings);
        let permitted = self.should_play();

        if was_permitted && !permitted {
            self.service.stop();
            self.restore_host_audio();
        } else if permitted && !was_permitted && !self.service.is_loaded() {
            self.play_current();
        }
    }

    /// Advance timers: the login settle delay and the fade curve
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// `tick` with an explicit timestamp, for hosts that drive their own
    /// frame clock (and for deterministic tests)
    pub fn tick_at(&mut self, now: Instant) {
        if self.settle_pending {
            self.settle_pending = false;
            self.settle_deadline = Some(now + self.settings.login_settle_delay);
        } else if let Some(deadline) = self.settle_deadline {
            if now >= deadline {
                self.settle_deadline = None;
                if self.should_play() {
                    self.play_current();
                }
            }
        }

        self.service.tick(now);
    }

    // ===== Status =====

    /// Current gating state (read-only)
    pub fn state(&self) -> &CoordinatorState {
        &self.state
    }

    /// Whether the backend has a track loaded
    pub fn is_loaded(&self) -> bool {
        self.service.is_loaded()
    }

    /// Path of the current track, for "now playing" display
    pub fn current_track_path(&self) -> Option<&Path> {
        self.service.current_track_path()
    }

    /// Drain queued UI events
    pub fn take_events(&mut self) -> Vec<PreviewEvent> {
        self.service.take_events()
    }

    // ===== Internals =====

    fn play_current(&mut self) {
        let Some(item) = self.state.current_item.clone() else {
            return;
        };
        self.suppress_host_audio();
        self.service.play_item(&item);
    }

    fn suppress_host_audio(&mut self) {
        if !self.host_suppressed {
            if let Some(suppressor) = &mut self.suppressor {
                suppressor.suppress();
            }
            self.host_suppressed = true;
        }
    }

    fn restore_host_audio(&mut self) {
        if self.host_suppressed {
            if let Some(suppressor) = &mut self.suppressor {
                suppressor.restore();
            }
            self.host_suppressed = false;
        }
    }
}
