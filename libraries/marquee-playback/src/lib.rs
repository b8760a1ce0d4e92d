//! Marquee - Playback Coordination & Fade Transitions
//!
//! The engine behind soundtrack previews in a library frontend: decide
//! whether audio may play right now, pick a track for the browsed item, and
//! move between tracks with timer-driven fades so switching items never
//! produces jarring silence, overlap, or volume jumps.
//!
//! This crate provides:
//! - [`Coordinator`] - the single gate over all transient suppressors
//!   (first selection, login screen, background video, mode gating) and the
//!   dispatcher for host events
//! - [`PlaybackService`] - track selection (primary-track-once, random
//!   rotation, fallback track with position preservation) and transition
//!   orchestration
//! - a fade engine driving the audio backend's volume on every host timer
//!   tick, tolerant of irregular tick spacing
//! - [`PreviewEvent`] - a drained event queue for "now playing" UI
//!
//! # Architecture
//!
//! Everything runs on one UI-affined event-loop thread: host events, the
//! timer tick, and all backend calls. There are no worker threads and no
//! locks in here; the host's event loop serializes everything. Blocking work
//! (downloading, scraping, file enumeration) belongs to the collaborators
//! behind [`marquee_core::TrackCatalog`], not to this crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use marquee_audio::{create_backend, BackendKind};
//! use marquee_core::{AppMode, ItemId, PreviewSettings, TrackCatalog};
//! use marquee_playback::{Coordinator, PlaybackService};
//! use std::path::PathBuf;
//!
//! struct MyCatalog;
//!
//! impl TrackCatalog for MyCatalog {
//!     fn tracks(&self, _item: &ItemId) -> Vec<PathBuf> {
//!         vec![PathBuf::from("/music/level1.ogg")]
//!     }
//!     fn primary_track(&self, _item: &ItemId) -> Option<PathBuf> {
//!         None
//!     }
//! }
//!
//! let backend = create_backend(BackendKind::Timeline).unwrap();
//! let service = PlaybackService::new(
//!     Box::new(MyCatalog),
//!     backend,
//!     PreviewSettings::default(),
//! );
//! let mut coordinator =
//!     Coordinator::new(service, PreviewSettings::default(), AppMode::Fullscreen);
//!
//! // Host event handlers call in:
//! coordinator.item_selected(Some(ItemId::new("game-42")));
//!
//! // Host timer drives the fades (e.g. every 25ms):
//! coordinator.tick();
//!
//! // UI drains events for its "now playing" display:
//! for event in coordinator.take_events() {
//!     println!("{event:?}");
//! }
//! ```

mod coordinator;
mod error;
mod events;
mod fade;
mod service;
#[cfg(test)]
mod testing;
mod types;

// Public exports
pub use coordinator::{Coordinator, CoordinatorState};
pub use error::{PreviewError, Result};
pub use events::PreviewEvent;
pub use service::PlaybackService;
pub use types::TrackSelection;
