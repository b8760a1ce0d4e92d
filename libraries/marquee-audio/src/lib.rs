//! Marquee - Audio Backends
//!
//! One capability surface ([`AudioBackend`]) over two concrete players:
//! - `MixerBackend` plays through the system's native mixer via rodio
//!   (behind the `mixer` feature)
//! - [`TimelineBackend`] models playback over a monotonic clock for
//!   environments without an audio device
//!
//! Both expose a single active playback slot plus a preload slot, so the
//! next track can be fully prepared while the current one is still playing
//! and the swap is effectively instantaneous. The backend is selected once
//! at construction via [`create_backend`]; nothing above this crate branches
//! on which one is active.

mod backend;
mod error;
#[cfg(feature = "mixer")]
mod mixer;
mod timeline;

// Public exports
pub use backend::{create_backend, AudioBackend, BackendKind};
pub use error::{AudioError, Result};
#[cfg(feature = "mixer")]
pub use mixer::MixerBackend;
pub use timeline::TimelineBackend;
