//! Error types for playback coordination
//!
//! These never cross the host boundary: every event handler absorbs them and
//! degrades to "do not play". They exist so the selection and transition
//! internals can use `?` before the absorption point.

use marquee_audio::AudioError;
use thiserror::Error;

/// Preview engine errors
#[derive(Debug, Error)]
pub enum PreviewError {
    /// Every candidate track failed to load
    #[error("No playable track available")]
    NoPlayableTrack,

    /// Audio backend error
    #[error(transparent)]
    Backend(#[from] AudioError),
}

/// Result type for preview operations
pub type Result<T> = std::result::Result<T, PreviewError>;
