//! Error types for audio backends

use std::path::PathBuf;
use thiserror::Error;

/// Audio backend errors
#[derive(Debug, Error)]
pub enum AudioError {
    /// Track file does not exist or cannot be read
    #[error("Track not found: {0}")]
    TrackNotFound(PathBuf),

    /// Track file exists but could not be decoded
    #[error("Failed to decode {path}: {reason}")]
    DecodeFailed {
        /// The offending file
        path: PathBuf,
        /// Decoder error text
        reason: String,
    },

    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Seek within the loaded track failed
    #[error("Seek failed: {0}")]
    SeekFailed(String),

    /// No usable audio output device
    #[error("Audio device unavailable: {0}")]
    DeviceUnavailable(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for backend operations
pub type Result<T> = std::result::Result<T, AudioError>;
