//! Marquee - Core Types
//!
//! Shared vocabulary for the Marquee preview engine:
//! - Item and mode identifiers
//! - The `PreviewSettings` snapshot the host hands to the engine
//! - Collaborator traits implemented by the host shell
//!   (`TrackCatalog`, `HostAudioSuppressor`)
//!
//! This crate has no knowledge of audio backends or fade state; it only
//! defines what the host and the engine agree on.

mod catalog;
mod suppressor;
pub mod types;

// Public exports
pub use catalog::TrackCatalog;
pub use suppressor::HostAudioSuppressor;
pub use types::{AppMode, ItemId, PreviewSettings};
