//! Track catalog collaborator trait
//!
//! The host shell owns the on-disk layout of each item's music and whatever
//! metadata designates a primary track. The engine only asks for the result.

use crate::types::ItemId;
use std::path::PathBuf;

/// Provides the track files associated with a library item
///
/// Implementations must return tracks in a stable order: the engine relies on
/// "first track in catalog order" as a deterministic default and on the order
/// staying put between consecutive calls for the same item.
pub trait TrackCatalog {
    /// All track files for an item, in stable order (may be empty)
    fn tracks(&self, item: &ItemId) -> Vec<PathBuf>;

    /// The designated primary track for an item, if one is configured
    ///
    /// The primary track plays once, the first time an item is exposed in a
    /// session, before normal rotation resumes.
    fn primary_track(&self, item: &ItemId) -> Option<PathBuf>;
}
