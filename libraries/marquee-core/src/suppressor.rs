//! Host audio suppression capability
//!
//! Hosts that play their own ambient/background audio need it silenced while
//! a preview is audible. How that happens is host interop (a public API where
//! one exists, an isolated adapter otherwise); the engine only sees this
//! narrow capability and never tracks host audio state itself.

/// Silences and restores the host application's own background audio
///
/// Both calls are best-effort: implementations absorb and log their own
/// failures. The engine pairs them (`suppress` when preview audio starts,
/// `restore` once it has fully stopped) and never calls either twice in a
/// row.
pub trait HostAudioSuppressor {
    /// Silence the host's background audio
    fn suppress(&mut self);

    /// Restore the host's background audio
    fn restore(&mut self);
}
