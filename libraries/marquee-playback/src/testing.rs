//! Scripted audio backend for unit tests
//!
//! Records every capability call and lets tests script the backend's world:
//! prime an already-playing track, advance the reported position, make a
//! path fail to load, or end a track "naturally" by flipping `playing`.

use marquee_audio::{AudioBackend, AudioError};
use marquee_core::{ItemId, TrackCatalog};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

/// Observable backend state shared between the test and the backend handle
#[derive(Debug, Default)]
pub(crate) struct BackendScript {
    pub loaded_path: Option<PathBuf>,
    pub preloaded: Option<PathBuf>,
    pub playing: bool,
    pub paused: bool,
    pub volume: f32,
    pub position: Duration,

    pub load_calls: usize,
    pub seeks: Vec<Duration>,
    pub volume_writes: Vec<f32>,

    /// Paths whose `load`/`preload` fail with `TrackNotFound`
    pub fail_loads: Vec<PathBuf>,
    /// Make every `seek` fail
    pub fail_seeks: bool,
}

impl BackendScript {
    pub fn loaded(&self) -> bool {
        self.loaded_path.is_some()
    }

    /// Put the backend into "track playing at `volume`" state directly
    pub fn prime_playing(&mut self, path: &str, volume: f32) {
        self.loaded_path = Some(PathBuf::from(path));
        self.playing = true;
        self.paused = false;
        self.volume = volume;
    }

    /// Simulate the loaded track reaching its natural end
    pub fn finish_track(&mut self) {
        self.playing = false;
        self.paused = false;
    }

    fn fails(&self, path: &Path) -> bool {
        self.fail_loads.iter().any(|p| p == path)
    }
}

/// Handle implementing [`AudioBackend`] over a shared [`BackendScript`]
pub(crate) struct ScriptedBackend {
    state: Rc<RefCell<BackendScript>>,
}

impl ScriptedBackend {
    pub fn new() -> (Self, Rc<RefCell<BackendScript>>) {
        let state = Rc::new(RefCell::new(BackendScript {
            volume: 1.0,
            ..BackendScript::default()
        }));
        (
            Self {
                state: Rc::clone(&state),
            },
            state,
        )
    }
}

/// In-memory catalog for tests
#[derive(Debug, Default)]
pub(crate) struct FakeCatalog {
    tracks: HashMap<ItemId, Vec<PathBuf>>,
    primary: HashMap<ItemId, PathBuf>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_tracks(&mut self, item: &str, paths: &[&str]) {
        self.tracks
            .insert(ItemId::new(item), paths.iter().map(PathBuf::from).collect());
    }

    pub fn set_primary(&mut self, item: &str, path: &str) {
        self.primary.insert(ItemId::new(item), PathBuf::from(path));
    }
}

impl TrackCatalog for FakeCatalog {
    fn tracks(&self, item: &ItemId) -> Vec<PathBuf> {
        self.tracks.get(item).cloned().unwrap_or_default()
    }

    fn primary_track(&self, item: &ItemId) -> Option<PathBuf> {
        self.primary.get(item).cloned()
    }
}

impl AudioBackend for ScriptedBackend {
    fn load(&mut self, path: &Path) -> marquee_audio::Result<()> {
        let mut state = self.state.borrow_mut();
        state.load_calls += 1;
        if state.fails(path) {
            return Err(AudioError::TrackNotFound(path.to_path_buf()));
        }
        if state.preloaded.as_deref() == Some(path) {
            state.preloaded = None;
        }
        state.loaded_path = Some(path.to_path_buf());
        state.playing = false;
        state.paused = false;
        state.position = Duration::ZERO;
        Ok(())
    }

    fn preload(&mut self, path: &Path) -> marquee_audio::Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fails(path) {
            return Err(AudioError::TrackNotFound(path.to_path_buf()));
        }
        state.preloaded = Some(path.to_path_buf());
        Ok(())
    }

    fn play(&mut self) -> marquee_audio::Result<()> {
        let mut state = self.state.borrow_mut();
        if !state.loaded() {
            return Err(AudioError::NoTrackLoaded);
        }
        state.playing = true;
        state.paused = false;
        Ok(())
    }

    fn pause(&mut self) -> marquee_audio::Result<()> {
        let mut state = self.state.borrow_mut();
        if !state.loaded() {
            return Err(AudioError::NoTrackLoaded);
        }
        state.paused = true;
        Ok(())
    }

    fn resume(&mut self) -> marquee_audio::Result<()> {
        let mut state = self.state.borrow_mut();
        if !state.loaded() {
            return Err(AudioError::NoTrackLoaded);
        }
        state.paused = false;
        state.playing = true;
        Ok(())
    }

    fn stop(&mut self) -> marquee_audio::Result<()> {
        let mut state = self.state.borrow_mut();
        if !state.loaded() {
            return Err(AudioError::NoTrackLoaded);
        }
        state.playing = false;
        state.paused = false;
        state.position = Duration::ZERO;
        Ok(())
    }

    fn close(&mut self) {
        let mut state = self.state.borrow_mut();
        state.loaded_path = None;
        state.preloaded = None;
        state.playing = false;
        state.paused = false;
        state.position = Duration::ZERO;
    }

    fn seek(&mut self, position: Duration) -> marquee_audio::Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_seeks {
            return Err(AudioError::SeekFailed("scripted failure".into()));
        }
        if !state.loaded() {
            return Err(AudioError::NoTrackLoaded);
        }
        state.seeks.push(position);
        state.position = position;
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) -> marquee_audio::Result<()> {
        let mut state = self.state.borrow_mut();
        state.volume = volume;
        state.volume_writes.push(volume);
        Ok(())
    }

    fn position(&self) -> Duration {
        self.state.borrow().position
    }

    fn is_loaded(&self) -> bool {
        self.state.borrow().loaded()
    }

    fn is_playing(&self) -> bool {
        let state = self.state.borrow();
        state.loaded() && state.playing && !state.paused
    }
}
