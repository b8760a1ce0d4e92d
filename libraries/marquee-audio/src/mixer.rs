//! Native mixer backend (rodio)
//!
//! Sink-per-track playback over the system's default output stream. The
//! preload slot holds a fully probed decoder over in-memory bytes, so
//! promoting it on `load` costs no file I/O.

use crate::backend::AudioBackend;
use crate::error::{AudioError, Result};
use rodio::mixer::Mixer;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Next track, read and probed ahead of the swap
struct PreloadedTrack {
    path: PathBuf,
    decoder: Decoder<Cursor<Vec<u8>>>,
}

/// Rodio-backed audio output
pub struct MixerBackend {
    // Keeps the output device open for the lifetime of the backend
    _stream: OutputStream,
    mixer: Mixer,
    sink: Option<Sink>,
    loaded_path: Option<PathBuf>,
    preloaded: Option<PreloadedTrack>,
    volume: f32,
}

impl MixerBackend {
    /// Open the default output stream
    ///
    /// # Errors
    /// Returns [`AudioError::DeviceUnavailable`] when no output device can be
    /// opened; callers typically fall back to the timeline backend.
    pub fn new() -> Result<Self> {
        let stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| AudioError::DeviceUnavailable(e.to_string()))?;
        let mixer = stream.mixer().clone();

        Ok(Self {
            _stream: stream,
            mixer,
            sink: None,
            loaded_path: None,
            preloaded: None,
            volume: 1.0,
        })
    }

    /// Path of the active track, if one is loaded
    pub fn loaded_path(&self) -> Option<&Path> {
        self.loaded_path.as_deref()
    }

    fn decode_file(path: &Path) -> Result<Decoder<BufReader<File>>> {
        let file = File::open(path).map_err(|_| AudioError::TrackNotFound(path.to_path_buf()))?;
        Decoder::new(BufReader::new(file)).map_err(|e| AudioError::DecodeFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

impl AudioBackend for MixerBackend {
    fn load(&mut self, path: &Path) -> Result<()> {
        // A stale preload (different path) is discarded by the take
        let source: Box<dyn Source + Send> = match self.preloaded.take() {
            Some(ready) if ready.path == path => Box::new(ready.decoder),
            _ => Box::new(Self::decode_file(path)?),
        };

        let sink = Sink::connect_new(&self.mixer);
        sink.pause();
        sink.set_volume(self.volume);
        sink.append(source);

        // Release the old handle only after the replacement is in place
        if let Some(old) = self.sink.replace(sink) {
            old.stop();
        }
        self.loaded_path = Some(path.to_path_buf());
        Ok(())
    }

    fn preload(&mut self, path: &Path) -> Result<()> {
        if self.preloaded.as_ref().is_some_and(|p| p.path == path) {
            return Ok(());
        }

        let bytes =
            std::fs::read(path).map_err(|_| AudioError::TrackNotFound(path.to_path_buf()))?;
        let decoder = Decoder::new(Cursor::new(bytes)).map_err(|e| AudioError::DecodeFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        self.preloaded = Some(PreloadedTrack {
            path: path.to_path_buf(),
            decoder,
        });
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let sink = self.sink.as_ref().ok_or(AudioError::NoTrackLoaded)?;
        sink.play();
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        let sink = self.sink.as_ref().ok_or(AudioError::NoTrackLoaded)?;
        sink.pause();
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        let sink = self.sink.as_ref().ok_or(AudioError::NoTrackLoaded)?;
        sink.play();
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        let sink = self.sink.as_ref().ok_or(AudioError::NoTrackLoaded)?;
        sink.stop();
        Ok(())
    }

    fn close(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.loaded_path = None;
        self.preloaded = None;
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        let sink = self.sink.as_ref().ok_or(AudioError::NoTrackLoaded)?;
        sink.try_seek(position)
            .map_err(|e| AudioError::SeekFailed(e.to_string()))
    }

    fn set_volume(&mut self, volume: f32) -> Result<()> {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(sink) = &self.sink {
            sink.set_volume(self.volume);
        }
        Ok(())
    }

    fn position(&self) -> Duration {
        self.sink
            .as_ref()
            .map(Sink::get_pos)
            .unwrap_or(Duration::ZERO)
    }

    fn is_loaded(&self) -> bool {
        self.sink.is_some()
    }

    fn is_playing(&self) -> bool {
        self.sink
            .as_ref()
            .is_some_and(|s| !s.empty() && !s.is_paused())
    }
}
