//! End-to-end preview flow against the timeline backend
//!
//! Exercises the coordinator, playback service, and fade engine together
//! with real track files on disk and the clock-modeled audio backend.

use marquee_audio::TimelineBackend;
use marquee_core::{AppMode, ItemId, PreviewSettings, TrackCatalog};
use marquee_playback::{Coordinator, PlaybackService, PreviewEvent};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

struct DirCatalog {
    tracks: HashMap<ItemId, Vec<PathBuf>>,
}

impl TrackCatalog for DirCatalog {
    fn tracks(&self, item: &ItemId) -> Vec<PathBuf> {
        self.tracks.get(item).cloned().unwrap_or_default()
    }

    fn primary_track(&self, _item: &ItemId) -> Option<PathBuf> {
        None
    }
}

struct Fixture {
    coordinator: Coordinator,
    _dir: tempfile::TempDir,
}

fn fixture(settings: PreviewSettings) -> Fixture {
    let dir = tempfile::tempdir().unwrap();

    let mut tracks = HashMap::new();
    for (item, files) in [("rtype", vec!["rtype-1.ogg", "rtype-2.ogg"]), ("zelda", vec!["zelda-1.ogg"])] {
        let mut paths = Vec::new();
        for file in files {
            let path = dir.path().join(file);
            fs::write(&path, b"placeholder audio").unwrap();
            paths.push(path);
        }
        tracks.insert(ItemId::new(item), paths);
    }

    let catalog = DirCatalog { tracks };
    let service = PlaybackService::new(
        Box::new(catalog),
        Box::new(TimelineBackend::new()),
        settings.clone(),
    );
    Fixture {
        coordinator: Coordinator::new(service, settings, AppMode::Fullscreen),
        _dir: dir,
    }
}

fn quick_settings() -> PreviewSettings {
    PreviewSettings {
        volume: 0.7,
        fade_in: Duration::from_millis(50),
        fade_out: Duration::from_millis(50),
        ..Default::default()
    }
}

/// Tick at 10ms spacing for `count` ticks
fn run_ticks(coordinator: &mut Coordinator, count: u32) {
    let start = Instant::now();
    for i in 0..count {
        coordinator.tick_at(start + Duration::from_millis(10) * i);
    }
}

#[test]
fn browse_play_switch_and_stop() {
    let mut fx = fixture(quick_settings());
    let coordinator = &mut fx.coordinator;

    // Selecting an item starts its first track
    coordinator.item_selected(Some(ItemId::new("rtype")));
    assert!(coordinator.is_loaded());
    assert_eq!(
        coordinator
            .current_track_path()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str()),
        Some("rtype-1.ogg")
    );

    run_ticks(coordinator, 10);

    // Switching items fades over to the other item's track
    coordinator.item_selected(Some(ItemId::new("zelda")));
    run_ticks(coordinator, 15);
    assert_eq!(
        coordinator
            .current_track_path()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str()),
        Some("zelda-1.ogg")
    );

    // Deselecting fades out and releases the backend
    coordinator.item_selected(None);
    run_ticks(coordinator, 15);
    assert!(!coordinator.is_loaded());
    assert!(coordinator.current_track_path().is_none());

    let events = fx.coordinator.take_events();
    let names: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            PreviewEvent::TrackStarted { path, .. } => path.file_name().and_then(|n| n.to_str()),
            _ => None,
        })
        .collect();
    assert_eq!(names, vec!["rtype-1.ogg", "zelda-1.ogg"]);
    assert!(events
        .iter()
        .any(|e| matches!(e, PreviewEvent::PlaybackStopped)));
}

#[test]
fn first_selection_suppression_end_to_end() {
    let mut fx = fixture(PreviewSettings {
        skip_first_selection: true,
        ..quick_settings()
    });
    let coordinator = &mut fx.coordinator;

    coordinator.item_selected(Some(ItemId::new("rtype")));
    assert!(!coordinator.is_loaded(), "synthetic startup selection is silent");

    coordinator.item_selected(Some(ItemId::new("rtype")));
    assert!(coordinator.is_loaded(), "a real selection plays");
}

#[test]
fn missing_item_without_fallback_is_silent() {
    let mut fx = fixture(quick_settings());
    let coordinator = &mut fx.coordinator;

    coordinator.item_selected(Some(ItemId::new("unknown-game")));
    run_ticks(coordinator, 10);

    assert!(!coordinator.is_loaded());
    assert!(fx
        .coordinator
        .take_events()
        .iter()
        .any(|e| matches!(e, PreviewEvent::NothingToPlay { .. })));
}

#[test]
fn fallback_track_covers_items_without_music() {
    let dir = tempfile::tempdir().unwrap();
    let fallback = dir.path().join("fallback.ogg");
    fs::write(&fallback, b"placeholder audio").unwrap();

    let settings = PreviewSettings {
        fallback_track: Some(fallback.clone()),
        fallback_enabled: true,
        ..quick_settings()
    };
    let catalog = DirCatalog {
        tracks: HashMap::new(),
    };
    let service = PlaybackService::new(
        Box::new(catalog),
        Box::new(TimelineBackend::new()),
        settings.clone(),
    );
    let mut coordinator = Coordinator::new(service, settings, AppMode::Fullscreen);

    coordinator.item_selected(Some(ItemId::new("quiet-1")));
    assert_eq!(coordinator.current_track_path(), Some(fallback.as_path()));

    // A second track-less item leaves the fallback running untouched
    run_ticks(&mut coordinator, 10);
    coordinator.item_selected(Some(ItemId::new("quiet-2")));
    assert_eq!(coordinator.current_track_path(), Some(fallback.as_path()));

    let starts = coordinator
        .take_events()
        .iter()
        .filter(|e| matches!(e, PreviewEvent::TrackStarted { .. }))
        .count();
    assert_eq!(starts, 1, "fallback started exactly once");
}
