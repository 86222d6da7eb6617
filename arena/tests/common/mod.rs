// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared helpers for arena integration tests

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::Result;

use gridduel_arena::overlay::{OverlayEvent, OverlaySink, OverlaySnapshot};
use gridduel_arena::{ArenaConfig, BoardType, GameArena, User};
use gridduel_core::Variant;

/// Sink that records every call so tests can assert on overlay traffic
#[derive(Default)]
pub struct MemoryOverlay {
    pub snapshots: Mutex<Vec<OverlaySnapshot>>,
    pub events: Mutex<Vec<OverlayEvent>>,
}

impl MemoryOverlay {
    pub fn last_snapshot(&self) -> Option<OverlaySnapshot> {
        self.snapshots.lock().unwrap().last().cloned()
    }

    pub fn event_names(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.event.clone())
            .collect()
    }
}

impl OverlaySink for MemoryOverlay {
    fn write_snapshot(&self, snapshot: &OverlaySnapshot) -> Result<()> {
        self.snapshots.lock().unwrap().push(snapshot.clone());
        Ok(())
    }

    fn broadcast_event(&self, game: &str, event: &str) -> Result<()> {
        self.events.lock().unwrap().push(OverlayEvent {
            game: game.to_string(),
            event: event.to_string(),
        });
        Ok(())
    }
}

/// Config pinned to a single open-grid board so tests are deterministic
pub fn open_grid_config() -> ArenaConfig {
    ArenaConfig {
        board_types: vec![BoardType {
            variant: Variant::OpenGrid,
            size: 13,
            win_length: 5,
        }],
        ..ArenaConfig::default()
    }
}

/// Config pinned to the column-drop board
pub fn column_drop_config() -> ArenaConfig {
    ArenaConfig {
        board_types: vec![BoardType {
            variant: Variant::ColumnDrop,
            size: 6,
            win_length: 4,
        }],
        ..ArenaConfig::default()
    }
}

pub fn arena_with(cfg: ArenaConfig) -> (GameArena, Arc<MemoryOverlay>) {
    let overlay = Arc::new(MemoryOverlay::default());
    let arena = GameArena::new("testchannel", cfg, overlay.clone());
    (arena, overlay)
}

pub fn user(name: &str) -> User {
    User::new(name)
}

/// Drain pending chat replies into strings
pub fn drain_chat(rx: &mut tokio::sync::broadcast::Receiver<gridduel_arena::ArenaEvent>) -> Vec<String> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        let gridduel_arena::ArenaEvent::Chat(text) = event;
        out.push(text);
    }
    out
}
