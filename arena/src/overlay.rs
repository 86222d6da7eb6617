// SPDX-License-Identifier: MIT OR Apache-2.0

//! Overlay snapshot and event contract
//!
//! The overlay is an external visual surface: the arena pushes it the latest
//! state and fire-and-forget event names, nothing comes back. Every call is
//! best-effort; failures are logged by the caller and never reach game logic.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Event name sent when a match starts
pub const EVENT_NEW_GAME: &str = "new_game";
/// Event name sent when the rendered state changed
pub const EVENT_REFRESH: &str = "refresh";
/// Event name sent when a match reached a terminal state
pub const EVENT_GAME_OVER: &str = "game_over";

/// The visual state persisted for the overlay renderer.
///
/// The cleared form (between matches) has every string field empty and the
/// board omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlaySnapshot {
    pub game: String,
    pub variant: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub board: Vec<Vec<String>>,
    pub player1: String,
    pub player2: String,
    pub current_player: String,
    pub winner: String,
}

impl OverlaySnapshot {
    /// The empty snapshot written after teardown
    pub fn cleared() -> Self {
        Self::default()
    }
}

/// A fire-and-forget overlay notification
#[derive(Debug, Clone)]
pub struct OverlayEvent {
    pub game: String,
    pub event: String,
}

/// Receiver side of the overlay contract. Implementations must not block:
/// the arena calls these inside its serialized mutation path.
pub trait OverlaySink: Send + Sync {
    /// Persist the latest visual state
    fn write_snapshot(&self, snapshot: &OverlaySnapshot) -> Result<()>;

    /// Notify the overlay that something happened; no acknowledgement
    fn broadcast_event(&self, game: &str, event: &str) -> Result<()>;
}

/// File-backed sink: snapshots land as pretty JSON at a fixed path, events
/// fan out on a broadcast channel an overlay server can subscribe to.
pub struct FileOverlay {
    path: PathBuf,
    events_tx: broadcast::Sender<OverlayEvent>,
}

impl FileOverlay {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let (events_tx, _) = broadcast::channel(64);
        Self {
            path: path.into(),
            events_tx,
        }
    }

    /// Get a receiver for overlay events
    pub fn subscribe(&self) -> broadcast::Receiver<OverlayEvent> {
        self.events_tx.subscribe()
    }
}

impl OverlaySink for FileOverlay {
    fn write_snapshot(&self, snapshot: &OverlaySnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create overlay directory")?;
        }
        let json =
            serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write overlay file: {}", self.path.display()))?;
        Ok(())
    }

    fn broadcast_event(&self, game: &str, event: &str) -> Result<()> {
        // No receiver is not an error: events are fire-and-forget.
        let _ = self.events_tx.send(OverlayEvent {
            game: game.to_string(),
            event: event.to_string(),
        });
        Ok(())
    }
}

/// Sink that drops everything, for setups without an overlay
pub struct NullOverlay;

impl OverlaySink for NullOverlay {
    fn write_snapshot(&self, _snapshot: &OverlaySnapshot) -> Result<()> {
        Ok(())
    }

    fn broadcast_event(&self, _game: &str, _event: &str) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn cleared_snapshot_omits_the_board() {
        let json = serde_json::to_string(&OverlaySnapshot::cleared()).unwrap();
        assert!(!json.contains("board"));
        assert!(json.contains("\"winner\":\"\""));
    }

    #[test]
    fn file_overlay_writes_and_notifies() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("overlay").join("data.json");
        let overlay = FileOverlay::new(&path);
        let mut events = overlay.subscribe();

        let snapshot = OverlaySnapshot {
            game: "gridduel".to_string(),
            variant: "open_grid".to_string(),
            board: vec![vec!["X".to_string(), String::new()]],
            player1: "alice".to_string(),
            player2: "bob".to_string(),
            current_player: "bob".to_string(),
            winner: String::new(),
        };
        overlay.write_snapshot(&snapshot).unwrap();
        overlay.broadcast_event("gridduel", EVENT_REFRESH).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: OverlaySnapshot = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, snapshot);

        let event = events.try_recv().unwrap();
        assert_eq!(event.event, EVENT_REFRESH);
    }
}
