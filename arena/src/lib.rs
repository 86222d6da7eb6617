// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gridduel Arena - per-channel match coordination
//!
//! This crate provides the service layer around the core rules:
//! - Challenge / AI-offer negotiation and expiry
//! - The running session and its move-timeout supervisor
//! - AI turn scheduling
//! - Overlay snapshot and event publication
//! - Chat-command parsing and the persisted module configuration

#![deny(unsafe_code)]

pub mod arena;
pub mod command;
pub mod config;
pub mod overlay;
pub mod session;

// Re-exports
pub use arena::{ArenaEvent, GameArena, GAME_ID};
pub use command::{parse_command, Command, User};
pub use config::{load_config, save_config, ArenaConfig, BoardType};
pub use overlay::{FileOverlay, NullOverlay, OverlayEvent, OverlaySink, OverlaySnapshot};
pub use session::{Session, SessionResult};
