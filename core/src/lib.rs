// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gridduel Core - Game Rules and Board Logic
//!
//! This crate provides the core game functionality including:
//! - Board representation for both game variants
//! - Move legality, win and draw detection
//! - Chat-coordinate notation parsing and formatting
//! - The heuristic move evaluator used for the AI opponent

#![deny(unsafe_code)]
#![deny(clippy::all)]

pub mod board;
pub mod heuristic;
pub mod notation;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Player mark on the board (Cross or Nought)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    /// Cross, played by the challenger (moves first)
    Cross,
    /// Nought, played by the acceptor or the AI
    Nought,
}

impl Mark {
    /// Returns the opposite mark
    pub fn opposite(&self) -> Self {
        match self {
            Mark::Cross => Mark::Nought,
            Mark::Nought => Mark::Cross,
        }
    }

    /// Display symbol used in chat replies and overlay snapshots
    pub fn symbol(&self) -> &'static str {
        match self {
            Mark::Cross => "X",
            Mark::Nought => "O",
        }
    }
}

/// Game variant played on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Free placement anywhere on the grid, win by N in a row
    OpenGrid,
    /// Gravity drop into a column on a fixed 6x7 grid, win by 4 in a row
    ColumnDrop,
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::OpenGrid => write!(f, "open_grid"),
            Variant::ColumnDrop => write!(f, "column_drop"),
        }
    }
}

/// Board coordinate representing a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// X coordinate (column)
    pub x: u8,
    /// Y coordinate (row)
    pub y: u8,
}

impl Coord {
    /// Create a new coordinate
    pub fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Check if coordinate is inside a board of the given dimensions
    pub fn is_valid(&self, rows: u8, cols: u8) -> bool {
        self.x < cols && self.y < rows
    }
}

/// Represents a move in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Place a mark at the specified coordinate (open grid)
    Place(Coord),
    /// Drop a mark into the specified column (column drop)
    Drop(u8),
}

/// Result of applying a legal move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The game continues with the other player
    Continue,
    /// The move completed a winning line for this mark
    Win(Mark),
    /// The board is full and nobody won
    Draw,
}

/// Errors that can occur during game play
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// The coordinate is outside the board
    #[error("that square is outside the board")]
    OutOfBounds,

    /// The position is already occupied
    #[error("that square is already taken")]
    Occupied,

    /// The column has no empty cell left
    #[error("that column is full")]
    ColumnFull,

    /// The move shape does not match the board variant
    #[error("that kind of move does not fit this board")]
    WrongMoveKind,
}

pub use board::Board;
