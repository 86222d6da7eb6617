// SPDX-License-Identifier: MIT OR Apache-2.0

//! One match instance: two players, one board, whose turn it is

use chrono::{DateTime, Utc};
use tokio::time::Instant;
use uuid::Uuid;

use gridduel_core::{Board, GameError, Mark, Move, MoveOutcome};

use crate::overlay::OverlaySnapshot;

/// Terminal result of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionResult {
    Win(Mark),
    Draw,
}

/// An in-progress or just-terminated match.
///
/// The session exclusively owns its board; all mutation goes through
/// [`Session::apply_current`]. Player identity comparisons are ASCII
/// case-insensitive, matching how chat names arrive.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    /// The challenger plays Cross and moves first
    challenger: String,
    /// The acceptor or the synthetic AI identity, playing Nought
    opponent: String,
    current: Mark,
    result: Option<SessionResult>,
    active: bool,
    vs_ai: bool,
    started_at: DateTime<Utc>,
    last_move_at: Instant,
    board: Board,
}

impl Session {
    pub fn new(challenger: String, opponent: String, vs_ai: bool, board: Board) -> Self {
        Self {
            id: Uuid::new_v4(),
            challenger,
            opponent,
            current: Mark::Cross,
            result: None,
            active: true,
            vs_ai,
            started_at: Utc::now(),
            last_move_at: Instant::now(),
            board,
        }
    }

    /// Apply a move for the player whose turn it is.
    ///
    /// On `Continue` the turn flips; on a terminal outcome the session
    /// becomes inactive and immutable. The move timestamp is refreshed on
    /// every successful application, including forced ones.
    pub fn apply_current(&mut self, mv: Move) -> Result<MoveOutcome, GameError> {
        let mark = self.current;
        let outcome = self.board.apply_move(mark, mv)?;
        self.last_move_at = Instant::now();
        match outcome {
            MoveOutcome::Continue => {
                self.current = mark.opposite();
            }
            MoveOutcome::Win(winner) => {
                self.active = false;
                self.result = Some(SessionResult::Win(winner));
            }
            MoveOutcome::Draw => {
                self.active = false;
                self.result = Some(SessionResult::Draw);
            }
        }
        Ok(outcome)
    }

    /// Whether it is `name`'s turn
    pub fn is_turn(&self, name: &str) -> bool {
        self.active && self.current_player_name().eq_ignore_ascii_case(name)
    }

    pub fn player_name(&self, mark: Mark) -> &str {
        match mark {
            Mark::Cross => &self.challenger,
            Mark::Nought => &self.opponent,
        }
    }

    pub fn current_player_name(&self) -> &str {
        self.player_name(self.current)
    }

    pub fn current_mark(&self) -> Mark {
        self.current
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn vs_ai(&self) -> bool {
        self.vs_ai
    }

    pub fn result(&self) -> Option<SessionResult> {
        self.result
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Time since the last successful move
    pub fn idle_time(&self) -> std::time::Duration {
        self.last_move_at.elapsed()
    }

    /// Current visual state for the overlay
    pub fn snapshot(&self, game: &str) -> OverlaySnapshot {
        let winner = match self.result {
            None => String::new(),
            Some(SessionResult::Win(mark)) => self.player_name(mark).to_string(),
            Some(SessionResult::Draw) => "draw".to_string(),
        };
        OverlaySnapshot {
            game: game.to_string(),
            variant: self.board.variant().to_string(),
            board: self.board.symbol_rows(),
            player1: self.challenger.clone(),
            player2: self.opponent.clone(),
            current_player: self.current_player_name().to_string(),
            winner,
        }
    }
}
