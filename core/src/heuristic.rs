// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic move selection for the AI opponent and timeout fallback moves
//!
//! Deliberately not optimal play: the open-grid evaluator scores run
//! potential around each empty cell, the column-drop evaluator is a simple
//! center preference. Both keep matches approachable for chat opponents.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::AXES;
use crate::{Board, Coord, Mark, Move, Variant};

/// Default weighting of opponent runs over own runs. Blocking an opponent's
/// near-complete line outranks extending a shorter own line.
pub const DEFAULT_DEFENSE_WEIGHT: f64 = 1.5;

/// Pick the best available move for `own` on the given board.
///
/// Returns `None` when no legal move exists.
pub fn best_move(board: &Board, own: Mark, defense_weight: f64) -> Option<Move> {
    match board.variant() {
        Variant::OpenGrid => best_open_grid_move(board, own, defense_weight),
        Variant::ColumnDrop => best_drop_column(board),
    }
}

/// Score every empty cell by the squared run lengths around it and pick
/// uniformly among the maximum-scoring set.
///
/// Runs are counted outward from the candidate cell without the hypothetical
/// placement itself, so the score measures potential rather than the
/// post-placement line.
fn best_open_grid_move(board: &Board, own: Mark, defense_weight: f64) -> Option<Move> {
    let opponent = own.opposite();
    let mut best_score = f64::NEG_INFINITY;
    let mut best_cells: Vec<Coord> = Vec::new();

    for row in 0..board.rows() {
        for col in 0..board.cols() {
            let cell = Coord::new(col, row);
            if board.get(cell).is_some() {
                continue;
            }
            let mut score = 0.0;
            for &(dx, dy) in AXES.iter() {
                let own_run = (board.contiguous(cell, (dx, dy), own)
                    + board.contiguous(cell, (-dx, -dy), own)) as f64;
                let opp_run = (board.contiguous(cell, (dx, dy), opponent)
                    + board.contiguous(cell, (-dx, -dy), opponent))
                    as f64;
                score += own_run * own_run + defense_weight * opp_run * opp_run;
            }
            if score > best_score {
                best_score = score;
                best_cells.clear();
                best_cells.push(cell);
            } else if score == best_score {
                best_cells.push(cell);
            }
        }
    }

    best_cells
        .choose(&mut rand::thread_rng())
        .copied()
        .map(Move::Place)
}

/// Prefer columns near the center, with a small jitter so equal columns do
/// not always resolve the same way. Full columns are skipped.
fn best_drop_column(board: &Board) -> Option<Move> {
    let mut rng = rand::thread_rng();
    let center = board.cols() / 2;
    let mut best: Option<(f64, u8)> = None;

    for col in 0..board.cols() {
        if board.drop_row(col).is_none() {
            continue;
        }
        let center_bias = (board.cols() - center.abs_diff(col)) as f64;
        let score = center_bias + rng.gen::<f64>() * 0.1;
        let replaces = match best {
            Some((top, _)) => score > top,
            None => true,
        };
        if replaces {
            best = Some((score, col));
        }
    }

    best.map(|(_, col)| Move::Drop(col))
}
