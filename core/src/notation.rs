// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat-coordinate notation, per variant
//!
//! Open grid moves are letter+number (`C4` is column C, row 4). Column drop
//! moves are a 1-based column number or a column letter. Both grammars are
//! case-insensitive.

use thiserror::Error;

use crate::{Coord, Move, Variant};

/// A coordinate that could not be read
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("cannot read coordinate `{0}`")]
    Unreadable(String),
}

/// Parse a raw chat token into a move for the given variant
pub fn parse_move(variant: Variant, raw: &str) -> Result<Move, NotationError> {
    let token = raw.trim();
    if token.is_empty() {
        return Err(NotationError::Unreadable(raw.to_string()));
    }
    match variant {
        Variant::ColumnDrop => parse_column(token)
            .map(Move::Drop)
            .ok_or_else(|| NotationError::Unreadable(token.to_string())),
        Variant::OpenGrid => parse_cell(token)
            .map(Move::Place)
            .ok_or_else(|| NotationError::Unreadable(token.to_string())),
    }
}

/// Format a move the way players type it, for chat echoes
pub fn format_move(variant: Variant, mv: Move) -> String {
    match (variant, mv) {
        (_, Move::Drop(col)) => (col + 1).to_string(),
        (_, Move::Place(coord)) => {
            format!("{}{}", column_letter(coord.x), coord.y as u16 + 1)
        }
    }
}

fn parse_column(token: &str) -> Option<u8> {
    if token.chars().all(|c| c.is_ascii_digit()) {
        let number: u16 = token.parse().ok()?;
        if number == 0 || number > u8::MAX as u16 {
            return None;
        }
        return Some((number - 1) as u8);
    }
    let mut chars = token.chars();
    let letter = chars.next()?;
    if chars.next().is_some() || !letter.is_ascii_alphabetic() {
        return None;
    }
    Some(letter.to_ascii_uppercase() as u8 - b'A')
}

fn parse_cell(token: &str) -> Option<Coord> {
    let mut chars = token.chars();
    let letter = chars.next()?;
    if !letter.is_ascii_alphabetic() {
        return None;
    }
    let digits = chars.as_str();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let row: u16 = digits.parse().ok()?;
    if row == 0 || row > u8::MAX as u16 {
        return None;
    }
    let col = letter.to_ascii_uppercase() as u8 - b'A';
    Some(Coord::new(col, (row - 1) as u8))
}

fn column_letter(col: u8) -> char {
    (b'A' + col) as char
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_grid_letter_number() {
        assert_eq!(
            parse_move(Variant::OpenGrid, "C4"),
            Ok(Move::Place(Coord::new(2, 3)))
        );
        assert_eq!(
            parse_move(Variant::OpenGrid, "a1"),
            Ok(Move::Place(Coord::new(0, 0)))
        );
        assert_eq!(
            parse_move(Variant::OpenGrid, " h12 "),
            Ok(Move::Place(Coord::new(7, 11)))
        );
    }

    #[test]
    fn open_grid_rejects_garbage() {
        for raw in ["", "4C", "C", "C0", "CC4", "4"] {
            assert!(parse_move(Variant::OpenGrid, raw).is_err(), "{raw:?}");
        }
    }

    #[test]
    fn column_drop_number_or_letter() {
        assert_eq!(parse_move(Variant::ColumnDrop, "3"), Ok(Move::Drop(2)));
        assert_eq!(parse_move(Variant::ColumnDrop, "c"), Ok(Move::Drop(2)));
        assert_eq!(parse_move(Variant::ColumnDrop, "G"), Ok(Move::Drop(6)));
        assert!(parse_move(Variant::ColumnDrop, "0").is_err());
        assert!(parse_move(Variant::ColumnDrop, "x7").is_err());
    }

    #[test]
    fn formatting_round_trips_the_user_shape() {
        assert_eq!(
            format_move(Variant::OpenGrid, Move::Place(Coord::new(2, 3))),
            "C4"
        );
        assert_eq!(format_move(Variant::ColumnDrop, Move::Drop(2)), "3");
    }
}
