// SPDX-License-Identifier: MIT OR Apache-2.0

//! Board representation, legality checks and win/draw detection

use crate::{Coord, GameError, Mark, Move, MoveOutcome, Variant};

/// Axis directions scanned for a winning line. Each axis is walked in both
/// directions from the last played cell.
pub(crate) const AXES: [(i16, i16); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// Fixed dimensions of the column-drop variant
const COLUMN_DROP_ROWS: u8 = 6;
const COLUMN_DROP_COLS: u8 = 7;
const COLUMN_DROP_WIN: u8 = 4;

/// A game board for either variant
#[derive(Debug, Clone)]
pub struct Board {
    variant: Variant,
    rows: u8,
    cols: u8,
    win_length: u8,
    /// Row-major cells, `None` for empty
    cells: Vec<Option<Mark>>,
    occupied: usize,
}

impl Board {
    /// Create an empty open-grid board of `size` x `size`
    pub fn open_grid(size: u8, win_length: u8) -> Self {
        assert!(win_length > 1, "win length must be at least 2");
        let cells = (size as usize) * (size as usize);
        Self {
            variant: Variant::OpenGrid,
            rows: size,
            cols: size,
            win_length,
            cells: vec![None; cells],
            occupied: 0,
        }
    }

    /// Create an empty column-drop board (fixed 6x7, four in a row)
    pub fn column_drop() -> Self {
        let cells = (COLUMN_DROP_ROWS as usize) * (COLUMN_DROP_COLS as usize);
        Self {
            variant: Variant::ColumnDrop,
            rows: COLUMN_DROP_ROWS,
            cols: COLUMN_DROP_COLS,
            win_length: COLUMN_DROP_WIN,
            cells: vec![None; cells],
            occupied: 0,
        }
    }

    /// Apply a move for `mark`, returning how the game proceeds.
    ///
    /// Win detection is incremental: only lines through the just-played cell
    /// are scanned, so cost does not grow with board size.
    pub fn apply_move(&mut self, mark: Mark, mv: Move) -> Result<MoveOutcome, GameError> {
        let coord = match (self.variant, mv) {
            (Variant::ColumnDrop, Move::Drop(col)) => {
                if col >= self.cols {
                    return Err(GameError::OutOfBounds);
                }
                let row = self.drop_row(col).ok_or(GameError::ColumnFull)?;
                Coord::new(col, row)
            }
            (Variant::OpenGrid, Move::Place(coord)) => {
                if !coord.is_valid(self.rows, self.cols) {
                    return Err(GameError::OutOfBounds);
                }
                if self.get(coord).is_some() {
                    return Err(GameError::Occupied);
                }
                coord
            }
            _ => return Err(GameError::WrongMoveKind),
        };

        let idx = self.index(coord);
        self.cells[idx] = Some(mark);
        self.occupied += 1;

        if self.is_winning_cell(coord, mark) {
            tracing::debug!(?coord, ?mark, "winning line completed");
            return Ok(MoveOutcome::Win(mark));
        }
        if self.occupied == self.cells.len() {
            return Ok(MoveOutcome::Draw);
        }
        Ok(MoveOutcome::Continue)
    }

    /// Get the mark at the specified coordinate, `None` when empty or outside
    pub fn get(&self, coord: Coord) -> Option<Mark> {
        if !coord.is_valid(self.rows, self.cols) {
            return None;
        }
        self.cells[self.index(coord)]
    }

    /// Lowest empty row of a column, `None` when the column is full or out of range
    pub fn drop_row(&self, col: u8) -> Option<u8> {
        if col >= self.cols {
            return None;
        }
        (0..self.rows)
            .rev()
            .find(|&row| self.get(Coord::new(col, row)).is_none())
    }

    /// Whether every cell is occupied
    pub fn is_full(&self) -> bool {
        self.occupied == self.cells.len()
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    pub fn win_length(&self) -> u8 {
        self.win_length
    }

    /// Human description of the board, used in match announcements
    pub fn describe(&self) -> String {
        match self.variant {
            Variant::OpenGrid => format!(
                "{}x{} open grid, {} in a row",
                self.rows, self.cols, self.win_length
            ),
            Variant::ColumnDrop => format!(
                "{}x{} column drop, {} in a row",
                self.rows, self.cols, self.win_length
            ),
        }
    }

    /// Grid of display symbols, row by row, empty cells as `""`.
    /// This is the shape the overlay renders.
    pub fn symbol_rows(&self) -> Vec<Vec<String>> {
        (0..self.rows)
            .map(|row| {
                (0..self.cols)
                    .map(|col| {
                        self.get(Coord::new(col, row))
                            .map(|mark| mark.symbol().to_string())
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect()
    }

    /// Count contiguous cells of `mark` walking from `start + step` onward.
    /// The starting cell itself is not counted.
    pub(crate) fn contiguous(&self, start: Coord, step: (i16, i16), mark: Mark) -> u8 {
        let mut count = 0;
        let mut x = start.x as i16 + step.0;
        let mut y = start.y as i16 + step.1;
        while x >= 0
            && y >= 0
            && x < self.cols as i16
            && y < self.rows as i16
            && self.cells[(y as usize) * (self.cols as usize) + (x as usize)] == Some(mark)
        {
            count += 1;
            x += step.0;
            y += step.1;
        }
        count
    }

    fn is_winning_cell(&self, coord: Coord, mark: Mark) -> bool {
        AXES.iter().any(|&(dx, dy)| {
            let run = 1
                + self.contiguous(coord, (dx, dy), mark)
                + self.contiguous(coord, (-dx, -dy), mark);
            run >= self.win_length
        })
    }

    fn index(&self, coord: Coord) -> usize {
        (coord.y as usize) * (self.cols as usize) + (coord.x as usize)
    }
}
