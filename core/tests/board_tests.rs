// SPDX-License-Identifier: MIT OR Apache-2.0

use gridduel_core::{Board, Coord, GameError, Mark, Move, MoveOutcome};

fn place(board: &mut Board, mark: Mark, x: u8, y: u8) -> MoveOutcome {
    board
        .apply_move(mark, Move::Place(Coord::new(x, y)))
        .unwrap()
}

#[test]
fn horizontal_five_wins_open_grid() {
    let mut board = Board::open_grid(13, 5);
    for x in 0..4 {
        assert_eq!(place(&mut board, Mark::Cross, x, 0), MoveOutcome::Continue);
    }
    assert_eq!(
        place(&mut board, Mark::Cross, 4, 0),
        MoveOutcome::Win(Mark::Cross)
    );
}

#[test]
fn win_is_detected_on_every_axis() {
    // The winning mark is placed in the middle of the line last, so both
    // walking directions contribute to the run.
    let axes: [(i16, i16); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];
    for (dx, dy) in axes {
        for mark in [Mark::Cross, Mark::Nought] {
            let mut board = Board::open_grid(13, 5);
            let origin = (6i16, 6i16);
            let mut cells: Vec<(u8, u8)> = (-2..=2)
                .map(|step| {
                    (
                        (origin.0 + dx * step) as u8,
                        (origin.1 + dy * step) as u8,
                    )
                })
                .collect();
            // play the center cell last
            let center = cells.remove(2);
            for (x, y) in cells {
                assert_eq!(place(&mut board, mark, x, y), MoveOutcome::Continue);
            }
            let last = place(&mut board, mark, center.0, center.1);
            assert_eq!(last, MoveOutcome::Win(mark), "axis ({dx},{dy}) {mark:?}");
        }
    }
}

#[test]
fn occupied_cell_is_rejected_and_unchanged() {
    let mut board = Board::open_grid(13, 5);
    place(&mut board, Mark::Cross, 3, 3);
    let result = board.apply_move(Mark::Nought, Move::Place(Coord::new(3, 3)));
    assert_eq!(result, Err(GameError::Occupied));
    assert_eq!(board.get(Coord::new(3, 3)), Some(Mark::Cross));
}

#[test]
fn out_of_bounds_is_rejected() {
    let mut board = Board::open_grid(13, 5);
    let result = board.apply_move(Mark::Cross, Move::Place(Coord::new(13, 0)));
    assert_eq!(result, Err(GameError::OutOfBounds));
    let mut drop = Board::column_drop();
    assert_eq!(
        drop.apply_move(Mark::Cross, Move::Drop(7)),
        Err(GameError::OutOfBounds)
    );
}

#[test]
fn full_column_rejects_further_drops() {
    let mut board = Board::column_drop();
    let mut mark = Mark::Cross;
    for _ in 0..6 {
        assert_eq!(
            board.apply_move(mark, Move::Drop(0)).unwrap(),
            MoveOutcome::Continue
        );
        mark = mark.opposite();
    }
    assert_eq!(
        board.apply_move(mark, Move::Drop(0)),
        Err(GameError::ColumnFull)
    );
}

#[test]
fn drops_stack_from_the_bottom() {
    let mut board = Board::column_drop();
    board.apply_move(Mark::Cross, Move::Drop(2)).unwrap();
    board.apply_move(Mark::Nought, Move::Drop(2)).unwrap();
    assert_eq!(board.get(Coord::new(2, 5)), Some(Mark::Cross));
    assert_eq!(board.get(Coord::new(2, 4)), Some(Mark::Nought));
}

#[test]
fn vertical_four_wins_column_drop() {
    let mut board = Board::column_drop();
    for _ in 0..3 {
        board.apply_move(Mark::Cross, Move::Drop(1)).unwrap();
        board.apply_move(Mark::Nought, Move::Drop(4)).unwrap();
    }
    assert_eq!(
        board.apply_move(Mark::Cross, Move::Drop(1)).unwrap(),
        MoveOutcome::Win(Mark::Cross)
    );
}

#[test]
fn diagonal_four_wins_column_drop() {
    let mut board = Board::column_drop();
    // Build a staircase so Cross lands on the rising diagonal.
    let filler = [(1, Mark::Nought), (2, Mark::Nought), (2, Mark::Cross), (3, Mark::Nought)];
    board.apply_move(Mark::Cross, Move::Drop(0)).unwrap();
    for (col, mark) in filler {
        board.apply_move(mark, Move::Drop(col)).unwrap();
    }
    board.apply_move(Mark::Cross, Move::Drop(1)).unwrap();
    board.apply_move(Mark::Nought, Move::Drop(3)).unwrap();
    board.apply_move(Mark::Cross, Move::Drop(2)).unwrap();
    board.apply_move(Mark::Nought, Move::Drop(3)).unwrap();
    assert_eq!(
        board.apply_move(Mark::Cross, Move::Drop(3)).unwrap(),
        MoveOutcome::Win(Mark::Cross)
    );
}

#[test]
fn full_board_without_a_line_is_a_draw() {
    let plan = [
        (0, 0, Mark::Cross),
        (1, 0, Mark::Nought),
        (2, 0, Mark::Cross),
        (0, 1, Mark::Cross),
        (1, 1, Mark::Nought),
        (2, 1, Mark::Nought),
        (0, 2, Mark::Nought),
        (1, 2, Mark::Cross),
        (2, 2, Mark::Cross),
    ];
    let mut board = Board::open_grid(3, 3);
    let (&(lx, ly, lmark), rest) = plan.split_last().unwrap();
    for &(x, y, mark) in rest {
        assert_eq!(place(&mut board, mark, x, y), MoveOutcome::Continue);
    }
    assert_eq!(place(&mut board, lmark, lx, ly), MoveOutcome::Draw);
    assert!(board.is_full());
}

#[test]
fn symbol_rows_mirror_the_grid() {
    let mut board = Board::column_drop();
    board.apply_move(Mark::Cross, Move::Drop(0)).unwrap();
    let rows = board.symbol_rows();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0].len(), 7);
    assert_eq!(rows[5][0], "X");
    assert_eq!(rows[0][0], "");
}
