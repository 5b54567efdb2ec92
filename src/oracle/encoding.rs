use crate::game::{Board, Cell};

/// Code for an empty cell in the oracle's board encoding.
pub const EMPTY_CODE: u8 = 0;
/// Code for the side that moved first.
pub const FIRST_MOVER_CODE: u8 = 1;
/// Code for the side that moved second.
pub const SECOND_MOVER_CODE: u8 = 2;

/// Rows of cell codes, top row first, as the oracle expects them.
pub type OracleBoard = Vec<Vec<u8>>;

/// Encode a board for the oracle: 0 empty, 1 first mover, 2 second mover.
pub fn encode_board(board: &Board, human_first: bool) -> OracleBoard {
    let (human_code, opponent_code) = if human_first {
        (FIRST_MOVER_CODE, SECOND_MOVER_CODE)
    } else {
        (SECOND_MOVER_CODE, FIRST_MOVER_CODE)
    };

    (0..board.rows())
        .map(|row| {
            (0..board.cols())
                .map(|col| match board.get(row, col) {
                    Cell::Empty => EMPTY_CODE,
                    Cell::Human => human_code,
                    Cell::Opponent => opponent_code,
                })
                .collect()
        })
        .collect()
}

/// Columns of an encoded board whose top cell is still empty.
pub fn open_columns(board: &[Vec<u8>]) -> Vec<usize> {
    match board.first() {
        Some(top) => top
            .iter()
            .enumerate()
            .filter(|(_, code)| **code == EMPTY_CODE)
            .map(|(col, _)| col)
            .collect(),
        None => Vec::new(),
    }
}
