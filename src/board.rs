//! Game board representation
//!
//! The board only holds locked cells. All transitions here are pure: they take
//! `&self` and hand back a new board.

use crate::tetromino::{Shape, TetrominoType};
use serde::Serialize;

/// Standard Tetris board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

/// A cell on the board - either empty or filled by a piece type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Cell {
    #[default]
    Empty,
    Filled(TetrominoType),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// Result of removing full rows from a board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearedRows {
    pub board: Board,
    pub count: usize,
}

/// The game board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    /// Grid stored as [row][col], row 0 is the top, row increases downward
    cells: [[Cell; BOARD_WIDTH]; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }

    /// Get the cell at a position (row, col)
    /// Returns None if out of bounds
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        if row < 0 || col < 0 {
            return None;
        }
        let row = row as usize;
        let col = col as usize;
        if row >= BOARD_HEIGHT || col >= BOARD_WIDTH {
            return None;
        }
        Some(self.cells[row][col])
    }

    /// Set a cell at a position
    /// Returns false if out of bounds
    pub fn set(&mut self, row: i32, col: i32, cell: Cell) -> bool {
        if row < 0 || col < 0 {
            return false;
        }
        let row = row as usize;
        let col = col as usize;
        if row >= BOARD_HEIGHT || col >= BOARD_WIDTH {
            return false;
        }
        self.cells[row][col] = cell;
        true
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell; BOARD_WIDTH]> {
        self.cells.iter()
    }

    /// Write every occupied cell of `shape` at offset (row, col) as `piece_type`.
    ///
    /// Does not check for collisions; callers verify the position first. Cells
    /// that land outside the grid are dropped.
    pub fn merge(&self, piece_type: TetrominoType, shape: &Shape, row: i32, col: i32) -> Board {
        let mut merged = self.clone();
        for (dr, dc) in shape.cells() {
            merged.set(row + dr, col + dc, Cell::Filled(piece_type));
        }
        merged
    }

    /// Remove every full row, padding the top with empty rows.
    ///
    /// Surviving rows keep their relative order.
    pub fn clear_full_rows(&self) -> ClearedRows {
        let mut board = self.clone();
        let mut write_row = BOARD_HEIGHT;

        // Compact bottom-up so a removed row never causes the one above to be skipped
        for read_row in (0..BOARD_HEIGHT).rev() {
            if !self.is_line_full(read_row) {
                write_row -= 1;
                board.cells[write_row] = self.cells[read_row];
            }
        }

        for row in 0..write_row {
            board.cells[row] = [Cell::Empty; BOARD_WIDTH];
        }

        ClearedRows {
            board,
            count: write_row,
        }
    }

    /// Check if a line is completely filled
    fn is_line_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(|cell| cell.is_filled())
    }

    /// Check if the board is completely empty
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(board: &mut Board, row: i32, piece: TetrominoType) {
        for col in 0..BOARD_WIDTH {
            board.set(row, col as i32, Cell::Filled(piece));
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert!(board.is_empty());
        assert_eq!(board.rows().count(), BOARD_HEIGHT);
    }

    #[test]
    fn test_set_and_get() {
        let mut board = Board::new();
        assert!(board.set(5, 5, Cell::Filled(TetrominoType::Z)));
        assert_eq!(board.get(5, 5), Some(Cell::Filled(TetrominoType::Z)));
    }

    #[test]
    fn test_out_of_bounds() {
        let board = Board::new();
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(0, -1), None);
        assert_eq!(board.get(BOARD_HEIGHT as i32, 0), None);
        assert_eq!(board.get(0, BOARD_WIDTH as i32), None);
    }

    #[test]
    fn test_merge_is_pure() {
        let board = Board::new();
        let merged = board.merge(TetrominoType::O, &TetrominoType::O.shape(), 18, 0);
        assert!(board.is_empty());
        for (row, col) in [(18, 0), (18, 1), (19, 0), (19, 1)] {
            assert_eq!(merged.get(row, col), Some(Cell::Filled(TetrominoType::O)));
        }
        assert_eq!(merged.get(17, 0), Some(Cell::Empty));
    }

    #[test]
    fn test_merge_skips_blank_shape_rows() {
        // The I piece's blank top row must not shift it down a row
        let merged = Board::new().merge(TetrominoType::I, &TetrominoType::I.shape(), 0, 3);
        for col in 3..7 {
            assert_eq!(merged.get(0, col), Some(Cell::Filled(TetrominoType::I)));
        }
        assert!(merged.rows().skip(1).all(|row| row.iter().all(Cell::is_empty)));
    }

    #[test]
    fn test_clear_without_full_rows_is_noop() {
        let mut board = Board::new();
        board.set(19, 0, Cell::Filled(TetrominoType::T));
        board.set(10, 4, Cell::Filled(TetrominoType::L));
        let cleared = board.clear_full_rows();
        assert_eq!(cleared.count, 0);
        assert_eq!(cleared.board, board);
    }

    #[test]
    fn test_clear_all_rows_full() {
        let mut board = Board::new();
        for row in 0..BOARD_HEIGHT as i32 {
            fill_row(&mut board, row, TetrominoType::J);
        }
        let cleared = board.clear_full_rows();
        assert_eq!(cleared.count, BOARD_HEIGHT);
        assert!(cleared.board.is_empty());
    }

    #[test]
    fn test_clear_adjacent_rows_preserves_order() {
        let mut board = Board::new();
        board.set(16, 0, Cell::Filled(TetrominoType::S));
        board.set(17, 1, Cell::Filled(TetrominoType::Z));
        fill_row(&mut board, 18, TetrominoType::I);
        fill_row(&mut board, 19, TetrominoType::I);

        let cleared = board.clear_full_rows();
        assert_eq!(cleared.count, 2);
        assert_eq!(cleared.board.get(18, 0), Some(Cell::Filled(TetrominoType::S)));
        assert_eq!(cleared.board.get(19, 1), Some(Cell::Filled(TetrominoType::Z)));
        assert!(cleared.board.rows().take(18).all(|row| row.iter().all(Cell::is_empty)));
    }

    #[test]
    fn test_clear_split_rows() {
        let mut board = Board::new();
        fill_row(&mut board, 15, TetrominoType::O);
        board.set(16, 9, Cell::Filled(TetrominoType::T));
        fill_row(&mut board, 17, TetrominoType::O);
        board.set(18, 3, Cell::Filled(TetrominoType::L));

        let cleared = board.clear_full_rows();
        assert_eq!(cleared.count, 2);
        assert_eq!(cleared.board.get(17, 9), Some(Cell::Filled(TetrominoType::T)));
        assert_eq!(cleared.board.get(18, 3), Some(Cell::Filled(TetrominoType::L)));
        assert_eq!(cleared.board.get(19, 0), Some(Cell::Empty));
    }
}
