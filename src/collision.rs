//! Collision detection between a shape and the locked cells of a board

use crate::board::{Board, BOARD_HEIGHT, BOARD_WIDTH};
use crate::tetromino::Shape;

/// Check whether `shape` placed at (row, col) overlaps the floor, a side wall
/// or a locked cell.
///
/// There is no ceiling: cells above row 0 never collide.
pub fn has_collision(board: &Board, shape: &Shape, row: i32, col: i32) -> bool {
    shape.cells().any(|(dr, dc)| {
        let r = row + dr;
        let c = col + dc;
        if r >= BOARD_HEIGHT as i32 || c < 0 || c >= BOARD_WIDTH as i32 {
            return true;
        }
        // None here only means above the board
        board.get(r, c).is_some_and(|cell| cell.is_filled())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::tetromino::TetrominoType;

    #[test]
    fn test_empty_board_spawn_is_free() {
        let board = Board::new();
        for piece in TetrominoType::ALL {
            assert!(!has_collision(&board, &piece.shape(), 0, 3), "{:?}", piece);
        }
    }

    #[test]
    fn test_floor() {
        let board = Board::new();
        let o = TetrominoType::O.shape();
        assert!(!has_collision(&board, &o, 18, 0));
        assert!(has_collision(&board, &o, 19, 0));
    }

    #[test]
    fn test_side_walls() {
        let board = Board::new();
        let i = TetrominoType::I.shape();
        assert!(!has_collision(&board, &i, 5, 0));
        assert!(has_collision(&board, &i, 5, -1));
        assert!(!has_collision(&board, &i, 5, 6));
        assert!(has_collision(&board, &i, 5, 7));
    }

    #[test]
    fn test_blank_columns_may_hang_over_the_wall() {
        // Rotated I occupies only matrix column 2, so col -2 puts it at column 0
        let board = Board::new();
        let vertical = TetrominoType::I.shape().rotated();
        assert!(!has_collision(&board, &vertical, 0, -2));
        assert!(has_collision(&board, &vertical, 0, -3));
    }

    #[test]
    fn test_locked_cell() {
        let mut board = Board::new();
        board.set(10, 4, Cell::Filled(TetrominoType::S));
        let t = TetrominoType::T.shape();
        // T cells: (0,1), (1,0), (1,1), (1,2)
        assert!(has_collision(&board, &t, 9, 3));
        assert!(has_collision(&board, &t, 10, 3));
        assert!(!has_collision(&board, &t, 8, 3));
        assert!(!has_collision(&board, &t, 9, 5));
    }

    #[test]
    fn test_above_ceiling_does_not_collide() {
        let board = Board::new();
        assert!(!has_collision(&board, &TetrominoType::O.shape(), -1, 4));
        assert!(!has_collision(&board, &TetrominoType::I.shape(), -5, 0));
    }

    #[test]
    fn test_matches_cellwise_definition() {
        let mut board = Board::new();
        for (r, c) in [(19, 0), (19, 1), (18, 5), (12, 9), (7, 2)] {
            board.set(r, c, Cell::Filled(TetrominoType::J));
        }
        for piece in TetrominoType::ALL {
            let mut shape = piece.shape();
            for _ in 0..4 {
                for row in -2..22 {
                    for col in -4..12 {
                        let expected = !shape.cells().all(|(dr, dc)| {
                            let (r, c) = (row + dr, col + dc);
                            (0..BOARD_WIDTH as i32).contains(&c)
                                && r < BOARD_HEIGHT as i32
                                && (r < 0 || board.get(r, c) == Some(Cell::Empty))
                        });
                        assert_eq!(has_collision(&board, &shape, row, col), expected);
                    }
                }
                shape = shape.rotated();
            }
        }
    }
}
