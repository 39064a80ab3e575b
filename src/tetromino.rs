//! Tetromino definitions and shapes
//!
//! All 7 standard tetrominoes as square boolean matrices. Rotation is a plain
//! 90° clockwise transform of the matrix, with no wall kicks.

use rand::Rng;
use serde::Serialize;

/// Largest bounding box side of any tetromino (the I piece)
pub const MAX_SHAPE_SIZE: usize = 4;

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TetrominoType {
    I, // long bar
    O, // square
    T, // T-shape
    S, // S-shape
    Z, // Z-shape
    J, // J-shape
    L, // L-shape
}

impl TetrominoType {
    /// All tetromino types, in a fixed order
    pub const ALL: [TetrominoType; 7] = [
        TetrominoType::I,
        TetrominoType::O,
        TetrominoType::T,
        TetrominoType::S,
        TetrominoType::Z,
        TetrominoType::J,
        TetrominoType::L,
    ];

    /// Pick a tetromino type uniformly at random
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> TetrominoType {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Get the canonical, un-rotated shape for this tetromino
    pub fn shape(&self) -> Shape {
        match self {
            TetrominoType::I => Shape::from_rows(&["....", "####", "....", "...."]),
            TetrominoType::O => Shape::from_rows(&["##", "##"]),
            TetrominoType::T => Shape::from_rows(&[".#.", "###", "..."]),
            TetrominoType::S => Shape::from_rows(&[".##", "##.", "..."]),
            TetrominoType::Z => Shape::from_rows(&["##.", ".##", "..."]),
            TetrominoType::J => Shape::from_rows(&["#..", "###", "..."]),
            TetrominoType::L => Shape::from_rows(&["..#", "###", "..."]),
        }
    }
}

/// A square occupancy matrix for a piece, relative to its bounding box.
///
/// Only the top-left `size` x `size` corner of `cells` is meaningful; the rest
/// stays `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    size: usize,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    /// Build a shape from rows of `#` (occupied) and `.` (empty).
    ///
    /// Panics if the rows do not form a square of side `1..=MAX_SHAPE_SIZE`.
    pub fn from_rows(rows: &[&str]) -> Shape {
        let size = rows.len();
        assert!(
            (1..=MAX_SHAPE_SIZE).contains(&size),
            "shape side {} out of range",
            size
        );
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (r, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), size, "shape rows must be square");
            for (c, ch) in row.chars().enumerate() {
                cells[r][c] = ch == '#';
            }
        }
        Shape { size, cells }
    }

    /// Side length of the bounding box
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the matrix cell at (row, col) is occupied
    pub fn is_set(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size && self.cells[row][col]
    }

    /// Rotate 90° clockwise. The bounding box keeps its size.
    pub fn rotated(&self) -> Shape {
        let n = self.size;
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for r in 0..n {
            for c in 0..n {
                cells[c][n - 1 - r] = self.cells[r][c];
            }
        }
        Shape { size: n, cells }
    }

    /// Offsets (row, col) of every occupied cell.
    ///
    /// Fully empty matrix rows are skipped and do not count toward the row
    /// offset, so a piece whose top rows are blank sits flush at its origin.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let n = self.size;
        self.cells[..n]
            .iter()
            .filter(move |row| row[..n].iter().any(|&set| set))
            .enumerate()
            .flat_map(move |(r, row)| {
                (0..n)
                    .filter(move |&c| row[c])
                    .map(move |c| (r as i32, c as i32))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    #[test]
    fn test_every_shape_has_four_cells() {
        for piece in TetrominoType::ALL {
            assert_eq!(piece.shape().cells().count(), 4, "{:?}", piece);
        }
    }

    #[test]
    fn test_four_rotations_is_identity() {
        for piece in TetrominoType::ALL {
            let shape = piece.shape();
            let back = shape.rotated().rotated().rotated().rotated();
            assert_eq!(back, shape, "{:?}", piece);
        }
    }

    #[test]
    fn test_rotation_is_clockwise() {
        // .#.      .#.
        // ###  ->  .##
        // ...      .#.
        let rotated = TetrominoType::T.shape().rotated();
        assert_eq!(rotated, Shape::from_rows(&[".#.", ".##", ".#."]));
    }

    #[test]
    fn test_o_rotation_is_noop() {
        let o = TetrominoType::O.shape();
        assert_eq!(o.rotated(), o);
    }

    #[test]
    fn test_empty_rows_are_compacted() {
        // The I piece has a blank first row; its cells start at row offset 0
        let cells: Vec<_> = TetrominoType::I.shape().cells().collect();
        assert_eq!(cells, vec![(0, 0), (0, 1), (0, 2), (0, 3)]);

        // Rotated twice, the bar sits on matrix row 2 but still reports row 0
        let flipped: Vec<_> = TetrominoType::I.shape().rotated().rotated().cells().collect();
        assert_eq!(flipped, vec![(0, 0), (0, 1), (0, 2), (0, 3)]);
    }

    #[test]
    fn test_random_covers_all_types() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let seen: HashSet<_> = (0..500).map(|_| TetrominoType::random(&mut rng)).collect();
        assert_eq!(seen.len(), 7);
    }
}
