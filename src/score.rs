//! Scoring for line clears

/// Points awarded for a single lock, keyed by rows cleared.
///
/// A piece spans at most four rows, so anything above four means the board
/// pipeline is broken.
pub fn points_for(rows_cleared: usize) -> u64 {
    match rows_cleared {
        0 => 0,
        1 => 100,
        2 => 300,
        3 => 500,
        4 => 800,
        n => unreachable!("cleared {} rows with a single piece", n),
    }
}

/// Running totals for one game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Total lines cleared
    pub lines: u32,
    /// Pieces locked into the board
    pub pieces: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one locked piece and the rows it cleared.
    /// Returns the points awarded.
    pub fn add_lock(&mut self, rows_cleared: usize) -> u64 {
        let awarded = points_for(rows_cleared);
        self.points += awarded;
        self.lines += rows_cleared as u32;
        self.pieces += 1;
        awarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_table() {
        assert_eq!(points_for(0), 0);
        assert_eq!(points_for(1), 100);
        assert_eq!(points_for(2), 300);
        assert_eq!(points_for(3), 500);
        assert_eq!(points_for(4), 800);
    }

    #[test]
    #[should_panic(expected = "cleared 5 rows")]
    fn test_five_rows_is_fatal() {
        points_for(5);
    }

    #[test]
    fn test_totals_accumulate() {
        let mut score = Score::new();
        assert_eq!(score.add_lock(0), 0);
        assert_eq!(score.add_lock(2), 300);
        assert_eq!(score.add_lock(4), 800);
        assert_eq!(score.points, 1100);
        assert_eq!(score.lines, 6);
        assert_eq!(score.pieces, 3);
    }
}
