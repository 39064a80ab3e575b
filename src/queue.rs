//! Piece generation and the upcoming-piece preview
//!
//! Pieces are drawn uniformly at random from an injected source, so a seeded
//! generator replays the same game.

use crate::tetromino::TetrominoType;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Number of pieces shown in the preview
pub const PREVIEW_LEN: usize = 3;

/// Anything that can hand out the next piece type
pub trait PieceSource {
    fn next_piece(&mut self) -> TetrominoType;
}

/// Uniform random pieces backed by any `rand` generator
#[derive(Debug, Clone)]
pub struct RandomPieces<R: Rng = ChaCha8Rng> {
    rng: R,
}

impl RandomPieces<ChaCha8Rng> {
    /// Deterministic source for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Source seeded from the thread-local generator
    pub fn from_entropy() -> Self {
        Self::seeded(rand::random())
    }
}

impl<R: Rng> RandomPieces<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> PieceSource for RandomPieces<R> {
    fn next_piece(&mut self) -> TetrominoType {
        TetrominoType::random(&mut self.rng)
    }
}

/// Fixed-length FIFO of upcoming pieces
#[derive(Debug, Clone)]
pub struct UpcomingQueue {
    queue: [TetrominoType; PREVIEW_LEN],
}

impl UpcomingQueue {
    /// Create a full preview queue
    pub fn new(source: &mut impl PieceSource) -> Self {
        Self {
            queue: std::array::from_fn(|_| source.next_piece()),
        }
    }

    /// Take the next piece and top the queue back up
    pub fn next(&mut self, source: &mut impl PieceSource) -> TetrominoType {
        let next = self.queue[0];
        self.queue.rotate_left(1);
        self.queue[PREVIEW_LEN - 1] = source.next_piece();
        next
    }

    /// Upcoming pieces, next to spawn first
    pub fn preview(&self) -> &[TetrominoType] {
        &self.queue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Cycle(usize);

    impl PieceSource for Cycle {
        fn next_piece(&mut self) -> TetrominoType {
            let piece = TetrominoType::ALL[self.0 % 7];
            self.0 += 1;
            piece
        }
    }

    #[test]
    fn test_queue_starts_full() {
        let queue = UpcomingQueue::new(&mut Cycle(0));
        assert_eq!(
            queue.preview(),
            [TetrominoType::I, TetrominoType::O, TetrominoType::T]
        );
    }

    #[test]
    fn test_next_is_fifo() {
        let mut source = Cycle(0);
        let mut queue = UpcomingQueue::new(&mut source);
        assert_eq!(queue.next(&mut source), TetrominoType::I);
        assert_eq!(
            queue.preview(),
            [TetrominoType::O, TetrominoType::T, TetrominoType::S]
        );
        assert_eq!(queue.next(&mut source), TetrominoType::O);
        assert_eq!(queue.preview().len(), PREVIEW_LEN);
    }

    #[test]
    fn test_seeded_sources_agree() {
        let mut a = RandomPieces::seeded(42);
        let mut b = RandomPieces::seeded(42);
        let left: Vec<_> = (0..50).map(|_| a.next_piece()).collect();
        let right: Vec<_> = (0..50).map(|_| b.next_piece()).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_many_pieces() {
        let mut source = RandomPieces::from_entropy();
        let mut queue = UpcomingQueue::new(&mut source);
        for _ in 0..100 {
            let _ = queue.next(&mut source);
            assert_eq!(queue.preview().len(), PREVIEW_LEN);
        }
    }
}
