//! BLOCKTRIS - a falling-block puzzle engine
//!
//! The engine is a synchronous state machine: a host feeds it input events and
//! the current time, and reads back a [`Snapshot`] to draw.

pub mod board;
pub mod collision;
pub mod game;
pub mod queue;
pub mod scheduler;
pub mod score;
pub mod settings;
pub mod tetromino;

pub use board::{Board, Cell, BOARD_HEIGHT, BOARD_WIDTH};
pub use collision::has_collision;
pub use game::{DropSpeed, Event, FallingPiece, Game, GamePhase, Input, Snapshot};
pub use queue::{PieceSource, RandomPieces, UpcomingQueue};
pub use settings::{Settings, TimingSettings};
pub use tetromino::{Shape, TetrominoType};
