//! Core game state and logic
//!
//! `Game` is a state machine fed one `Event` at a time. Gravity and horizontal
//! auto-repeat come from the game's own `Scheduler`; the host only reports the
//! passage of time through [`Game::on_tick`].

use crate::board::{Board, ClearedRows};
use crate::collision::has_collision;
use crate::queue::{PieceSource, RandomPieces, UpcomingQueue};
use crate::scheduler::{Scheduler, TimerKind};
use crate::score::Score;
use crate::settings::TimingSettings;
use crate::tetromino::{Shape, TetrominoType};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// Where every new piece appears
pub const SPAWN_ROW: i32 = 0;
pub const SPAWN_COL: i32 = 3;

/// Lifecycle of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum GamePhase {
    /// Not started yet
    #[default]
    Idle,
    Running,
    Paused,
    GameOver,
}

/// Gravity regimes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropSpeed {
    /// Regular fall rate
    Normal,
    /// Piece has landed and waits to lock; still slidable
    Sliding,
    /// Soft drop held
    Fast,
}

/// Player input, as forwarded by a presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Rotate,
    MoveLeftStart,
    MoveLeftStop,
    MoveRightStart,
    MoveRightStop,
    SoftDropStart,
    SoftDropStop,
}

/// Everything that can change a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Start a new game from any phase
    Start,
    /// Pause a running game or resume a paused one
    TogglePause,
    Input(Input),
    /// Gravity timer fired
    DropTick,
    /// Auto-repeat timer fired
    RepeatTick,
}

impl From<Input> for Event {
    fn from(input: Input) -> Self {
        Event::Input(input)
    }
}

/// The piece currently falling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallingPiece {
    pub piece_type: TetrominoType,
    pub shape: Shape,
    /// Top-left corner of the shape's bounding box
    pub row: i32,
    pub col: i32,
}

impl FallingPiece {
    /// A piece in its canonical orientation at the spawn point
    pub fn spawn(piece_type: TetrominoType) -> Self {
        Self {
            piece_type,
            shape: piece_type.shape(),
            row: SPAWN_ROW,
            col: SPAWN_COL,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct HeldKeys {
    left: bool,
    right: bool,
    soft_drop: bool,
}

impl HeldKeys {
    /// Right wins when both directions are held
    fn col_offset(&self) -> i32 {
        if self.right {
            1
        } else if self.left {
            -1
        } else {
            0
        }
    }

    fn any_direction(&self) -> bool {
        self.left || self.right
    }
}

/// Read-only view for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Locked cells, with the falling piece drawn in while a game is live
    pub board: Board,
    pub score: u64,
    pub lines: u32,
    pub phase: GamePhase,
    /// Next pieces, next to spawn first
    pub upcoming: Vec<TetrominoType>,
}

/// The main game struct
#[derive(Debug)]
pub struct Game<S: PieceSource = RandomPieces> {
    /// Locked cells only
    board: Board,
    current_piece: Option<FallingPiece>,
    /// None until the first game starts
    queue: Option<UpcomingQueue>,
    source: S,
    score: Score,
    phase: GamePhase,
    /// Piece can't fall further; the next drop tick locks it
    landed: bool,
    held: HeldKeys,
    /// Gravity regime, None while the drop timer is stopped
    drop_speed: Option<DropSpeed>,
    scheduler: Scheduler,
    timing: TimingSettings,
}

impl Game<RandomPieces> {
    /// Create an idle game with an entropy-seeded piece generator
    pub fn new(timing: TimingSettings) -> Self {
        Self::with_source(timing, RandomPieces::from_entropy())
    }

    /// Create an idle game whose piece sequence is fixed by `seed`
    pub fn with_seed(timing: TimingSettings, seed: u64) -> Self {
        Self::with_source(timing, RandomPieces::seeded(seed))
    }
}

impl<S: PieceSource> Game<S> {
    /// Create an idle game drawing pieces from `source`
    pub fn with_source(timing: TimingSettings, source: S) -> Self {
        Self {
            board: Board::new(),
            current_piece: None,
            queue: None,
            source,
            score: Score::new(),
            phase: GamePhase::Idle,
            landed: false,
            held: HeldKeys::default(),
            drop_speed: None,
            scheduler: Scheduler::new(),
            timing,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    /// Locked cells, without the falling piece
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_piece(&self) -> Option<&FallingPiece> {
        self.current_piece.as_ref()
    }

    /// Next pieces, empty before the first game
    pub fn upcoming(&self) -> &[TetrominoType] {
        self.queue
            .as_ref()
            .map(UpcomingQueue::preview)
            .unwrap_or_default()
    }

    pub fn drop_speed(&self) -> Option<DropSpeed> {
        self.drop_speed
    }

    /// Whether the piece is resting and waiting to lock
    pub fn is_landed(&self) -> bool {
        self.landed
    }

    pub fn start_game(&mut self) {
        self.process_event(Event::Start);
    }

    pub fn toggle_pause(&mut self) {
        self.process_event(Event::TogglePause);
    }

    /// Pause if running, otherwise do nothing
    pub fn pause_game(&mut self) {
        if self.phase == GamePhase::Running {
            self.process_event(Event::TogglePause);
        }
    }

    /// Resume if paused, otherwise do nothing
    pub fn resume_game(&mut self) {
        if self.phase == GamePhase::Paused {
            self.process_event(Event::TogglePause);
        }
    }

    pub fn input(&mut self, input: Input) {
        self.process_event(Event::Input(input));
    }

    /// Advance the game clock to `now`, delivering every timer tick due by then.
    ///
    /// Ticks fire one at a time in deadline order. A transition that cancels
    /// or reschedules a timer takes effect before the next tick is chosen, so
    /// a revoked timer never fires. Inputs processed between calls are stamped
    /// with the clock of the latest call.
    pub fn on_tick(&mut self, now: Duration) {
        while let Some(kind) = self.scheduler.pop_due(now) {
            let event = match kind {
                TimerKind::Drop => Event::DropTick,
                TimerKind::Repeat => Event::RepeatTick,
            };
            self.process_event(event);
        }
        self.scheduler.set_now(now);
    }

    /// Process one event
    pub fn process_event(&mut self, event: Event) {
        match event {
            Event::Start => self.start(),
            Event::TogglePause => match self.phase {
                GamePhase::Running => self.pause(),
                GamePhase::Paused => self.resume(),
                GamePhase::Idle | GamePhase::GameOver => {}
            },
            Event::Input(input) => {
                if self.phase == GamePhase::Running {
                    self.handle_input(input);
                }
            }
            Event::DropTick => {
                if self.phase == GamePhase::Running {
                    self.drop_step();
                }
            }
            Event::RepeatTick => {
                if self.phase == GamePhase::Running {
                    self.shift(false);
                }
            }
        }
    }

    /// Render-ready view of the game
    pub fn snapshot(&self) -> Snapshot {
        let board = match (self.phase, &self.current_piece) {
            (GamePhase::Running | GamePhase::Paused, Some(piece)) => {
                self.board
                    .merge(piece.piece_type, &piece.shape, piece.row, piece.col)
            }
            _ => self.board.clone(),
        };
        Snapshot {
            board,
            score: self.score.points,
            lines: self.score.lines,
            phase: self.phase,
            upcoming: self.upcoming().to_vec(),
        }
    }

    fn start(&mut self) {
        // Stale timers from a previous game must not survive the reset
        self.stop_timers();
        self.board = Board::new();
        self.score = Score::new();
        self.queue = Some(UpcomingQueue::new(&mut self.source));
        let first = self.source.next_piece();
        self.current_piece = Some(FallingPiece::spawn(first));
        self.landed = false;
        self.held = HeldKeys::default();
        self.phase = GamePhase::Running;
        self.set_drop_speed(Some(DropSpeed::Normal));
        debug!(piece = ?first, upcoming = ?self.upcoming(), "game started");
    }

    fn pause(&mut self) {
        self.stop_timers();
        self.held = HeldKeys::default();
        self.phase = GamePhase::Paused;
        debug!("game paused");
    }

    fn resume(&mut self) {
        self.phase = GamePhase::Running;
        self.set_drop_speed(Some(DropSpeed::Normal));
        debug!("game resumed");
    }

    fn handle_input(&mut self, input: Input) {
        match input {
            Input::Rotate => self.shift(true),
            Input::MoveLeftStart | Input::MoveLeftStop => {
                let pressed = input == Input::MoveLeftStart;
                if self.held.left != pressed {
                    self.held.left = pressed;
                    self.shift(false);
                    self.restart_repeat();
                }
            }
            Input::MoveRightStart | Input::MoveRightStop => {
                let pressed = input == Input::MoveRightStart;
                if self.held.right != pressed {
                    self.held.right = pressed;
                    self.shift(false);
                    self.restart_repeat();
                }
            }
            Input::SoftDropStart | Input::SoftDropStop => {
                self.held.soft_drop = input == Input::SoftDropStart;
                self.refresh_drop_speed();
            }
        }
    }

    /// Apply the held horizontal offset, optionally with a clockwise rotation.
    /// Rejected silently if the result would collide.
    fn shift(&mut self, rotate: bool) {
        let offset = self.held.col_offset();
        let Some(piece) = self.current_piece.as_mut() else {
            return;
        };
        let shape = if rotate {
            piece.shape.rotated()
        } else {
            piece.shape
        };
        let col = piece.col + offset;
        if !has_collision(&self.board, &shape, piece.row, col) {
            piece.shape = shape;
            piece.col = col;
        }
    }

    /// One gravity step
    fn drop_step(&mut self) {
        let Some(piece) = self.current_piece.as_mut() else {
            return;
        };

        if self.landed {
            self.lock_and_clear();
        } else if has_collision(&self.board, &piece.shape, piece.row + 1, piece.col) {
            self.landed = true;
            self.refresh_drop_speed();
        } else {
            piece.row += 1;
        }
    }

    /// Lock the current piece, clear rows, score, and spawn the next piece.
    ///
    /// If the piece was slid off its ledge since landing, the lock is called
    /// off and the piece falls again.
    fn lock_and_clear(&mut self) {
        let Some(piece) = self.current_piece else {
            return;
        };
        self.landed = false;

        if !has_collision(&self.board, &piece.shape, piece.row + 1, piece.col) {
            self.refresh_drop_speed();
            return;
        }

        let merged = self
            .board
            .merge(piece.piece_type, &piece.shape, piece.row, piece.col);
        let ClearedRows { board, count } = merged.clear_full_rows();
        self.board = board;
        let awarded = self.score.add_lock(count);

        let next_type = match self.queue.as_mut() {
            Some(queue) => queue.next(&mut self.source),
            None => self.source.next_piece(),
        };
        let next = FallingPiece::spawn(next_type);
        debug!(
            piece = ?piece.piece_type,
            row = piece.row,
            col = piece.col,
            rows_cleared = count,
            awarded,
            next = ?next.piece_type,
            "piece locked"
        );

        if has_collision(&self.board, &next.shape, next.row, next.col) {
            self.current_piece = None;
            self.held = HeldKeys::default();
            self.stop_timers();
            self.phase = GamePhase::GameOver;
            info!(
                score = self.score.points,
                lines = self.score.lines,
                pieces = self.score.pieces,
                "game over"
            );
            return;
        }

        self.current_piece = Some(next);
        self.refresh_drop_speed();
    }

    fn effective_speed(&self) -> DropSpeed {
        if self.held.soft_drop {
            DropSpeed::Fast
        } else if self.landed {
            DropSpeed::Sliding
        } else {
            DropSpeed::Normal
        }
    }

    fn refresh_drop_speed(&mut self) {
        self.set_drop_speed(Some(self.effective_speed()));
    }

    /// Switch gravity regime. Re-selecting the current regime keeps the
    /// pending tick; any change revokes it and schedules a fresh one.
    fn set_drop_speed(&mut self, speed: Option<DropSpeed>) {
        if self.drop_speed == speed {
            return;
        }
        self.drop_speed = speed;
        match speed {
            Some(speed) => {
                let interval = self.drop_interval(speed);
                self.scheduler.schedule(TimerKind::Drop, interval);
            }
            None => self.scheduler.cancel(TimerKind::Drop),
        }
    }

    fn drop_interval(&self, speed: DropSpeed) -> Duration {
        match speed {
            DropSpeed::Normal => self.timing.normal_drop(),
            DropSpeed::Sliding => self.timing.sliding_drop(),
            DropSpeed::Fast => self.timing.fast_drop(),
        }
    }

    fn restart_repeat(&mut self) {
        if self.held.any_direction() {
            self.scheduler
                .schedule(TimerKind::Repeat, self.timing.move_repeat());
        } else {
            self.scheduler.cancel(TimerKind::Repeat);
        }
    }

    fn stop_timers(&mut self) {
        self.scheduler.cancel_all();
        self.drop_speed = None;
    }
}
