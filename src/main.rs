//! BLOCKTRIS terminal host
//!
//! Draws the engine's snapshot with ratatui and forwards keys: w rotate,
//! a/d move, s soft drop, Enter new game, p pause, q quit.

mod input;
mod ui;

use blocktris::{Game, GamePhase, PieceSource, Settings};
use crossterm::{
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use input::{HostAction, InputHandler};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io::{self, stdout},
    path::PathBuf,
    time::{Duration, Instant},
};

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Directory for session logs, created if missing
fn log_dir() -> io::Result<PathBuf> {
    let dir = std::env::temp_dir().join("blocktris");
    // The file appender cannot start without it
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn main() -> io::Result<()> {
    let session_id: u32 = rand::random();
    let log_dir = log_dir()?;
    let log_file = format!("{:08x}.log", session_id);

    // stdout belongs to the terminal UI, so logs go to a file
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("blocktris=debug".parse().unwrap()),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "BLOCKTRIS starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings = Settings::load();
    let mut game = match settings.seed {
        Some(seed) => {
            tracing::info!(seed, "using fixed piece seed");
            Game::with_seed(settings.timing, seed)
        }
        None => Game::new(settings.timing),
    };

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    // Key release events, where the terminal can report them
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        execute!(
            stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    tracing::debug!(enhanced, "keyboard enhancement");

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut game, enhanced);

    // Restore terminal
    if enhanced {
        execute!(stdout(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    if result.is_ok() && game.phase() != GamePhase::Idle {
        let score = game.score();
        println!("\nThanks for playing BLOCKTRIS!");
        println!("Final Score: {} | Lines: {}", score.points, score.lines);
    }

    result
}

fn run_app<S: PieceSource>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    game: &mut Game<S>,
    releases_reported: bool,
) -> io::Result<()> {
    let epoch = Instant::now();
    let mut input = InputHandler::new(releases_reported);

    loop {
        let snapshot = game.snapshot();
        terminal.draw(|frame| ui::render_game(frame, &snapshot))?;

        if event::poll(FRAME_DURATION)? {
            if let Event::Key(key) = event::read()? {
                // Inputs act on the clock as of now
                game.on_tick(epoch.elapsed());
                for action in input.handle_key(key, Instant::now()) {
                    if !apply(game, &mut input, action) {
                        return Ok(());
                    }
                }
            }
        }

        for action in input.update(Instant::now()) {
            apply(game, &mut input, action);
        }
        game.on_tick(epoch.elapsed());
    }
}

/// Forward one host action. Returns false when the player quits.
fn apply<S: PieceSource>(game: &mut Game<S>, input: &mut InputHandler, action: HostAction) -> bool {
    match action {
        HostAction::Game(key_input) => game.process_event(key_input.into()),
        HostAction::NewGame => {
            input.clear();
            game.start_game();
        }
        HostAction::TogglePause => {
            input.clear();
            game.toggle_pause();
        }
        HostAction::Quit => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_dir_exists() {
        let dir = log_dir().unwrap();
        assert!(dir.is_dir());
        assert!(dir.ends_with("blocktris"));
    }
}
