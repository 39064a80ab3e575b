//! Terminal key handling
//!
//! Turns crossterm key events into engine inputs. Terminals that report key
//! releases get exact start/stop pairs. Elsewhere each a/d press is a single
//! step and the terminal's own auto-repeat moves the piece further, while soft
//! drop counts as released once its auto-repeat stops arriving.

use blocktris::Input;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::{Duration, Instant};

/// Time after which we consider a key "released" if no repeat received.
/// Needs to outlast the OS's initial auto-repeat delay.
const KEY_TIMEOUT: Duration = Duration::from_millis(550);

/// What the host should do in response to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAction {
    Game(Input),
    NewGame,
    TogglePause,
    Quit,
}

/// Keys that have a start/stop pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HoldKey {
    Left,
    Right,
    SoftDrop,
}

impl HoldKey {
    const ALL: [HoldKey; 3] = [HoldKey::Left, HoldKey::Right, HoldKey::SoftDrop];

    fn from_code(code: KeyCode) -> Option<HoldKey> {
        match code {
            KeyCode::Char('a') => Some(HoldKey::Left),
            KeyCode::Char('d') => Some(HoldKey::Right),
            KeyCode::Char('s') => Some(HoldKey::SoftDrop),
            _ => None,
        }
    }

    fn start(self) -> Input {
        match self {
            HoldKey::Left => Input::MoveLeftStart,
            HoldKey::Right => Input::MoveRightStart,
            HoldKey::SoftDrop => Input::SoftDropStart,
        }
    }

    fn stop(self) -> Input {
        match self {
            HoldKey::Left => Input::MoveLeftStop,
            HoldKey::Right => Input::MoveRightStop,
            HoldKey::SoftDrop => Input::SoftDropStop,
        }
    }

    fn is_direction(self) -> bool {
        matches!(self, HoldKey::Left | HoldKey::Right)
    }

    fn index(self) -> usize {
        match self {
            HoldKey::Left => 0,
            HoldKey::Right => 1,
            HoldKey::SoftDrop => 2,
        }
    }
}

/// Tracks which hold keys are down
#[derive(Debug)]
pub struct InputHandler {
    /// Whether the terminal sends key release events
    releases_reported: bool,
    /// Last time each hold key was seen pressed or repeating
    last_seen: [Option<Instant>; 3],
}

impl InputHandler {
    pub fn new(releases_reported: bool) -> Self {
        Self {
            releases_reported,
            last_seen: [None; 3],
        }
    }

    /// Translate one key event
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Vec<HostAction> {
        // Handle Ctrl+C for quit
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return vec![HostAction::Quit];
        }

        let code = normalize_key(key.code);

        if let Some(hold) = HoldKey::from_code(code) {
            if hold.is_direction() && !self.releases_reported {
                // No release will come: tap once per press or auto-repeat
                return match key.kind {
                    KeyEventKind::Release => Vec::new(),
                    KeyEventKind::Press | KeyEventKind::Repeat => vec![
                        HostAction::Game(hold.start()),
                        HostAction::Game(hold.stop()),
                    ],
                };
            }
            let slot = &mut self.last_seen[hold.index()];
            return match key.kind {
                KeyEventKind::Release => match slot.take() {
                    Some(_) => vec![HostAction::Game(hold.stop())],
                    None => Vec::new(),
                },
                KeyEventKind::Press | KeyEventKind::Repeat => match slot.replace(now) {
                    // Already held: just a repeat
                    Some(_) => Vec::new(),
                    None => vec![HostAction::Game(hold.start())],
                },
            };
        }

        if key.kind == KeyEventKind::Release {
            return Vec::new();
        }

        match code {
            KeyCode::Char('w') if key.kind == KeyEventKind::Press => {
                vec![HostAction::Game(Input::Rotate)]
            }
            KeyCode::Enter => vec![HostAction::NewGame],
            KeyCode::Char('p') | KeyCode::Esc => vec![HostAction::TogglePause],
            KeyCode::Char('q') => vec![HostAction::Quit],
            _ => Vec::new(),
        }
    }

    /// Release keys whose auto-repeat has stopped (call every frame)
    pub fn update(&mut self, now: Instant) -> Vec<HostAction> {
        let mut actions = Vec::new();
        for hold in HoldKey::ALL {
            let slot = &mut self.last_seen[hold.index()];
            if slot.is_some_and(|seen| now.duration_since(seen) > KEY_TIMEOUT) {
                *slot = None;
                actions.push(HostAction::Game(hold.stop()));
            }
        }
        actions
    }

    /// Forget all held keys (the engine drops them on pause and restart)
    pub fn clear(&mut self) {
        self.last_seen = [None; 3];
    }
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}
