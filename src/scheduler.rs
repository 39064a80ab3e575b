//! Explicit timers for the game controller
//!
//! The controller owns its timers instead of relying on a host event loop's
//! intervals. Time is a monotonic `Duration` since whatever epoch the host
//! picks; the host only ever moves it forward.

use std::time::Duration;

/// Shortest interval a timer may run at; a zero interval would fire forever
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// The timers a game can have armed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Gravity: one drop step per fire
    Drop,
    /// Horizontal auto-repeat while a direction is held
    Repeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Timer {
    interval: Duration,
    deadline: Duration,
}

/// Periodic timers on a virtual clock
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: Duration,
    drop: Option<Timer>,
    repeat: Option<Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock reading
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward without firing anything. Never goes back.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    fn slot(&mut self, kind: TimerKind) -> &mut Option<Timer> {
        match kind {
            TimerKind::Drop => &mut self.drop,
            TimerKind::Repeat => &mut self.repeat,
        }
    }

    /// Revoke any timer of this kind and arm a fresh one due one interval from now
    pub fn schedule(&mut self, kind: TimerKind, interval: Duration) {
        let interval = interval.max(MIN_INTERVAL);
        let deadline = self.now + interval;
        *self.slot(kind) = Some(Timer { interval, deadline });
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        *self.slot(kind) = None;
    }

    pub fn cancel_all(&mut self) {
        self.drop = None;
        self.repeat = None;
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        match kind {
            TimerKind::Drop => self.drop.is_some(),
            TimerKind::Repeat => self.repeat.is_some(),
        }
    }

    /// Interval of an armed timer
    pub fn interval(&self, kind: TimerKind) -> Option<Duration> {
        match kind {
            TimerKind::Drop => self.drop.map(|t| t.interval),
            TimerKind::Repeat => self.repeat.map(|t| t.interval),
        }
    }

    /// Pop the earliest timer due at or before `until`.
    ///
    /// The clock jumps to that timer's deadline and the timer re-arms one
    /// interval later. Drop wins a tie with Repeat.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerKind> {
        let candidates = [(TimerKind::Drop, self.drop), (TimerKind::Repeat, self.repeat)];
        let (kind, timer) = candidates
            .into_iter()
            .filter_map(|(kind, timer)| timer.map(|t| (kind, t)))
            .filter(|(_, t)| t.deadline <= until)
            .min_by_key(|(_, t)| t.deadline)?;

        self.now = self.now.max(timer.deadline);
        *self.slot(kind) = Some(Timer {
            interval: timer.interval,
            deadline: timer.deadline + timer.interval,
        });
        Some(kind)
    }
}
