//! Close confirmation
//!
//! A guarded window only closes on the third close attempt made while the
//! guard is still armed:
//! ```text
//! Idle
//!   ↓ attempt (cancelled)
//! Pending(deadline)
//!   ↓ attempt before deadline (cancelled)
//! Confirmed(deadline)
//!   ↓ attempt before deadline (allowed)
//! Idle
//! ```
//! Every cancelled attempt pushes the deadline to `now + 2000ms`. Reaching a
//! deadline drops the guard back to `Idle`. An attempt landing exactly on
//! the deadline counts as after it.

use parking_lot::Mutex;
use std::time::{Duration, Instant};

pub const CLOSE_CONFIRM_WINDOW: Duration = Duration::from_millis(2000);

/// Cancelled attempts needed before the next one is allowed through.
pub const CLOSE_CONFIRM_THRESHOLD: u8 = 2;

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GuardState {
    Idle,
    Pending { deadline: Instant },
    Confirmed { deadline: Instant },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    /// Keep the window open
    Cancel,
    /// Let the close proceed
    Allow,
}

#[derive(Debug)]
pub struct CloseGuard {
    state: GuardState,
    window: Duration,
}

impl CloseGuard {
    pub fn new() -> Self {
        Self::with_window(CLOSE_CONFIRM_WINDOW)
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            state: GuardState::Idle,
            window,
        }
    }

    /// Register a close attempt at `now`.
    pub fn attempt(&mut self, now: Instant) -> CloseDecision {
        self.expire(now);

        let deadline = now + self.window;
        let (next, decision) = match self.state {
            GuardState::Idle => (GuardState::Pending { deadline }, CloseDecision::Cancel),
            GuardState::Pending { .. } => {
                (GuardState::Confirmed { deadline }, CloseDecision::Cancel)
            }
            GuardState::Confirmed { .. } => (GuardState::Idle, CloseDecision::Allow),
        };
        self.state = next;

        match decision {
            CloseDecision::Cancel => tracing::debug!(
                count = self.count(),
                "Close prevented, repeat to confirm"
            ),
            CloseDecision::Allow => tracing::debug!("Close confirmed"),
        }

        decision
    }

    /// Drop back to idle if the deadline has passed. Returns true on reset.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.state {
            GuardState::Pending { deadline } | GuardState::Confirmed { deadline }
                if now >= deadline =>
            {
                tracing::trace!("Close confirmation lapsed");
                self.state = GuardState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Cancelled attempts currently counted.
    pub fn count(&self) -> u8 {
        match self.state {
            GuardState::Idle => 0,
            GuardState::Pending { .. } => 1,
            GuardState::Confirmed { .. } => CLOSE_CONFIRM_THRESHOLD,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            GuardState::Idle => None,
            GuardState::Pending { deadline } | GuardState::Confirmed { deadline } => {
                Some(deadline)
            }
        }
    }

    pub fn reset(&mut self) {
        self.state = GuardState::Idle;
    }
}

impl Default for CloseGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_single_attempt_never_closes() {
        let clock = ManualClock::new();
        let mut guard = CloseGuard::new();
        assert_eq!(guard.attempt(clock.now()), CloseDecision::Cancel);
        assert_eq!(guard.count(), 1);
    }

    #[test]
    fn test_third_rapid_attempt_closes() {
        let clock = ManualClock::new();
        let mut guard = CloseGuard::new();

        assert_eq!(guard.attempt(clock.now()), CloseDecision::Cancel);
        clock.advance(ms(400));
        assert_eq!(guard.attempt(clock.now()), CloseDecision::Cancel);
        assert_eq!(guard.count(), CLOSE_CONFIRM_THRESHOLD);
        clock.advance(ms(400));
        assert_eq!(guard.attempt(clock.now()), CloseDecision::Allow);
        assert_eq!(guard.count(), 0);
    }

    #[test]
    fn test_lapse_resets_to_idle() {
        let clock = ManualClock::new();
        let mut guard = CloseGuard::new();

        guard.attempt(clock.now());
        guard.attempt(clock.now());
        clock.advance(ms(2500));

        // Counts as a fresh first attempt, two more are needed
        assert_eq!(guard.attempt(clock.now()), CloseDecision::Cancel);
        assert_eq!(guard.count(), 1);
        assert_eq!(guard.attempt(clock.now()), CloseDecision::Cancel);
        assert_eq!(guard.attempt(clock.now()), CloseDecision::Allow);
    }

    #[test]
    fn test_each_attempt_restarts_the_window() {
        let clock = ManualClock::new();
        let mut guard = CloseGuard::new();

        guard.attempt(clock.now());
        clock.advance(ms(1500));
        guard.attempt(clock.now());
        // 2500ms after the first attempt but 1000ms after the last one
        clock.advance(ms(1000));
        assert_eq!(guard.attempt(clock.now()), CloseDecision::Allow);
    }

    #[test]
    fn test_deadline_is_exclusive() {
        let clock = ManualClock::new();
        let mut guard = CloseGuard::new();

        guard.attempt(clock.now());
        clock.advance(ms(1999));
        assert_eq!(guard.attempt(clock.now()), CloseDecision::Cancel);
        assert_eq!(guard.count(), 2);

        clock.advance(CLOSE_CONFIRM_WINDOW);
        assert!(guard.expire(clock.now()));
        assert_eq!(guard.count(), 0);
    }

    #[test]
    fn test_attempt_exactly_on_deadline_starts_over() {
        let clock = ManualClock::new();
        let mut guard = CloseGuard::new();

        guard.attempt(clock.now());
        guard.attempt(clock.now());
        clock.advance(CLOSE_CONFIRM_WINDOW);
        assert_eq!(guard.attempt(clock.now()), CloseDecision::Cancel);
        assert_eq!(guard.count(), 1);
    }
}
