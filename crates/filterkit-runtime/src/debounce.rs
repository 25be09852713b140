#![forbid(unsafe_code)]

//! Trailing-edge debounce timer driven by injected time.
//!
//! [`Debouncer`] is a single-shot deadline owned by whoever needs
//! debouncing. There is no background thread: the host event loop passes
//! `now` into [`schedule`](Debouncer::schedule) and
//! [`poll`](Debouncer::poll), the same way key sequence timeouts are checked
//! on tick.
//!
//! # State Machine
//!
//! ```text
//!                 schedule(now)
//!   ┌──────┐  ───────────────────▶  ┌─────────────────────┐
//!   │ Idle │                        │ Pending { deadline } │◀──┐ schedule(now):
//!   └──────┘  ◀───────────────────  └─────────────────────┘───┘ deadline moves
//!      ▲        cancel()                     │
//!      │                                     │ poll(now >= deadline)
//!      └──────────────── fires once ◀────────┘
//! ```
//!
//! # Invariants
//!
//! - At most one deadline is pending.
//! - Each schedule fires at most once, never before its deadline.
//! - Rescheduling replaces the deadline (no leading-edge call).

use web_time::{Duration, Instant};

/// Cancellable single-shot deadline.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Create an idle debouncer with the given quiet window.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Quiet window.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Cancel any pending deadline and start a new one at `now + window`.
    pub fn schedule(&mut self, now: Instant) -> Instant {
        let deadline = now + self.window;
        self.deadline = Some(deadline);
        deadline
    }

    /// Drop the pending deadline. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Pending deadline, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left until the deadline, zero if it has passed.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Returns `true` exactly once when `now` reaches the pending deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn fires_once_at_deadline() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(600));
        assert_eq!(d.schedule(t0), t0 + ms(600));

        assert!(!d.poll(t0 + ms(599)));
        assert!(d.poll(t0 + ms(600)));
        assert!(!d.poll(t0 + ms(601)));
        assert!(!d.is_pending());
    }

    #[test]
    fn reschedule_moves_deadline() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(600));
        d.schedule(t0);
        d.schedule(t0 + ms(100));
        d.schedule(t0 + ms(200));

        assert!(!d.poll(t0 + ms(700)));
        assert_eq!(d.remaining(t0 + ms(700)), Some(ms(100)));
        assert!(d.poll(t0 + ms(800)));
    }

    #[test]
    fn cancel_clears_pending() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(50));
        d.schedule(t0);
        assert!(d.cancel());
        assert!(!d.cancel());
        assert!(!d.poll(t0 + ms(1000)));
        assert_eq!(d.remaining(t0), None);
    }

    #[test]
    fn zero_window_fires_on_first_poll() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::ZERO);
        d.schedule(t0);
        assert!(d.poll(t0));
    }
}
