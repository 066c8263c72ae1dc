#![forbid(unsafe_code)]

//! Deterministic leading + trailing throttle.
//!
//! [`Throttle`] gates an expensive recomputation to at most one run per
//! window. The first call in a quiet period runs immediately; calls inside
//! the window collapse into a single trailing run at the end of the window.
//!
//! The throttle owns no timer. Callers feed it the current time and poll it
//! when the deadline it reported is due, which keeps it usable from a
//! host-driven event loop and from tests with synthetic clocks.
//!
//! # Invariants
//!
//! 1. Two runs are never closer than `window` apart.
//! 2. At most one trailing run is pending at any time.
//! 3. After [`cancel`](Throttle::cancel), [`poll`](Throttle::poll) returns
//!    `false` until a new call schedules work.

use web_time::{Duration, Instant};

/// What the caller should do after [`Throttle::call`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleCall {
    /// Run now.
    Immediate,
    /// A trailing run was scheduled; wake the throttle after `delay`.
    Scheduled { delay: Duration },
    /// A trailing run was already pending; nothing new to schedule.
    Coalesced,
}

/// Leading + trailing throttle over an injected clock.
#[derive(Debug, Clone)]
pub struct Throttle {
    window: Duration,
    last_run: Option<Instant>,
    pending: Option<Instant>,
}

impl Throttle {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_run: None,
            pending: None,
        }
    }

    #[inline]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Deadline of the pending trailing run, if any.
    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Request a run at `now`.
    pub fn call(&mut self, now: Instant) -> ThrottleCall {
        let ready = self
            .last_run
            .is_none_or(|last| now.saturating_duration_since(last) >= self.window);
        if ready && self.pending.is_none() {
            self.last_run = Some(now);
            return ThrottleCall::Immediate;
        }
        if self.pending.is_some() {
            return ThrottleCall::Coalesced;
        }
        // `ready` is false here, so `last_run` is set.
        let deadline = self.last_run.map_or(now, |last| last + self.window);
        self.pending = Some(deadline);
        ThrottleCall::Scheduled {
            delay: deadline.saturating_duration_since(now),
        }
    }

    /// Fire the trailing run if it is due.
    ///
    /// Returns `true` when the caller should run now.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(deadline) if now >= deadline => {
                self.pending = None;
                self.last_run = Some(now);
                true
            }
            _ => false,
        }
    }

    /// Time left until the pending run is due, if one is pending.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Drop any pending trailing run and forget the last run time.
    ///
    /// Returns `true` if a trailing run was pending.
    pub fn cancel(&mut self) -> bool {
        self.last_run = None;
        self.pending.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(100);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn first_call_runs_immediately() {
        let mut throttle = Throttle::new(WINDOW);
        assert_eq!(throttle.call(Instant::now()), ThrottleCall::Immediate);
        assert!(!throttle.is_pending());
    }

    #[test]
    fn call_inside_window_schedules_trailing_run() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(WINDOW);
        assert_eq!(throttle.call(t0), ThrottleCall::Immediate);
        assert_eq!(
            throttle.call(t0 + ms(30)),
            ThrottleCall::Scheduled { delay: ms(70) }
        );
        assert_eq!(throttle.deadline(), Some(t0 + WINDOW));
    }

    #[test]
    fn burst_collapses_into_one_trailing_run() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(WINDOW);
        throttle.call(t0);
        throttle.call(t0 + ms(10));
        assert_eq!(throttle.call(t0 + ms(20)), ThrottleCall::Coalesced);
        assert_eq!(throttle.call(t0 + ms(90)), ThrottleCall::Coalesced);

        assert!(!throttle.poll(t0 + ms(99)));
        assert!(throttle.poll(t0 + ms(100)));
        assert!(!throttle.poll(t0 + ms(150)));
    }

    #[test]
    fn call_after_window_runs_immediately_again() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(WINDOW);
        throttle.call(t0);
        assert_eq!(throttle.call(t0 + ms(100)), ThrottleCall::Immediate);
        assert_eq!(throttle.call(t0 + ms(250)), ThrottleCall::Immediate);
    }

    #[test]
    fn trailing_run_restarts_the_window() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(WINDOW);
        throttle.call(t0);
        throttle.call(t0 + ms(50));
        assert!(throttle.poll(t0 + ms(100)));
        assert_eq!(
            throttle.call(t0 + ms(120)),
            ThrottleCall::Scheduled { delay: ms(80) }
        );
    }

    #[test]
    fn late_call_while_pending_stays_coalesced() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(WINDOW);
        throttle.call(t0);
        throttle.call(t0 + ms(50));
        // The wake was late; the pending run still owns the slot.
        assert_eq!(throttle.call(t0 + ms(180)), ThrottleCall::Coalesced);
        assert!(throttle.poll(t0 + ms(180)));
    }

    #[test]
    fn cancel_drops_pending_run() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(WINDOW);
        throttle.call(t0);
        throttle.call(t0 + ms(10));
        assert!(throttle.cancel());
        assert!(!throttle.poll(t0 + ms(500)));
        assert!(!throttle.cancel());
        // Cancel also forgets the last run, so the next call leads again.
        assert_eq!(throttle.call(t0 + ms(20)), ThrottleCall::Immediate);
    }

    #[test]
    fn remaining_reports_time_to_deadline() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(WINDOW);
        assert_eq!(throttle.remaining(t0), None);
        throttle.call(t0);
        throttle.call(t0 + ms(40));
        assert_eq!(throttle.remaining(t0 + ms(40)), Some(ms(60)));
        assert_eq!(throttle.remaining(t0 + ms(400)), Some(Duration::ZERO));
    }
}
