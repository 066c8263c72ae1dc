#![forbid(unsafe_code)]

//! Bookkeeping for the single outstanding host timer.
//!
//! Browser timers cannot be recalled once their callback is queued, so each
//! scheduled timer carries a token. Only the callback holding the current
//! token may fire; cancelling or rescheduling retires every earlier token.

/// Token identifying one scheduled timer.
pub type TimerToken = u64;

#[derive(Debug, Default)]
pub struct TimerSlot<H = i32> {
    generation: TimerToken,
    handle: Option<H>,
}

impl<H> TimerSlot<H> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            generation: 0,
            handle: None,
        }
    }

    /// Start scheduling a new timer.
    ///
    /// Returns the token for the new callback and the handle of the timer it
    /// replaces, which the caller should clear.
    pub fn schedule(&mut self) -> (TimerToken, Option<H>) {
        let stale = self.cancel();
        (self.generation, stale)
    }

    /// Record the host handle for the timer scheduled with `token`.
    ///
    /// Returns `false` (and keeps nothing) if `token` was already retired.
    pub fn armed(&mut self, token: TimerToken, handle: H) -> bool {
        if token != self.generation {
            return false;
        }
        self.handle = Some(handle);
        true
    }

    /// A timer callback ran. Returns `true` if it is the current timer.
    pub fn fire(&mut self, token: TimerToken) -> bool {
        if token != self.generation || self.handle.is_none() {
            return false;
        }
        self.handle = None;
        true
    }

    /// Retire the current timer. Returns its handle for the host to clear.
    pub fn cancel(&mut self) -> Option<H> {
        self.generation = self.generation.wrapping_add(1);
        self.handle.take()
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.handle.is_some()
    }
}
