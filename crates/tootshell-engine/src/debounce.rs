//! Trailing-edge debouncing with explicit time.
//!
//! Callers pass `now` into every operation, which lets tests advance time
//! deterministically and lets an event loop compute its next wake-up from
//! [`Debouncer::deadline`].

use std::time::{Duration, Instant};

/// Coalesces a burst of calls into one delayed firing carrying the last
/// value.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    /// Create a debouncer with the given delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// The configured delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a call, replacing any pending value and restarting the delay.
    pub fn call(&mut self, value: T, now: Instant) {
        self.pending = Some((now + self.delay, value));
    }

    /// Fire the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if now >= *deadline => self.pending.take().map(|(_, v)| v),
            _ => None,
        }
    }

    /// When the pending value will fire.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    /// Whether a call is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending call without firing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
