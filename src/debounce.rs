//! Trailing-edge debouncing for preview refresh and search filtering.
//!
//! Time is passed in explicitly so callers drive it from whatever clock
//! they have, and tests can step it deterministically.

use std::time::{Duration, Instant};

/// Holds the latest request until `delay` has passed without a newer one.
///
/// Every [`request`](Self::request) cancels the pending one and restarts the
/// timer, so a burst of requests fires once, with the last value.
#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    /// Schedule `value`, replacing anything already pending
    pub fn request(&mut self, now: Instant, value: T) {
        self.pending = Some((now + self.delay, value));
    }

    /// Take the pending value once its deadline has passed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|(deadline, _)| now >= *deadline);
        if due { self.flush() } else { None }
    }

    /// Take the pending value immediately, ignoring the deadline
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(_, value)| value)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes due
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }
}
