//! Monotonic time sources.
//!
//! Every component takes `now` explicitly; the clock only lives at the edge
//! where the event loop samples it.

use core::cell::Cell;

use embassy_time::{Duration, Instant};

/// Source of monotonic timestamps
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Process-wide monotonic clock backed by the embassy-time std driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock for deterministic tests and replays.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<Instant>,
}

impl ManualClock {
    pub const fn new(start: Instant) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Jump to `instant`. Moving backwards is ignored.
    pub fn set(&self, instant: Instant) {
        if instant > self.now.get() {
            self.now.set(instant);
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Instant::from_millis(0))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}
