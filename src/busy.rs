//! Busy windows: short "do not repaint" leases per pad.
//!
//! Whoever is about to animate a pad marks it busy for the length of the
//! visual, and the sync loop leaves it alone until the lease runs out.
//! Expired leases are dropped lazily when they are read.

use std::collections::HashMap;

use embassy_time::{Duration, Instant};

use crate::PadId;

/// Registry of busy deadlines keyed by pad
#[derive(Debug, Default)]
pub struct BusyRegistry {
    until: HashMap<PadId, Instant>,
}

impl BusyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `pad` busy until `now + duration`.
    ///
    /// Overwrites any earlier lease, even a longer one. A zero duration is
    /// ignored.
    pub fn mark_busy(&mut self, pad: PadId, duration: Duration, now: Instant) {
        if duration.as_ticks() == 0 {
            return;
        }
        self.until.insert(pad, now + duration);
    }

    /// Check whether `pad` is still inside its busy window
    pub fn is_busy(&mut self, pad: PadId, now: Instant) -> bool {
        self.deadline(pad, now).is_some()
    }

    /// Time left in the busy window, zero when not busy
    pub fn remaining(&mut self, pad: PadId, now: Instant) -> Duration {
        self.deadline(pad, now)
            .and_then(|deadline| deadline.checked_duration_since(now))
            .unwrap_or(Duration::from_ticks(0))
    }

    /// Forget every busy window
    pub fn clear_all(&mut self) {
        self.until.clear();
    }

    /// Number of leases currently stored (expired ones included until read)
    pub fn len(&self) -> usize {
        self.until.len()
    }

    pub fn is_empty(&self) -> bool {
        self.until.is_empty()
    }

    fn deadline(&mut self, pad: PadId, now: Instant) -> Option<Instant> {
        let deadline = *self.until.get(&pad)?;
        if now <= deadline {
            return Some(deadline);
        }
        self.until.remove(&pad);
        None
    }
}
