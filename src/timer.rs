//! Cancellable one-shot timers.
//!
//! A [`TimerQueue`] stores pending deadlines together with a payload that
//! tells the owner what to do when the deadline passes. Nothing here sleeps:
//! the owner asks for [`TimerQueue::next_deadline`], waits however it likes
//! and then drains [`TimerQueue::pop_due`].

use std::collections::{BTreeMap, HashMap};

use embassy_time::{Duration, Instant};

/// Handle of a scheduled timer.
///
/// Handles are never reused within one queue, so cancelling a stale handle
/// cannot hit a newer timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// Deadline-ordered queue of pending timers
///
/// Timers sharing a deadline fire in the order they were scheduled.
#[derive(Debug)]
pub struct TimerQueue<T> {
    entries: BTreeMap<(Instant, u64), T>,
    deadlines: HashMap<u64, Instant>,
    next_id: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            deadlines: HashMap::new(),
            next_id: 0,
        }
    }

    /// Schedule `value` to fire at `deadline`
    pub fn schedule_at(&mut self, deadline: Instant, value: T) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert((deadline, id), value);
        self.deadlines.insert(id, deadline);
        TimerHandle(id)
    }

    /// Schedule `value` to fire `delay` after `now`
    pub fn schedule_after(&mut self, now: Instant, delay: Duration, value: T) -> TimerHandle {
        self.schedule_at(now + delay, value)
    }

    /// Cancel a pending timer, returning its payload.
    ///
    /// Returns `None` if the timer already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> Option<T> {
        let deadline = self.deadlines.remove(&handle.0)?;
        self.entries.remove(&(deadline, handle.0))
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.deadlines.contains_key(&handle.0)
    }

    /// Deadline of a pending timer
    pub fn deadline(&self, handle: TimerHandle) -> Option<Instant> {
        self.deadlines.get(&handle.0).copied()
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.first_key_value().map(|((deadline, _), _)| *deadline)
    }

    /// Pop the earliest timer whose deadline is at or before `now`
    pub fn pop_due(&mut self, now: Instant) -> Option<(TimerHandle, T)> {
        let (&(deadline, id), _) = self.entries.first_key_value()?;
        if deadline > now {
            return None;
        }
        self.deadlines.remove(&id);
        let value = self.entries.remove(&(deadline, id))?;
        Some((TimerHandle(id), value))
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.entries.clear();
        self.deadlines.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
