//! Gesture decoding
//!
//! Turns raw down/up signals into one semantic event per interaction:
//! single press, double tap or long press. Bounces shorter than
//! [`GestureTimings::bounce`] are ignored.
//!
//! A single press is reported as soon as the pad is released; a second tap
//! inside the double-tap window then reports a double tap on top of it.

use std::collections::HashMap;

use embassy_time::{Duration, Instant};
use tracing::trace;

use crate::PadId;
use crate::timer::{TimerHandle, TimerQueue};

pub const DEFAULT_DOUBLE_TAP: Duration = Duration::from_millis(480);
pub const DEFAULT_LONG_PRESS: Duration = Duration::from_millis(800);
pub const DEFAULT_BOUNCE: Duration = Duration::from_millis(28);

/// Timing thresholds for gesture decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureTimings {
    /// Maximum gap between two releases that still counts as a double tap
    pub double_tap: Duration,
    /// Hold time after which a long press fires
    pub long_press: Duration,
    /// Presses shorter than this are contact noise
    pub bounce: Duration,
    /// Minimum gap between two events of one pad, zero to disable
    pub cooldown: Duration,
}

impl Default for GestureTimings {
    fn default() -> Self {
        Self {
            double_tap: DEFAULT_DOUBLE_TAP,
            long_press: DEFAULT_LONG_PRESS,
            bounce: DEFAULT_BOUNCE,
            cooldown: Duration::from_ticks(0),
        }
    }
}

/// Kind of a decoded gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    SinglePress,
    DoubleTap,
    LongPress,
}

/// Decoded gesture of one pad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureEvent {
    pub pad: PadId,
    pub kind: GestureKind,
}

#[derive(Debug, Default)]
struct PadTiming {
    down_at: Option<Instant>,
    long_press: Option<TimerHandle>,
    last_release: Option<Instant>,
    last_emit: Option<Instant>,
}

impl PadTiming {
    fn is_idle(&self, now: Instant, timings: &GestureTimings) -> bool {
        let lapsed = |at: Option<Instant>, window: Duration| {
            at.is_none_or(|at| now.checked_duration_since(at).is_some_and(|d| d > window))
        };
        self.down_at.is_none()
            && self.long_press.is_none()
            && lapsed(self.last_release, timings.double_tap)
            && lapsed(self.last_emit, timings.cooldown)
    }
}

/// Per-pad press/release state machine
#[derive(Debug)]
pub struct GestureDecoder {
    timings: GestureTimings,
    pads: HashMap<PadId, PadTiming>,
    timers: TimerQueue<PadId>,
    last_prune: Option<Instant>,
}

impl GestureDecoder {
    pub fn new(timings: GestureTimings) -> Self {
        Self {
            timings,
            pads: HashMap::new(),
            timers: TimerQueue::new(),
            last_prune: None,
        }
    }

    pub const fn timings(&self) -> &GestureTimings {
        &self.timings
    }

    /// Handle a pad going down.
    ///
    /// A repeated down without an up replaces the pending long-press timer.
    pub fn on_down(&mut self, pad: PadId, now: Instant) {
        let timing = self.pads.entry(pad).or_default();
        if let Some(stale) = timing.long_press.take() {
            self.timers.cancel(stale);
        }
        timing.down_at = Some(now);
        timing.long_press = Some(self.timers.schedule_after(now, self.timings.long_press, pad));
        trace!(pad, "pad down");
    }

    /// Handle a pad going up, returning the decoded gesture if any.
    pub fn on_up(&mut self, pad: PadId, now: Instant) -> Option<GestureEvent> {
        let timing = self.pads.get_mut(&pad)?;
        let down_at = timing.down_at.take()?;
        let held = now
            .checked_duration_since(down_at)
            .unwrap_or(Duration::from_ticks(0));

        if held < self.timings.bounce {
            if let Some(timer) = timing.long_press.take() {
                self.timers.cancel(timer);
            }
            trace!(pad, held_ms = held.as_millis(), "bounce ignored");
            return None;
        }

        // No pending timer means the long press already fired for this hold.
        let timer = timing.long_press.take()?;
        self.timers.cancel(timer);

        // Down and up drained in one batch: the timer never had a chance to
        // fire, but the hold was long enough.
        if held >= self.timings.long_press {
            timing.last_release = None;
            timing.last_emit = Some(now);
            trace!(pad, held_ms = held.as_millis(), "long press on release");
            return Some(GestureEvent {
                pad,
                kind: GestureKind::LongPress,
            });
        }

        let cooldown = self.timings.cooldown;
        if cooldown.as_ticks() > 0 {
            let cooling = timing
                .last_emit
                .and_then(|at| now.checked_duration_since(at))
                .is_some_and(|since| since < cooldown);
            if cooling {
                trace!(pad, "release inside cooldown ignored");
                return None;
            }
        }

        let is_double = timing
            .last_release
            .and_then(|at| now.checked_duration_since(at))
            .is_some_and(|since| since <= self.timings.double_tap);

        let kind = if is_double {
            // A double tap consumes both releases.
            timing.last_release = None;
            GestureKind::DoubleTap
        } else {
            timing.last_release = Some(now);
            GestureKind::SinglePress
        };
        timing.last_emit = Some(now);

        trace!(pad, ?kind, held_ms = held.as_millis(), "gesture");
        Some(GestureEvent { pad, kind })
    }

    /// Fire due long-press timers.
    ///
    /// Call repeatedly until it returns `None`.
    pub fn poll(&mut self, now: Instant) -> Option<GestureEvent> {
        while let Some((handle, pad)) = self.timers.pop_due(now) {
            let Some(timing) = self.pads.get_mut(&pad) else {
                continue;
            };
            if timing.long_press != Some(handle) {
                continue;
            }
            timing.long_press = None;
            timing.last_release = None;
            timing.last_emit = Some(now);
            trace!(pad, "long press");
            return Some(GestureEvent {
                pad,
                kind: GestureKind::LongPress,
            });
        }
        self.prune(now);
        None
    }

    /// Earliest pending long-press deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Abort the current press of `pad`.
    ///
    /// Double-tap memory survives so a transient device glitch does not
    /// break the feel of a double tap.
    pub fn cancel_pad(&mut self, pad: PadId) {
        if let Some(timing) = self.pads.get_mut(&pad) {
            if let Some(timer) = timing.long_press.take() {
                self.timers.cancel(timer);
            }
            timing.down_at = None;
        }
    }

    /// Forget all state of every pad
    pub fn reset(&mut self) {
        self.timers.clear();
        self.pads.clear();
        self.last_prune = None;
    }

    /// Whether `pad` is currently held down
    pub fn is_down(&self, pad: PadId) -> bool {
        self.pads.get(&pad).is_some_and(|timing| timing.down_at.is_some())
    }

    /// Number of pads with tracked state
    pub fn tracked_pads(&self) -> usize {
        self.pads.len()
    }

    /// Drop entries that no longer influence any decision.
    ///
    /// Runs at most once per double-tap window.
    fn prune(&mut self, now: Instant) {
        let due = self.last_prune.is_none_or(|at| {
            now.checked_duration_since(at)
                .is_some_and(|since| since >= self.timings.double_tap)
        });
        if !due {
            return;
        }
        self.last_prune = Some(now);
        let timings = self.timings;
        self.pads.retain(|_, timing| !timing.is_idle(now, &timings));
    }
}

impl Default for GestureDecoder {
    fn default() -> Self {
        Self::new(GestureTimings::default())
    }
}
