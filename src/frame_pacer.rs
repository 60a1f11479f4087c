//! Frame pacing for animations.
//!
//! Animations are evaluated from the time elapsed since they started, not
//! by accumulating per-frame deltas, so a late wakeup never skews the
//! schedule. The pacer only decides when the next frame is due.

use embassy_time::{Duration, Instant};

/// Default animation frame rate (~45 FPS).
pub const DEFAULT_FPS: u64 = 45;

/// Default frame duration based on target FPS.
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(1000 / DEFAULT_FPS);

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// Time since the pacer was started.
    pub elapsed: Duration,
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
}

/// Recurring frame deadlines with drift correction.
///
/// If the caller falls behind by more than two frames, the backlog is
/// skipped instead of replayed in a catch-up burst.
#[derive(Debug, Clone)]
pub struct FramePacer {
    started_at: Instant,
    next_frame: Instant,
    frame_duration: Duration,
}

impl FramePacer {
    /// Create a pacer whose first frame is due immediately.
    pub fn new(now: Instant, frame_duration: Duration) -> Self {
        let frame_duration = if frame_duration.as_millis() == 0 {
            DEFAULT_FRAME_DURATION
        } else {
            frame_duration
        };
        Self {
            started_at: now,
            next_frame: now,
            frame_duration,
        }
    }

    pub const fn started_at(&self) -> Instant {
        self.started_at
    }

    pub const fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Deadline of the next frame
    pub const fn next_deadline(&self) -> Instant {
        self.next_frame
    }

    /// Time since start, saturating at zero for timestamps before start.
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.checked_duration_since(self.started_at)
            .unwrap_or(Duration::from_millis(0))
    }

    /// Consume one frame and return timing information.
    ///
    /// The caller renders using `elapsed` and waits until `next_deadline`
    /// before calling `tick` again.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        let max_drift = self.frame_duration * 2;
        if now > self.next_frame + max_drift {
            self.next_frame = now;
        }

        self.next_frame += self.frame_duration;

        let sleep_duration = self
            .next_frame
            .checked_duration_since(now)
            .unwrap_or(Duration::from_millis(0));

        FrameResult {
            elapsed: self.elapsed(now),
            next_deadline: self.next_frame,
            sleep_duration,
        }
    }
}
