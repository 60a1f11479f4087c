//! Shutdown ripple
//!
//! A head walks across the pads in id order, dragging a trail of fading
//! colors behind it. Pads that fall out of the trail are switched off, so
//! after the head has left the grid every pad is dark again.

use embassy_time::Duration;
use heapless::Vec;

use super::{AnimationOptions, Effect, Progress, millis_or};
use crate::PadId;
use crate::color::{Color, TRAIL_PALETTE};

const DEFAULT_STEP_MS: u64 = 35;
const DEFAULT_PASSES: u32 = 2;
const DEFAULT_PAUSE_MS: u64 = 120;
const DEFAULT_HOLD_MS: u64 = 200;

/// Longest supported trail
pub const MAX_TRAIL: usize = 8;

const _: () = assert!(TRAIL_PALETTE.len() <= MAX_TRAIL);

#[derive(Debug, Clone)]
pub struct RippleEffect {
    /// Trail colors, head first
    trail: Vec<Color, MAX_TRAIL>,
    passes: u32,
    step: Duration,
    pause: Duration,
    hold: Duration,
}

impl Default for RippleEffect {
    fn default() -> Self {
        Self::from_options(&AnimationOptions::default())
    }
}

impl RippleEffect {
    pub fn from_options(options: &AnimationOptions) -> Self {
        let length = options
            .trail
            .unwrap_or(TRAIL_PALETTE.len())
            .clamp(1, TRAIL_PALETTE.len());
        let trail = Vec::from_slice(&TRAIL_PALETTE[..length]).unwrap_or_default();
        Self {
            trail,
            passes: options.passes.unwrap_or(DEFAULT_PASSES).max(1),
            step: millis_or(options.step_ms, DEFAULT_STEP_MS),
            pause: Duration::from_millis(DEFAULT_PAUSE_MS),
            hold: Duration::from_millis(options.final_hold_ms.unwrap_or(DEFAULT_HOLD_MS)),
        }
    }

    pub fn trail(&self) -> &[Color] {
        &self.trail
    }

    /// Duration of one sweep over `pad_count` pads
    #[allow(clippy::cast_possible_truncation)]
    pub fn sweep_duration(&self, pad_count: usize) -> Duration {
        self.step * (pad_count + self.trail.len()) as u32
    }

    /// All sweeps with their pauses, excluding the final hold
    pub fn sweeps_duration(&self, pad_count: usize) -> Duration {
        self.sweep_duration(pad_count) * self.passes + self.pause * (self.passes - 1)
    }

    /// Color of the pad at `position` while the head is at `head`
    fn color_at(&self, head: usize, position: usize) -> Option<Color> {
        let behind = head.checked_sub(position)?;
        Some(self.trail.get(behind).copied().unwrap_or(Color::OFF))
    }
}

impl Effect for RippleEffect {
    #[allow(clippy::cast_possible_truncation)]
    fn render(
        &mut self,
        elapsed: Duration,
        pads: &[PadId],
        frame: &mut [Option<Color>],
    ) -> Progress {
        let sweeps = self.sweeps_duration(pads.len());
        if elapsed >= sweeps {
            frame.fill(Some(Color::OFF));
            return if elapsed >= sweeps + self.hold {
                Progress::Finished
            } else {
                Progress::Running
            };
        }

        let sweep_ms = self.sweep_duration(pads.len()).as_millis();
        let pass_ms = sweep_ms + self.pause.as_millis();
        let offset_ms = elapsed.as_millis() % pass_ms.max(1);
        if offset_ms >= sweep_ms {
            // Between passes
            frame.fill(Some(Color::OFF));
            return Progress::Running;
        }

        let head = (offset_ms / self.step.as_millis().max(1)) as usize;
        for (position, slot) in frame.iter_mut().enumerate() {
            *slot = self.color_at(head, position);
        }
        Progress::Running
    }

    fn frame_duration(&self) -> Duration {
        self.step
    }
}
