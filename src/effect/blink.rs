//! On/off pulse used to acknowledge actions and to flag errors

use embassy_time::Duration;

use super::{AnimationOptions, Effect, Progress, millis_or};
use crate::PadId;
use crate::color::Color;

const DEFAULT_PERIOD_MS: u64 = 240;
const DEFAULT_TOTAL_MS: u64 = 900;

/// When a blink stops on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkLimit {
    /// Stop after this much time
    Duration(Duration),
    /// Stop after this many on/off cycles
    Cycles(u32),
}

#[derive(Debug, Clone)]
pub struct BlinkEffect {
    on: Color,
    half_period: Duration,
    limit: BlinkLimit,
}

impl BlinkEffect {
    pub const fn new(on: Color, half_period: Duration, limit: BlinkLimit) -> Self {
        Self {
            on,
            half_period,
            limit,
        }
    }

    /// Blink `on` using the period and length from `options`
    pub fn from_options(on: Color, options: &AnimationOptions) -> Self {
        let period = millis_or(options.period_ms, DEFAULT_PERIOD_MS);
        let limit = match options.cycles {
            Some(cycles) if cycles > 0 => BlinkLimit::Cycles(cycles),
            _ => BlinkLimit::Duration(millis_or(options.total_duration_ms, DEFAULT_TOTAL_MS)),
        };
        Self::new(on, (period / 2).max(Duration::from_millis(1)), limit)
    }

    pub const fn color(&self) -> Color {
        self.on
    }

    /// How long the blink runs before stopping by itself
    pub fn total_duration(&self) -> Duration {
        match self.limit {
            BlinkLimit::Duration(duration) => duration,
            BlinkLimit::Cycles(cycles) => self.half_period * 2 * cycles,
        }
    }

    fn is_on(&self, elapsed: Duration) -> bool {
        let half = self.half_period.as_ticks().max(1);
        (elapsed.as_ticks() / half).is_multiple_of(2)
    }
}

impl Effect for BlinkEffect {
    fn render(
        &mut self,
        elapsed: Duration,
        _pads: &[PadId],
        frame: &mut [Option<Color>],
    ) -> Progress {
        if elapsed >= self.total_duration() {
            return Progress::Finished;
        }
        let color = if self.is_on(elapsed) {
            self.on
        } else {
            Color::OFF
        };
        frame.fill(Some(color));
        Progress::Running
    }

    fn frame_duration(&self) -> Duration {
        self.half_period
    }
}
