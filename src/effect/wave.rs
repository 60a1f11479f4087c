//! Boot wave
//!
//! Every pad oscillates between a dim and a bright color. Pads are split
//! into eight groups by id and each group lags the previous one by the
//! stagger, which reads as a wave rolling across the grid. The wave runs
//! once per color pair, then holds the last bright color before the engine
//! turns everything off.

use core::f32::consts::TAU;

use embassy_time::Duration;
use heapless::Vec;

use super::{AnimationOptions, Effect, Progress, millis_or};
use crate::PadId;
use crate::color::{Color, WAVE_PAIRS, WavePair, blend_colors};
use crate::frame_pacer::DEFAULT_FRAME_DURATION;

const DEFAULT_TOTAL_MS: u64 = 2_400;
const DEFAULT_PERIOD_MS: u64 = 900;
const DEFAULT_STAGGER_MS: u64 = 70;
const DEFAULT_HOLD_MS: u64 = 250;

/// Number of stagger groups
const GROUPS: u8 = 8;

/// Maximum number of color pairs per wave
pub const MAX_WAVE_PAIRS: usize = 4;

const _: () = assert!(WAVE_PAIRS.len() <= MAX_WAVE_PAIRS);

#[derive(Debug, Clone)]
pub struct WaveEffect {
    pairs: Vec<WavePair, MAX_WAVE_PAIRS>,
    /// Length of one color pair's phase
    phase_duration: Duration,
    period: Duration,
    stagger: Duration,
    hold: Duration,
    frame_duration: Duration,
}

impl Default for WaveEffect {
    fn default() -> Self {
        Self::from_options(&AnimationOptions::default())
    }
}

impl WaveEffect {
    /// Build the default boot wave, tuned by `options`
    pub fn from_options(options: &AnimationOptions) -> Self {
        let pairs = Vec::from_slice(&WAVE_PAIRS).unwrap_or_default();
        Self::with_pairs(pairs, options)
    }

    /// Build a wave over custom color pairs
    #[allow(clippy::cast_possible_truncation)]
    pub fn with_pairs(pairs: Vec<WavePair, MAX_WAVE_PAIRS>, options: &AnimationOptions) -> Self {
        let total = millis_or(options.total_duration_ms, DEFAULT_TOTAL_MS);
        let phase_count = pairs.len().max(1) as u32;
        Self {
            pairs,
            phase_duration: total / phase_count,
            period: millis_or(options.period_ms, DEFAULT_PERIOD_MS),
            stagger: Duration::from_millis(options.stagger_ms.unwrap_or(DEFAULT_STAGGER_MS)),
            hold: Duration::from_millis(options.final_hold_ms.unwrap_or(DEFAULT_HOLD_MS)),
            frame_duration: options
                .step_ms
                .filter(|&ms| ms > 0)
                .map_or(DEFAULT_FRAME_DURATION, Duration::from_millis),
        }
    }

    /// Wave phases plus the final hold
    pub fn total_duration(&self) -> Duration {
        self.waves_duration() + self.hold
    }

    #[allow(clippy::cast_possible_truncation)]
    fn waves_duration(&self) -> Duration {
        self.phase_duration * self.pairs.len() as u32
    }

    /// Blend amount (0 = dim, 255 = bright) of `pad` at `elapsed`
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn level(&self, elapsed: Duration, pad: PadId) -> u8 {
        let period_ms = self.period.as_millis().max(1);
        let offset_ms = self.stagger.as_millis() * u64::from(pad % GROUPS);
        let phase = ((elapsed.as_millis() + offset_ms) % period_ms) as f32 / period_ms as f32;
        let level = 0.5 - 0.5 * libm::cosf(TAU * phase);
        libm::roundf(level.clamp(0.0, 1.0) * 255.0) as u8
    }
}

impl Effect for WaveEffect {
    #[allow(clippy::cast_possible_truncation)]
    fn render(
        &mut self,
        elapsed: Duration,
        pads: &[PadId],
        frame: &mut [Option<Color>],
    ) -> Progress {
        let Some(last) = self.pairs.last().copied() else {
            return Progress::Finished;
        };

        if elapsed < self.waves_duration() {
            let index = (elapsed.as_ticks() / self.phase_duration.as_ticks().max(1)) as usize;
            let pair = self.pairs.get(index).copied().unwrap_or(last);
            for (slot, &pad) in frame.iter_mut().zip(pads) {
                *slot = Some(blend_colors(pair.dim, pair.bright, self.level(elapsed, pad)));
            }
            return Progress::Running;
        }

        if elapsed < self.total_duration() {
            frame.fill(Some(last.bright));
            return Progress::Running;
        }

        Progress::Finished
    }

    fn frame_duration(&self) -> Duration {
        self.frame_duration
    }
}
