//! Animation effects with compile-time known variants
//!
//! All effects are stored in an enum so the engine can hold any of them
//! without boxing. Effects are pure functions of the time elapsed since
//! they started; the engine owns pacing, ownership and device writes.

mod blink;
mod ripple;
mod wave;

use embassy_time::Duration;
use serde::Deserialize;

pub use blink::{BlinkEffect, BlinkLimit};
pub use ripple::RippleEffect;
pub use wave::WaveEffect;

use crate::PadId;
use crate::color::Color;

/// Whether an effect wants more frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Running,
    Finished,
}

pub trait Effect {
    /// Render a single frame.
    ///
    /// `frame[i]` belongs to `pads[i]`; `None` leaves that pad untouched.
    fn render(&mut self, elapsed: Duration, pads: &[PadId], frame: &mut [Option<Color>])
    -> Progress;

    /// Time between two frames
    fn frame_duration(&self) -> Duration;

    /// Color every target is left in when the effect ends or is cancelled
    fn terminal_color(&self) -> Color {
        Color::OFF
    }
}

/// Tunables accepted by the animation entry points.
///
/// Unset values fall back to the defaults of the effect being played.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AnimationOptions {
    /// Animate every pad of the grid instead of the given targets
    #[serde(alias = "useAllPads")]
    pub use_all_pads: bool,
    #[serde(alias = "totalDurationMs")]
    pub total_duration_ms: Option<u64>,
    /// Frame (wave, blink) or step (ripple) length
    #[serde(alias = "stepMs")]
    pub step_ms: Option<u64>,
    /// Number of trail colors behind the ripple head
    pub trail: Option<usize>,
    /// Ripple sweeps
    pub passes: Option<u32>,
    #[serde(alias = "finalHoldMs")]
    pub final_hold_ms: Option<u64>,
    /// Wave oscillation period, or full on/off period of a blink
    #[serde(alias = "periodMs")]
    pub period_ms: Option<u64>,
    /// Wave phase offset between neighbouring pad groups
    #[serde(alias = "staggerMs")]
    pub stagger_ms: Option<u64>,
    /// Blink cycle count, takes precedence over the total duration
    pub cycles: Option<u32>,
}

/// Which family an animation belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    Boot,
    Shutdown,
    Blink,
}

impl AnimationKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boot => "boot",
            Self::Shutdown => "shutdown",
            Self::Blink => "blink",
        }
    }
}

/// Effect slot - enum containing all possible effects
#[derive(Debug, Clone)]
pub enum EffectSlot {
    /// Phased boot wave
    Wave(WaveEffect),
    /// Shutdown sweep with a fading trail
    Ripple(RippleEffect),
    /// On/off pulse
    Blink(BlinkEffect),
}

impl EffectSlot {
    pub fn render(
        &mut self,
        elapsed: Duration,
        pads: &[PadId],
        frame: &mut [Option<Color>],
    ) -> Progress {
        match self {
            Self::Wave(effect) => effect.render(elapsed, pads, frame),
            Self::Ripple(effect) => effect.render(elapsed, pads, frame),
            Self::Blink(effect) => effect.render(elapsed, pads, frame),
        }
    }

    pub fn frame_duration(&self) -> Duration {
        match self {
            Self::Wave(effect) => effect.frame_duration(),
            Self::Ripple(effect) => effect.frame_duration(),
            Self::Blink(effect) => effect.frame_duration(),
        }
    }

    pub fn terminal_color(&self) -> Color {
        match self {
            Self::Wave(effect) => effect.terminal_color(),
            Self::Ripple(effect) => effect.terminal_color(),
            Self::Blink(effect) => effect.terminal_color(),
        }
    }

    /// Get the animation kind for external observation
    pub const fn kind(&self) -> AnimationKind {
        match self {
            Self::Wave(_) => AnimationKind::Boot,
            Self::Ripple(_) => AnimationKind::Shutdown,
            Self::Blink(_) => AnimationKind::Blink,
        }
    }
}

/// Resolve an optional millisecond value, treating zero as unset
fn millis_or(value: Option<u64>, default: u64) -> Duration {
    Duration::from_millis(value.filter(|&ms| ms > 0).unwrap_or(default))
}
