//! Controller configuration.
//!
//! Every section has defaults, so an empty document is a valid config.
//! Durations are given in milliseconds.
//!
//! ```toml
//! grid = [0, 1, 2, 3]
//!
//! [gestures]
//! double_tap_ms = 480
//!
//! [pads]
//! 0 = "Safari"
//! 1 = "Terminal"
//! ```

use std::collections::BTreeMap;

use embassy_time::Duration;
use serde::Deserialize;

use crate::PadId;
use crate::controller::FeedbackTimings;
use crate::effect::AnimationOptions;
use crate::error::ConfigError;
use crate::gesture::GestureTimings;
use crate::sync::{PadMapping, SyncConfig};

/// Side length of the default square grid
const GRID_SIDE: u8 = 8;
/// Note distance between two rows of the default grid
const GRID_ROW_STRIDE: u8 = 16;

/// Upper bound of every millisecond setting (one hour)
pub const MAX_TIMING_MS: u64 = 3_600_000;
/// Upper bound of ripple passes and blink cycles
pub const MAX_REPEATS: u32 = 16;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GestureSettings {
    pub double_tap_ms: u64,
    pub long_press_ms: u64,
    pub bounce_ms: u64,
    pub cooldown_ms: u64,
}

impl Default for GestureSettings {
    fn default() -> Self {
        let timings = GestureTimings::default();
        Self {
            double_tap_ms: timings.double_tap.as_millis(),
            long_press_ms: timings.long_press.as_millis(),
            bounce_ms: timings.bounce.as_millis(),
            cooldown_ms: timings.cooldown.as_millis(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    pub interval_ms: u64,
    pub poke_delay_ms: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        let config = SyncConfig::default();
        Self {
            interval_ms: config.interval.as_millis(),
            poke_delay_ms: config.poke_delay.as_millis(),
        }
    }
}

/// How long each action blinks its pad
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FeedbackSettings {
    pub launch_ms: u64,
    pub focus_ms: u64,
    pub minimize_ms: u64,
    pub close_ms: u64,
    pub error_ms: u64,
    /// Full on/off period of the feedback blinks
    pub period_ms: u64,
}

impl Default for FeedbackSettings {
    fn default() -> Self {
        let timings = FeedbackTimings::default();
        Self {
            launch_ms: timings.launch.as_millis(),
            focus_ms: timings.focus.as_millis(),
            minimize_ms: timings.minimize.as_millis(),
            close_ms: timings.close.as_millis(),
            error_ms: timings.error.as_millis(),
            period_ms: timings.period.as_millis(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub gestures: GestureSettings,
    pub sync: SyncSettings,
    pub feedback: FeedbackSettings,
    pub boot: AnimationOptions,
    pub shutdown: AnimationOptions,
    /// Every addressable pad
    pub grid: Vec<PadId>,
    /// Pad number to application target
    pub pads: BTreeMap<String, String>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            gestures: GestureSettings::default(),
            sync: SyncSettings::default(),
            feedback: FeedbackSettings::default(),
            boot: AnimationOptions {
                use_all_pads: true,
                ..AnimationOptions::default()
            },
            shutdown: AnimationOptions {
                use_all_pads: true,
                ..AnimationOptions::default()
            },
            grid: default_grid(),
            pads: BTreeMap::new(),
        }
    }
}

impl ControllerConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_bounds()?;
        let gestures = &self.gestures;
        if gestures.long_press_ms == 0 {
            return Err(invalid("gestures.long_press_ms", "must be positive"));
        }
        if gestures.bounce_ms >= gestures.long_press_ms {
            return Err(invalid("gestures.bounce_ms", "must be shorter than long_press_ms"));
        }
        if gestures.double_tap_ms <= gestures.bounce_ms {
            return Err(invalid("gestures.double_tap_ms", "must be longer than bounce_ms"));
        }
        if self.sync.interval_ms == 0 {
            return Err(invalid("sync.interval_ms", "must be positive"));
        }
        if self.feedback.period_ms < 2 {
            return Err(invalid("feedback.period_ms", "must be at least 2"));
        }
        self.mapping().map(|_| ())
    }

    /// Reject values large enough to overflow deadline arithmetic
    fn validate_bounds(&self) -> Result<(), ConfigError> {
        let gestures = &self.gestures;
        let feedback = &self.feedback;
        let timings = [
            ("gestures.double_tap_ms", gestures.double_tap_ms),
            ("gestures.long_press_ms", gestures.long_press_ms),
            ("gestures.bounce_ms", gestures.bounce_ms),
            ("gestures.cooldown_ms", gestures.cooldown_ms),
            ("sync.interval_ms", self.sync.interval_ms),
            ("sync.poke_delay_ms", self.sync.poke_delay_ms),
            ("feedback.launch_ms", feedback.launch_ms),
            ("feedback.focus_ms", feedback.focus_ms),
            ("feedback.minimize_ms", feedback.minimize_ms),
            ("feedback.close_ms", feedback.close_ms),
            ("feedback.error_ms", feedback.error_ms),
            ("feedback.period_ms", feedback.period_ms),
        ];
        for (field, value) in timings {
            if value > MAX_TIMING_MS {
                return Err(invalid(field, "must not exceed one hour"));
            }
        }
        validate_animation("boot", &self.boot)?;
        validate_animation("shutdown", &self.shutdown)
    }

    pub fn gesture_timings(&self) -> GestureTimings {
        GestureTimings {
            double_tap: Duration::from_millis(self.gestures.double_tap_ms),
            long_press: Duration::from_millis(self.gestures.long_press_ms),
            bounce: Duration::from_millis(self.gestures.bounce_ms),
            cooldown: Duration::from_millis(self.gestures.cooldown_ms),
        }
    }

    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            interval: Duration::from_millis(self.sync.interval_ms),
            poke_delay: Duration::from_millis(self.sync.poke_delay_ms),
        }
    }

    pub fn feedback_timings(&self) -> FeedbackTimings {
        FeedbackTimings {
            launch: Duration::from_millis(self.feedback.launch_ms),
            focus: Duration::from_millis(self.feedback.focus_ms),
            minimize: Duration::from_millis(self.feedback.minimize_ms),
            close: Duration::from_millis(self.feedback.close_ms),
            error: Duration::from_millis(self.feedback.error_ms),
            period: Duration::from_millis(self.feedback.period_ms),
        }
    }

    /// Pad mapping with numeric pad ids
    pub fn mapping(&self) -> Result<PadMapping, ConfigError> {
        self.pads
            .iter()
            .map(|(pad, target)| {
                let pad = pad
                    .trim()
                    .parse::<PadId>()
                    .map_err(|_| invalid("pads", "keys must be pad numbers (0-255)"))?;
                if target.trim().is_empty() {
                    return Err(invalid("pads", "targets must not be empty"));
                }
                Ok((pad, target.clone()))
            })
            .collect()
    }
}

/// Launchpad-style 8x8 grid: rows are 16 notes apart
pub fn default_grid() -> Vec<PadId> {
    (0..GRID_SIDE)
        .flat_map(|row| (0..GRID_SIDE).map(move |col| row * GRID_ROW_STRIDE + col))
        .collect()
}

fn validate_animation(section: &'static str, options: &AnimationOptions) -> Result<(), ConfigError> {
    let millis = [
        options.total_duration_ms,
        options.step_ms,
        options.final_hold_ms,
        options.period_ms,
        options.stagger_ms,
    ];
    if millis.into_iter().flatten().any(|ms| ms > MAX_TIMING_MS) {
        return Err(invalid(section, "animation timings must not exceed one hour"));
    }
    let repeats = [options.passes, options.cycles];
    if repeats.into_iter().flatten().any(|count| count > MAX_REPEATS) {
        return Err(invalid(section, "passes and cycles must not exceed 16"));
    }
    Ok(())
}

const fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
