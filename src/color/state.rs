//! Logical LED states and their colors

use crate::color::Color;

const STATE_NAME_UNASSIGNED: &str = "unassigned";
const STATE_NAME_ASSIGNED_STOPPED: &str = "assigned_stopped";
const STATE_NAME_RUNNING_BACKGROUND: &str = "running_background";
const STATE_NAME_RUNNING_FOCUSED: &str = "running_focused";
const STATE_NAME_MINIMIZED: &str = "minimized";
const STATE_NAME_LAUNCHING: &str = "launching";
const STATE_NAME_FOCUSING: &str = "focusing";
const STATE_NAME_MINIMIZING: &str = "minimizing";
const STATE_NAME_QUITTING: &str = "quitting";
const STATE_NAME_ERROR: &str = "error";

const STATE_ID_UNASSIGNED: u8 = 0;
const STATE_ID_ASSIGNED_STOPPED: u8 = 1;
const STATE_ID_RUNNING_BACKGROUND: u8 = 2;
const STATE_ID_RUNNING_FOCUSED: u8 = 3;
const STATE_ID_MINIMIZED: u8 = 4;
const STATE_ID_LAUNCHING: u8 = 5;
const STATE_ID_FOCUSING: u8 = 6;
const STATE_ID_MINIMIZING: u8 = 7;
const STATE_ID_QUITTING: u8 = 8;
const STATE_ID_ERROR: u8 = 9;

/// Symbolic state a pad can display.
///
/// The first five describe the application behind the pad, the transitional
/// ones are shown while an action is in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LedState {
    #[default]
    Unassigned = STATE_ID_UNASSIGNED,
    AssignedStopped = STATE_ID_ASSIGNED_STOPPED,
    RunningBackground = STATE_ID_RUNNING_BACKGROUND,
    RunningFocused = STATE_ID_RUNNING_FOCUSED,
    Minimized = STATE_ID_MINIMIZED,
    Launching = STATE_ID_LAUNCHING,
    Focusing = STATE_ID_FOCUSING,
    Minimizing = STATE_ID_MINIMIZING,
    Quitting = STATE_ID_QUITTING,
    Error = STATE_ID_ERROR,
}

impl LedState {
    /// Decode a raw state id. Unknown ids fall back to `Unassigned`.
    pub const fn from_raw(value: u8) -> Self {
        match value {
            STATE_ID_ASSIGNED_STOPPED => Self::AssignedStopped,
            STATE_ID_RUNNING_BACKGROUND => Self::RunningBackground,
            STATE_ID_RUNNING_FOCUSED => Self::RunningFocused,
            STATE_ID_MINIMIZED => Self::Minimized,
            STATE_ID_LAUNCHING => Self::Launching,
            STATE_ID_FOCUSING => Self::Focusing,
            STATE_ID_MINIMIZING => Self::Minimizing,
            STATE_ID_QUITTING => Self::Quitting,
            STATE_ID_ERROR => Self::Error,
            _ => Self::Unassigned,
        }
    }

    /// Parse a state name. Unknown names fall back to `Unassigned`.
    pub fn parse_from_str(s: &str) -> Self {
        match s {
            STATE_NAME_ASSIGNED_STOPPED => Self::AssignedStopped,
            STATE_NAME_RUNNING_BACKGROUND => Self::RunningBackground,
            STATE_NAME_RUNNING_FOCUSED => Self::RunningFocused,
            STATE_NAME_MINIMIZED => Self::Minimized,
            STATE_NAME_LAUNCHING => Self::Launching,
            STATE_NAME_FOCUSING => Self::Focusing,
            STATE_NAME_MINIMIZING => Self::Minimizing,
            STATE_NAME_QUITTING => Self::Quitting,
            STATE_NAME_ERROR => Self::Error,
            _ => Self::Unassigned,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unassigned => STATE_NAME_UNASSIGNED,
            Self::AssignedStopped => STATE_NAME_ASSIGNED_STOPPED,
            Self::RunningBackground => STATE_NAME_RUNNING_BACKGROUND,
            Self::RunningFocused => STATE_NAME_RUNNING_FOCUSED,
            Self::Minimized => STATE_NAME_MINIMIZED,
            Self::Launching => STATE_NAME_LAUNCHING,
            Self::Focusing => STATE_NAME_FOCUSING,
            Self::Minimizing => STATE_NAME_MINIMIZING,
            Self::Quitting => STATE_NAME_QUITTING,
            Self::Error => STATE_NAME_ERROR,
        }
    }

    /// Color shown for this state
    pub const fn color(self) -> Color {
        match self {
            Self::Unassigned => Color::OFF,
            Self::AssignedStopped => Color::RED_DIM,
            Self::RunningBackground => Color::GREEN_DIM,
            Self::RunningFocused => Color::GREEN,
            Self::Minimized => Color::AMBER_DIM,
            Self::Launching => Color::AMBER,
            Self::Focusing => Color::GREEN_MID,
            Self::Minimizing => Color::YELLOW,
            Self::Quitting => Color::ORANGE,
            Self::Error => Color::RED,
        }
    }

    /// Whether the state describes an action in flight rather than an app.
    pub const fn is_transitional(self) -> bool {
        matches!(
            self,
            Self::Launching | Self::Focusing | Self::Minimizing | Self::Quitting
        )
    }
}
