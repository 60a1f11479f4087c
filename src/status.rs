//! Application status as reported by the state service, and the decision
//! function turning it into a [`LedState`].

use serde::Deserialize;

use crate::color::LedState;

/// Snapshot of one application's window state.
///
/// Everything except `target` is optional on the wire; missing fields read
/// as "not running" and zero counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppStatus {
    pub target: String,
    pub running: bool,
    pub focused: Option<bool>,
    pub window_count: Option<u32>,
    pub minimized_count: Option<u32>,
    pub visible_count: Option<u32>,
    pub all_minimized: Option<bool>,
    pub has_visible_windows: Option<bool>,
}

impl AppStatus {
    /// Status of an application that is not running
    pub fn stopped(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    /// Status of a running application with one visible window
    pub fn visible(target: impl Into<String>, focused: bool) -> Self {
        Self {
            target: target.into(),
            running: true,
            focused: Some(focused),
            window_count: Some(1),
            visible_count: Some(1),
            has_visible_windows: Some(true),
            ..Self::default()
        }
    }

    /// Status of a running application whose windows are all minimized
    pub fn minimized(target: impl Into<String>, windows: u32) -> Self {
        Self {
            target: target.into(),
            running: true,
            focused: Some(false),
            window_count: Some(windows),
            minimized_count: Some(windows),
            visible_count: Some(0),
            all_minimized: Some(true),
            has_visible_windows: Some(false),
        }
    }

    fn is_all_minimized(&self) -> bool {
        if let Some(all) = self.all_minimized {
            return all;
        }
        let windows = self.window_count.unwrap_or(0);
        let minimized = self.minimized_count.unwrap_or(0);
        windows > 0 && minimized >= windows
    }

    fn has_windows(&self) -> bool {
        self.has_visible_windows.unwrap_or(false)
            || self.visible_count.unwrap_or(0) > 0
            || self.window_count.unwrap_or(0) > 0
    }

    /// Derive the displayed state.
    ///
    /// Order matters: "all minimized" is checked before "has visible
    /// windows", so a payload claiming both shows as minimized.
    pub fn led_state(&self) -> LedState {
        if !self.running {
            return LedState::AssignedStopped;
        }
        if self.is_all_minimized() {
            return LedState::Minimized;
        }
        if self.has_windows() {
            return if self.focused.unwrap_or(false) {
                LedState::RunningFocused
            } else {
                LedState::RunningBackground
            };
        }
        LedState::AssignedStopped
    }
}
