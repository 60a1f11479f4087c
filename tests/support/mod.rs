#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use launchgrid::{
    ActionService, AppStateService, AppStatus, Color, PadId, PadPort, PortError, ServiceError,
};

/// Pad port that records every successful write
#[derive(Debug, Default)]
pub struct RecordingPort {
    pub writes: Vec<(PadId, Color)>,
    pub failing: HashSet<PadId>,
}

impl RecordingPort {
    pub fn failing_on(pads: &[PadId]) -> Self {
        Self {
            writes: Vec::new(),
            failing: pads.iter().copied().collect(),
        }
    }

    /// Colors written to `pad`, in order
    pub fn writes_for(&self, pad: PadId) -> Vec<Color> {
        self.writes
            .iter()
            .filter(|(written, _)| *written == pad)
            .map(|(_, color)| *color)
            .collect()
    }

    pub fn last(&self, pad: PadId) -> Option<Color> {
        self.writes_for(pad).last().copied()
    }

    pub fn has_consecutive_duplicates(&self, pad: PadId) -> bool {
        self.writes_for(pad).windows(2).any(|pair| pair[0] == pair[1])
    }
}

impl PadPort for RecordingPort {
    fn set_pad(&mut self, pad: PadId, color: Color) -> Result<(), PortError> {
        if self.failing.contains(&pad) {
            return Err(PortError::Write {
                pad,
                reason: "simulated".to_string(),
            });
        }
        self.writes.push((pad, color));
        Ok(())
    }
}

/// App state service answering from a table
#[derive(Debug, Default)]
pub struct ScriptedAppState {
    pub statuses: HashMap<String, AppStatus>,
    pub fail: bool,
    pub calls: Vec<Vec<String>>,
}

impl ScriptedAppState {
    pub fn set(&mut self, status: AppStatus) {
        self.statuses.insert(status.target.clone(), status);
    }
}

impl AppStateService for ScriptedAppState {
    fn get_states_bulk(&mut self, targets: &[String]) -> Result<Vec<AppStatus>, ServiceError> {
        self.calls.push(targets.to_vec());
        if self.fail {
            return Err(ServiceError::Unavailable("bridge timed out".to_string()));
        }
        Ok(targets
            .iter()
            .filter_map(|target| self.statuses.get(target).cloned())
            .collect())
    }
}

/// Action service logging "action target" lines
#[derive(Debug, Default)]
pub struct RecordingActions {
    pub calls: Vec<String>,
    pub reject: bool,
}

impl RecordingActions {
    fn record(&mut self, action: &'static str, target: &str) -> Result<(), ServiceError> {
        self.calls.push(format!("{action} {target}"));
        if self.reject {
            return Err(ServiceError::Rejected {
                action,
                target: target.to_string(),
                reply: "not ok".to_string(),
            });
        }
        Ok(())
    }
}

impl ActionService for RecordingActions {
    fn launch(&mut self, target: &str) -> Result<(), ServiceError> {
        self.record("launch", target)
    }

    fn focus(&mut self, target: &str) -> Result<(), ServiceError> {
        self.record("focus", target)
    }

    fn minimize_all(&mut self, target: &str) -> Result<(), ServiceError> {
        self.record("minimize_all", target)
    }

    fn close_all(&mut self, target: &str) -> Result<(), ServiceError> {
        self.record("close_all", target)
    }
}
