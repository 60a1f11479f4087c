//! Boundaries to the outside world: the pad device and the application
//! services. The core only ever sees success or failure of these calls.

use crate::PadId;
use crate::color::{Color, LedState};
use crate::error::{PortError, ServiceError};
use crate::signal::PadSignalSender;
use crate::status::AppStatus;

/// LED sink of the pad device.
///
/// Implement this trait to support different hardware. Writes are
/// best-effort; callers never retry.
pub trait PadPort {
    /// Light a single pad
    fn set_pad(&mut self, pad: PadId, color: Color) -> Result<(), PortError>;
}

impl<P: PadPort + ?Sized> PadPort for &mut P {
    fn set_pad(&mut self, pad: PadId, color: Color) -> Result<(), PortError> {
        (**self).set_pad(pad, color)
    }
}

/// Source of raw press/release signals.
pub trait PadEventSource {
    /// Start forwarding signals into `sink`.
    ///
    /// Must be callable before the device produced any event.
    fn subscribe(&mut self, sink: PadSignalSender<'static>) -> Result<Subscription, PortError>;
}

/// Active pad event subscription. Dropping it unsubscribes.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Subscription with nothing to tear down
    pub fn detached() -> Self {
        Self { cancel: None }
    }

    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl core::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Bulk query for application window state.
pub trait AppStateService {
    /// Query every target in one round trip.
    ///
    /// Targets missing from the reply are left alone by the caller.
    fn get_states_bulk(&mut self, targets: &[String]) -> Result<Vec<AppStatus>, ServiceError>;
}

/// Actions the controller can run against an application.
pub trait ActionService {
    fn launch(&mut self, target: &str) -> Result<(), ServiceError>;
    fn focus(&mut self, target: &str) -> Result<(), ServiceError>;
    fn minimize_all(&mut self, target: &str) -> Result<(), ServiceError>;
    fn close_all(&mut self, target: &str) -> Result<(), ServiceError>;
}

/// Action requested through a gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppAction {
    Launch,
    Focus,
    MinimizeAll,
    CloseAll,
}

impl AppAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Launch => "launch",
            Self::Focus => "focus",
            Self::MinimizeAll => "minimize_all",
            Self::CloseAll => "close_all",
        }
    }

    /// Run the action against `service`
    pub fn perform<A: ActionService + ?Sized>(
        self,
        service: &mut A,
        target: &str,
    ) -> Result<(), ServiceError> {
        match self {
            Self::Launch => service.launch(target),
            Self::Focus => service.focus(target),
            Self::MinimizeAll => service.minimize_all(target),
            Self::CloseAll => service.close_all(target),
        }
    }

    /// State shown while the action is in flight
    pub const fn pending_state(self) -> LedState {
        match self {
            Self::Launch => LedState::Launching,
            Self::Focus => LedState::Focusing,
            Self::MinimizeAll => LedState::Minimizing,
            Self::CloseAll => LedState::Quitting,
        }
    }

    /// State the app is expected to reach once the action succeeded
    pub const fn expected_state(self) -> LedState {
        match self {
            Self::Launch | Self::Focus => LedState::RunningFocused,
            Self::MinimizeAll => LedState::Minimized,
            Self::CloseAll => LedState::AssignedStopped,
        }
    }
}
