//! Real-time pad feedback for button-grid application launchers.
//!
//! Raw pad edges are decoded into gestures, gestures become application
//! actions, and the pad LEDs are kept in line with what the applications
//! are actually doing. Everything runs on one cooperative timeline: each
//! component takes `now` explicitly and reports when it next needs to run.

pub mod animation;
pub mod busy;
pub mod channel;
pub mod clock;
pub mod color;
pub mod config;
pub mod controller;
pub mod effect;
pub mod error;
pub mod frame_pacer;
pub mod gesture;
pub mod painter;
pub mod port;
pub mod signal;
pub mod status;
pub mod sync;
pub mod timer;

pub use animation::{AnimationEngine, AnimationId, AnimationOutcome, AnimationReport};
pub use busy::BusyRegistry;
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use color::{Color, LedState};
pub use config::ControllerConfig;
pub use controller::{Controller, FeedbackTimings, Phase};
pub use effect::{AnimationKind, AnimationOptions, EffectSlot};
pub use error::{ConfigError, PortError, ServiceError};
pub use frame_pacer::FramePacer;
pub use gesture::{GestureDecoder, GestureEvent, GestureKind, GestureTimings};
pub use painter::PadPainter;
pub use port::{
    ActionService, AppAction, AppStateService, PadEventSource, PadPort, Subscription,
};
pub use signal::{
    PadSignal, PadSignalChannel, PadSignalReceiver, PadSignalSender, SignalProcessor,
};
pub use status::AppStatus;
pub use sync::{PadMapping, SyncConfig, SyncLoop, SyncRequest, TickReport};
pub use timer::{TimerHandle, TimerQueue};

pub use embassy_time::{Duration, Instant};

/// Identifier of one physical pad (input and LED)
pub type PadId = u8;
