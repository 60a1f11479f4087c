//! Controller - wires gestures to application actions
//!
//! The controller owns every component and is the only place where they
//! meet. It stays thin: pick an action for a gesture, blink the pad while
//! the action runs, keep the sync loop off that pad, and hand the pad back
//! to the sync loop once the blink is over.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use embassy_time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::PadId;
use crate::animation::{AnimationEngine, AnimationId, AnimationOutcome, AnimationReport};
use crate::busy::BusyRegistry;
use crate::clock::Clock;
use crate::color::{Color, LedState};
use crate::config::ControllerConfig;
use crate::effect::AnimationOptions;
use crate::error::ConfigError;
use crate::gesture::{GestureDecoder, GestureEvent, GestureKind};
use crate::painter::PadPainter;
use crate::port::{ActionService, AppAction, AppStateService, PadPort};
use crate::signal::{PadSignalReceiver, SignalProcessor};
use crate::sync::{PadMapping, SyncConfig, SyncLoop};

/// Longest sleep of [`Controller::run_until`], bounds input latency
const MAX_IDLE_WAIT: Duration = Duration::from_millis(10);

/// Blink lengths of the action feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackTimings {
    pub launch: Duration,
    pub focus: Duration,
    pub minimize: Duration,
    pub close: Duration,
    pub error: Duration,
    /// Full on/off period of a feedback blink
    pub period: Duration,
}

impl Default for FeedbackTimings {
    fn default() -> Self {
        Self {
            launch: Duration::from_millis(1_200),
            focus: Duration::from_millis(420),
            minimize: Duration::from_millis(420),
            close: Duration::from_millis(700),
            error: Duration::from_millis(900),
            period: Duration::from_millis(240),
        }
    }
}

impl FeedbackTimings {
    pub const fn for_action(&self, action: AppAction) -> Duration {
        match action {
            AppAction::Launch => self.launch,
            AppAction::Focus => self.focus,
            AppAction::MinimizeAll => self.minimize,
            AppAction::CloseAll => self.close,
        }
    }

    /// Blink length rounded up to whole on/off halves, which is when the
    /// blink actually ends
    fn blink_length(&self, duration: Duration) -> Duration {
        let half = (self.period.as_millis() / 2).max(1);
        Duration::from_millis(duration.as_millis().div_ceil(half) * half)
    }

    fn blink_options(&self, duration: Duration) -> AnimationOptions {
        AnimationOptions {
            total_duration_ms: Some(duration.as_millis()),
            period_ms: Some(self.period.as_millis()),
            ..AnimationOptions::default()
        }
    }
}

/// Lifecycle of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Booting,
    Running,
    ShuttingDown,
    Stopped,
}

#[derive(Debug, Clone, Copy)]
struct PendingFeedback {
    pad: PadId,
    action: AppAction,
    succeeded: bool,
}

/// Orchestrates decoder, animations and sync for one device
pub struct Controller<'a, P: PadPort, S: AppStateService, A: ActionService> {
    // External dependencies and configuration
    painter: PadPainter<P>,
    app_state: S,
    actions: A,
    signals: SignalProcessor<'a>,
    mapping: PadMapping,
    sync_config: SyncConfig,
    feedback: FeedbackTimings,
    boot_options: AnimationOptions,
    shutdown_options: AnimationOptions,

    // Internal state
    phase: Phase,
    boot: Option<AnimationId>,
    shutdown: Option<AnimationId>,
    pending: HashMap<AnimationId, PendingFeedback>,

    // Internal components
    busy: BusyRegistry,
    decoder: GestureDecoder,
    engine: AnimationEngine,
    sync: Option<SyncLoop>,
}

impl<'a, P: PadPort, S: AppStateService, A: ActionService> Controller<'a, P, S, A> {
    pub fn new(
        config: &ControllerConfig,
        port: P,
        app_state: S,
        actions: A,
        signals: PadSignalReceiver<'a>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            painter: PadPainter::new(port),
            app_state,
            actions,
            signals: SignalProcessor::new(signals),
            mapping: config.mapping()?,
            sync_config: config.sync_config(),
            feedback: config.feedback_timings(),
            boot_options: config.boot.clone(),
            shutdown_options: config.shutdown.clone(),
            phase: Phase::Idle,
            boot: None,
            shutdown: None,
            pending: HashMap::new(),
            busy: BusyRegistry::new(),
            decoder: GestureDecoder::new(config.gesture_timings()),
            engine: AnimationEngine::new(config.grid.clone()),
            sync: None,
        })
    }

    /// Play the boot animation; the sync loop starts once it is over.
    pub fn start(&mut self, now: Instant) {
        if self.phase != Phase::Idle {
            return;
        }
        info!(pads = self.mapping.len(), "controller starting");
        self.phase = Phase::Booting;
        let targets: Vec<PadId> = self.mapping.keys().copied().collect();
        self.boot = self.engine.play_boot_animation(
            &mut self.painter,
            &targets,
            &self.boot_options,
            now,
        );
        if self.boot.is_none() {
            self.start_sync(now);
        }
    }

    /// Stop syncing, drop every in-flight visual and play the shutdown ripple
    pub fn shutdown(&mut self, now: Instant) {
        if matches!(self.phase, Phase::ShuttingDown | Phase::Stopped) {
            return;
        }
        info!("controller shutting down");
        self.phase = Phase::ShuttingDown;
        if let Some(sync) = self.sync.as_mut() {
            sync.stop();
        }
        self.busy.clear_all();
        self.decoder.reset();
        self.engine.cancel_all(&mut self.painter);
        self.engine.take_reports();
        self.pending.clear();
        self.boot = None;

        let targets: Vec<PadId> = self.mapping.keys().copied().collect();
        self.shutdown = self.engine.play_shutdown_animation(
            &mut self.painter,
            &targets,
            &self.shutdown_options,
            now,
        );
        if self.shutdown.is_none() {
            self.phase = Phase::Stopped;
        }
    }

    /// Run everything that is due at `now`.
    ///
    /// Returns the earliest deadline at which something will be due next.
    pub fn tick(&mut self, now: Instant) -> Option<Instant> {
        let effects = self.signals.process_pending(&mut self.decoder);
        if effects.device_reset {
            debug!("device reset, repainting from scratch");
            self.painter.invalidate_all();
            if let Some(sync) = self.sync.as_mut() {
                sync.poke(None, now);
            }
        }
        for event in effects.gestures {
            self.handle_gesture(event, now);
        }
        while let Some(event) = self.decoder.poll(now) {
            self.handle_gesture(event, now);
        }

        self.engine.poll(now, &mut self.painter);
        for report in self.engine.take_reports() {
            self.handle_report(report, now);
        }

        if let Some(sync) = self.sync.as_mut() {
            sync.poll(now, &mut self.app_state, &mut self.painter, &mut self.busy);
        }

        self.next_deadline()
    }

    /// Drive the controller with `clock` until `stop` is set
    pub fn run_until<C: Clock>(&mut self, clock: &C, stop: &AtomicBool) {
        while !stop.load(Ordering::Relaxed) {
            let now = clock.now();
            let next = self.tick(now);
            Self::sleep_until(clock, next);
        }
    }

    /// Shut down and drive the controller until the shutdown animation ended
    pub fn run_shutdown<C: Clock>(&mut self, clock: &C) {
        self.shutdown(clock.now());
        while !self.is_idle() {
            let next = self.tick(clock.now());
            Self::sleep_until(clock, next);
        }
    }

    /// React to a decoded gesture
    pub fn handle_gesture(&mut self, event: GestureEvent, now: Instant) {
        match event.kind {
            GestureKind::SinglePress => self.on_press(event.pad, false, now),
            GestureKind::DoubleTap => self.on_press(event.pad, true, now),
            GestureKind::LongPress => self.on_long_press(event.pad, now),
        }
    }

    /// Single press launches or focuses, double tap minimizes
    pub fn on_press(&mut self, pad: PadId, double: bool, now: Instant) {
        let action = if double {
            AppAction::MinimizeAll
        } else {
            match self.known_state(pad) {
                Some(
                    LedState::RunningFocused
                    | LedState::RunningBackground
                    | LedState::Minimized
                    | LedState::Launching
                    | LedState::Focusing
                    | LedState::Minimizing,
                ) => AppAction::Focus,
                _ => AppAction::Launch,
            }
        };
        self.run_action(pad, action, now);
    }

    /// Long press closes every window of the app
    pub fn on_long_press(&mut self, pad: PadId, now: Instant) {
        self.run_action(pad, AppAction::CloseAll, now);
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Nothing left to run after shutdown
    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Stopped && self.engine.is_idle()
    }

    /// State the sync loop last derived (or assumed) for `pad`
    pub fn known_state(&self, pad: PadId) -> Option<LedState> {
        self.sync.as_ref().and_then(|sync| sync.known_state(pad))
    }

    /// Earliest deadline of any component
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.decoder.next_deadline(),
            self.engine.next_deadline(),
            self.sync.as_ref().and_then(SyncLoop::next_deadline),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    pub const fn painter(&self) -> &PadPainter<P> {
        &self.painter
    }

    pub fn busy_mut(&mut self) -> &mut BusyRegistry {
        &mut self.busy
    }

    pub const fn engine(&self) -> &AnimationEngine {
        &self.engine
    }

    pub const fn sync(&self) -> Option<&SyncLoop> {
        self.sync.as_ref()
    }

    pub fn app_state_mut(&mut self) -> &mut S {
        &mut self.app_state
    }

    pub const fn actions(&self) -> &A {
        &self.actions
    }

    fn start_sync(&mut self, now: Instant) {
        if self.phase != Phase::Booting {
            return;
        }
        self.phase = Phase::Running;
        self.sync = Some(SyncLoop::start(self.sync_config, self.mapping.clone(), now));
        debug!("sync loop started");
    }

    fn run_action(&mut self, pad: PadId, action: AppAction, now: Instant) {
        if self.phase != Phase::Running {
            debug!(pad, action = action.as_str(), phase = ?self.phase, "gesture ignored");
            return;
        }
        let Some(target) = self.mapping.get(&pad).cloned() else {
            debug!(pad, "gesture on unmapped pad ignored");
            return;
        };

        let duration = self.feedback.for_action(action);
        let color = action.pending_state().color();
        let Some(blink) = self.feedback_blink(pad, color, duration, now) else {
            return;
        };

        match action.perform(&mut self.actions, &target) {
            Ok(()) => {
                info!(pad, app = %target, action = action.as_str(), "action done");
                self.pending.insert(
                    blink,
                    PendingFeedback {
                        pad,
                        action,
                        succeeded: true,
                    },
                );
            }
            Err(error) => {
                warn!(pad, app = %target, action = action.as_str(), %error, "action failed");
                let error_color = LedState::Error.color();
                if let Some(error_blink) =
                    self.feedback_blink(pad, error_color, self.feedback.error, now)
                {
                    self.pending.insert(
                        error_blink,
                        PendingFeedback {
                            pad,
                            action,
                            succeeded: false,
                        },
                    );
                }
            }
        }
    }

    /// Blink `pad` and keep the sync loop away from it meanwhile
    fn feedback_blink(
        &mut self,
        pad: PadId,
        color: Color,
        duration: Duration,
        now: Instant,
    ) -> Option<AnimationId> {
        let duration = self.feedback.blink_length(duration);
        self.busy.mark_busy(pad, duration, now);
        let options = self.feedback.blink_options(duration);
        self.engine
            .blink_pulse(&mut self.painter, &[pad], color, &options, now)
    }

    fn handle_report(&mut self, report: AnimationReport, now: Instant) {
        if Some(report.id) == self.boot {
            self.boot = None;
            self.start_sync(now);
            return;
        }
        if Some(report.id) == self.shutdown {
            self.shutdown = None;
            self.phase = Phase::Stopped;
            info!("controller stopped");
            return;
        }

        let Some(feedback) = self.pending.remove(&report.id) else {
            return;
        };
        if report.outcome == AnimationOutcome::Superseded {
            return;
        }
        let Some(sync) = self.sync.as_mut() else {
            return;
        };
        if feedback.succeeded {
            // Optimistic repaint until the next tick confirms it.
            let expected = feedback.action.expected_state();
            sync.assume_state(feedback.pad, expected);
            self.painter.paint(feedback.pad, expected.color());
        }
        sync.poke(Some(feedback.pad), now);
    }

    fn sleep_until<C: Clock>(clock: &C, deadline: Option<Instant>) {
        let now = clock.now();
        let wait = deadline
            .and_then(|deadline| deadline.checked_duration_since(now))
            .map_or(MAX_IDLE_WAIT, |wait| wait.min(MAX_IDLE_WAIT));
        if wait.as_ticks() > 0 {
            std::thread::sleep(core::time::Duration::from_micros(wait.as_micros()));
        }
    }
}
