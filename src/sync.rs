//! State sync loop
//!
//! Periodically asks the application-state service about every mapped
//! target and repaints the pads from the answer. Pads inside a busy window
//! are skipped unless they were poked. A tick is split in two halves,
//! [`SyncLoop::begin_tick`] and [`SyncLoop::complete_tick`], so the query
//! itself may run anywhere; while one is in flight no other tick starts.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use embassy_time::{Duration, Instant};
use tracing::{debug, trace, warn};

use crate::PadId;
use crate::busy::BusyRegistry;
use crate::color::LedState;
use crate::error::ServiceError;
use crate::painter::PadPainter;
use crate::port::{AppStateService, PadPort};
use crate::status::AppStatus;
use crate::timer::{TimerHandle, TimerQueue};

pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_millis(140);
pub const DEFAULT_POKE_DELAY: Duration = Duration::from_millis(25);

/// Read-only association of pads to application targets
pub type PadMapping = BTreeMap<PadId, String>;

/// Timing of the sync loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    /// Steady-state interval between ticks
    pub interval: Duration,
    /// Delay of the accelerated tick scheduled by a poke
    pub poke_delay: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_SYNC_INTERVAL,
            poke_delay: DEFAULT_POKE_DELAY,
        }
    }
}

/// Work of one tick, handed to whoever performs the query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    /// Targets to query, in mapping order
    pub targets: Vec<String>,
    groups: BTreeMap<String, Vec<PadId>>,
    poked: BTreeSet<PadId>,
}

impl SyncRequest {
    /// Pads painted for `target` by this request
    pub fn pads_for(&self, target: &str) -> &[PadId] {
        self.groups.get(target).map_or(&[], Vec::as_slice)
    }
}

/// Outcome of a finished tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Writes that reached the port
    pub painted: usize,
    /// Pads skipped because they turned busy while the query was running
    pub skipped_busy: usize,
    /// Whether the query failed and pads were painted with the error color
    pub failed: bool,
}

/// Periodic reconciliation of pad colors with application state
#[derive(Debug)]
pub struct SyncLoop {
    config: SyncConfig,
    mapping: PadMapping,
    timer: TimerQueue<()>,
    pending: Option<TimerHandle>,
    in_flight: bool,
    stopped: bool,
    poked: BTreeSet<PadId>,
    /// Last state derived for each pad
    known: HashMap<PadId, LedState>,
}

impl SyncLoop {
    /// Create a loop whose first tick is due at `now`
    pub fn start(config: SyncConfig, mapping: PadMapping, now: Instant) -> Self {
        let mut sync = Self {
            config,
            mapping,
            timer: TimerQueue::new(),
            pending: None,
            in_flight: false,
            stopped: false,
            poked: BTreeSet::new(),
            known: HashMap::new(),
        };
        sync.schedule_at(now);
        sync
    }

    pub const fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub const fn mapping(&self) -> &PadMapping {
        &self.mapping
    }

    /// Target mapped to `pad`
    pub fn target_of(&self, pad: PadId) -> Option<&str> {
        self.mapping.get(&pad).map(String::as_str)
    }

    /// State most recently derived for `pad`
    pub fn known_state(&self, pad: PadId) -> Option<LedState> {
        self.known.get(&pad).copied()
    }

    /// Record a state the pad is expected to reach, until the next tick
    /// says otherwise
    pub fn assume_state(&mut self, pad: PadId, state: LedState) {
        if self.mapping.contains_key(&pad) {
            self.known.insert(pad, state);
        }
    }

    pub const fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Deadline of the next scheduled tick
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.next_deadline()
    }

    /// Request a re-check outside the normal interval.
    ///
    /// `Some(pad)` lets that pad bypass its busy window on the next tick.
    /// Either way, when no tick is running the next one is pulled in to
    /// `poke_delay` from now.
    pub fn poke(&mut self, pad: Option<PadId>, now: Instant) {
        if self.stopped {
            return;
        }
        if let Some(pad) = pad {
            self.poked.insert(pad);
        }
        if self.in_flight {
            return;
        }
        let accelerated = now + self.config.poke_delay;
        let sooner = self
            .pending
            .and_then(|handle| self.timer.deadline(handle))
            .is_none_or(|deadline| accelerated < deadline);
        if sooner {
            self.schedule_at(accelerated);
        }
        trace!(?pad, "sync poked");
    }

    /// Halt scheduling. Idempotent.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.timer.clear();
        self.pending = None;
        self.poked.clear();
        debug!("sync loop stopped");
    }

    /// Whether a tick is due at `now`
    pub fn is_due(&self, now: Instant) -> bool {
        !self.stopped && self.timer.next_deadline().is_some_and(|deadline| deadline <= now)
    }

    /// Run a due tick end to end with a blocking query.
    ///
    /// Returns `None` when no tick was due.
    pub fn poll<S, P>(
        &mut self,
        now: Instant,
        service: &mut S,
        painter: &mut PadPainter<P>,
        busy: &mut BusyRegistry,
    ) -> Option<TickReport>
    where
        S: AppStateService + ?Sized,
        P: PadPort,
    {
        if !self.is_due(now) {
            return None;
        }
        Some(self.tick(now, service, painter, busy))
    }

    /// Run one full tick right now with a blocking query
    pub fn tick<S, P>(
        &mut self,
        now: Instant,
        service: &mut S,
        painter: &mut PadPainter<P>,
        busy: &mut BusyRegistry,
    ) -> TickReport
    where
        S: AppStateService + ?Sized,
        P: PadPort,
    {
        let Some(request) = self.begin_tick(now, busy) else {
            return TickReport::default();
        };
        let result = service.get_states_bulk(&request.targets);
        self.complete_tick(now, &request, result, painter, busy)
    }

    /// Start a tick: collect the targets to query.
    ///
    /// Returns `None` when stopped, when a tick is already in flight (the
    /// in-flight tick reschedules on completion), or when every mapped pad is
    /// busy (the next tick is scheduled).
    pub fn begin_tick(&mut self, now: Instant, busy: &mut BusyRegistry) -> Option<SyncRequest> {
        if self.stopped {
            return None;
        }
        if self.in_flight {
            trace!("sync tick deferred, previous still in flight");
            return None;
        }
        if let Some(handle) = self.pending.take() {
            self.timer.cancel(handle);
        }

        let poked = core::mem::take(&mut self.poked);
        let mut groups: BTreeMap<String, Vec<PadId>> = BTreeMap::new();
        for (&pad, target) in &self.mapping {
            if busy.is_busy(pad, now) && !poked.contains(&pad) {
                continue;
            }
            groups.entry(target.clone()).or_default().push(pad);
        }

        if groups.is_empty() {
            self.schedule(now);
            return None;
        }

        self.in_flight = true;
        Some(SyncRequest {
            targets: groups.keys().cloned().collect(),
            groups,
            poked,
        })
    }

    /// Finish a tick started with [`SyncLoop::begin_tick`].
    ///
    /// Always reschedules, whatever the outcome of the query.
    pub fn complete_tick<P: PadPort>(
        &mut self,
        now: Instant,
        request: &SyncRequest,
        result: Result<Vec<AppStatus>, ServiceError>,
        painter: &mut PadPainter<P>,
        busy: &mut BusyRegistry,
    ) -> TickReport {
        let mut report = TickReport::default();

        match result {
            Ok(statuses) => {
                for status in &statuses {
                    let Some(pads) = request.groups.get(&status.target) else {
                        trace!(app = %status.target, "status for unrequested target ignored");
                        continue;
                    };
                    let state = status.led_state();
                    for &pad in pads {
                        self.paint(pad, state, now, request, painter, busy, &mut report);
                    }
                }
            }
            Err(error) => {
                warn!(%error, targets = request.targets.len(), "app state query failed");
                report.failed = true;
                for pads in request.groups.values() {
                    for &pad in pads {
                        self.paint(pad, LedState::Error, now, request, painter, busy, &mut report);
                    }
                }
            }
        }

        self.in_flight = false;
        if !self.stopped {
            if self.poked.is_empty() {
                self.schedule(now);
            } else {
                // Pokes that arrived mid-flight get their fast tick now.
                self.schedule_at(now + self.config.poke_delay);
            }
        }
        report
    }

    #[allow(clippy::too_many_arguments)]
    fn paint<P: PadPort>(
        &mut self,
        pad: PadId,
        state: LedState,
        now: Instant,
        request: &SyncRequest,
        painter: &mut PadPainter<P>,
        busy: &mut BusyRegistry,
        report: &mut TickReport,
    ) {
        if busy.is_busy(pad, now) && !request.poked.contains(&pad) {
            report.skipped_busy += 1;
            return;
        }
        if state != LedState::Error {
            self.known.insert(pad, state);
        }
        if painter.paint(pad, state.color()) {
            report.painted += 1;
        }
    }

    fn schedule(&mut self, now: Instant) {
        self.schedule_at(now + self.config.interval);
    }

    fn schedule_at(&mut self, deadline: Instant) {
        if let Some(handle) = self.pending.take() {
            self.timer.cancel(handle);
        }
        self.pending = Some(self.timer.schedule_at(deadline, ()));
    }
}
