//! Animation engine - drives effects onto the pads
//!
//! Each running animation owns a set of pads and a single recurring timer.
//! Starting an animation takes its pads away from whatever animation was
//! driving them before. When an animation ends, for whatever reason, every
//! pad it still owns is painted with the effect's terminal color.

use std::collections::HashMap;

use embassy_time::Instant;
use tracing::debug;

use crate::PadId;
use crate::color::Color;
use crate::effect::{
    AnimationKind, AnimationOptions, BlinkEffect, EffectSlot, Progress, RippleEffect, WaveEffect,
};
use crate::frame_pacer::FramePacer;
use crate::painter::PadPainter;
use crate::port::PadPort;
use crate::timer::{TimerHandle, TimerQueue};

/// Identifier of a started animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(u64);

/// How an animation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationOutcome {
    /// Ran to the end of its schedule
    Completed,
    /// Stopped through [`AnimationEngine::cancel`]
    Cancelled,
    /// Lost all of its pads to newer animations
    Superseded,
}

/// Completion report of one animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationReport {
    pub id: AnimationId,
    pub kind: AnimationKind,
    pub outcome: AnimationOutcome,
}

#[derive(Debug)]
struct RunningAnimation {
    slot: EffectSlot,
    pads: Vec<PadId>,
    /// `owned[i]` is false once `pads[i]` was taken by a newer animation
    owned: Vec<bool>,
    frame: Vec<Option<Color>>,
    pacer: FramePacer,
    timer: Option<TimerHandle>,
}

impl RunningAnimation {
    fn owns_any(&self) -> bool {
        self.owned.iter().any(|&owned| owned)
    }

    fn release(&mut self, pad: PadId) {
        if let Ok(index) = self.pads.binary_search(&pad) {
            self.owned[index] = false;
        }
    }
}

/// Runs effects against a shared [`PadPainter`]
#[derive(Debug)]
pub struct AnimationEngine {
    /// Every addressable pad, used by `use_all_pads`
    grid: Vec<PadId>,
    running: HashMap<AnimationId, RunningAnimation>,
    owners: HashMap<PadId, AnimationId>,
    timers: TimerQueue<AnimationId>,
    reports: Vec<AnimationReport>,
    next_id: u64,
}

impl AnimationEngine {
    pub fn new(grid: Vec<PadId>) -> Self {
        Self {
            grid,
            running: HashMap::new(),
            owners: HashMap::new(),
            timers: TimerQueue::new(),
            reports: Vec::new(),
            next_id: 0,
        }
    }

    pub fn grid(&self) -> &[PadId] {
        &self.grid
    }

    /// Play the phased boot wave
    pub fn play_boot_animation<P: PadPort>(
        &mut self,
        painter: &mut PadPainter<P>,
        targets: &[PadId],
        options: &AnimationOptions,
        now: Instant,
    ) -> Option<AnimationId> {
        let targets = self.resolve_targets(targets, options);
        let slot = EffectSlot::Wave(WaveEffect::from_options(options));
        self.start(painter, slot, targets, now)
    }

    /// Play the shutdown ripple
    pub fn play_shutdown_animation<P: PadPort>(
        &mut self,
        painter: &mut PadPainter<P>,
        targets: &[PadId],
        options: &AnimationOptions,
        now: Instant,
    ) -> Option<AnimationId> {
        let targets = self.resolve_targets(targets, options);
        let slot = EffectSlot::Ripple(RippleEffect::from_options(options));
        self.start(painter, slot, targets, now)
    }

    /// Blink `targets` in `color`
    pub fn blink_pulse<P: PadPort>(
        &mut self,
        painter: &mut PadPainter<P>,
        targets: &[PadId],
        color: Color,
        options: &AnimationOptions,
        now: Instant,
    ) -> Option<AnimationId> {
        let targets = self.resolve_targets(targets, options);
        let slot = EffectSlot::Blink(BlinkEffect::from_options(color, options));
        self.start(painter, slot, targets, now)
    }

    /// Start an arbitrary effect on `targets`.
    ///
    /// The first frame is painted right away. Returns `None` when there is
    /// nothing to animate.
    pub fn start<P: PadPort>(
        &mut self,
        painter: &mut PadPainter<P>,
        slot: EffectSlot,
        mut targets: Vec<PadId>,
        now: Instant,
    ) -> Option<AnimationId> {
        targets.sort_unstable();
        targets.dedup();
        if targets.is_empty() {
            return None;
        }

        let id = AnimationId(self.next_id);
        self.next_id += 1;

        for &pad in &targets {
            if let Some(previous) = self.owners.insert(pad, id) {
                self.take_pad(previous, pad);
            }
        }

        debug!(id = id.0, kind = slot.kind().as_str(), pads = targets.len(), "animation started");
        let pacer = FramePacer::new(now, slot.frame_duration());
        self.running.insert(
            id,
            RunningAnimation {
                slot,
                owned: vec![true; targets.len()],
                frame: vec![None; targets.len()],
                pads: targets,
                pacer,
                timer: None,
            },
        );
        self.step(id, now, painter);
        Some(id)
    }

    /// Advance every animation whose frame is due
    pub fn poll<P: PadPort>(&mut self, now: Instant, painter: &mut PadPainter<P>) {
        while let Some((handle, id)) = self.timers.pop_due(now) {
            let current = self
                .running
                .get_mut(&id)
                .is_some_and(|animation| animation.timer.take() == Some(handle));
            if current {
                self.step(id, now, painter);
            }
        }
    }

    /// Stop an animation, painting its terminal color right away.
    ///
    /// Returns `false` if the animation is no longer running.
    pub fn cancel<P: PadPort>(&mut self, id: AnimationId, painter: &mut PadPainter<P>) -> bool {
        if !self.running.contains_key(&id) {
            return false;
        }
        self.finish(id, AnimationOutcome::Cancelled, painter);
        true
    }

    /// Cancel whatever animation currently drives `pad`
    pub fn cancel_pad<P: PadPort>(&mut self, pad: PadId, painter: &mut PadPainter<P>) -> bool {
        match self.owners.get(&pad).copied() {
            Some(id) => self.cancel(id, painter),
            None => false,
        }
    }

    /// Cancel every running animation
    pub fn cancel_all<P: PadPort>(&mut self, painter: &mut PadPainter<P>) {
        let mut ids: Vec<AnimationId> = self.running.keys().copied().collect();
        ids.sort_unstable();
        for id in ids {
            self.finish(id, AnimationOutcome::Cancelled, painter);
        }
    }

    pub fn is_running(&self, id: AnimationId) -> bool {
        self.running.contains_key(&id)
    }

    /// Animation currently driving `pad`
    pub fn owner_of(&self, pad: PadId) -> Option<AnimationId> {
        self.owners.get(&pad).copied()
    }

    pub fn is_idle(&self) -> bool {
        self.running.is_empty()
    }

    /// Earliest pending frame deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Take the reports of every animation that ended since the last call
    pub fn take_reports(&mut self) -> Vec<AnimationReport> {
        core::mem::take(&mut self.reports)
    }

    fn resolve_targets(&self, targets: &[PadId], options: &AnimationOptions) -> Vec<PadId> {
        if options.use_all_pads {
            self.grid.clone()
        } else {
            targets.to_vec()
        }
    }

    /// Hand `pad` over from `previous` to a newer animation
    fn take_pad(&mut self, previous: AnimationId, pad: PadId) {
        let Some(animation) = self.running.get_mut(&previous) else {
            return;
        };
        animation.release(pad);
        if animation.owns_any() {
            return;
        }
        if let Some(timer) = animation.timer.take() {
            self.timers.cancel(timer);
        }
        if let Some(animation) = self.running.remove(&previous) {
            debug!(id = previous.0, "animation superseded");
            self.reports.push(AnimationReport {
                id: previous,
                kind: animation.slot.kind(),
                outcome: AnimationOutcome::Superseded,
            });
        }
    }

    /// Render and paint one frame, then schedule the next or finish
    fn step<P: PadPort>(&mut self, id: AnimationId, now: Instant, painter: &mut PadPainter<P>) {
        let Some(animation) = self.running.get_mut(&id) else {
            return;
        };

        let timing = animation.pacer.tick(now);
        animation.frame.fill(None);
        let progress = animation
            .slot
            .render(timing.elapsed, &animation.pads, &mut animation.frame);

        if progress == Progress::Finished {
            self.finish(id, AnimationOutcome::Completed, painter);
            return;
        }

        for ((&pad, &owned), color) in animation
            .pads
            .iter()
            .zip(&animation.owned)
            .zip(&animation.frame)
        {
            if let (true, Some(color)) = (owned, color) {
                painter.paint(pad, *color);
            }
        }
        animation.timer = Some(self.timers.schedule_at(timing.next_deadline, id));
    }

    /// Remove an animation and leave its pads in the terminal color
    fn finish<P: PadPort>(
        &mut self,
        id: AnimationId,
        outcome: AnimationOutcome,
        painter: &mut PadPainter<P>,
    ) {
        let Some(mut animation) = self.running.remove(&id) else {
            return;
        };
        if let Some(timer) = animation.timer.take() {
            self.timers.cancel(timer);
        }

        let terminal = animation.slot.terminal_color();
        for (&pad, &owned) in animation.pads.iter().zip(&animation.owned) {
            if owned {
                painter.paint(pad, terminal);
                self.owners.remove(&pad);
            }
        }

        debug!(id = id.0, kind = animation.slot.kind().as_str(), ?outcome, "animation ended");
        self.reports.push(AnimationReport {
            id,
            kind: animation.slot.kind(),
            outcome,
        });
    }
}
