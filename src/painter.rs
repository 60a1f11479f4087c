//! Deduplicating writer in front of the pad port.
//!
//! Animations and the sync loop share one painter, so a color that is
//! already lit is never sent again no matter who asks for it.

use std::collections::HashMap;

use tracing::debug;

use crate::PadId;
use crate::color::Color;
use crate::port::PadPort;

/// Pad writer that remembers the last color sent to each pad
#[derive(Debug)]
pub struct PadPainter<P: PadPort> {
    port: P,
    last_sent: HashMap<PadId, Color>,
    failed_writes: u32,
}

impl<P: PadPort> PadPainter<P> {
    pub fn new(port: P) -> Self {
        Self {
            port,
            last_sent: HashMap::new(),
            failed_writes: 0,
        }
    }

    /// Paint `pad` unless it already shows `color`.
    ///
    /// Returns `true` if a write reached the port. Write errors are logged
    /// and swallowed; the pad is then treated as unknown so the next paint
    /// goes through.
    pub fn paint(&mut self, pad: PadId, color: Color) -> bool {
        if self.last_sent.get(&pad) == Some(&color) {
            return false;
        }
        match self.port.set_pad(pad, color) {
            Ok(()) => {
                self.last_sent.insert(pad, color);
                true
            }
            Err(error) => {
                self.last_sent.remove(&pad);
                self.failed_writes = self.failed_writes.saturating_add(1);
                debug!(pad, %error, "pad write failed");
                false
            }
        }
    }

    /// Paint every pad in `pads` with the same color
    pub fn paint_all(&mut self, pads: &[PadId], color: Color) -> usize {
        pads.iter()
            .filter(|&&pad| self.paint(pad, color))
            .count()
    }

    /// Last color successfully sent to `pad`
    pub fn last_color(&self, pad: PadId) -> Option<Color> {
        self.last_sent.get(&pad).copied()
    }

    /// Forget what `pad` shows, e.g. after the device redrew it by itself.
    pub fn invalidate(&mut self, pad: PadId) {
        self.last_sent.remove(&pad);
    }

    /// Forget every pad, e.g. after a device reconnect.
    pub fn invalidate_all(&mut self) {
        self.last_sent.clear();
    }

    /// Writes rejected by the port so far
    pub const fn failed_writes(&self) -> u32 {
        self.failed_writes
    }

    pub const fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn into_inner(self) -> P {
        self.port
    }
}
