//! Pad signal intake
//!
//! The device driver pushes raw edges into a [`PadSignalChannel`] from its
//! own callback thread; the event loop drains them in arrival order and
//! feeds them to the gesture decoder.

use embassy_time::Instant;
use tracing::warn;

use crate::PadId;
use crate::channel::{Channel, Receiver, Sender};
use crate::gesture::{GestureDecoder, GestureEvent};

/// Number of signals buffered between the driver and the event loop
pub const PAD_SIGNAL_CHANNEL_SIZE: usize = 64;

/// Raw input from the pad device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadSignal {
    /// Pad pressed at `at`
    Down { pad: PadId, at: Instant },
    /// Pad released at `at`
    Up { pad: PadId, at: Instant },
    /// The device lost track of one pad (e.g. a dropped message)
    Cancel { pad: PadId },
    /// The device was reset or reconnected
    Reset,
}

/// Type alias for the pad signal channel
pub type PadSignalChannel = Channel<PadSignal, PAD_SIGNAL_CHANNEL_SIZE>;

/// Type alias for pad signal sender
pub type PadSignalSender<'a> = Sender<'a, PadSignal, PAD_SIGNAL_CHANNEL_SIZE>;

/// Type alias for pad signal receiver
pub type PadSignalReceiver<'a> = Receiver<'a, PadSignal, PAD_SIGNAL_CHANNEL_SIZE>;

/// Side effects of a drained batch that the owner should apply
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalEffects {
    /// Gestures decoded from the batch, in order
    pub gestures: Vec<GestureEvent>,
    /// The device reported a reset
    pub device_reset: bool,
}

/// Drains pad signals into a gesture decoder
pub struct SignalProcessor<'a> {
    signals: PadSignalReceiver<'a>,
}

impl<'a> SignalProcessor<'a> {
    pub const fn new(signals: PadSignalReceiver<'a>) -> Self {
        Self { signals }
    }

    /// Process all pending signals from the channel (non-blocking)
    pub fn process_pending(&mut self, decoder: &mut GestureDecoder) -> SignalEffects {
        let mut effects = SignalEffects::default();

        for signal in self.signals.drain() {
            match signal {
                PadSignal::Down { pad, at } => decoder.on_down(pad, at),
                PadSignal::Up { pad, at } => {
                    if let Some(event) = decoder.on_up(pad, at) {
                        effects.gestures.push(event);
                    }
                }
                PadSignal::Cancel { pad } => decoder.cancel_pad(pad),
                PadSignal::Reset => {
                    decoder.reset();
                    effects.device_reset = true;
                }
            }
        }

        let dropped = self.signals.take_dropped();
        if dropped > 0 {
            warn!(dropped, "pad signal queue overflowed");
        }

        effects
    }
}
