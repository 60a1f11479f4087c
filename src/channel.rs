//! Bounded channel between the device callback thread and the event loop.
//!
//! A multi-sender queue built on `critical-section` and `heapless::Deque`.
//! Senders never block: when the queue is full the value is handed back and
//! the overflow is counted, so a stuck consumer cannot stall the device
//! driver.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

/// Error returned when trying to send to a full channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrySendError<T>(pub T);

struct Inner<T, const SIZE: usize> {
    queue: Deque<T, SIZE>,
    dropped: u32,
}

/// A bounded, thread-safe channel.
pub struct Channel<T, const SIZE: usize> {
    inner: Mutex<RefCell<Inner<T, SIZE>>>,
}

impl<T, const SIZE: usize> Channel<T, SIZE> {
    /// Create a new empty channel.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                queue: Deque::new(),
                dropped: 0,
            })),
        }
    }

    /// Get a sender handle for this channel.
    pub const fn sender(&self) -> Sender<'_, T, SIZE> {
        Sender { channel: self }
    }

    /// Get a receiver handle for this channel.
    pub const fn receiver(&self) -> Receiver<'_, T, SIZE> {
        Receiver { channel: self }
    }

    /// Try to send a value into the channel.
    ///
    /// Returns `Err(TrySendError(value))` and bumps the overflow counter if
    /// the channel is full.
    pub fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow(cs).borrow_mut();
            inner.queue.push_back(value).map_err(|value| {
                inner.dropped = inner.dropped.saturating_add(1);
                TrySendError(value)
            })
        })
    }

    /// Take the oldest queued value, if any.
    pub fn try_receive(&self) -> Option<T> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().queue.pop_front())
    }

    /// Number of queued values
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().queue.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return and reset the number of values rejected since the last call.
    pub fn take_dropped(&self) -> u32 {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow(cs).borrow_mut();
            core::mem::take(&mut inner.dropped)
        })
    }
}

impl<T, const SIZE: usize> Default for Channel<T, SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// A sender handle for a [`Channel`].
#[derive(Clone, Copy)]
pub struct Sender<'a, T, const SIZE: usize> {
    channel: &'a Channel<T, SIZE>,
}

impl<T, const SIZE: usize> Sender<'_, T, SIZE> {
    /// Try to send a value into the channel.
    pub fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
        self.channel.try_send(value)
    }
}

/// A receiver handle for a [`Channel`].
#[derive(Clone, Copy)]
pub struct Receiver<'a, T, const SIZE: usize> {
    channel: &'a Channel<T, SIZE>,
}

impl<'a, T, const SIZE: usize> Receiver<'a, T, SIZE> {
    /// Take the oldest queued value, if any.
    pub fn try_receive(&self) -> Option<T> {
        self.channel.try_receive()
    }

    /// Iterate over queued values in arrival order until the channel is empty.
    pub fn drain(&self) -> impl Iterator<Item = T> + 'a {
        let channel = self.channel;
        core::iter::from_fn(move || channel.try_receive())
    }

    /// Return and reset the overflow counter.
    pub fn take_dropped(&self) -> u32 {
        self.channel.take_dropped()
    }
}
