//! Thermal events and the single-consumer event queue.
//!
//! Events are produced by:
//! - The temperature classifier (one event per sensor reading)
//! - The cooling supervisor on the host (success / failure verdicts)
//! - Operator or boot logic (`SystemInit`)
//!
//! A multi-threaded host routes them through an [`EventQueue`] so that a
//! single dispatcher owns the state machine:
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Sensor task │────▶│              │     │              │
//! │ Cooling sup │────▶│  EventQueue  │────▶│  Dispatcher  │
//! │ Boot / ops  │────▶│  (SPSC)      │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::fmt;

use heapless::spsc::{Consumer, Producer, Queue};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// External stimuli that make the engine re-evaluate its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ThermalEvent {
    TempNormal = 0,
    TempWarning = 1,
    TempCritical = 2,
    TempExtreme = 3,
    CoolingSuccess = 4,
    CoolingFailure = 5,
    SystemInit = 6,
}

impl ThermalEvent {
    /// Number of events in the set.
    pub const COUNT: usize = 7;

    /// Every event, in discriminant order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::TempNormal,
        Self::TempWarning,
        Self::TempCritical,
        Self::TempExtreme,
        Self::CoolingSuccess,
        Self::CoolingFailure,
        Self::SystemInit,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::TempNormal => "TEMP_NORMAL",
            Self::TempWarning => "TEMP_WARNING",
            Self::TempCritical => "TEMP_CRITICAL",
            Self::TempExtreme => "TEMP_EXTREME",
            Self::CoolingSuccess => "COOLING_SUCCESS",
            Self::CoolingFailure => "COOLING_FAILURE",
            Self::SystemInit => "SYSTEM_INIT",
        }
    }
}

impl TryFrom<u8> for ThermalEvent {
    type Error = Error;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(raw as usize)
            .copied()
            .ok_or(Error::InvalidEvent(raw))
    }
}

impl fmt::Display for ThermalEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Bounded SPSC queue ────────────────────────────────────────
//
// Producers push from sensor / supervisor context, the dispatcher pops.
// Backed by `heapless::spsc::Queue`, which holds `N - 1` events.

/// Fixed-capacity event queue.  Split it once, hand the producer to the
/// event source and keep the consumer next to the state machine.
pub struct EventQueue<const N: usize> {
    inner: Queue<ThermalEvent, N>,
}

impl<const N: usize> EventQueue<N> {
    pub const fn new() -> Self {
        Self {
            inner: Queue::new(),
        }
    }

    /// Maximum number of pending events.
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Split into producer and consumer halves.
    pub fn split(&mut self) -> (EventProducer<'_, N>, EventConsumer<'_, N>) {
        let (producer, consumer) = self.inner.split();
        (EventProducer { inner: producer }, EventConsumer { inner: consumer })
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Write half of an [`EventQueue`].
pub struct EventProducer<'a, const N: usize> {
    inner: Producer<'a, ThermalEvent, N>,
}

impl<const N: usize> EventProducer<'_, N> {
    /// Push an event.  Returns `false` if the queue is full (event dropped).
    pub fn push(&mut self, event: ThermalEvent) -> bool {
        if self.inner.enqueue(event).is_err() {
            log::warn!("event queue full, dropping {event}");
            return false;
        }
        true
    }
}

/// Read half of an [`EventQueue`].
pub struct EventConsumer<'a, const N: usize> {
    inner: Consumer<'a, ThermalEvent, N>,
}

impl<const N: usize> EventConsumer<'_, N> {
    /// Pop the next event.  Returns `None` if the queue is empty.
    pub fn pop(&mut self) -> Option<ThermalEvent> {
        self.inner.dequeue()
    }

    /// Drain all pending events into a callback, FIFO order.
    pub fn drain(&mut self, mut handler: impl FnMut(ThermalEvent)) {
        while let Some(event) = self.pop() {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.len() == 0
    }
}
