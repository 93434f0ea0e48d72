//! Application service — the hexagonal core.
//!
//! [`ThermalService`] owns the FSM engine, the engine context and a bounded
//! transition history.  It exposes a clean, hardware-agnostic API.  All I/O
//! flows through port traits injected at call sites, making the entire
//! service testable with mock adapters.
//!
//! ```text
//!  reading / event ──▶ ┌────────────────────────┐ ──▶ FanPort
//!                      │    ThermalService      │ ──▶ LogPort
//!     AppCommand ────▶ │ Classifier · FSM · Log │ ◀── ClockPort
//!                      └────────────────────────┘
//! ```
//!
//! The service is not `Sync`-shared: a multi-threaded host wraps it in a
//! `Mutex` or feeds it from an [`EventQueue`](crate::events::EventQueue)
//! consumer on one dispatcher thread.

use heapless::HistoryBuffer;
use log::{error, info, warn};

use crate::classifier::classify_with;
use crate::config::ThermalConfig;
use crate::error::Result;
use crate::events::{EventConsumer, ThermalEvent};
use crate::fsm::context::FsmContext;
use crate::fsm::{Dispatch, Fsm, StateId};

use super::commands::AppCommand;
use super::events::{TelemetryData, TransitionCause, TransitionRecord};
use super::ports::ThermalPorts;

/// Number of transitions kept for diagnostics.
pub const TRANSITION_HISTORY_LEN: usize = 16;

// ───────────────────────────────────────────────────────────────
// ThermalService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct ThermalService<P> {
    fsm: Fsm<P>,
    ctx: FsmContext,
    history: HistoryBuffer<TransitionRecord, TRANSITION_HISTORY_LEN>,
    /// Invalid raw events seen since the last valid one.
    consecutive_invalid: u8,
}

impl<P: ThermalPorts> ThermalService<P> {
    /// Construct the service in `Idle`.  No action runs until the first
    /// event (normally `SystemInit`).
    pub fn new(config: ThermalConfig) -> Result<Self> {
        config.validate()?;
        info!(
            "ThermalService ready: thresholds {}/{}/{}\u{00b0}C",
            config.thresholds.warning_c, config.thresholds.critical_c, config.thresholds.extreme_c
        );
        Ok(Self {
            fsm: Fsm::default(),
            ctx: FsmContext::new(config),
            history: HistoryBuffer::new(),
            consecutive_invalid: 0,
        })
    }

    // ── Dispatch ──────────────────────────────────────────────

    /// Record a temperature reading, classify it and dispatch the result.
    pub fn handle_reading(&mut self, temperature_c: u16, ports: &mut P) -> Result<Dispatch> {
        self.ctx.current_temperature = temperature_c;
        let event = classify_with(temperature_c, &self.ctx.config.thresholds);
        self.handle_event(event, ports)
    }

    /// Record a temperature without classifying it, e.g. when the host
    /// reports a cooling verdict alongside the reading.
    pub fn record_temperature(&mut self, temperature_c: u16) {
        self.ctx.current_temperature = temperature_c;
    }

    /// Dispatch one event through the transition table.
    pub fn handle_event(&mut self, event: ThermalEvent, ports: &mut P) -> Result<Dispatch> {
        self.consecutive_invalid = 0;
        let dispatch = self.fsm.process_event(&mut self.ctx, event, ports)?;
        self.record(dispatch, TransitionCause::Event(event));
        Ok(dispatch)
    }

    /// Dispatch an event given as its raw discriminant.
    ///
    /// Unknown values are returned as [`Error::InvalidEvent`](crate::error::Error::InvalidEvent).  Once
    /// `max_consecutive_invalid_events` of them arrive back to back the
    /// input source is treated as faulty and the machine is forced into
    /// Shutdown; the error is still returned.
    pub fn handle_raw_event(&mut self, raw: u8, ports: &mut P) -> Result<Dispatch> {
        let event = match ThermalEvent::try_from(raw) {
            Ok(event) => event,
            Err(e) => {
                self.consecutive_invalid = self.consecutive_invalid.saturating_add(1);
                warn!(
                    "invalid raw event {raw} ({}/{})",
                    self.consecutive_invalid, self.ctx.config.max_consecutive_invalid_events
                );
                if self.consecutive_invalid >= self.ctx.config.max_consecutive_invalid_events
                    && self.ctx.current_state != StateId::Shutdown
                {
                    warn!("event source considered faulty, forcing shutdown");
                    if let Err(fault) = self.force_shutdown(ports) {
                        error!("forced shutdown failed: {fault}");
                    }
                }
                return Err(e);
            }
        };
        self.handle_event(event, ports)
    }

    /// Process every queued event, FIFO.  Stops at the first error and
    /// leaves the rest queued.  Returns how many events were dispatched.
    pub fn drain<const N: usize>(
        &mut self,
        queue: &mut EventConsumer<'_, N>,
        ports: &mut P,
    ) -> Result<usize> {
        let mut dispatched = 0;
        while let Some(event) = queue.pop() {
            self.handle_event(event, ports)?;
            dispatched += 1;
        }
        Ok(dispatched)
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command.
    pub fn handle_command(&mut self, cmd: AppCommand, ports: &mut P) -> Result<Dispatch> {
        match cmd {
            AppCommand::Reinitialize => self.handle_event(ThermalEvent::SystemInit, ports),
            AppCommand::ForceShutdown => self.force_shutdown(ports),
            AppCommand::UpdateConfig(new_config) => {
                new_config.validate()?;
                self.ctx.config = new_config;
                info!("Configuration updated at runtime");
                Ok(Dispatch::Stayed(self.ctx.current_state))
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot from the current context.
    pub fn telemetry(&self) -> TelemetryData {
        TelemetryData {
            state: self.ctx.current_state,
            previous_state: self.ctx.previous_state,
            temperature_c: self.ctx.current_temperature,
            fan_speed: self.ctx.current_fan_speed,
            emergency_cooling_active: self.ctx.emergency_cooling_active,
            state_entry_time: self.ctx.state_entry_time,
            state_transitions: self.ctx.state_transitions,
            events_processed: self.ctx.events_processed,
        }
    }

    /// Recent transitions, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.history.oldest_ordered()
    }

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.ctx.current_state
    }

    /// Display name of the current state, from the state table.
    pub fn state_name(&self) -> &'static str {
        self.fsm.state_name(self.ctx.current_state)
    }

    /// `true` in Shutdown: the host should stop normal control until an
    /// explicit [`AppCommand::Reinitialize`].
    pub fn is_terminal(&self) -> bool {
        self.ctx.current_state == StateId::Shutdown
    }

    /// Read-only view of the engine context.
    pub fn context(&self) -> &FsmContext {
        &self.ctx
    }

    /// The live configuration.
    pub fn config(&self) -> &ThermalConfig {
        &self.ctx.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn force_shutdown(&mut self, ports: &mut P) -> Result<Dispatch> {
        let dispatch = self.fsm.transition(&mut self.ctx, StateId::Shutdown, ports)?;
        self.record(dispatch, TransitionCause::Forced);
        Ok(dispatch)
    }

    fn record(&mut self, dispatch: Dispatch, cause: TransitionCause) {
        if let Dispatch::Transitioned { from, to } = dispatch {
            self.history.write(TransitionRecord {
                from,
                to,
                cause,
                at: self.ctx.state_entry_time,
            });
        }
    }
}

impl<P> core::fmt::Debug for ThermalService<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ThermalService")
            .field("ctx", &self.ctx)
            .field("history_len", &self.history.len())
            .field("consecutive_invalid", &self.consecutive_invalid)
            .finish_non_exhaustive()
    }
}
