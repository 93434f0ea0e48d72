//! Outbound application records.
//!
//! [`ThermalService`](super::service::ThermalService) exposes these for
//! telemetry and diagnostics.  Adapters on the other side decide where they
//! go — serial log, a management bus, a status page.

use serde::{Deserialize, Serialize};

use crate::events::ThermalEvent;
use crate::fsm::StateId;
use crate::fsm::context::{FanSpeed, Timestamp};

/// What caused a recorded transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionCause {
    /// Dispatched through the transition table.
    Event(ThermalEvent),
    /// Forced by host policy (operator command or repeated invalid input).
    Forced,
}

/// One completed transition, kept in the service's bounded history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: StateId,
    pub to: StateId,
    pub cause: TransitionCause,
    /// Entry timestamp of `to`.
    pub at: Timestamp,
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryData {
    pub state: StateId,
    pub previous_state: StateId,
    pub temperature_c: u16,
    pub fan_speed: FanSpeed,
    pub emergency_cooling_active: bool,
    pub state_entry_time: Timestamp,
    pub state_transitions: u32,
    pub events_processed: u32,
}
