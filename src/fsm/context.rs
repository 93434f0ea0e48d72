//! Engine context threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that state handlers read from and
//! write to.  It holds the current/previous state, the latest temperature,
//! the fan duty last commanded, diagnostic timing and the dispatch
//! counters.  One context exists per controlled subsystem; only the
//! engine mutates it.

use serde::{Deserialize, Serialize};

use crate::config::ThermalConfig;

use super::StateId;

// ---------------------------------------------------------------------------
// Fan speed
// ---------------------------------------------------------------------------

/// Fan duty in percent.  Always within 0–100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct FanSpeed(u8);

impl FanSpeed {
    pub const OFF: Self = Self(0);
    pub const MAX: Self = Self(100);

    /// `None` if `percent` exceeds 100.
    pub const fn new(percent: u8) -> Option<Self> {
        if percent <= 100 {
            Some(Self(percent))
        } else {
            None
        }
    }

    /// Clamp `percent` into range.
    pub const fn saturating(percent: u8) -> Self {
        if percent > 100 { Self::MAX } else { Self(percent) }
    }

    pub const fn percent(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for FanSpeed {
    type Error = &'static str;

    fn try_from(percent: u8) -> Result<Self, Self::Error> {
        Self::new(percent).ok_or("fan speed above 100%")
    }
}

impl From<FanSpeed> for u8 {
    fn from(speed: FanSpeed) -> Self {
        speed.0
    }
}

// ---------------------------------------------------------------------------
// Timestamp
// ---------------------------------------------------------------------------

/// Monotonic timestamp in microseconds since the host clock's epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub const fn from_micros(us: u64) -> Self {
        Self(us)
    }

    pub const fn as_micros(self) -> u64 {
        self.0
    }

    /// Microseconds elapsed between `earlier` and `self` (zero if reversed).
    pub const fn micros_since(self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

// ---------------------------------------------------------------------------
// Log snapshot
// ---------------------------------------------------------------------------

/// What the log hook sees on every entry action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: StateId,
    pub temperature_c: u16,
    pub fan_speed: FanSpeed,
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The machine instance passed to every state handler.
#[derive(Debug, Clone)]
pub struct FsmContext {
    // -- State --
    pub current_state: StateId,
    /// State before the latest completed transition.
    pub previous_state: StateId,

    // -- Readings / outputs --
    /// Latest temperature recorded by the host (degrees C).
    pub current_temperature: u16,
    /// Fan duty last commanded by an entry action.
    pub current_fan_speed: FanSpeed,
    /// Set only while in `EmergencyCooling`.
    pub emergency_cooling_active: bool,

    // -- Timing --
    /// When the current state was entered (diagnostics only).
    pub state_entry_time: Timestamp,

    // -- Counters (saturate at `u32::MAX`) --
    pub state_transitions: u32,
    pub events_processed: u32,

    // -- Configuration --
    pub config: ThermalConfig,
}

impl FsmContext {
    /// Fresh context in `Idle` at the configured ambient temperature.
    /// No action runs here.
    pub fn new(config: ThermalConfig) -> Self {
        Self {
            current_state: StateId::Idle,
            previous_state: StateId::Idle,
            current_temperature: config.ambient_temperature_c,
            current_fan_speed: FanSpeed::OFF,
            emergency_cooling_active: false,
            state_entry_time: Timestamp::default(),
            state_transitions: 0,
            events_processed: 0,
            config,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.current_state,
            temperature_c: self.current_temperature,
            fan_speed: self.current_fan_speed,
        }
    }
}
