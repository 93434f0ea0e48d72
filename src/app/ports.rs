//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Fsm / ThermalService (domain)
//! ```
//!
//! Driven adapters (fan PWM, log sink, clock, config storage) implement
//! these traits.  The engine consumes them via generics, so the domain core
//! never touches hardware directly.
//!
//! Every port call is synchronous: it has completed by the time the engine
//! moves on to the next step of a transition.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ThermalConfig;
use crate::error::Result;
use crate::fsm::context::{FanSpeed, Snapshot, Timestamp};

// ───────────────────────────────────────────────────────────────
// Fan port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Actuator hook called by every entry action.
pub trait FanPort {
    /// Command the fan.  `speed` is always within 0–100%.
    fn set_fan_speed(&mut self, speed: FanSpeed);
}

// ───────────────────────────────────────────────────────────────
// Log port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// Diagnostic severity attached to each entry-action log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        })
    }
}

/// Diagnostic sink.  Called exactly once per entry action, after the fan
/// has been commanded, so the snapshot carries the new duty.
pub trait LogPort {
    fn log(&mut self, severity: Severity, snapshot: &Snapshot);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time source.  Read once per completed transition.
pub trait ClockPort {
    fn now(&self) -> Timestamp;
}

/// Everything a transition needs.  Blanket-implemented, so a single mock
/// or a [`PortBundle`](crate::adapters::PortBundle) satisfies it.
pub trait ThermalPorts: FanPort + LogPort + ClockPort {}

impl<T: FanPort + LogPort + ClockPort> ThermalPorts for T {}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists controller configuration.
///
/// Implementations MUST call [`ThermalConfig::validate`] before persisting.
/// Invalid values are rejected with [`Error::Config`](crate::error::Error::Config),
/// not silently clamped.
pub trait ConfigPort {
    /// Load configuration.  Fails with `StorageError::NotFound` if nothing
    /// has been stored yet.
    fn load(&self) -> Result<ThermalConfig>;

    /// Validate and persist configuration.
    fn save(&mut self, config: &ThermalConfig) -> Result<()>;

    /// Load, falling back to [`ThermalConfig::default`] on any failure.
    fn load_or_default(&self) -> ThermalConfig {
        match self.load() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("config load failed ({e}), using defaults");
                ThermalConfig::default()
            }
        }
    }
}
