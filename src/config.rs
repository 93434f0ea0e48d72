//! System configuration parameters
//!
//! All tunable parameters for the thermal controller.
//! Values can be overridden through a [`ConfigPort`](crate::app::ports::ConfigPort)
//! or at runtime with `AppCommand::UpdateConfig`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Temperature thresholds (inclusive lower bounds, degrees C).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemperatureThresholds {
    /// At or above this the reading classifies as `TempWarning`.
    pub warning_c: u16,
    /// At or above this the reading classifies as `TempCritical`.
    pub critical_c: u16,
    /// At or above this the reading classifies as `TempExtreme`.
    pub extreme_c: u16,
}

impl Default for TemperatureThresholds {
    fn default() -> Self {
        Self {
            warning_c: 70,
            critical_c: 85,
            extreme_c: 95,
        }
    }
}

/// Fan duty (0-100%) commanded by each state's entry action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanProfile {
    pub idle: u8,
    pub normal: u8,
    pub warning: u8,
    pub critical: u8,
    pub emergency: u8,
    pub shutdown: u8,
}

impl Default for FanProfile {
    fn default() -> Self {
        Self {
            idle: 0,
            normal: 30,
            warning: 60,
            critical: 85,
            emergency: 100,
            shutdown: 100,
        }
    }
}

impl FanProfile {
    fn all(&self) -> [u8; 6] {
        [
            self.idle,
            self.normal,
            self.warning,
            self.critical,
            self.emergency,
            self.shutdown,
        ]
    }
}

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThermalConfig {
    // --- Classifier ---
    pub thresholds: TemperatureThresholds,

    // --- Actuator ---
    pub fan: FanProfile,

    // --- Context defaults ---
    /// Temperature assumed before the first reading arrives (degrees C).
    pub ambient_temperature_c: u16,

    // --- Host fault policy ---
    /// Consecutive invalid raw events tolerated before forcing Shutdown.
    pub max_consecutive_invalid_events: u8,
}

impl Default for ThermalConfig {
    fn default() -> Self {
        Self {
            thresholds: TemperatureThresholds::default(),
            fan: FanProfile::default(),
            ambient_temperature_c: 25,
            max_consecutive_invalid_events: 3,
        }
    }
}

impl ThermalConfig {
    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<()> {
        let t = &self.thresholds;
        if !(t.warning_c < t.critical_c && t.critical_c < t.extreme_c) {
            return Err(Error::Config(
                "thresholds must be strictly increasing (warning < critical < extreme)",
            ));
        }
        if self.fan.all().iter().any(|&duty| duty > 100) {
            return Err(Error::Config("fan duty must be within 0-100%"));
        }
        if self.max_consecutive_invalid_events == 0 {
            return Err(Error::Config("max_consecutive_invalid_events must be > 0"));
        }
        Ok(())
    }
}
