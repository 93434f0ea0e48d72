//! Temperature classifier.
//!
//! Maps a raw reading (whole degrees C) onto a discrete [`ThermalEvent`].
//! Pure and total: thresholds are inclusive lower bounds and the highest
//! matching threshold wins.
//!
//! ```text
//!   0 ─────────── 70 ─────────── 85 ─────────── 95 ──────────▶ °C
//!     TempNormal     TempWarning    TempCritical    TempExtreme
//! ```

use crate::config::TemperatureThresholds;
use crate::events::ThermalEvent;

/// Classify `temperature_c` against `thresholds`.
pub fn classify_with(temperature_c: u16, thresholds: &TemperatureThresholds) -> ThermalEvent {
    if temperature_c >= thresholds.extreme_c {
        ThermalEvent::TempExtreme
    } else if temperature_c >= thresholds.critical_c {
        ThermalEvent::TempCritical
    } else if temperature_c >= thresholds.warning_c {
        ThermalEvent::TempWarning
    } else {
        ThermalEvent::TempNormal
    }
}

/// Classify against the default 70 / 85 / 95 thresholds.
pub fn classify(temperature_c: u16) -> ThermalEvent {
    classify_with(temperature_c, &TemperatureThresholds::default())
}
