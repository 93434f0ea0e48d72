//! Log-based diagnostic sink adapter.
//!
//! Implements [`LogPort`] by writing each entry-action record to the `log`
//! facade (whatever backend the host installed).  A telemetry or
//! management-bus adapter would implement the same trait.

use log::{error, info, warn};

use crate::app::ports::{LogPort, Severity};
use crate::fsm::context::Snapshot;

/// Adapter that logs every entry-action record.
pub struct LogEventSink {
    records: u64,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self { records: 0 }
    }

    /// Records written so far.
    pub fn records(&self) -> u64 {
        self.records
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogPort for LogEventSink {
    fn log(&mut self, severity: Severity, snapshot: &Snapshot) {
        self.records += 1;
        let state = snapshot.state;
        let temp = snapshot.temperature_c;
        let fan = snapshot.fan_speed.percent();
        match severity {
            Severity::Info => {
                info!("THERM | state={state} | T={temp}\u{00b0}C | fan={fan}%");
            }
            Severity::Warning => {
                warn!("THERM | state={state} | T={temp}\u{00b0}C | fan={fan}%");
            }
            Severity::Error => {
                error!("THERM | state={state} | T={temp}\u{00b0}C | fan={fan}%");
            }
            Severity::Critical => {
                error!("THERM CRITICAL | state={state} | T={temp}\u{00b0}C | fan={fan}%");
            }
        }
    }
}
