//! Fuzz target: `ThermalService::handle_raw_event`
//!
//! Treats every input byte as a raw event (even bytes) or a temperature
//! reading (odd bytes, next byte is the value) and asserts that the
//! service never panics and keeps its context consistent.
//!
//! cargo fuzz run fuzz_raw_events

#![no_main]

use libfuzzer_sys::fuzz_target;
use thermalctl::app::ports::{ClockPort, FanPort, LogPort, Severity};
use thermalctl::app::service::ThermalService;
use thermalctl::config::ThermalConfig;
use thermalctl::fsm::StateId;
use thermalctl::fsm::context::{FanSpeed, Snapshot, Timestamp};

struct Sink;

impl FanPort for Sink {
    fn set_fan_speed(&mut self, speed: FanSpeed) {
        assert!(speed.percent() <= 100);
    }
}

impl LogPort for Sink {
    fn log(&mut self, _severity: Severity, _snapshot: &Snapshot) {}
}

impl ClockPort for Sink {
    fn now(&self) -> Timestamp {
        Timestamp::from_micros(0)
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(mut svc) = ThermalService::new(ThermalConfig::default()) else {
        return;
    };
    let mut ports = Sink;

    let mut bytes = data.iter().copied();
    while let Some(b) = bytes.next() {
        let before = svc.telemetry();
        if b & 1 == 1 {
            let Some(t) = bytes.next() else { break };
            let _ = svc.handle_reading(u16::from(t), &mut ports);
        } else {
            let _ = svc.handle_raw_event(b >> 1, &mut ports);
        }
        let after = svc.telemetry();

        assert_eq!(
            after.emergency_cooling_active,
            after.state == StateId::EmergencyCooling
        );
        assert!(after.events_processed >= before.events_processed);
        assert!(after.state_transitions >= before.state_transitions);
        if after.state == before.state {
            assert_eq!(after.previous_state, before.previous_state);
        }
    }
});
