//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements   | Connects to                       |
//! |----------------|--------------|-----------------------------------|
//! | `pwm_fan`      | FanPort      | embedded-hal PWM channel          |
//! | `log_sink`     | LogPort      | `log` facade                      |
//! | `time`         | ClockPort    | `std::time::Instant`              |
//! | `config_store` | ConfigPort   | postcard blob / JSON file         |
//!
//! [`PortBundle`] glues one fan, one log sink and one clock into a single
//! value satisfying [`ThermalPorts`](crate::app::ports::ThermalPorts).

pub mod config_store;
pub mod log_sink;
pub mod pwm_fan;
pub mod time;

use crate::app::ports::{ClockPort, FanPort, LogPort, Severity};
use crate::fsm::context::{FanSpeed, Snapshot, Timestamp};

/// Separate adapters presented to the engine as one ports value.
pub struct PortBundle<F, L, C> {
    pub fan: F,
    pub log: L,
    pub clock: C,
}

impl<F, L, C> PortBundle<F, L, C> {
    pub fn new(fan: F, log: L, clock: C) -> Self {
        Self { fan, log, clock }
    }
}

impl<F: FanPort, L, C> FanPort for PortBundle<F, L, C> {
    fn set_fan_speed(&mut self, speed: FanSpeed) {
        self.fan.set_fan_speed(speed);
    }
}

impl<F, L: LogPort, C> LogPort for PortBundle<F, L, C> {
    fn log(&mut self, severity: Severity, snapshot: &Snapshot) {
        self.log.log(severity, snapshot);
    }
}

impl<F, L, C: ClockPort> ClockPort for PortBundle<F, L, C> {
    fn now(&self) -> Timestamp {
        self.clock.now()
    }
}
