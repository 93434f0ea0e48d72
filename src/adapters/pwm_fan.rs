//! PWM fan driver adapter.
//!
//! Implements [`FanPort`] over any `embedded-hal` PWM channel, so the same
//! adapter drives an MCU timer, a Linux sysfs PWM wrapper, or a fan
//! controller IC exposed through a HAL crate.
//!
//! ## Failure handling
//!
//! The engine treats the fan hook as infallible.  A failed duty write is
//! logged at `error`, counted, and leaves [`PwmFan::commanded`] at the last
//! value the hardware actually accepted; the host can poll
//! [`PwmFan::write_failures`] to escalate.

use embedded_hal::pwm::{Error as _, SetDutyCycle};
use log::{debug, error};

use crate::app::ports::FanPort;
use crate::error::{ActuatorError, Result};
use crate::fsm::context::FanSpeed;

pub struct PwmFan<P> {
    channel: P,
    commanded: FanSpeed,
    write_failures: u32,
}

impl<P: SetDutyCycle> PwmFan<P> {
    /// Wrap `channel`.  The fan is not touched until the first command.
    pub fn new(channel: P) -> Self {
        Self {
            channel,
            commanded: FanSpeed::OFF,
            write_failures: 0,
        }
    }

    /// Write `speed` to the channel, reporting failure to the caller.
    pub fn try_set(&mut self, speed: FanSpeed) -> Result<()> {
        match self.channel.set_duty_cycle_percent(speed.percent()) {
            Ok(()) => {
                debug!(
                    "fan PWM: {}% ({}/{})",
                    speed.percent(),
                    u32::from(self.channel.max_duty_cycle()) * u32::from(speed.percent()) / 100,
                    self.channel.max_duty_cycle()
                );
                self.commanded = speed;
                Ok(())
            }
            Err(e) => {
                self.write_failures = self.write_failures.saturating_add(1);
                error!("fan PWM write failed: {:?}", e.kind());
                Err(ActuatorError::PwmWriteFailed.into())
            }
        }
    }

    /// Last speed the channel accepted.
    pub fn commanded(&self) -> FanSpeed {
        self.commanded
    }

    /// Failed writes since construction.
    pub fn write_failures(&self) -> u32 {
        self.write_failures
    }

    /// Give the channel back.
    pub fn release(self) -> P {
        self.channel
    }
}

impl<P: SetDutyCycle> FanPort for PwmFan<P> {
    fn set_fan_speed(&mut self, speed: FanSpeed) {
        // Failure is already logged and counted by `try_set`.
        let _ = self.try_set(speed);
    }
}
