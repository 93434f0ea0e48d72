//! thermal-sim — host-side replay of the fan-control scenario.
//!
//! Drives a [`ThermalService`] through a scripted heat-up / cool-down
//! sequence against a simulated probe and PWM channel, then prints the
//! controller statistics.
//!
//! ```text
//! thermal-sim [config.json]
//! ```
//!
//! Set `RUST_LOG=debug` to see every PWM write.

use std::convert::Infallible;

use anyhow::{Context, Result, bail};
use embedded_hal::pwm::{ErrorType, SetDutyCycle};
use log::info;

use thermalctl::ThermalEvent;
use thermalctl::adapters::PortBundle;
use thermalctl::adapters::config_store::JsonFileConfigStore;
use thermalctl::adapters::log_sink::LogEventSink;
use thermalctl::adapters::pwm_fan::PwmFan;
use thermalctl::adapters::time::MonotonicClock;
use thermalctl::app::commands::AppCommand;
use thermalctl::app::ports::ConfigPort;
use thermalctl::app::service::ThermalService;
use thermalctl::config::ThermalConfig;

/// Probe readings are clamped to this range.
const PROBE_MIN_C: i32 = 20;
const PROBE_MAX_C: i32 = 100;

// ── Simulated hardware ────────────────────────────────────────

/// 8-bit PWM channel that just remembers its duty.
struct SimPwm {
    duty: u16,
}

impl ErrorType for SimPwm {
    type Error = Infallible;
}

impl SetDutyCycle for SimPwm {
    fn max_duty_cycle(&self) -> u16 {
        255
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duty = duty;
        Ok(())
    }
}

/// Temperature probe whose reading moves by scripted deltas.
struct SimProbe {
    celsius: u16,
}

impl SimProbe {
    fn change(&mut self, delta: i32) -> u16 {
        let before = self.celsius;
        let after = (i32::from(before) + delta).clamp(PROBE_MIN_C, PROBE_MAX_C);
        self.celsius = after as u16;
        info!("probe: {before}\u{00b0}C -> {}\u{00b0}C", self.celsius);
        self.celsius
    }
}

/// One scripted step: a probe delta, then either the classified reading
/// or an explicit event.
enum Step {
    Event(ThermalEvent),
    Reading(i32),
    ReadingThen(i32, ThermalEvent),
}

const SCENARIO: &[(&str, Step)] = &[
    ("power on", Step::Event(ThermalEvent::SystemInit)),
    ("normal operation", Step::Reading(20)),
    ("temperature rising to warning", Step::Reading(30)),
    ("temperature rising to critical", Step::Reading(15)),
    ("extreme temperature, emergency cooling", Step::Reading(8)),
    ("cooling succeeded", Step::ReadingThen(-30, ThermalEvent::CoolingSuccess)),
    ("back to normal", Step::Reading(-25)),
];

fn load_config() -> Result<ThermalConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let store = JsonFileConfigStore::new(&path);
            store
                .load()
                .with_context(|| format!("loading config from {path}"))
        }
        None => Ok(ThermalConfig::default()),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    let mut probe = SimProbe {
        celsius: config.ambient_temperature_c,
    };
    let mut service = ThermalService::new(config).context("invalid configuration")?;
    let mut ports = PortBundle::new(
        PwmFan::new(SimPwm { duty: 0 }),
        LogEventSink::new(),
        MonotonicClock::new(),
    );

    info!("=== thermal controller simulation ===");
    for (label, step) in SCENARIO {
        info!("--- {label} ---");
        match *step {
            Step::Event(ThermalEvent::SystemInit) => {
                service.handle_command(AppCommand::Reinitialize, &mut ports)?;
            }
            Step::Event(event) => {
                service.handle_event(event, &mut ports)?;
            }
            Step::Reading(delta) => {
                let t = probe.change(delta);
                service.handle_reading(t, &mut ports)?;
            }
            Step::ReadingThen(delta, event) => {
                // The cooling verdict replaces classification of this reading.
                service.record_temperature(probe.change(delta));
                service.handle_event(event, &mut ports)?;
            }
        }
    }

    if ports.fan.write_failures() > 0 {
        bail!("{} fan PWM writes failed", ports.fan.write_failures());
    }

    let t = service.telemetry();
    println!("=== statistics ===");
    println!("state transitions : {}", t.state_transitions);
    println!("events processed  : {}", t.events_processed);
    println!("final state       : {}", service.state_name());
    println!("final temperature : {}\u{00b0}C", probe.celsius);
    println!("final fan speed   : {}%", t.fan_speed.percent());
    println!("log records       : {}", ports.log.records());
    println!("PWM duty          : {}/255", ports.fan.release().duty);
    Ok(())
}
