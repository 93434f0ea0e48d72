//! Integration tests for the concrete adapters wired into the service.

use std::convert::Infallible;

use embedded_hal::pwm::{ErrorType, SetDutyCycle};

use thermalctl::ThermalEvent;
use thermalctl::adapters::PortBundle;
use thermalctl::adapters::config_store::{JsonFileConfigStore, MemoryConfigStore};
use thermalctl::adapters::log_sink::LogEventSink;
use thermalctl::adapters::pwm_fan::PwmFan;
use thermalctl::adapters::time::MonotonicClock;
use thermalctl::app::commands::AppCommand;
use thermalctl::app::ports::ConfigPort;
use thermalctl::app::service::ThermalService;
use thermalctl::config::ThermalConfig;
use thermalctl::fsm::StateId;

/// 10-bit PWM channel.
struct TenBitPwm {
    duty: u16,
}

impl ErrorType for TenBitPwm {
    type Error = Infallible;
}

impl SetDutyCycle for TenBitPwm {
    fn max_duty_cycle(&self) -> u16 {
        1023
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duty = duty;
        Ok(())
    }
}

type HostPorts = PortBundle<PwmFan<TenBitPwm>, LogEventSink, MonotonicClock>;

fn host_ports() -> HostPorts {
    PortBundle::new(
        PwmFan::new(TenBitPwm { duty: 0 }),
        LogEventSink::new(),
        MonotonicClock::new(),
    )
}

#[test]
fn service_drives_pwm_channel_through_bundle() {
    let mut svc: ThermalService<HostPorts> = ThermalService::new(ThermalConfig::default()).unwrap();
    let mut ports = host_ports();

    svc.handle_event(ThermalEvent::SystemInit, &mut ports).unwrap();
    assert_eq!(ports.fan.commanded().percent(), 30);

    svc.handle_reading(99, &mut ports).unwrap();
    assert_eq!(svc.state(), StateId::EmergencyCooling);
    assert_eq!(ports.fan.commanded().percent(), 100);
    assert_eq!(ports.log.records(), 2);
    assert_eq!(ports.fan.write_failures(), 0);

    let pwm = ports.fan.release();
    assert_eq!(pwm.duty, 1023);
}

#[test]
fn monotonic_entry_times_through_bundle() {
    let mut svc: ThermalService<HostPorts> = ThermalService::new(ThermalConfig::default()).unwrap();
    let mut ports = host_ports();
    svc.handle_command(AppCommand::Reinitialize, &mut ports).unwrap();
    let first = svc.telemetry().state_entry_time;
    svc.handle_reading(86, &mut ports).unwrap();
    assert!(svc.telemetry().state_entry_time >= first);
}

#[test]
fn service_boots_from_persisted_json_config() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonFileConfigStore::new(dir.path().join("thermal.json"));

    let mut cfg = ThermalConfig::default();
    cfg.thresholds.warning_c = 60;
    cfg.fan.normal = 40;
    store.save(&cfg).unwrap();

    let mut svc: ThermalService<HostPorts> = ThermalService::new(store.load_or_default()).unwrap();
    let mut ports = host_ports();
    svc.handle_command(AppCommand::Reinitialize, &mut ports).unwrap();
    assert_eq!(ports.fan.commanded().percent(), 40);

    svc.handle_reading(65, &mut ports).unwrap();
    assert_eq!(svc.state(), StateId::Warning);
}

#[test]
fn missing_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileConfigStore::new(dir.path().join("absent.json"));
    assert_eq!(store.load_or_default(), ThermalConfig::default());
}

#[test]
fn runtime_config_update_can_be_persisted() {
    let mut store = MemoryConfigStore::new();
    let mut svc: ThermalService<HostPorts> = ThermalService::new(store.load_or_default()).unwrap();
    let mut ports = host_ports();

    let mut cfg = ThermalConfig::default();
    cfg.fan.critical = 90;
    svc.handle_command(AppCommand::UpdateConfig(cfg.clone()), &mut ports)
        .unwrap();
    store.save(svc.config()).unwrap();

    assert_eq!(store.load().unwrap(), cfg);
}
