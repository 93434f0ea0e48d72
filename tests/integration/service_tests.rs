//! Integration tests for the ThermalService → FSM → ports pipeline.
//!
//! Verify that readings, events and commands reach the fan and log ports
//! in the right order, with the counters and history the host relies on.

use crate::mock_hw::{MockHardware, PortCall};

use thermalctl::app::commands::AppCommand;
use thermalctl::app::events::TransitionCause;
use thermalctl::app::ports::Severity;
use thermalctl::app::service::ThermalService;
use thermalctl::config::ThermalConfig;
use thermalctl::events::EventQueue;
use thermalctl::fsm::{Dispatch, StateId};
use thermalctl::{Error, ThermalEvent};

fn make_service() -> (ThermalService<MockHardware>, MockHardware) {
    let svc = ThermalService::new(ThermalConfig::default()).unwrap();
    (svc, MockHardware::new())
}

fn booted() -> (ThermalService<MockHardware>, MockHardware) {
    let (mut svc, mut hw) = make_service();
    svc.handle_command(AppCommand::Reinitialize, &mut hw).unwrap();
    hw.clear();
    (svc, hw)
}

// ── Construction ─────────────────────────────────────────────

#[test]
fn construction_runs_no_actions() {
    let (svc, hw) = make_service();
    let t = svc.telemetry();
    assert_eq!(t.state, StateId::Idle);
    assert_eq!(t.previous_state, StateId::Idle);
    assert_eq!(t.temperature_c, 25);
    assert_eq!(t.fan_speed.percent(), 0);
    assert_eq!((t.state_transitions, t.events_processed), (0, 0));
    assert!(!t.emergency_cooling_active);
    assert!(hw.calls.is_empty());
    assert_eq!(hw.clock_reads(), 0);
}

// ── Reference scenarios ──────────────────────────────────────

#[test]
fn system_init_enters_normal() {
    let (mut svc, mut hw) = make_service();
    let d = svc.handle_command(AppCommand::Reinitialize, &mut hw).unwrap();
    assert_eq!(
        d,
        Dispatch::Transitioned {
            from: StateId::Idle,
            to: StateId::Normal
        }
    );
    assert_eq!(svc.telemetry().fan_speed.percent(), 30);
    assert_eq!(svc.telemetry().state_transitions, 1);
    assert_eq!(svc.telemetry().previous_state, StateId::Idle);
}

#[test]
fn warning_reading_from_normal() {
    let (mut svc, mut hw) = booted();
    svc.handle_reading(75, &mut hw).unwrap();
    assert_eq!(svc.state(), StateId::Warning);
    assert_eq!(hw.fan_percent(), Some(60));
    assert_eq!(hw.severities(), [Severity::Warning]);
}

#[test]
fn extreme_reading_from_warning_starts_emergency_cooling() {
    let (mut svc, mut hw) = booted();
    svc.handle_reading(75, &mut hw).unwrap();
    svc.handle_reading(98, &mut hw).unwrap();
    let t = svc.telemetry();
    assert_eq!(t.state, StateId::EmergencyCooling);
    assert_eq!(t.fan_speed.percent(), 100);
    assert!(t.emergency_cooling_active);
}

#[test]
fn cooling_success_leaves_emergency_for_warning() {
    let (mut svc, mut hw) = booted();
    svc.handle_reading(98, &mut hw).unwrap();
    svc.handle_event(ThermalEvent::CoolingSuccess, &mut hw).unwrap();
    let t = svc.telemetry();
    assert_eq!(t.state, StateId::Warning);
    assert_eq!(t.previous_state, StateId::EmergencyCooling);
    assert_eq!(t.fan_speed.percent(), 60);
    assert!(!t.emergency_cooling_active);
}

#[test]
fn cooling_failure_shuts_down_until_reinitialised() {
    let (mut svc, mut hw) = booted();
    svc.handle_reading(98, &mut hw).unwrap();
    svc.handle_event(ThermalEvent::CoolingFailure, &mut hw).unwrap();
    assert!(svc.is_terminal());
    assert_eq!(svc.telemetry().fan_speed.percent(), 100);
    assert!(!svc.telemetry().emergency_cooling_active);

    let transitions = svc.telemetry().state_transitions;
    hw.clear();
    let d = svc.handle_event(ThermalEvent::TempNormal, &mut hw).unwrap();
    assert_eq!(d, Dispatch::Stayed(StateId::Shutdown));
    assert_eq!(svc.telemetry().state_transitions, transitions);
    assert!(hw.calls.is_empty());

    svc.handle_command(AppCommand::Reinitialize, &mut hw).unwrap();
    assert_eq!(svc.state(), StateId::Idle);
    assert_eq!(svc.telemetry().fan_speed.percent(), 0);
    assert_eq!(hw.severities(), [Severity::Info]);
}

#[test]
fn scripted_heat_up_and_cool_down() {
    let (mut svc, mut hw) = make_service();
    svc.handle_event(ThermalEvent::SystemInit, &mut hw).unwrap();
    for t in [45, 75, 90, 98] {
        svc.handle_reading(t, &mut hw).unwrap();
    }
    svc.record_temperature(68);
    svc.handle_event(ThermalEvent::CoolingSuccess, &mut hw).unwrap();
    svc.handle_reading(43, &mut hw).unwrap();

    let t = svc.telemetry();
    assert_eq!(t.state, StateId::Normal);
    assert_eq!(t.temperature_c, 43);
    assert_eq!(t.fan_speed.percent(), 30);
    assert_eq!(t.state_transitions, 6);
    assert_eq!(t.events_processed, 7);

    let fans: Vec<u8> = hw
        .calls
        .iter()
        .filter_map(|c| match c {
            PortCall::SetFan(p) => Some(*p),
            PortCall::Log { .. } => None,
        })
        .collect();
    assert_eq!(fans, [30, 60, 85, 100, 60, 30]);
    assert_eq!(
        hw.severities(),
        [
            Severity::Info,
            Severity::Warning,
            Severity::Error,
            Severity::Critical,
            Severity::Warning,
            Severity::Info,
        ]
    );
    assert_eq!(hw.clock_reads(), 6);
}

// ── Port contract ────────────────────────────────────────────

#[test]
fn fan_is_set_before_the_entry_is_logged() {
    let (mut svc, mut hw) = booted();
    svc.handle_reading(88, &mut hw).unwrap();
    assert_eq!(hw.calls.len(), 2);
    assert_eq!(hw.calls[0], PortCall::SetFan(85));
    match &hw.calls[1] {
        PortCall::Log { severity, snapshot } => {
            assert_eq!(*severity, Severity::Error);
            assert_eq!(snapshot.state, StateId::Critical);
            assert_eq!(snapshot.temperature_c, 88);
            assert_eq!(snapshot.fan_speed.percent(), 85);
        }
        other => panic!("expected log record, got {other:?}"),
    }
}

#[test]
fn same_band_reading_counts_event_but_runs_nothing() {
    let (mut svc, mut hw) = booted();
    let reads = hw.clock_reads();
    let d = svc.handle_reading(50, &mut hw).unwrap();
    assert_eq!(d, Dispatch::Stayed(StateId::Normal));
    assert!(hw.calls.is_empty());
    assert_eq!(hw.clock_reads(), reads);
    let t = svc.telemetry();
    assert_eq!(t.events_processed, 2);
    assert_eq!(t.state_transitions, 1);
    assert_eq!(t.temperature_c, 50);
}

#[test]
fn entry_timestamp_comes_from_the_clock() {
    let (mut svc, mut hw) = make_service();
    svc.handle_event(ThermalEvent::SystemInit, &mut hw).unwrap();
    let first = svc.telemetry().state_entry_time;
    svc.handle_reading(72, &mut hw).unwrap();
    let second = svc.telemetry().state_entry_time;
    assert_eq!(second.micros_since(first), 1_000);
}

// ── Error paths ──────────────────────────────────────────────

#[test]
fn unknown_raw_event_changes_nothing() {
    let (mut svc, mut hw) = booted();
    let before = svc.telemetry();
    assert_eq!(svc.handle_raw_event(7, &mut hw), Err(Error::InvalidEvent(7)));
    assert_eq!(svc.telemetry(), before);
    assert!(hw.calls.is_empty());
}

#[test]
fn faulty_event_source_forces_shutdown() {
    let (mut svc, mut hw) = booted();
    for _ in 0..3 {
        assert_eq!(svc.handle_raw_event(0xFF, &mut hw), Err(Error::InvalidEvent(0xFF)));
    }
    assert!(svc.is_terminal());
    assert_eq!(hw.fan_percent(), Some(100));
    assert_eq!(hw.severities(), [Severity::Critical]);
    let last = svc.history().last().copied().unwrap();
    assert_eq!(last.cause, TransitionCause::Forced);
}

#[test]
fn invalid_event_budget_is_configurable() {
    let mut cfg = ThermalConfig::default();
    cfg.max_consecutive_invalid_events = 1;
    let mut svc = ThermalService::new(cfg).unwrap();
    let mut hw = MockHardware::new();
    svc.handle_command(AppCommand::Reinitialize, &mut hw).unwrap();
    let _ = svc.handle_raw_event(42, &mut hw);
    assert!(svc.is_terminal());
}

// ── Commands ─────────────────────────────────────────────────

#[test]
fn force_shutdown_from_any_running_state() {
    let (mut svc, mut hw) = booted();
    svc.handle_reading(90, &mut hw).unwrap();
    let d = svc.handle_command(AppCommand::ForceShutdown, &mut hw).unwrap();
    assert_eq!(
        d,
        Dispatch::Transitioned {
            from: StateId::Critical,
            to: StateId::Shutdown
        }
    );
    let again = svc.handle_command(AppCommand::ForceShutdown, &mut hw).unwrap();
    assert_eq!(again, Dispatch::Stayed(StateId::Shutdown));
}

#[test]
fn force_shutdown_out_of_emergency_clears_flag() {
    let (mut svc, mut hw) = booted();
    svc.handle_reading(97, &mut hw).unwrap();
    svc.handle_command(AppCommand::ForceShutdown, &mut hw).unwrap();
    assert!(!svc.telemetry().emergency_cooling_active);
}

#[test]
fn updated_fan_profile_applies_on_next_entry() {
    let (mut svc, mut hw) = booted();
    let mut cfg = ThermalConfig::default();
    cfg.fan.warning = 70;
    svc.handle_command(AppCommand::UpdateConfig(cfg), &mut hw).unwrap();
    // No entry has run yet, so the fan keeps its old duty.
    assert_eq!(svc.telemetry().fan_speed.percent(), 30);

    svc.handle_reading(80, &mut hw).unwrap();
    assert_eq!(hw.fan_percent(), Some(70));
}

// ── Queue ────────────────────────────────────────────────────

#[test]
fn events_from_another_thread_are_drained_in_order() {
    let (mut svc, mut hw) = make_service();
    let mut queue: EventQueue<16> = EventQueue::new();
    let (mut tx, mut rx) = queue.split();

    std::thread::scope(|s| {
        s.spawn(move || {
            for event in [
                ThermalEvent::SystemInit,
                ThermalEvent::TempWarning,
                ThermalEvent::TempExtreme,
                ThermalEvent::CoolingFailure,
            ] {
                assert!(tx.push(event));
            }
        });
    });

    assert_eq!(svc.drain(&mut rx, &mut hw), Ok(4));
    assert!(rx.is_empty());
    assert!(svc.is_terminal());
    let path: Vec<_> = svc.history().map(|r| r.to).collect();
    assert_eq!(
        path,
        [
            StateId::Normal,
            StateId::Warning,
            StateId::EmergencyCooling,
            StateId::Shutdown,
        ]
    );
}
