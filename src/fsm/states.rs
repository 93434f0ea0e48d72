//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers — no closures, no dynamic
//! dispatch, no heap.  Entry actions are generic over the injected ports
//! and monomorphise into ordinary function pointers.
//!
//! ```text
//!            SystemInit / TempNormal
//!  IDLE ───────────────────────────▶ NORMAL ◀──────────────┐
//!   ▲                                 │  ▲                  │
//!   │                        TempWarn │  │ TempNormal       │ TempNormal
//!   │                                 ▼  │ CoolingSuccess   │
//!   │                               WARNING ◀────────┐      │
//!   │                                 │  ▲           │      │
//!   │                        TempCrit │  │ TempWarn  │      │
//!   │                                 ▼  │ CoolingOk │      │
//!   │                               CRITICAL         │      │
//!   │                                 │      CoolingSuccess │
//!   │                     TempExtreme │      TempWarning    │
//!   │                                 ▼              │      │
//!   │                          EMERGENCY_COOLING ────┴──────┘
//!   │                                 │
//!   │ SystemInit          CoolingFailure
//!   │                                 ▼
//!   └──────────────────────────── SHUTDOWN
//! ```
//!
//! `TempExtreme` reaches EMERGENCY_COOLING from NORMAL, WARNING and
//! CRITICAL alike; `TempCritical` reaches CRITICAL from NORMAL and WARNING.

use log::{error, info, warn};

use super::context::{FanSpeed, FsmContext};
use super::{StateDescriptor, StateId};
use crate::app::ports::{Severity, ThermalPorts};
use crate::events::ThermalEvent;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the state table.  Called once when the engine is constructed.
pub fn build_state_table<P: ThermalPorts>() -> [StateDescriptor<P>; StateId::COUNT] {
    [
        // Index 0 — Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "IDLE",
            on_enter: Some(idle_enter::<P>),
            on_exit: None,
            handle_event: idle_event,
        },
        // Index 1 — Normal
        StateDescriptor {
            id: StateId::Normal,
            name: "NORMAL",
            on_enter: Some(normal_enter::<P>),
            on_exit: None,
            handle_event: normal_event,
        },
        // Index 2 — Warning
        StateDescriptor {
            id: StateId::Warning,
            name: "WARNING",
            on_enter: Some(warning_enter::<P>),
            on_exit: None,
            handle_event: warning_event,
        },
        // Index 3 — Critical
        StateDescriptor {
            id: StateId::Critical,
            name: "CRITICAL",
            on_enter: Some(critical_enter::<P>),
            on_exit: None,
            handle_event: critical_event,
        },
        // Index 4 — EmergencyCooling
        StateDescriptor {
            id: StateId::EmergencyCooling,
            name: "EMERGENCY_COOLING",
            on_enter: Some(emergency_enter::<P>),
            on_exit: Some(emergency_exit::<P>),
            handle_event: emergency_event,
        },
        // Index 5 — Shutdown
        StateDescriptor {
            id: StateId::Shutdown,
            name: "SHUTDOWN",
            on_enter: Some(shutdown_enter::<P>),
            on_exit: None,
            handle_event: shutdown_event,
        },
    ]
}

/// Shared tail of every entry action: command the fan, then log once.
fn apply_entry<P: ThermalPorts>(ctx: &mut FsmContext, ports: &mut P, duty: u8, severity: Severity) {
    let speed = FanSpeed::saturating(duty);
    ctx.current_fan_speed = speed;
    ports.set_fan_speed(speed);
    ports.log(severity, &ctx.snapshot());
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter<P: ThermalPorts>(ctx: &mut FsmContext, ports: &mut P) {
    info!("IDLE: fan off, waiting for SystemInit");
    let duty = ctx.config.fan.idle;
    apply_entry(ctx, ports, duty, Severity::Info);
}

fn idle_event(event: ThermalEvent) -> StateId {
    match event {
        ThermalEvent::SystemInit | ThermalEvent::TempNormal => StateId::Normal,
        _ => StateId::Idle,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  NORMAL state
// ═══════════════════════════════════════════════════════════════════════════

fn normal_enter<P: ThermalPorts>(ctx: &mut FsmContext, ports: &mut P) {
    info!("NORMAL: {}\u{00b0}C, fan low", ctx.current_temperature);
    let duty = ctx.config.fan.normal;
    apply_entry(ctx, ports, duty, Severity::Info);
}

fn normal_event(event: ThermalEvent) -> StateId {
    match event {
        ThermalEvent::TempWarning => StateId::Warning,
        ThermalEvent::TempCritical => StateId::Critical,
        ThermalEvent::TempExtreme => StateId::EmergencyCooling,
        _ => StateId::Normal,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  WARNING state
// ═══════════════════════════════════════════════════════════════════════════

fn warning_enter<P: ThermalPorts>(ctx: &mut FsmContext, ports: &mut P) {
    warn!("WARNING: {}\u{00b0}C, fan medium", ctx.current_temperature);
    let duty = ctx.config.fan.warning;
    apply_entry(ctx, ports, duty, Severity::Warning);
}

fn warning_event(event: ThermalEvent) -> StateId {
    match event {
        ThermalEvent::TempNormal | ThermalEvent::CoolingSuccess => StateId::Normal,
        ThermalEvent::TempCritical => StateId::Critical,
        ThermalEvent::TempExtreme => StateId::EmergencyCooling,
        _ => StateId::Warning,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  CRITICAL state
// ═══════════════════════════════════════════════════════════════════════════

fn critical_enter<P: ThermalPorts>(ctx: &mut FsmContext, ports: &mut P) {
    warn!("CRITICAL: {}\u{00b0}C, fan high", ctx.current_temperature);
    let duty = ctx.config.fan.critical;
    apply_entry(ctx, ports, duty, Severity::Error);
}

fn critical_event(event: ThermalEvent) -> StateId {
    match event {
        ThermalEvent::TempNormal => StateId::Normal,
        ThermalEvent::TempWarning | ThermalEvent::CoolingSuccess => StateId::Warning,
        ThermalEvent::TempExtreme => StateId::EmergencyCooling,
        _ => StateId::Critical,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  EMERGENCY_COOLING state — maximum airflow, externally flagged
// ═══════════════════════════════════════════════════════════════════════════

fn emergency_enter<P: ThermalPorts>(ctx: &mut FsmContext, ports: &mut P) {
    error!("EMERGENCY_COOLING: {}\u{00b0}C, fan at maximum", ctx.current_temperature);
    ctx.emergency_cooling_active = true;
    let duty = ctx.config.fan.emergency;
    apply_entry(ctx, ports, duty, Severity::Critical);
}

fn emergency_exit<P: ThermalPorts>(ctx: &mut FsmContext, _ports: &mut P) {
    ctx.emergency_cooling_active = false;
    info!("EMERGENCY_COOLING: cleared on state exit");
}

fn emergency_event(event: ThermalEvent) -> StateId {
    match event {
        ThermalEvent::CoolingSuccess | ThermalEvent::TempWarning => StateId::Warning,
        ThermalEvent::CoolingFailure => StateId::Shutdown,
        ThermalEvent::TempNormal => StateId::Normal,
        _ => StateId::EmergencyCooling,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  SHUTDOWN state — terminal until an explicit SystemInit
// ═══════════════════════════════════════════════════════════════════════════

fn shutdown_enter<P: ThermalPorts>(ctx: &mut FsmContext, ports: &mut P) {
    // Fan stays at maximum while the host powers down.
    error!(
        "SHUTDOWN: cooling failed at {}\u{00b0}C, manual SystemInit required",
        ctx.current_temperature
    );
    let duty = ctx.config.fan.shutdown;
    apply_entry(ctx, ports, duty, Severity::Critical);
}

fn shutdown_event(event: ThermalEvent) -> StateId {
    if event == ThermalEvent::SystemInit {
        return StateId::Idle;
    }
    StateId::Shutdown
}
