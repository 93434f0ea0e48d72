//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern ported to Rust:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  StateTable                                                    │
//! │  ┌───────────────────┬────────────┬────────────┬─────────────┐ │
//! │  │ StateId           │ on_enter   │ on_exit    │ handle_event│ │
//! │  ├───────────────────┼────────────┼────────────┼─────────────┤ │
//! │  │ Idle              │ fn(ctx,io) │ —          │ fn(ev)->St  │ │
//! │  │ Normal            │ fn(ctx,io) │ —          │ fn(ev)->St  │ │
//! │  │ Warning           │ fn(ctx,io) │ —          │ fn(ev)->St  │ │
//! │  │ Critical          │ fn(ctx,io) │ —          │ fn(ev)->St  │ │
//! │  │ EmergencyCooling  │ fn(ctx,io) │ fn(ctx,io) │ fn(ev)->St  │ │
//! │  │ Shutdown          │ fn(ctx,io) │ —          │ fn(ev)->St  │ │
//! │  └───────────────────┴────────────┴────────────┴─────────────┘ │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each dispatched event is handed to `handle_event` of the **current**
//! state.  If it names a different state, the engine runs `on_exit` for
//! the current state, updates the context, then runs `on_enter` for the
//! next one.  Adding a state means adding one row; the dispatcher never
//! changes.

pub mod context;
pub mod states;

use core::fmt;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::ThermalPorts;
use crate::error::{Error, Result};
use crate::events::ThermalEvent;
use context::FsmContext;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all thermal-response regimes.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum StateId {
    Idle = 0,
    Normal = 1,
    Warning = 2,
    Critical = 3,
    EmergencyCooling = 4,
    Shutdown = 5,
}

impl StateId {
    /// Total number of states — used to size the table array.
    pub const COUNT: usize = 6;

    /// Every state, in table order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Idle,
        Self::Normal,
        Self::Warning,
        Self::Critical,
        Self::EmergencyCooling,
        Self::Shutdown,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Normal => "NORMAL",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
            Self::EmergencyCooling => "EMERGENCY_COOLING",
            Self::Shutdown => "SHUTDOWN",
        }
    }
}

impl TryFrom<u8> for StateId {
    type Error = Error;

    fn try_from(raw: u8) -> Result<Self> {
        Self::ALL
            .get(raw as usize)
            .copied()
            .ok_or(Error::InvalidTargetState(raw))
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each state transition.
pub type StateActionFn<P> = fn(&mut FsmContext, &mut P);

/// Pure per-state transition function.  Total over every event; returns
/// the owning state to mean "stay".
pub type EventHandlerFn = fn(ThermalEvent) -> StateId;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
/// Stored in a fixed-size array — no heap, no `dyn`.
pub struct StateDescriptor<P> {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn<P>>,
    pub on_exit: Option<StateActionFn<P>>,
    pub handle_event: EventHandlerFn,
}

/// Result of a successful dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The table mapped the event back onto the current state.
    Stayed(StateId),
    /// A full exit → update → enter sequence ran.
    Transitioned { from: StateId, to: StateId },
}

impl Dispatch {
    pub fn state(self) -> StateId {
        match self {
            Self::Stayed(s) | Self::Transitioned { to: s, .. } => s,
        }
    }
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the immutable state table; all mutable state lives in the
/// caller-owned [`FsmContext`], and all side effects go through the
/// injected ports `P`.
pub struct Fsm<P> {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor<P>; StateId::COUNT],
}

impl<P: ThermalPorts> Fsm<P> {
    /// Construct an engine over the given state table.
    pub fn new(table: [StateDescriptor<P>; StateId::COUNT]) -> Self {
        Self { table }
    }

    /// Pure table lookup: where does `event` take `state`?
    pub fn handle_event(&self, state: StateId, event: ThermalEvent) -> StateId {
        (self.table[state as usize].handle_event)(event)
    }

    /// Display name from the table row for `state`.
    pub fn state_name(&self, state: StateId) -> &'static str {
        self.table[state as usize].name
    }

    /// Dispatch one event.
    ///
    /// 1. Count the event.
    /// 2. Ask the current state's handler for the next state.
    /// 3. If it differs, run the transition.
    pub fn process_event(
        &self,
        ctx: &mut FsmContext,
        event: ThermalEvent,
        ports: &mut P,
    ) -> Result<Dispatch> {
        ctx.events_processed = ctx.events_processed.saturating_add(1);

        let next = self.handle_event(ctx.current_state, event);
        if next == ctx.current_state {
            return Ok(Dispatch::Stayed(next));
        }

        self.transition(ctx, next, ports)
    }

    /// Dispatch an event given as its raw discriminant (e.g. straight off a
    /// bus or queue).  Unknown values are rejected before anything is
    /// counted.
    pub fn process_raw_event(
        &self,
        ctx: &mut FsmContext,
        raw: u8,
        ports: &mut P,
    ) -> Result<Dispatch> {
        let event = ThermalEvent::try_from(raw).inspect_err(|_| {
            warn!("FSM rejected raw event {raw}");
        })?;
        self.process_event(ctx, event, ports)
    }

    /// Move to `next`: `on_exit(current)` → update context → `on_enter(next)`.
    ///
    /// A no-op when `next` is already current.  Fails with
    /// [`Error::InvalidTargetState`] before touching anything if the table
    /// has no valid row for `next`.
    pub fn transition(
        &self,
        ctx: &mut FsmContext,
        next: StateId,
        ports: &mut P,
    ) -> Result<Dispatch> {
        let from = ctx.current_state;
        if next == from {
            return Ok(Dispatch::Stayed(from));
        }

        let Some(target) = self.table.get(next as usize).filter(|row| row.id == next) else {
            warn!("FSM table has no valid row for {next:?}");
            return Err(Error::InvalidTargetState(next as u8));
        };

        info!(
            "FSM transition: {} -> {}",
            self.table[from as usize].name, target.name
        );

        // Exit current state
        if let Some(exit) = self.table[from as usize].on_exit {
            exit(ctx, ports);
        }

        // Update pointer and timing
        ctx.previous_state = from;
        ctx.current_state = next;
        ctx.state_entry_time = ports.now();
        ctx.state_transitions = ctx.state_transitions.saturating_add(1);

        // Enter new state
        if let Some(enter) = target.on_enter {
            enter(ctx, ports);
        }

        Ok(Dispatch::Transitioned { from, to: next })
    }

    /// Transition given a raw state discriminant.
    pub fn transition_raw(&self, ctx: &mut FsmContext, raw: u8, ports: &mut P) -> Result<Dispatch> {
        let next = StateId::try_from(raw)?;
        self.transition(ctx, next, ports)
    }
}

impl<P: ThermalPorts> Default for Fsm<P> {
    fn default() -> Self {
        Self::new(states::build_state_table())
    }
}
