//! Thermal management controller library.
//!
//! An event-driven state machine for BMC fan control: a pure temperature
//! classifier feeds thermal events into a table-driven FSM whose entry and
//! exit actions drive the fan and the diagnostic log through injected
//! ports.
//!
//! ```text
//!  reading ──▶ classifier ──▶ ThermalEvent ──▶ Fsm ──▶ FanPort / LogPort
//! ```

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod classifier;
pub mod config;
pub mod error;
pub mod events;
pub mod fsm;


pub use classifier::{classify, classify_with};
pub use error::{Error, Result};
pub use events::ThermalEvent;
pub use fsm::StateId;
