//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (operator
//! console, management bus, boot logic) that the
//! [`ThermalService`](super::service::ThermalService) interprets.

use crate::config::ThermalConfig;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Dispatch `SystemInit` (boot, or manual recovery from Shutdown).
    Reinitialize,

    /// Force the machine into Shutdown regardless of the table (host
    /// hardware-fault policy).
    ForceShutdown,

    /// Hot-reload configuration.  Rejected if it fails validation.
    UpdateConfig(ThermalConfig),
}
