//! Inbound commands to the application service.
//!
//! These are the actions a UI, a message-bus integration or the settings
//! layer can request.  The [`AppService`](super::service::AppService)
//! routes each one to the addressed zone.

use crate::config::ZoneConfig;
use crate::temperature::Temperature;
use crate::zone::Mode;

/// One operation on a single zone.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneCommand {
    SetMode(Mode),
    SetHighTarget(Temperature),
    SetLowTarget(Temperature),
    /// Timed manual setpoint (ignored while the zone is `Off`).
    OverrideTarget(Temperature),
    /// Cancel the manual setpoint.
    ResetTarget,
    StartOrExtendBoost,
    StopBoost,
    /// Window contact changed (`true` = open).
    WindowOpened(bool),
    /// Hot-replace the zone configuration.  Must already be validated.
    ReplaceConfig(ZoneConfig),
}

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Apply `command` to zone `zone`.
    Zone { zone: usize, command: ZoneCommand },

    /// Emit a telemetry snapshot for every zone right away.
    PublishTelemetry,
}
