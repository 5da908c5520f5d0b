//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide where they end up.

use serde::Serialize;

use crate::temperature::Temperature;
use crate::zone::{HvacAction, Mode};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started.
    Started { zones: usize },

    /// The shared furnace relay was switched.
    FurnaceChanged { active: bool },

    /// A zone's reported action changed.
    ZoneActionChanged {
        zone: usize,
        from: HvacAction,
        to: HvacAction,
    },

    /// Periodic or on-demand zone snapshot.
    Telemetry(ZoneTelemetry),

    /// A zone's persistable state was written to the settings store.
    StateSaved { zone: usize },
}

/// A point-in-time view of one zone, suitable for transmission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneTelemetry {
    pub zone: usize,
    pub mode: Mode,
    pub action: HvacAction,
    pub current: Option<Temperature>,
    pub target: Option<Temperature>,
    pub high_target: Temperature,
    pub low_target: Temperature,
    pub boost_active: bool,
    pub boost_remaining_secs: u32,
    pub override_active: bool,
    pub override_remaining_secs: u32,
    pub window_open: bool,
    pub window_lockout_secs: u32,
}
