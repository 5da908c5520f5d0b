//! Configuration parameters
//!
//! Per-zone tunables ([`ZoneConfig`]) and controller-wide timing
//! ([`ControllerConfig`]).  Both are plain values: the settings layer
//! loads them, runs [`ZoneConfig::validate`], and hands them over.  A
//! zone never mutates its configuration; it is replaced wholesale.

use serde::{Deserialize, Serialize};

use crate::control::hysteresis::HysteresisBand;
use crate::error::{Error, Result};
use crate::schedule::ScheduleData;
use crate::temperature::Temperature;

/// Four hours.  Suggested value for [`ZoneConfig::boost_max_secs`].
pub const BOOST_CEILING_SECS: u32 = 4 * 60 * 60;

/// Largest accepted hysteresis margin (5.0 °C).
const MAX_MARGIN: Temperature = Temperature::from_deci(50);

/// Accepted range for the Holiday setpoint (5.0 °C – 30.0 °C).
const HOLIDAY_RANGE: (Temperature, Temperature) =
    (Temperature::from_deci(50), Temperature::from_deci(300));

/// Per-zone configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneConfig {
    // --- Manual override ---
    /// How long a manual setpoint override lasts (seconds).
    pub override_timeout_secs: u32,

    // --- Boost ---
    /// Boost length when started from idle (seconds).
    pub boost_duration_secs: u32,
    /// Time added per request while boost is already running (seconds).
    pub boost_extension_secs: u32,
    /// Optional cap on the remaining boost time (seconds).
    /// `None` leaves extensions unbounded.
    pub boost_max_secs: Option<u32>,

    // --- Hysteresis ---
    /// Margin above target before heating stops (deci-degrees).
    pub overshoot: Temperature,
    /// Margin below target before heating starts (deci-degrees).
    pub undershoot: Temperature,

    // --- Setpoints ---
    /// Fixed target while in Holiday mode.
    pub holiday_target: Temperature,
    /// Weekly high/low bitmap used in Auto mode.
    pub schedule: ScheduleData,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            override_timeout_secs: 60 * 60,
            boost_duration_secs: 30 * 60,
            boost_extension_secs: 15 * 60,
            boost_max_secs: None,
            overshoot: Temperature::from_deci(5),
            undershoot: Temperature::from_deci(5),
            holiday_target: Temperature::from_deci(120),
            schedule: ScheduleData::default(),
        }
    }
}

impl ZoneConfig {
    pub fn band(&self) -> HysteresisBand {
        HysteresisBand {
            undershoot: self.undershoot,
            overshoot: self.overshoot,
        }
    }

    /// Range-check every field.  The zone engine trusts its config, so
    /// this must pass before a config reaches it.
    pub fn validate(&self) -> Result<()> {
        if self.override_timeout_secs == 0 {
            return Err(Error::Config("override_timeout_secs must be > 0"));
        }
        if self.boost_duration_secs == 0 {
            return Err(Error::Config("boost_duration_secs must be > 0"));
        }
        if let Some(max) = self.boost_max_secs {
            if max < self.boost_duration_secs {
                return Err(Error::Config("boost_max_secs must be >= boost_duration_secs"));
            }
        }
        for margin in [self.overshoot, self.undershoot] {
            if margin < Temperature::ZERO || margin > MAX_MARGIN {
                return Err(Error::Config("hysteresis margin must be within 0.0..=5.0 C"));
            }
        }
        let (lo, hi) = HOLIDAY_RANGE;
        if self.holiday_target < lo || self.holiday_target > hi {
            return Err(Error::Config("holiday_target must be within 5.0..=30.0 C"));
        }
        Ok(())
    }
}

/// Controller-wide timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Control cycle period (milliseconds).
    pub cycle_interval_ms: u32,
    /// Telemetry report period (milliseconds).
    pub telemetry_interval_ms: u32,
    /// How long a zone may hold unsaved changes before it is saved (milliseconds).
    pub auto_save_delay_ms: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            cycle_interval_ms: 1000,       // 1 Hz
            telemetry_interval_ms: 60_000, // 1/min
            auto_save_delay_ms: 5000,
        }
    }
}
