//! Fail-safe limits.
//!
//! Two kinds of hard limits sit above every configured setpoint:
//!
//! 1. **Temperature bounds**: at or below [`FAILSAFE_FLOOR`] a zone always
//!    demands heat (frost protection), at or above [`FAILSAFE_CEILING`] it
//!    never does (overheat protection).  Checked by the hysteresis latch
//!    before the normal band logic.
//! 2. **Window lockout**: after a window closes, the zone stays off for
//!    [`WINDOW_LOCKOUT_MS`] so a room that was just aired is not reheated
//!    straight away.
//!
//! Neither limit is configurable per zone.

use crate::temperature::Temperature;

/// 10.0 °C
pub const FAILSAFE_FLOOR: Temperature = Temperature::from_deci(100);

/// 30.0 °C
pub const FAILSAFE_CEILING: Temperature = Temperature::from_deci(300);

/// 10 minutes.
pub const WINDOW_LOCKOUT_MS: u32 = 10 * 60 * 1000;

/// Which bound a reading crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailSafeBreach {
    /// Reading at or below the floor: heating is forced on.
    BelowFloor,
    /// Reading at or above the ceiling: heating is forced off.
    AboveCeiling,
}

/// Absolute temperature bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailSafeBounds {
    pub floor: Temperature,
    pub ceiling: Temperature,
}

impl Default for FailSafeBounds {
    fn default() -> Self {
        Self {
            floor: FAILSAFE_FLOOR,
            ceiling: FAILSAFE_CEILING,
        }
    }
}

impl FailSafeBounds {
    /// Classify a reading.  The ceiling wins if the bounds ever overlap.
    pub fn check(&self, reading: Temperature) -> Option<FailSafeBreach> {
        if reading >= self.ceiling {
            Some(FailSafeBreach::AboveCeiling)
        } else if reading <= self.floor {
            Some(FailSafeBreach::BelowFloor)
        } else {
            None
        }
    }
}
