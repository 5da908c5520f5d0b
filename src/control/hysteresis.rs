//! Two-point hysteresis latch with fail-safe overrides.
//!
//! ```text
//!            not calling                         calling
//!   ───────────────────────────      ───────────────────────────────
//!   reading <= target - under  ─▶ ON  reading >= target + over  ─▶ OFF
//!                                     (>= target when the furnace is
//!                                      already running)
//!
//!   reading <= floor   ─▶ ON   regardless of band or current side
//!   reading >= ceiling ─▶ OFF  regardless of band or current side
//! ```
//!
//! Inside the band the latch keeps its previous side, which is what
//! stops the relay from chattering.

use crate::safety::{FailSafeBounds, FailSafeBreach};
use crate::temperature::Temperature;

/// Margins around the target, both in deci-degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HysteresisBand {
    /// How far below target the reading must fall before heating starts.
    pub undershoot: Temperature,
    /// How far above target the reading must rise before heating stops.
    pub overshoot: Temperature,
}

/// Why the latch changed side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flip {
    Band,
    FailSafe(FailSafeBreach),
}

/// Remembers which side of the band a zone is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HysteresisLatch {
    calling: bool,
    bounds: FailSafeBounds,
}

impl Default for HysteresisLatch {
    fn default() -> Self {
        Self::new()
    }
}

impl HysteresisLatch {
    /// Start on the "not calling" side with the standard bounds.
    pub fn new() -> Self {
        Self {
            calling: false,
            bounds: FailSafeBounds::default(),
        }
    }

    pub fn is_calling(&self) -> bool {
        self.calling
    }

    /// Evaluate one reading.  Returns the new side and, if the side
    /// changed, the reason.
    pub fn update(
        &mut self,
        reading: Temperature,
        target: Temperature,
        band: HysteresisBand,
        furnace_active: bool,
    ) -> (bool, Option<Flip>) {
        let next = match self.bounds.check(reading) {
            Some(breach @ FailSafeBreach::AboveCeiling) => (false, Flip::FailSafe(breach)),
            Some(breach @ FailSafeBreach::BelowFloor) => (true, Flip::FailSafe(breach)),
            None if self.calling => {
                let off_at = if furnace_active {
                    target
                } else {
                    target.saturating_add(band.overshoot)
                };
                (reading < off_at, Flip::Band)
            }
            None => (reading <= target.saturating_sub(band.undershoot), Flip::Band),
        };

        let (calling, reason) = next;
        let flipped = calling != self.calling;
        self.calling = calling;
        (calling, flipped.then_some(reason))
    }
}
