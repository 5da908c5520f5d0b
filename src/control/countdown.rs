//! Millisecond countdown timer.
//!
//! Time only moves when [`Countdown::advance`] is called with a measured
//! delta, so the timer is immune to wall-clock jumps and trivially
//! drivable from tests.

/// Convert seconds to milliseconds, saturating at `u32::MAX`.
pub const fn secs_to_ms(secs: u32) -> u32 {
    secs.saturating_mul(1000)
}

/// A countdown that runs while `remaining_ms > 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Countdown {
    remaining_ms: u32,
}

impl Countdown {
    /// A stopped countdown.
    pub const fn stopped() -> Self {
        Self { remaining_ms: 0 }
    }

    /// (Re)start with `ms` remaining.
    pub fn start(&mut self, ms: u32) {
        self.remaining_ms = ms;
    }

    /// Add `ms` to whatever is left.
    pub fn extend(&mut self, ms: u32) {
        self.remaining_ms = self.remaining_ms.saturating_add(ms);
    }

    /// Cap the remaining time at `ms`.
    pub fn clamp_to(&mut self, ms: u32) {
        self.remaining_ms = self.remaining_ms.min(ms);
    }

    pub fn cancel(&mut self) {
        self.remaining_ms = 0;
    }

    /// Consume `elapsed_ms`, stopping at zero.
    pub fn advance(&mut self, elapsed_ms: u32) {
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
    }

    pub fn is_running(&self) -> bool {
        self.remaining_ms > 0
    }

    pub fn remaining_ms(&self) -> u32 {
        self.remaining_ms
    }

    /// Whole seconds left (truncating).
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_ms / 1000
    }
}
