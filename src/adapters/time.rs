//! Host time adapter.
//!
//! Provides both clock ports for the controller:
//!
//! - [`MonotonicClock`]: `std::time::Instant`, measured from construction.
//! - [`WallClock`]: local time via `chrono`, with Monday as schedule day 0.

use std::time::Instant;

use chrono::{Datelike, Local, NaiveDateTime, Timelike};

use crate::app::ports::{LocalTime, MonotonicClock, WallClock};

/// System clock adapter for host builds.
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl MonotonicClock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

impl WallClock for SystemClock {
    fn local_time(&self) -> Option<LocalTime> {
        Some(local_time_of(Local::now().naive_local()))
    }
}

/// Map a calendar time onto the schedule week (Monday = 0).
pub fn local_time_of(at: NaiveDateTime) -> LocalTime {
    LocalTime {
        day_of_week: at.weekday().num_days_from_monday() as u8,
        hour: at.hour() as u8,
        minute: at.minute() as u8,
    }
}
