//! Simulation adapters for host runs and tests.
//!
//! - [`SimRelay`]: an infallible [`OutputPin`] whose level is shared
//!   through a [`RelayProbe`].
//! - [`SimClock`]: a manually advanced clock serving both clock ports.
//! - [`SimRooms`]: a first-order thermal model per zone, heated while the
//!   relay is on.

use core::cell::Cell;
use core::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, OutputPin};

use crate::app::ports::{LocalTime, MonotonicClock, TemperatureSource, WallClock};
use crate::temperature::Temperature;

const MINUTES_PER_WEEK: u64 = 7 * 24 * 60;

// ───────────────────────────────────────────────────────────────
// Relay
// ───────────────────────────────────────────────────────────────

/// Read-only view of a [`SimRelay`].
#[derive(Debug, Clone, Default)]
pub struct RelayProbe {
    level: Rc<Cell<bool>>,
    writes: Rc<Cell<u32>>,
}

impl RelayProbe {
    pub fn is_high(&self) -> bool {
        self.level.get()
    }

    /// Total writes, including the initial one.
    pub fn writes(&self) -> u32 {
        self.writes.get()
    }
}

#[derive(Debug, Default)]
pub struct SimRelay {
    probe: RelayProbe,
}

impl SimRelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn probe(&self) -> RelayProbe {
        self.probe.clone()
    }

    fn write(&mut self, high: bool) {
        self.probe.level.set(high);
        self.probe.writes.set(self.probe.writes.get() + 1);
    }
}

impl ErrorType for SimRelay {
    type Error = Infallible;
}

impl OutputPin for SimRelay {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true);
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Clock
// ───────────────────────────────────────────────────────────────

/// Shared manual clock.  Clones observe the same time.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    now_ms: Rc<Cell<u64>>,
    /// Minute of the week at `now_ms == 0` (0 = Monday 00:00).
    week_origin_min: u64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the wall clock at `day` `hour`:`minute`.
    pub fn starting_at(day: u8, hour: u8, minute: u8) -> Self {
        Self {
            now_ms: Rc::default(),
            week_origin_min: (u64::from(day) * 24 + u64::from(hour)) * 60 + u64::from(minute),
        }
    }

    pub fn advance_ms(&self, ms: u64) {
        self.now_ms.set(self.now_ms.get().saturating_add(ms));
    }
}

impl MonotonicClock for SimClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }
}

impl WallClock for SimClock {
    fn local_time(&self) -> Option<LocalTime> {
        let minute_of_week = (self.week_origin_min + self.now_ms.get() / 60_000) % MINUTES_PER_WEEK;
        Some(LocalTime {
            day_of_week: (minute_of_week / (24 * 60)) as u8,
            hour: (minute_of_week / 60 % 24) as u8,
            minute: (minute_of_week % 60) as u8,
        })
    }
}

// ───────────────────────────────────────────────────────────────
// Thermal model
// ───────────────────────────────────────────────────────────────

/// Per-hour rates of the room model.
#[derive(Debug, Clone, Copy)]
pub struct RoomModel {
    /// Outdoor temperature (°C).
    pub outside_c: f32,
    /// Fraction of the indoor/outdoor gap lost per hour.
    pub loss_per_hour: f32,
    /// Degrees gained per hour while the furnace runs.
    pub heat_per_hour: f32,
}

impl Default for RoomModel {
    fn default() -> Self {
        Self {
            outside_c: 5.0,
            loss_per_hour: 0.10,
            heat_per_hour: 3.0,
        }
    }
}

/// `N` rooms sharing one heat source.
pub struct SimRooms<const N: usize> {
    model: RoomModel,
    temps_c: [f32; N],
    windows: [bool; N],
    relay: RelayProbe,
}

impl<const N: usize> SimRooms<N> {
    pub fn new(model: RoomModel, initial_c: [f32; N], relay: RelayProbe) -> Self {
        Self {
            model,
            temps_c: initial_c,
            windows: [false; N],
            relay,
        }
    }

    /// An open window triples the heat loss of that room.
    pub fn set_window(&mut self, zone: usize, open: bool) {
        if let Some(w) = self.windows.get_mut(zone) {
            *w = open;
        }
    }

    /// Advance the model by `elapsed_ms`.
    pub fn step(&mut self, elapsed_ms: u64) {
        let hours = elapsed_ms as f32 / 3_600_000.0;
        let heating = self.relay.is_high();
        for (t, &window) in self.temps_c.iter_mut().zip(&self.windows) {
            let loss = if window { 3.0 } else { 1.0 } * self.model.loss_per_hour;
            *t -= (*t - self.model.outside_c) * loss * hours;
            if heating {
                *t += self.model.heat_per_hour * hours;
            }
        }
    }

    pub fn celsius(&self, zone: usize) -> Option<f32> {
        self.temps_c.get(zone).copied()
    }
}

impl<const N: usize> TemperatureSource for SimRooms<N> {
    fn read(&mut self, zone: usize) -> Option<Temperature> {
        let c = self.celsius(zone)?;
        Some(Temperature::from_deci((c * 10.0).round() as i16))
    }
}
