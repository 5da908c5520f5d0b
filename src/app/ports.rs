//! Port traits: the boundary between the control core and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Furnace / AppService (domain)
//! ```
//!
//! Clocks, sensors, event sinks and the settings store are implemented
//! by adapters and injected through generics, so the core never touches
//! hardware directly.  The relay itself is any
//! [`embedded_hal::digital::OutputPin`].

use core::fmt;

use crate::zone::PersistedState;

// ───────────────────────────────────────────────────────────────
// Clocks
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond counter used to measure cycle deltas.
pub trait MonotonicClock {
    /// Milliseconds since an arbitrary fixed origin.  Must never go back.
    fn now_ms(&self) -> u64;
}

/// Local wall-clock position as consumed by the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalTime {
    /// 0–6, 0 = first day of the schedule week.
    pub day_of_week: u8,
    /// 0–23
    pub hour: u8,
    /// 0–59
    pub minute: u8,
}

/// Read-side port for local time.
pub trait WallClock {
    /// `None` while the clock is not set (e.g. before the RTC/NTP sync).
    fn local_time(&self) -> Option<LocalTime>;
}

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Supplies one temperature per zone per cycle.
pub trait TemperatureSource {
    /// Latest reading for `zone`, or `None` if no fresh value is
    /// available (the zone keeps its previous reading).
    fn read(&mut self, zone: usize) -> Option<crate::temperature::Temperature>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The service emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Settings port (driven adapter: domain ↔ persistent storage)
// ───────────────────────────────────────────────────────────────

/// Loads and stores each zone's [`PersistedState`].
///
/// Format, versioning and corruption recovery belong to the
/// implementation.
pub trait SettingsPort {
    fn load(&self, zone: usize) -> Result<PersistedState, SettingsError>;

    fn save(&mut self, zone: usize, state: &PersistedState) -> Result<(), SettingsError>;
}

/// Errors from [`SettingsPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsError {
    /// Nothing stored for this zone (first boot).
    NotFound,
    /// Stored bytes failed to decode.
    Corrupted,
    /// Underlying storage failed.
    IoError,
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "no stored state"),
            Self::Corrupted => write!(f, "stored state corrupted"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
