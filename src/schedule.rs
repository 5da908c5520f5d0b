//! Weekly heating schedule.
//!
//! A schedule is a 7 × 6 byte bitmap: 7 days (0 = first day of the week),
//! 48 half-hour slots per day, packed 8 slots per byte, least significant
//! bit first.
//!
//! ```text
//!  day d ─▶ [ byte0 | byte1 | byte2 | byte3 | byte4 | byte5 ]
//!             slots   slots   slots   slots   slots   slots
//!             0..8    8..16   16..24  24..32  32..40  40..48
//!
//!  slot = (hour << 1) | (minute >= 30)
//!  byte = slot >> 3          mask = 1 << (slot & 7)
//! ```
//!
//! A set bit selects the zone's *high* setpoint for that half hour, a
//! clear bit selects the *low* setpoint.  Any lookup that falls outside
//! the table resolves to low.

use serde::{Deserialize, Serialize};

/// Days per schedule.
pub const DAYS: usize = 7;
/// Packed bytes per day.
pub const BYTES_PER_DAY: usize = 6;
/// Half-hour slots per day.
pub const SLOTS_PER_DAY: u8 = 48;
/// Size of the flat wire/storage representation.
pub const SCHEDULE_BYTES: usize = DAYS * BYTES_PER_DAY;

// ───────────────────────────────────────────────────────────────
// Lookup key
// ───────────────────────────────────────────────────────────────

/// Pre-computed position of one half-hour slot in a [`ScheduleData`].
///
/// Cached by the zone whenever the wall clock moves so that the
/// per-cycle schedule lookup is a single indexed AND.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleKey {
    day: u8,
    byte: u8,
    mask: u8,
}

impl ScheduleKey {
    /// Build a key from a wall-clock tuple.
    ///
    /// Returns `None` for `day_of_week > 6`, `hour > 23` or `minute > 59`.
    pub fn new(day_of_week: u8, hour: u8, minute: u8) -> Option<Self> {
        if usize::from(day_of_week) >= DAYS || hour > 23 || minute > 59 {
            return None;
        }
        let slot = (hour << 1) | u8::from(minute >= 30);
        Some(Self::from_slot(day_of_week, slot))
    }

    /// Key for `slot` (0–47) of `day`.  Not range checked.
    pub const fn from_slot(day: u8, slot: u8) -> Self {
        Self {
            day,
            byte: slot >> 3,
            mask: 1 << (slot & 7),
        }
    }

    /// Key from raw parts.  Not range checked; lookups with an
    /// out-of-table key resolve to the low setpoint.
    pub const fn from_raw(day: u8, byte: u8, mask: u8) -> Self {
        Self { day, byte, mask }
    }

    pub const fn day(&self) -> u8 {
        self.day
    }

    pub const fn byte(&self) -> u8 {
        self.byte
    }

    pub const fn mask(&self) -> u8 {
        self.mask
    }
}

// ───────────────────────────────────────────────────────────────
// Schedule bitmap
// ───────────────────────────────────────────────────────────────

/// Packed weekly schedule.  `Default` is all-low.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleData([[u8; BYTES_PER_DAY]; DAYS]);

impl ScheduleData {
    pub const fn new(days: [[u8; BYTES_PER_DAY]; DAYS]) -> Self {
        Self(days)
    }

    /// Rebuild from the flat 42-byte layout (day-major).
    pub fn from_bytes(bytes: &[u8; SCHEDULE_BYTES]) -> Self {
        let mut days = [[0u8; BYTES_PER_DAY]; DAYS];
        for (day, chunk) in days.iter_mut().zip(bytes.chunks_exact(BYTES_PER_DAY)) {
            day.copy_from_slice(chunk);
        }
        Self(days)
    }

    /// Flatten to the 42-byte layout (day-major).
    pub fn to_bytes(&self) -> [u8; SCHEDULE_BYTES] {
        let mut out = [0u8; SCHEDULE_BYTES];
        for (chunk, day) in out.chunks_exact_mut(BYTES_PER_DAY).zip(self.0.iter()) {
            chunk.copy_from_slice(day);
        }
        out
    }

    /// `true` if the slot addressed by `key` selects the high setpoint.
    pub fn is_high(&self, key: ScheduleKey) -> bool {
        self.0
            .get(usize::from(key.day))
            .and_then(|day| day.get(usize::from(key.byte)))
            .is_some_and(|byte| byte & key.mask != 0)
    }

    /// Read one slot.  Out-of-range `day`/`slot` read as low.
    pub fn slot(&self, day: u8, slot: u8) -> bool {
        slot < SLOTS_PER_DAY && self.is_high(ScheduleKey::from_slot(day, slot))
    }

    /// Write one slot.  Returns `false` (and changes nothing) when
    /// `day`/`slot` is out of range.
    pub fn set_slot(&mut self, day: u8, slot: u8, high: bool) -> bool {
        if slot >= SLOTS_PER_DAY {
            return false;
        }
        let key = ScheduleKey::from_slot(day, slot);
        match self.0.get_mut(usize::from(day)) {
            Some(bytes) => {
                let byte = &mut bytes[usize::from(key.byte)];
                if high {
                    *byte |= key.mask;
                } else {
                    *byte &= !key.mask;
                }
                true
            }
            None => false,
        }
    }

    /// Write slots `from..to` of `day`.  `to` is clamped to 48.
    pub fn set_range(&mut self, day: u8, from: u8, to: u8, high: bool) -> bool {
        if usize::from(day) >= DAYS {
            return false;
        }
        for slot in from..to.min(SLOTS_PER_DAY) {
            self.set_slot(day, slot, high);
        }
        true
    }

    /// Raw bytes of one day.
    pub fn day(&self, day: u8) -> Option<&[u8; BYTES_PER_DAY]> {
        self.0.get(usize::from(day))
    }
}
