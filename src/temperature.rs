//! Fixed-point temperature type.
//!
//! Every temperature in the control core is an integer number of
//! deci-degrees Celsius (°C × 10).  No floating point is used anywhere
//! in the decision path.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Temperature in deci-degrees Celsius (`215` = 21.5 °C).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Temperature(i16);

impl Temperature {
    pub const ZERO: Self = Self(0);

    /// Construct from a raw deci-degree value.
    pub const fn from_deci(deci: i16) -> Self {
        Self(deci)
    }

    /// Construct from whole degrees (saturates outside the i16 range).
    pub const fn from_celsius(celsius: i16) -> Self {
        Self(celsius.saturating_mul(10))
    }

    /// Raw deci-degree value.
    pub const fn deci(self) -> i16 {
        self.0
    }

    pub const fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{}\u{00b0}C", abs / 10, abs % 10)
    }
}
