//! Control primitives used by the zone engine.

pub mod countdown;
pub mod hysteresis;
