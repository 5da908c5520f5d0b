//! Multi-zone heating controller.
//!
//! Each [`zone::ZoneController`] decides whether its room wants heat; the
//! [`furnace::Furnace`] ORs those demands onto one shared relay.  The
//! [`app`] layer wraps both behind port traits so the same core runs on
//! hardware, in the host simulator, and under test.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod furnace;
pub mod safety;
pub mod schedule;
pub mod temperature;
pub mod zone;

pub use error::{Error, Result};
