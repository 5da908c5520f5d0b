//! Application core: pure domain orchestration, zero I/O.
//!
//! [`service::AppService`] wraps the [`Furnace`](crate::furnace::Furnace)
//! and routes [`commands`] in and [`events`] out.  All interaction with
//! the outside world happens through the **port traits** in [`ports`], so
//! the layer is fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
