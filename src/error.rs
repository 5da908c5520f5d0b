//! Error types for the edges of the controller.
//!
//! The control core itself never fails: bad inputs are clamped or
//! ignored.  Errors only exist where the core meets the outside world
//! (configuration handed in, the relay output, the settings store).
//! All variants are `Copy` so they can be logged and passed around
//! without allocation.

use core::fmt;

use crate::app::ports::SettingsError;

/// Every fallible edge operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration failed range validation.
    Config(&'static str),
    /// The furnace relay output could not be driven.
    Actuator(ActuatorError),
    /// The settings store failed.
    Settings(SettingsError),
    /// A zone index outside the controller's fixed zone set.
    UnknownZone(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Settings(e) => write!(f, "settings: {e}"),
            Self::UnknownZone(idx) => write!(f, "unknown zone index {idx}"),
        }
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// Output pin write returned an error.
    RelayWriteFailed(embedded_hal::digital::ErrorKind),
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RelayWriteFailed(kind) => write!(f, "relay write failed ({kind:?})"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

impl From<SettingsError> for Error {
    fn from(e: SettingsError) -> Self {
        Self::Settings(e)
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
