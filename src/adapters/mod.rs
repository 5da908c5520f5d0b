//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements                      | Connects to            |
//! |------------|---------------------------------|------------------------|
//! | `log_sink` | EventSink                       | `log` facade           |
//! | `settings` | SettingsPort                    | In-memory postcard blobs|
//! | `sim`      | OutputPin, clocks, TemperatureSource | Thermal model     |
//! | `time`     | MonotonicClock, WallClock       | Host system clock      |

pub mod log_sink;
pub mod settings;
pub mod sim;
pub mod time;
