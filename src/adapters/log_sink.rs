//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade.  Telemetry is rendered as one JSON object per zone
//! so the lines can be scraped.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => match serde_json::to_string(t) {
                Ok(json) => info!("TELEM | {}", json),
                Err(e) => warn!("TELEM | zone {} not serialisable: {}", t.zone, e),
            },
            AppEvent::FurnaceChanged { active } => {
                info!("FURNACE | {}", if *active { "ON" } else { "OFF" });
            }
            AppEvent::ZoneActionChanged { zone, from, to } => {
                info!("ZONE {} | {:?} -> {:?}", zone, from, to);
            }
            AppEvent::StateSaved { zone } => {
                info!("ZONE {} | state saved", zone);
            }
            AppEvent::Started { zones } => {
                info!("START | zones={}", zones);
            }
        }
    }
}
