//! Furnace aggregator.
//!
//! Owns every [`ZoneController`] and the single relay output that fires
//! the shared heat source.
//!
//! ```text
//!            ┌──────────────────── Furnace::tick ─────────────────────┐
//!  clock ──▶ │ delta = now - last                                     │
//!            │ zone[i].tick(delta)                 for every zone     │
//!            │ demand |= zone[i].calling_for_heating(prev_active)     │
//!            │ if demand != latched { relay.set_state(demand) }       │ ──▶ relay
//!            └────────────────────────────────────────────────────────┘
//! ```
//!
//! Every zone sees the relay state latched at the end of the *previous*
//! cycle, so the result never depends on zone order.  The relay is only
//! written on an edge; a failed write leaves the latch untouched and the
//! write is retried on the next cycle.

use embedded_hal::digital::{Error as _, OutputPin, PinState};
use log::{info, warn};

use crate::app::ports::MonotonicClock;
use crate::config::ZoneConfig;
use crate::error::{self, ActuatorError};
use crate::zone::ZoneController;

/// `N` zones sharing one relay.
pub struct Furnace<P, C, const N: usize> {
    zones: [ZoneController; N],
    relay: P,
    clock: C,
    /// Clock reading at the previous tick.
    last_tick_ms: u64,
    /// Relay state as last written successfully.
    active: bool,
    /// Most recent failed write, cleared by the next successful one.
    relay_fault: Option<ActuatorError>,
}

impl<P: OutputPin, C: MonotonicClock, const N: usize> Furnace<P, C, N> {
    /// Build zone `i` from `configs[i]` and drive the relay to off.
    pub fn new(configs: [ZoneConfig; N], mut relay: P, clock: C) -> Self {
        let mut index = 0;
        let zones = configs.map(|config| {
            let zone = ZoneController::new(index, config);
            index += 1;
            zone
        });

        let relay_fault = match relay.set_low() {
            Ok(()) => None,
            Err(e) => {
                warn!("furnace: initial relay write failed ({:?})", e.kind());
                Some(ActuatorError::RelayWriteFailed(e.kind()))
            }
        };

        let last_tick_ms = clock.now_ms();
        info!("furnace: {} zones, relay off", N);

        Self {
            zones,
            relay,
            clock,
            last_tick_ms,
            active: false,
            relay_fault,
        }
    }

    /// Run one control cycle.  Returns the aggregated demand.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now_ms();
        let elapsed = u32::try_from(now.saturating_sub(self.last_tick_ms)).unwrap_or(u32::MAX);
        self.last_tick_ms = now;

        for zone in &mut self.zones {
            zone.tick(elapsed);
        }

        let was_active = self.active;
        let mut demand = false;
        for zone in &mut self.zones {
            demand |= zone.calling_for_heating(was_active);
        }

        if demand != self.active || self.relay_fault.is_some() {
            self.drive(demand);
        }
        demand
    }

    fn drive(&mut self, on: bool) {
        match self.relay.set_state(PinState::from(on)) {
            Ok(()) => {
                if on != self.active {
                    info!("furnace: relay {}", if on { "ON" } else { "OFF" });
                }
                self.active = on;
                self.relay_fault = None;
            }
            Err(e) => {
                warn!(
                    "furnace: relay write failed ({:?}), retrying next cycle",
                    e.kind()
                );
                self.relay_fault = Some(ActuatorError::RelayWriteFailed(e.kind()));
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Relay state as last written.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn relay_fault(&self) -> Option<ActuatorError> {
        self.relay_fault
    }

    /// `Err(Error::Actuator)` while the last relay write is unconfirmed.
    pub fn relay_status(&self) -> error::Result<()> {
        match self.relay_fault {
            Some(fault) => Err(fault.into()),
            None => Ok(()),
        }
    }

    pub fn last_tick_ms(&self) -> u64 {
        self.last_tick_ms
    }

    /// Current clock reading, independent of the tick cadence.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn zones(&self) -> &[ZoneController; N] {
        &self.zones
    }

    pub fn zone(&self, index: usize) -> Option<&ZoneController> {
        self.zones.get(index)
    }

    pub fn zone_mut(&mut self, index: usize) -> Option<&mut ZoneController> {
        self.zones.get_mut(index)
    }

    pub fn zones_mut(&mut self) -> &mut [ZoneController; N] {
        &mut self.zones
    }

    pub fn relay(&self) -> &P {
        &self.relay
    }
}
