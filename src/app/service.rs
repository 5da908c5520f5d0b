//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the [`Furnace`] (and through it every zone) and
//! exposes a hardware-agnostic API.  All I/O flows through port traits
//! injected at call sites, making the whole service testable with mock
//! adapters.
//!
//! ```text
//!  WallClock ─────────▶ ┌────────────────────────┐ ──▶ EventSink
//!  TemperatureSource ─▶ │       AppService       │
//!  AppCommand ────────▶ │  Furnace · Zones       │ ──▶ relay (OutputPin)
//!  SettingsPort ◀─────▶ └────────────────────────┘
//! ```

use embedded_hal::digital::OutputPin;
use log::{info, warn};

use crate::config::{ControllerConfig, ZoneConfig};
use crate::error::{Error, Result};
use crate::furnace::Furnace;
use crate::zone::{HvacAction, ZoneController};

use super::commands::{AppCommand, ZoneCommand};
use super::events::{AppEvent, ZoneTelemetry};
use super::ports::{EventSink, MonotonicClock, SettingsError, SettingsPort, TemperatureSource, WallClock};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates one control cycle at a time.
pub struct AppService<P, C, const N: usize> {
    furnace: Furnace<P, C, N>,
    config: ControllerConfig,
    /// Last reported action per zone.
    actions: [HvacAction; N],
    /// Clock reading when each zone was first seen dirty.
    dirty_since_ms: [Option<u64>; N],
    last_telemetry_ms: u64,
    cycle_count: u64,
}

impl<P: OutputPin, C: MonotonicClock, const N: usize> AppService<P, C, N> {
    /// Construct the service and its furnace.
    ///
    /// Does **not** load persisted state; call [`load_persisted`] next.
    ///
    /// [`load_persisted`]: Self::load_persisted
    pub fn new(config: ControllerConfig, zones: [ZoneConfig; N], relay: P, clock: C) -> Self {
        let furnace = Furnace::new(zones, relay, clock);
        let last_telemetry_ms = furnace.last_tick_ms();
        Self {
            furnace,
            config,
            actions: [HvacAction::Off; N],
            dirty_since_ms: [None; N],
            last_telemetry_ms,
            cycle_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Restore each zone's persisted state.  Zones without stored state
    /// keep their defaults.
    pub fn load_persisted(&mut self, settings: &impl SettingsPort) {
        for zone in self.furnace.zones_mut() {
            match settings.load(zone.index()) {
                Ok(state) => {
                    zone.load_state(state);
                    info!(
                        "zone {}: restored mode={} high={} low={}",
                        zone.index(),
                        state.mode,
                        state.high_target,
                        state.low_target
                    );
                }
                Err(SettingsError::NotFound) => {
                    info!("zone {}: no stored state, using defaults", zone.index());
                }
                Err(e) => {
                    warn!("zone {}: stored state unusable ({}), using defaults", zone.index(), e);
                }
            }
        }
    }

    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started { zones: N });
        info!("AppService started with {} zones", N);
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one full control cycle:
    /// wall clock → schedule keys, sensors → zones, furnace tick, events.
    pub fn tick(
        &mut self,
        sensors: &mut impl TemperatureSource,
        wall: &impl WallClock,
        sink: &mut impl EventSink,
    ) {
        self.cycle_count += 1;

        // 1. Schedule position
        if let Some(now) = wall.local_time() {
            for zone in self.furnace.zones_mut() {
                zone.update_schedule_key(now.day_of_week, now.hour, now.minute);
            }
        }

        // 2. Fresh readings
        for zone in self.furnace.zones_mut() {
            if let Some(reading) = sensors.read(zone.index()) {
                zone.input_temperature(reading);
            }
        }

        // 3. Timers, demand, relay
        let was_active = self.furnace.is_active();
        self.furnace.tick();
        if self.furnace.is_active() != was_active {
            sink.emit(&AppEvent::FurnaceChanged {
                active: self.furnace.is_active(),
            });
        }

        // 4. Per-zone action changes and dirty tracking
        let now = self.furnace.last_tick_ms();
        for (i, zone) in self.furnace.zones().iter().enumerate() {
            let action = zone.action();
            if action != self.actions[i] {
                sink.emit(&AppEvent::ZoneActionChanged {
                    zone: i,
                    from: self.actions[i],
                    to: action,
                });
                self.actions[i] = action;
            }
            if !zone.state_changed() {
                self.dirty_since_ms[i] = None;
            } else if self.dirty_since_ms[i].is_none() {
                self.dirty_since_ms[i] = Some(now);
            }
        }

        // 5. Periodic telemetry
        if now.saturating_sub(self.last_telemetry_ms) >= u64::from(self.config.telemetry_interval_ms) {
            self.publish_telemetry(sink);
            self.last_telemetry_ms = now;
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (UI, message bus, settings layer).
    ///
    /// Zone commands take effect on the next [`tick`](Self::tick).
    pub fn handle_command(&mut self, cmd: AppCommand, sink: &mut impl EventSink) -> Result<()> {
        match cmd {
            AppCommand::Zone { zone, command } => {
                let Some(target) = self.furnace.zone_mut(zone) else {
                    warn!("command for unknown zone {}: {:?}", zone, command);
                    return Err(Error::UnknownZone(zone));
                };
                apply(target, command);
                if target.state_changed() && self.dirty_since_ms[zone].is_none() {
                    self.dirty_since_ms[zone] = Some(self.furnace.now_ms());
                }
            }
            AppCommand::PublishTelemetry => self.publish_telemetry(sink),
        }
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    /// Snapshot of one zone.
    pub fn telemetry(&self, zone: usize) -> Option<ZoneTelemetry> {
        self.furnace.zone(zone).map(snapshot)
    }

    /// Snapshot of every zone, in index order.
    pub fn telemetry_all(&self) -> heapless::Vec<ZoneTelemetry, N> {
        self.furnace.zones().iter().map(snapshot).collect()
    }

    pub fn furnace(&self) -> &Furnace<P, C, N> {
        &self.furnace
    }

    pub fn zone(&self, index: usize) -> Option<&ZoneController> {
        self.furnace.zone(index)
    }

    pub fn is_furnace_active(&self) -> bool {
        self.furnace.is_active()
    }

    /// Control cycles executed since startup.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    // ── Persistence ───────────────────────────────────────────

    /// Save zones that have been dirty for at least the auto-save delay.
    /// Returns how many zones were saved.  Failures are logged and the
    /// zone is retried on the next call.
    pub fn auto_save_if_needed(
        &mut self,
        settings: &mut impl SettingsPort,
        sink: &mut impl EventSink,
    ) -> usize {
        let now = self.furnace.now_ms();
        let delay = u64::from(self.config.auto_save_delay_ms);
        let mut saved = 0;
        for i in 0..N {
            let due = self.dirty_since_ms[i].is_some_and(|since| now.saturating_sub(since) >= delay);
            if !due {
                continue;
            }
            match self.save_zone(i, settings, sink) {
                Ok(()) => saved += 1,
                Err(e) => warn!("zone {}: auto-save failed: {}", i, e),
            }
        }
        saved
    }

    /// Save every dirty zone now (e.g. before a planned restart).
    ///
    /// All dirty zones are attempted; the first failure is returned and
    /// the failed zones stay dirty.
    pub fn force_save_if_dirty(
        &mut self,
        settings: &mut impl SettingsPort,
        sink: &mut impl EventSink,
    ) -> Result<usize> {
        let mut saved = 0;
        let mut first_err = None;
        for i in 0..N {
            if !self.furnace.zones()[i].state_changed() {
                continue;
            }
            match self.save_zone(i, settings, sink) {
                Ok(()) => saved += 1,
                Err(e) => {
                    warn!("zone {}: forced save failed: {}", i, e);
                    first_err.get_or_insert(e);
                }
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(saved),
        }
    }

    /// `Err(Error::Actuator)` while the furnace relay has an unconfirmed write.
    pub fn relay_status(&self) -> Result<()> {
        self.furnace.relay_status()
    }

    /// Whether any zone has unsaved persistable changes.
    pub fn has_unsaved_changes(&self) -> bool {
        self.furnace.zones().iter().any(ZoneController::state_changed)
    }

    // ── Internal ──────────────────────────────────────────────

    fn publish_telemetry(&self, sink: &mut impl EventSink) {
        for zone in self.furnace.zones() {
            sink.emit(&AppEvent::Telemetry(snapshot(zone)));
        }
    }

    /// Persist one zone; the dirty flag is only cleared once the store
    /// accepted the write.
    fn save_zone(
        &mut self,
        index: usize,
        settings: &mut impl SettingsPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let zone = &mut self.furnace.zones_mut()[index];
        settings.save(index, &zone.persisted_state())?;
        zone.save_state();
        self.dirty_since_ms[index] = None;
        sink.emit(&AppEvent::StateSaved { zone: index });
        info!("zone {}: state saved", index);
        Ok(())
    }
}

fn apply(zone: &mut ZoneController, command: ZoneCommand) {
    match command {
        ZoneCommand::SetMode(mode) => zone.set_mode(mode),
        ZoneCommand::SetHighTarget(value) => zone.set_high_target(value),
        ZoneCommand::SetLowTarget(value) => zone.set_low_target(value),
        ZoneCommand::OverrideTarget(value) => zone.override_target(value),
        ZoneCommand::ResetTarget => zone.reset_target(),
        ZoneCommand::StartOrExtendBoost => zone.start_or_extend_boost(),
        ZoneCommand::StopBoost => zone.stop_boost(),
        ZoneCommand::WindowOpened(open) => zone.set_window_opened(open),
        ZoneCommand::ReplaceConfig(config) => zone.set_config(config),
    }
}

fn snapshot(zone: &ZoneController) -> ZoneTelemetry {
    ZoneTelemetry {
        zone: zone.index(),
        mode: zone.mode(),
        action: zone.action(),
        current: zone.temperature(),
        target: zone.target_temperature(),
        high_target: zone.high_target(),
        low_target: zone.low_target(),
        boost_active: zone.boost_active(),
        boost_remaining_secs: zone.boost_remaining_secs(),
        override_active: zone.override_active(),
        override_remaining_secs: zone.override_remaining_secs(),
        window_open: zone.window_opened(),
        window_lockout_secs: zone.window_lockout_remaining_secs(),
    }
}
