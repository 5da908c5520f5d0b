//! Zone control engine.
//!
//! One [`ZoneController`] per heating zone.  It turns mode, setpoints,
//! the weekly schedule, the latest sensor reading and three countdown
//! timers into a single boolean: does this zone want heat right now?
//!
//! ```text
//!                 ┌────────────── calling_for_heating ──────────────┐
//!  window open ──▶│ 1. false                                        │
//!  boost       ──▶│ 2. true                                         │
//!  lockout     ──▶│ 3. false                                        │
//!  mode Off    ──▶│ 4. false                                        │
//!  target/temp ──▶│ 5. hysteresis latch (+ fail-safe floor/ceiling) │
//!                 └─────────────────────────────────────────────────┘
//! ```
//!
//! The engine does no I/O and has no notion of wall-clock time.  Timers
//! move only through [`ZoneController::tick`]; the schedule position
//! moves only through [`ZoneController::update_schedule_key`].
//!
//! Invalid inputs never produce errors: out-of-range clock tuples and
//! overrides requested while `Off` are ignored, missing schedule data
//! reads as the low setpoint.

use core::fmt;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::ZoneConfig;
use crate::control::countdown::{Countdown, secs_to_ms};
use crate::control::hysteresis::{Flip, HysteresisLatch};
use crate::safety::WINDOW_LOCKOUT_MS;
use crate::schedule::ScheduleKey;
use crate::temperature::Temperature;

/// Default high (comfort) setpoint before any state is loaded: 21.0 °C.
pub const DEFAULT_HIGH_TARGET: Temperature = Temperature::from_deci(210);
/// Default low (setback) setpoint before any state is loaded: 17.0 °C.
pub const DEFAULT_LOW_TARGET: Temperature = Temperature::from_deci(170);

// ───────────────────────────────────────────────────────────────
// Mode
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// No heating (boost still works).
    #[default]
    Off,
    /// Follow the weekly schedule.
    Auto,
    /// Hold the configured Holiday setpoint.
    Holiday,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::Auto => write!(f, "auto"),
            Self::Holiday => write!(f, "holiday"),
        }
    }
}

/// What the zone is doing, as reported to dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HvacAction {
    Off,
    Idle,
    Heating,
}

// ───────────────────────────────────────────────────────────────
// Persisted state
// ───────────────────────────────────────────────────────────────

/// The part of a zone that survives a restart.  Everything else (timers,
/// latch, window, override) starts from safe defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    pub mode: Mode,
    pub high_target: Temperature,
    pub low_target: Temperature,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            mode: Mode::Off,
            high_target: DEFAULT_HIGH_TARGET,
            low_target: DEFAULT_LOW_TARGET,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// ZoneController
// ───────────────────────────────────────────────────────────────

/// Control state machine for one zone.
pub struct ZoneController {
    index: usize,
    config: ZoneConfig,

    // -- Persistable --
    mode: Mode,
    high_target: Temperature,
    low_target: Temperature,
    dirty: bool,

    // -- Inputs --
    temperature: Option<Temperature>,
    window_open: bool,
    schedule_key: Option<ScheduleKey>,

    // -- Timers --
    boost: Countdown,
    override_timer: Countdown,
    window_lockout: Countdown,
    override_target: Temperature,

    // -- Decision --
    latch: HysteresisLatch,
    demand: bool,
}

impl ZoneController {
    /// Create zone `index` with all ephemeral state at its safe default.
    pub fn new(index: usize, config: ZoneConfig) -> Self {
        let persisted = PersistedState::default();
        Self {
            index,
            config,
            mode: persisted.mode,
            high_target: persisted.high_target,
            low_target: persisted.low_target,
            dirty: false,
            temperature: None,
            window_open: false,
            schedule_key: None,
            boost: Countdown::stopped(),
            override_timer: Countdown::stopped(),
            window_lockout: Countdown::stopped(),
            override_target: Temperature::ZERO,
            latch: HysteresisLatch::new(),
            demand: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn config(&self) -> &ZoneConfig {
        &self.config
    }

    /// Replace the configuration.  Timers, latch and window state carry
    /// over; only a running boost is re-capped to the new ceiling.
    pub fn set_config(&mut self, config: ZoneConfig) {
        self.config = config;
        if let Some(max) = self.config.boost_max_secs {
            self.boost.clamp_to(secs_to_ms(max));
        }
        info!("zone {}: configuration replaced", self.index);
    }

    // ── Mode ──────────────────────────────────────────────────

    pub fn set_mode(&mut self, mode: Mode) {
        if mode == Mode::Off {
            if self.override_timer.is_running() {
                self.override_timer.cancel();
                info!("zone {}: override cancelled by mode off", self.index);
            }
            if !self.boost.is_running() {
                self.demand = false;
            }
        }
        if mode != self.mode {
            info!("zone {}: mode {} -> {}", self.index, self.mode, mode);
        }
        self.mode = mode;
        self.dirty = true;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    // ── Boost ─────────────────────────────────────────────────

    /// Start boost, or extend it if it is already running.
    pub fn start_or_extend_boost(&mut self) {
        if self.boost.is_running() {
            self.boost.extend(secs_to_ms(self.config.boost_extension_secs));
        } else {
            self.boost.start(secs_to_ms(self.config.boost_duration_secs));
        }
        if let Some(max) = self.config.boost_max_secs {
            self.boost.clamp_to(secs_to_ms(max));
        }
        info!(
            "zone {}: boost {}s remaining",
            self.index,
            self.boost.remaining_secs()
        );
    }

    pub fn stop_boost(&mut self) {
        if self.boost.is_running() {
            info!("zone {}: boost stopped", self.index);
        }
        self.boost.cancel();
        // Re-evaluated next cycle; the latch may still want heat.
        self.demand = false;
    }

    pub fn boost_active(&self) -> bool {
        self.boost.is_running()
    }

    pub fn boost_remaining_secs(&self) -> u32 {
        self.boost.remaining_secs()
    }

    // ── Setpoints ─────────────────────────────────────────────

    /// Record the latest sensor reading.
    pub fn input_temperature(&mut self, value: Temperature) {
        self.temperature = Some(value);
    }

    /// Last recorded reading, `None` before the first one.
    pub fn temperature(&self) -> Option<Temperature> {
        self.temperature
    }

    pub fn set_high_target(&mut self, value: Temperature) {
        self.high_target = value;
        self.dirty = true;
    }

    pub fn set_low_target(&mut self, value: Temperature) {
        self.low_target = value;
        self.dirty = true;
    }

    pub fn high_target(&self) -> Temperature {
        self.high_target
    }

    pub fn low_target(&self) -> Temperature {
        self.low_target
    }

    // ── Override ──────────────────────────────────────────────

    /// Temporarily replace the target.  Ignored while the mode is `Off`.
    pub fn override_target(&mut self, value: Temperature) {
        if self.mode == Mode::Off {
            debug!("zone {}: override ignored in mode off", self.index);
            return;
        }
        self.override_target = value;
        self.override_timer
            .start(secs_to_ms(self.config.override_timeout_secs));
        info!(
            "zone {}: override {} for {}s",
            self.index,
            value,
            self.config.override_timeout_secs
        );
    }

    /// Drop any override and fall back to the schedule/Holiday target.
    pub fn reset_target(&mut self) {
        if self.override_timer.is_running() {
            info!("zone {}: override reset", self.index);
        }
        self.override_timer.cancel();
    }

    pub fn override_active(&self) -> bool {
        self.override_timer.is_running()
    }

    pub fn override_remaining_secs(&self) -> u32 {
        self.override_timer.remaining_secs()
    }

    /// Effective target: override, else per mode.  `None` when `Off`.
    pub fn target_temperature(&self) -> Option<Temperature> {
        if self.override_timer.is_running() {
            return Some(self.override_target);
        }
        match self.mode {
            Mode::Off => None,
            Mode::Auto => Some(self.scheduled_target()),
            Mode::Holiday => Some(self.config.holiday_target),
        }
    }

    /// Schedule lookup at the cached position; low when unknown.
    fn scheduled_target(&self) -> Temperature {
        match self.schedule_key {
            Some(key) if self.config.schedule.is_high(key) => self.high_target,
            _ => self.low_target,
        }
    }

    // ── Window ────────────────────────────────────────────────

    /// Open cancels any lockout; open → closed starts a fresh one.
    pub fn set_window_opened(&mut self, open: bool) {
        if open {
            self.window_lockout.cancel();
            self.demand = false;
        } else if self.window_open {
            self.window_lockout.start(WINDOW_LOCKOUT_MS);
        }
        if open != self.window_open {
            info!(
                "zone {}: window {}",
                self.index,
                if open { "opened" } else { "closed, lockout started" }
            );
        }
        self.window_open = open;
    }

    pub fn window_opened(&self) -> bool {
        self.window_open
    }

    pub fn window_lockout_active(&self) -> bool {
        self.window_lockout.is_running()
    }

    pub fn window_lockout_remaining_secs(&self) -> u32 {
        self.window_lockout.remaining_secs()
    }

    // ── Clock ─────────────────────────────────────────────────

    /// Move the cached schedule position.  Out-of-range tuples are ignored.
    pub fn update_schedule_key(&mut self, day_of_week: u8, hour: u8, minute: u8) {
        match ScheduleKey::new(day_of_week, hour, minute) {
            Some(key) => self.schedule_key = Some(key),
            None => debug!(
                "zone {}: ignoring clock {}/{}:{}",
                self.index, day_of_week, hour, minute
            ),
        }
    }

    /// Advance all three timers.  Call once per control cycle.
    pub fn tick(&mut self, elapsed_ms: u32) {
        let boost_was = self.boost.is_running();
        let override_was = self.override_timer.is_running();
        let lockout_was = self.window_lockout.is_running();

        self.boost.advance(elapsed_ms);
        self.override_timer.advance(elapsed_ms);
        self.window_lockout.advance(elapsed_ms);

        if boost_was && !self.boost.is_running() {
            info!("zone {}: boost expired", self.index);
        }
        if override_was && !self.override_timer.is_running() {
            info!("zone {}: override expired", self.index);
        }
        if lockout_was && !self.window_lockout.is_running() {
            info!("zone {}: window lockout over", self.index);
        }
    }

    // ── Decision ──────────────────────────────────────────────

    /// Heat demand for this cycle.
    ///
    /// `furnace_active` is the shared output as latched at the end of the
    /// previous cycle; it tightens the switch-off threshold to the bare
    /// target while the furnace is already running.
    pub fn calling_for_heating(&mut self, furnace_active: bool) -> bool {
        self.demand = self.evaluate(furnace_active);
        self.demand
    }

    fn evaluate(&mut self, furnace_active: bool) -> bool {
        if self.window_open {
            return false;
        }
        if self.boost.is_running() {
            return true;
        }
        if self.window_lockout.is_running() {
            return false;
        }
        if self.mode == Mode::Off {
            return false;
        }
        let Some(reading) = self.temperature else {
            return false;
        };

        let target = self.target_temperature().unwrap_or(Temperature::ZERO);
        let (calling, flip) = self
            .latch
            .update(reading, target, self.config.band(), furnace_active);
        match flip {
            Some(Flip::Band) => debug!(
                "zone {}: {} at {} (target {})",
                self.index,
                if calling { "heat on" } else { "heat off" },
                reading,
                target
            ),
            Some(Flip::FailSafe(breach)) => info!(
                "zone {}: fail-safe {:?} at {}",
                self.index, breach, reading
            ),
            None => {}
        }
        calling
    }

    /// Status derived from the most recent decision, corrected for
    /// window, mode and boost changes made since.
    pub fn action(&self) -> HvacAction {
        let blocked = self.window_open || (self.mode == Mode::Off && !self.boost.is_running());
        if self.demand && !blocked {
            HvacAction::Heating
        } else if self.mode == Mode::Off && !self.boost.is_running() {
            HvacAction::Off
        } else {
            HvacAction::Idle
        }
    }

    // ── Persistence ───────────────────────────────────────────

    /// Apply a stored state and clear the dirty flag.
    pub fn load_state(&mut self, state: PersistedState) {
        self.mode = state.mode;
        self.high_target = state.high_target;
        self.low_target = state.low_target;
        if self.mode == Mode::Off {
            self.override_timer.cancel();
        }
        self.dirty = false;
    }

    /// Snapshot the persistable fields and clear the dirty flag.
    pub fn save_state(&mut self) -> PersistedState {
        self.dirty = false;
        self.persisted_state()
    }

    /// Snapshot the persistable fields without touching the dirty flag.
    pub fn persisted_state(&self) -> PersistedState {
        PersistedState {
            mode: self.mode,
            high_target: self.high_target,
            low_target: self.low_target,
        }
    }

    /// Whether persistable fields changed since the last load/save.
    pub fn state_changed(&self) -> bool {
        self.dirty
    }
}
