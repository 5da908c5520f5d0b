//! heatzone-sim: host simulation of a three-zone installation.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  SimRooms           SimRelay        SimClock   MemorySettings│
//! │  (TemperatureSource)(OutputPin)     (clocks)   (SettingsPort)│
//! │  LogEventSink                                                │
//! │  (EventSink)                                                 │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ───────────────────    │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │              AppService (pure logic)                   │  │
//! │  │  Furnace · ZoneController × 3                          │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Simulated time runs as fast as the loop does.  Set `RUST_LOG=debug`
//! to see every timer expiry and latch flip.
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use log::info;

use heatzone::adapters::log_sink::LogEventSink;
use heatzone::adapters::settings::MemorySettings;
use heatzone::adapters::sim::{RoomModel, SimClock, SimRelay, SimRooms};
use heatzone::app::commands::{AppCommand, ZoneCommand};
use heatzone::app::service::AppService;
use heatzone::config::{BOOST_CEILING_SECS, ControllerConfig, ZoneConfig};
use heatzone::temperature::Temperature;
use heatzone::zone::Mode;

const ZONES: usize = 3;
/// Simulated run length.
const RUN_HOURS: u64 = 8;

/// Actions injected at a given simulated minute.
const SCRIPT: &[(u64, usize, ZoneCommand)] = &[
    (0, 0, ZoneCommand::SetMode(Mode::Auto)),
    (0, 1, ZoneCommand::SetMode(Mode::Auto)),
    (0, 2, ZoneCommand::SetMode(Mode::Holiday)),
    (45, 1, ZoneCommand::StartOrExtendBoost),
    (60, 1, ZoneCommand::StartOrExtendBoost),
    (120, 0, ZoneCommand::WindowOpened(true)),
    (130, 0, ZoneCommand::WindowOpened(false)),
    (200, 2, ZoneCommand::OverrideTarget(Temperature::from_deci(190))),
    (300, 1, ZoneCommand::SetHighTarget(Temperature::from_deci(220))),
];

fn zone_configs() -> Result<[ZoneConfig; ZONES]> {
    // Living room: comfort 06:30–09:00 and 17:00–22:00 on weekdays.
    let mut living = ZoneConfig::default();
    for day in 0..5 {
        living.schedule.set_range(day, 13, 18, true);
        living.schedule.set_range(day, 34, 44, true);
    }

    // Bathroom: comfort all morning, boost capped.
    let mut bath = ZoneConfig {
        boost_max_secs: Some(BOOST_CEILING_SECS),
        ..ZoneConfig::default()
    };
    for day in 0..7 {
        bath.schedule.set_range(day, 12, 20, true);
    }

    let configs = [living, bath, ZoneConfig::default()];
    for (i, cfg) in configs.iter().enumerate() {
        cfg.validate().with_context(|| format!("zone {i} config"))?;
    }
    Ok(configs)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("heatzone-sim: {} zones, {} simulated hours", ZONES, RUN_HOURS);

    let controller = ControllerConfig {
        cycle_interval_ms: 10_000,
        telemetry_interval_ms: 30 * 60_000,
        auto_save_delay_ms: 60_000,
    };
    let cycle_ms = u64::from(controller.cycle_interval_ms);

    // Monday 06:00
    let clock = SimClock::starting_at(0, 6, 0);
    let relay = SimRelay::new();
    let probe = relay.probe();
    let mut rooms = SimRooms::new(RoomModel::default(), [17.0, 16.0, 12.5], probe.clone());
    let mut settings = MemorySettings::new();
    let mut sink = LogEventSink::new();

    let mut app = AppService::new(controller, zone_configs()?, relay, clock.clone());
    app.load_persisted(&settings);
    app.start(&mut sink);

    let total_cycles = RUN_HOURS * 3_600_000 / cycle_ms;
    let mut script = SCRIPT.iter().peekable();

    for cycle in 0..total_cycles {
        let minute = cycle * cycle_ms / 60_000;
        while let Some((_, zone, command)) = script.next_if(|(at, _, _)| *at <= minute) {
            info!("t+{}min: zone {} <- {:?}", minute, zone, command);
            if let ZoneCommand::WindowOpened(open) = command {
                rooms.set_window(*zone, *open);
            }
            app.handle_command(
                AppCommand::Zone {
                    zone: *zone,
                    command: command.clone(),
                },
                &mut sink,
            )?;
        }

        app.tick(&mut rooms, &clock, &mut sink);
        app.auto_save_if_needed(&mut settings, &mut sink);

        clock.advance_ms(cycle_ms);
        rooms.step(cycle_ms);
    }

    let saved = app
        .force_save_if_dirty(&mut settings, &mut sink)
        .context("final save")?;
    app.relay_status().context("furnace relay")?;
    info!("heatzone-sim: {} zones saved on shutdown", saved);
    app.handle_command(AppCommand::PublishTelemetry, &mut sink)?;

    info!(
        "heatzone-sim: done after {} cycles, {} relay writes",
        app.cycle_count(),
        probe.writes()
    );
    Ok(())
}
