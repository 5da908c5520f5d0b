//! Integration tests for the AppService → Furnace → relay pipeline,
//! including persistence and telemetry.

use embedded_hal::digital::ErrorKind;
use heatzone::Error;
use heatzone::adapters::settings::MemorySettings;
use heatzone::app::commands::{AppCommand, ZoneCommand};
use heatzone::app::events::AppEvent;
use heatzone::app::ports::{SettingsError, SettingsPort};
use heatzone::app::service::AppService;
use heatzone::config::{ControllerConfig, ZoneConfig};
use heatzone::error::ActuatorError;
use heatzone::temperature::Temperature;
use heatzone::zone::{HvacAction, Mode, PersistedState};

use super::mock_hw::{ManualClock, MockRelay, RecordingSink, RelayLog, ScriptedTemps};

type App = AppService<MockRelay, ManualClock, 2>;

fn make_app() -> (App, RelayLog, ManualClock, RecordingSink) {
    let (relay, log) = MockRelay::new();
    let clock = ManualClock::default();
    let mut sink = RecordingSink::new();
    let mut app = AppService::new(
        ControllerConfig::default(),
        [ZoneConfig::default(), ZoneConfig::default()],
        relay,
        clock.clone(),
    );
    app.start(&mut sink);
    (app, log, clock, sink)
}

fn zone_cmd(zone: usize, command: ZoneCommand) -> AppCommand {
    AppCommand::Zone { zone, command }
}

// ── Command dispatch ─────────────────────────────────────────

#[test]
fn start_emits_zone_count() {
    let (_, _, _, sink) = make_app();
    assert_eq!(sink.events, vec![AppEvent::Started { zones: 2 }]);
}

#[test]
fn command_to_unknown_zone_is_an_error() {
    let (mut app, _, _, mut sink) = make_app();
    let res = app.handle_command(zone_cmd(7, ZoneCommand::StartOrExtendBoost), &mut sink);
    assert_eq!(res, Err(Error::UnknownZone(7)));
    assert!(!app.has_unsaved_changes());
}

#[test]
fn cold_zone_turns_furnace_on_through_commands() {
    let (mut app, log, clock, mut sink) = make_app();
    let mut temps = ScriptedTemps::<2>::all(150);

    app.tick(&mut temps, &clock, &mut sink);
    assert!(!app.is_furnace_active(), "both zones off");

    app.handle_command(zone_cmd(1, ZoneCommand::SetMode(Mode::Auto)), &mut sink)
        .unwrap();
    clock.advance_secs(1);
    app.tick(&mut temps, &clock, &mut sink);

    assert!(app.is_furnace_active());
    assert_eq!(log.writes(), vec![false, true]);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::FurnaceChanged { active: true })),
        1
    );
    assert_eq!(
        sink.count(|e| matches!(
            e,
            AppEvent::ZoneActionChanged {
                zone: 1,
                to: HvacAction::Heating,
                ..
            }
        )),
        1
    );
}

#[test]
fn wall_clock_selects_scheduled_target() {
    let mut cfg = ZoneConfig::default();
    cfg.schedule.set_range(2, 14, 16, true); // Wednesday 07:00–08:00
    let (relay, _) = MockRelay::new();
    let clock = ManualClock::default();
    let mut sink = RecordingSink::new();
    let mut app: AppService<_, _, 1> =
        AppService::new(ControllerConfig::default(), [cfg], relay, clock.clone());
    app.handle_command(zone_cmd(0, ZoneCommand::SetMode(Mode::Auto)), &mut sink)
        .unwrap();

    let mut temps = ScriptedTemps::<1>::all(190);
    clock.set_wall(2, 7, 15);
    app.tick(&mut temps, &clock, &mut sink);
    assert!(app.is_furnace_active());
    assert_eq!(app.telemetry(0).unwrap().target, Some(Temperature::from_deci(210)));

    clock.set_wall(2, 8, 0);
    clock.advance_secs(1);
    app.tick(&mut temps, &clock, &mut sink);
    assert!(!app.is_furnace_active());
}

#[test]
fn replacing_config_keeps_running_boost() {
    let (mut app, _, clock, mut sink) = make_app();
    let mut temps = ScriptedTemps::<2>::all(200);
    app.handle_command(zone_cmd(0, ZoneCommand::StartOrExtendBoost), &mut sink)
        .unwrap();
    clock.advance_secs(600);
    app.tick(&mut temps, &clock, &mut sink);

    let cfg = ZoneConfig {
        boost_max_secs: Some(1800),
        ..ZoneConfig::default()
    };
    app.handle_command(zone_cmd(0, ZoneCommand::ReplaceConfig(cfg)), &mut sink)
        .unwrap();
    let zone = app.zone(0).unwrap();
    assert!(zone.boost_active());
    assert_eq!(zone.boost_remaining_secs(), 1200);
    assert_eq!(zone.config().boost_max_secs, Some(1800));
}

#[test]
fn relay_fault_is_reported_until_a_write_succeeds() {
    let (mut app, log, clock, mut sink) = make_app();
    let mut temps = ScriptedTemps::<2>::all(200);
    app.handle_command(zone_cmd(0, ZoneCommand::StartOrExtendBoost), &mut sink)
        .unwrap();

    log.fail_next(1);
    app.tick(&mut temps, &clock, &mut sink);
    assert_eq!(
        app.relay_status(),
        Err(Error::Actuator(ActuatorError::RelayWriteFailed(
            ErrorKind::Other
        )))
    );
    assert!(!app.is_furnace_active());

    clock.advance_secs(1);
    app.tick(&mut temps, &clock, &mut sink);
    assert_eq!(app.relay_status(), Ok(()));
    assert!(app.is_furnace_active());
}

// ── Telemetry ────────────────────────────────────────────────

#[test]
fn telemetry_reflects_commands_before_next_tick() {
    let (mut app, _, clock, mut sink) = make_app();
    let mut temps = ScriptedTemps::<2>::all(150);
    app.handle_command(zone_cmd(0, ZoneCommand::SetMode(Mode::Auto)), &mut sink)
        .unwrap();
    app.handle_command(zone_cmd(1, ZoneCommand::SetMode(Mode::Auto)), &mut sink)
        .unwrap();
    clock.advance_secs(1);
    app.tick(&mut temps, &clock, &mut sink);
    assert_eq!(app.telemetry(0).unwrap().action, HvacAction::Heating);

    app.handle_command(zone_cmd(0, ZoneCommand::SetMode(Mode::Off)), &mut sink)
        .unwrap();
    app.handle_command(zone_cmd(1, ZoneCommand::WindowOpened(true)), &mut sink)
        .unwrap();
    sink.clear();
    app.handle_command(AppCommand::PublishTelemetry, &mut sink)
        .unwrap();

    let actions: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Telemetry(t) => Some((t.zone, t.mode, t.action)),
            _ => None,
        })
        .collect();
    assert_eq!(
        actions,
        vec![
            (0, Mode::Off, HvacAction::Off),
            (1, Mode::Auto, HvacAction::Idle),
        ]
    );
}

#[test]
fn telemetry_is_published_on_interval() {
    let (mut app, _, clock, mut sink) = make_app();
    let mut temps = ScriptedTemps::<2>::all(200);
    let is_telemetry = |e: &AppEvent| matches!(e, AppEvent::Telemetry(_));

    for _ in 0..59 {
        clock.advance_secs(1);
        app.tick(&mut temps, &clock, &mut sink);
    }
    assert_eq!(sink.count(is_telemetry), 0);

    clock.advance_secs(1);
    app.tick(&mut temps, &clock, &mut sink);
    assert_eq!(sink.count(is_telemetry), 2);

    let snap = app.telemetry_all();
    assert_eq!(snap[1].zone, 1);
    assert_eq!(snap[1].current, Some(Temperature::from_deci(200)));
    assert_eq!(snap[1].mode, Mode::Off);
}

#[test]
fn telemetry_serialises_to_json() {
    let (app, _, _, _) = make_app();
    let json = serde_json::to_string(&app.telemetry(0).unwrap()).unwrap();
    assert!(json.contains("\"mode\":\"Off\""), "{json}");
    assert!(json.contains("\"high_target\":210"), "{json}");
}

// ── Persistence ──────────────────────────────────────────────

#[test]
fn auto_save_waits_for_delay() {
    let (mut app, _, clock, mut sink) = make_app();
    let mut settings = MemorySettings::new();
    let mut temps = ScriptedTemps::<2>::all(200);

    app.handle_command(zone_cmd(0, ZoneCommand::SetMode(Mode::Holiday)), &mut sink)
        .unwrap();
    assert!(app.has_unsaved_changes());

    clock.advance_secs(1);
    app.tick(&mut temps, &clock, &mut sink);
    assert_eq!(app.auto_save_if_needed(&mut settings, &mut sink), 0);
    assert_eq!(settings.load(0), Err(SettingsError::NotFound));

    clock.advance_secs(4);
    app.tick(&mut temps, &clock, &mut sink);
    assert_eq!(app.auto_save_if_needed(&mut settings, &mut sink), 1);
    assert_eq!(settings.load(0).unwrap().mode, Mode::Holiday);
    assert!(!app.has_unsaved_changes());
    assert_eq!(sink.count(|e| *e == AppEvent::StateSaved { zone: 0 }), 1);
}

#[test]
fn auto_save_delay_counts_from_the_change_not_the_last_tick() {
    let (mut app, _, clock, mut sink) = make_app();
    let mut settings = MemorySettings::new();
    let mut temps = ScriptedTemps::<2>::all(200);
    app.tick(&mut temps, &clock, &mut sink);

    // Long gap without a cycle, then a change.
    clock.advance_secs(30);
    app.handle_command(zone_cmd(0, ZoneCommand::SetMode(Mode::Auto)), &mut sink)
        .unwrap();

    clock.advance_secs(1);
    app.tick(&mut temps, &clock, &mut sink);
    assert_eq!(app.auto_save_if_needed(&mut settings, &mut sink), 0);

    clock.advance_secs(4);
    app.tick(&mut temps, &clock, &mut sink);
    assert_eq!(app.auto_save_if_needed(&mut settings, &mut sink), 1);
}

#[test]
fn forced_save_failure_is_returned_and_zone_stays_dirty() {
    let (mut app, _, _, mut sink) = make_app();
    let mut settings = MemorySettings::new();
    for zone in 0..2 {
        app.handle_command(zone_cmd(zone, ZoneCommand::SetMode(Mode::Holiday)), &mut sink)
            .unwrap();
    }

    settings.fail_next_saves(1);
    assert_eq!(
        app.force_save_if_dirty(&mut settings, &mut sink),
        Err(Error::Settings(SettingsError::IoError))
    );
    assert!(app.zone(0).unwrap().state_changed());
    assert!(!app.zone(1).unwrap().state_changed());
    assert_eq!(settings.load(1).unwrap().mode, Mode::Holiday);

    assert_eq!(app.force_save_if_dirty(&mut settings, &mut sink), Ok(1));
    assert!(!app.has_unsaved_changes());
}

#[test]
fn failed_save_stays_dirty_and_is_retried() {
    let (mut app, _, clock, mut sink) = make_app();
    let mut settings = MemorySettings::new();
    let mut temps = ScriptedTemps::<2>::all(200);

    app.handle_command(
        zone_cmd(1, ZoneCommand::SetHighTarget(Temperature::from_deci(225))),
        &mut sink,
    )
    .unwrap();
    clock.advance_secs(10);
    app.tick(&mut temps, &clock, &mut sink);

    settings.fail_next_saves(1);
    assert_eq!(app.auto_save_if_needed(&mut settings, &mut sink), 0);
    assert!(app.has_unsaved_changes());

    clock.advance_secs(1);
    app.tick(&mut temps, &clock, &mut sink);
    assert_eq!(app.auto_save_if_needed(&mut settings, &mut sink), 1);
    assert_eq!(
        settings.load(1).unwrap().high_target,
        Temperature::from_deci(225)
    );
}

#[test]
fn force_save_ignores_delay() {
    let (mut app, _, _, mut sink) = make_app();
    let mut settings = MemorySettings::new();
    app.handle_command(zone_cmd(0, ZoneCommand::SetMode(Mode::Auto)), &mut sink)
        .unwrap();
    assert_eq!(app.force_save_if_dirty(&mut settings, &mut sink), Ok(1));
    assert_eq!(app.force_save_if_dirty(&mut settings, &mut sink), Ok(0));
}

#[test]
fn state_survives_restart() {
    let mut settings = MemorySettings::new();
    {
        let (mut app, _, _, mut sink) = make_app();
        app.handle_command(zone_cmd(1, ZoneCommand::SetMode(Mode::Auto)), &mut sink)
            .unwrap();
        app.handle_command(
            zone_cmd(1, ZoneCommand::SetLowTarget(Temperature::from_deci(155))),
            &mut sink,
        )
        .unwrap();
        app.force_save_if_dirty(&mut settings, &mut sink).unwrap();
    }

    let (mut app, _, _, _) = make_app();
    app.load_persisted(&settings);
    let zone = app.zone(1).unwrap();
    assert_eq!(zone.mode(), Mode::Auto);
    assert_eq!(zone.low_target(), Temperature::from_deci(155));
    assert!(!zone.state_changed());
    assert_eq!(app.zone(0).unwrap().persisted_state(), PersistedState::default());
}

#[test]
fn corrupted_state_falls_back_to_defaults() {
    let mut settings = MemorySettings::new();
    settings.put_raw(0, &[0xFF, 0xFF]);
    let (mut app, _, _, _) = make_app();
    app.load_persisted(&settings);
    assert_eq!(app.zone(0).unwrap().persisted_state(), PersistedState::default());
}
