//! End-to-end zone scenarios driven through the `Furnace`.

use heatzone::config::ZoneConfig;
use heatzone::furnace::Furnace;
use heatzone::temperature::Temperature;
use heatzone::zone::{HvacAction, Mode};

use super::mock_hw::{ManualClock, MockRelay, RelayLog};

fn t(deci: i16) -> Temperature {
    Temperature::from_deci(deci)
}

fn furnace<const N: usize>() -> (Furnace<MockRelay, ManualClock, N>, RelayLog, ManualClock) {
    let (relay, log) = MockRelay::new();
    let clock = ManualClock::default();
    let f = Furnace::new(core::array::from_fn(|_| ZoneConfig::default()), relay, clock.clone());
    (f, log, clock)
}

// ── Schedule ─────────────────────────────────────────────────

#[test]
fn schedule_switches_between_high_and_low_target() {
    let mut cfg = ZoneConfig::default();
    // Monday 08:00–08:30 high
    cfg.schedule.set_slot(0, 16, true);

    let (relay, log) = MockRelay::new();
    let clock = ManualClock::default();
    let mut f: Furnace<_, _, 1> = Furnace::new([cfg], relay, clock.clone());
    let zone = f.zone_mut(0).unwrap();
    zone.set_mode(Mode::Auto);
    zone.input_temperature(t(190));

    // 07:59: low target 17.0 °C, 19.0 °C is warm enough.
    zone.update_schedule_key(0, 7, 59);
    assert!(!f.tick());

    // 08:00: high target 21.0 °C.
    f.zone_mut(0).unwrap().update_schedule_key(0, 8, 0);
    assert!(f.tick());
    assert_eq!(f.zones()[0].target_temperature(), Some(t(210)));

    // 08:30: back to low.  Furnace was on, so off at >= 17.0.
    f.zone_mut(0).unwrap().update_schedule_key(0, 8, 30);
    clock.advance_secs(60);
    assert!(!f.tick());
    assert_eq!(log.writes(), vec![false, true, false]);
}

#[test]
fn unknown_clock_uses_low_target() {
    let (mut f, _, _) = furnace::<1>();
    let zone = f.zone_mut(0).unwrap();
    zone.set_mode(Mode::Auto);
    assert_eq!(zone.target_temperature(), Some(t(170)));
}

// ── Window ───────────────────────────────────────────────────

#[test]
fn window_close_locks_out_for_ten_minutes() {
    let (mut f, log, clock) = furnace::<2>();
    let zone = f.zone_mut(0).unwrap();
    zone.set_mode(Mode::Holiday);
    zone.input_temperature(t(100));
    assert!(f.tick());

    f.zone_mut(0).unwrap().set_window_opened(true);
    clock.advance_secs(1);
    assert!(!f.tick());

    f.zone_mut(0).unwrap().set_window_opened(false);
    clock.advance_secs(599);
    assert!(!f.tick());
    assert_eq!(f.zones()[0].window_lockout_remaining_secs(), 1);

    clock.advance_secs(1);
    assert!(f.tick());
    assert_eq!(log.writes(), vec![false, true, false, true]);
}

#[test]
fn reopening_window_cancels_lockout() {
    let (mut f, _, _) = furnace::<1>();
    let zone = f.zone_mut(0).unwrap();
    zone.set_window_opened(true);
    zone.set_window_opened(false);
    assert!(zone.window_lockout_active());
    zone.set_window_opened(true);
    assert!(!zone.window_lockout_active());
}

// ── Boost ────────────────────────────────────────────────────

#[test]
fn boost_heats_an_off_zone_until_it_expires() {
    let (mut f, _, clock) = furnace::<3>();
    f.zone_mut(2).unwrap().start_or_extend_boost();
    assert!(f.tick());
    assert_eq!(f.zones()[2].action(), HvacAction::Heating);

    clock.advance_secs(1799);
    assert!(f.tick());

    clock.advance_secs(1);
    assert!(!f.tick());
    assert_eq!(f.zones()[2].action(), HvacAction::Off);
}

#[test]
fn boost_overrides_lockout_but_not_open_window() {
    let (mut f, _, _) = furnace::<1>();
    let zone = f.zone_mut(0).unwrap();
    zone.start_or_extend_boost();
    zone.set_window_opened(true);
    assert!(!f.tick());

    f.zone_mut(0).unwrap().set_window_opened(false);
    assert!(f.tick());
}

// ── Fail-safe ────────────────────────────────────────────────

#[test]
fn fail_safe_bounds_override_the_target() {
    let (mut f, _, _) = furnace::<1>();
    let zone = f.zone_mut(0).unwrap();
    zone.set_mode(Mode::Auto);
    zone.override_target(t(350));
    zone.input_temperature(t(300));
    assert!(!f.tick(), "ceiling forces off even below a high target");

    let zone = f.zone_mut(0).unwrap();
    zone.override_target(t(50));
    zone.input_temperature(t(100));
    assert!(f.tick(), "floor forces on even above a low target");
}

// ── Override ─────────────────────────────────────────────────

#[test]
fn override_expires_back_to_schedule() {
    let (mut f, _, clock) = furnace::<1>();
    let zone = f.zone_mut(0).unwrap();
    zone.set_mode(Mode::Auto);
    zone.input_temperature(t(180));
    zone.override_target(t(200));
    assert!(f.tick());

    clock.advance_secs(3600);
    assert!(!f.tick());
    assert!(!f.zones()[0].override_active());
    assert_eq!(f.zones()[0].target_temperature(), Some(t(170)));
}

// ── Aggregation ──────────────────────────────────────────────

#[test]
fn relay_stays_on_while_any_zone_calls() {
    let (mut f, log, clock) = furnace::<3>();
    for zone in f.zones_mut() {
        zone.set_mode(Mode::Holiday);
        zone.input_temperature(t(110));
    }
    assert!(f.tick());

    // Holiday 12.0 °C, furnace on: zones switch off at >= 12.0.
    for i in 0..2 {
        f.zone_mut(i).unwrap().input_temperature(t(125));
        clock.advance_secs(1);
        assert!(f.tick());
    }
    f.zone_mut(2).unwrap().input_temperature(t(125));
    clock.advance_secs(1);
    assert!(!f.tick());
    assert_eq!(log.writes(), vec![false, true, false]);
}

#[test]
fn failed_relay_write_is_retried_next_cycle() {
    let (mut f, log, clock) = furnace::<1>();
    f.zone_mut(0).unwrap().start_or_extend_boost();
    log.fail_next(2);
    f.tick();
    assert!(!f.is_active());
    assert!(f.relay_fault().is_some());

    clock.advance_secs(1);
    f.tick();
    assert!(!f.is_active());

    clock.advance_secs(1);
    f.tick();
    assert!(f.is_active());
    assert!(f.relay_fault().is_none());
    assert_eq!(log.level(), Some(true));
}
