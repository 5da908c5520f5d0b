//! Fuzz target: zone command stream
//!
//! Decodes arbitrary bytes into a sequence of zone operations and checks
//! after every cycle:
//! - No panics, whatever the order or timing of operations
//! - A zone with an open window never calls for heat
//! - A zone at or above 30.0 °C only calls for heat while boosted
//! - The furnace output equals the OR of zone demands
//!
//! cargo fuzz run fuzz_zone_commands

#![no_main]

use core::cell::Cell;
use core::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, OutputPin};
use heatzone::app::ports::MonotonicClock;
use heatzone::config::ZoneConfig;
use heatzone::furnace::Furnace;
use heatzone::temperature::Temperature;
use heatzone::zone::{HvacAction, Mode};
use libfuzzer_sys::fuzz_target;

struct NullPin;

impl ErrorType for NullPin {
    type Error = Infallible;
}

impl OutputPin for NullPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

#[derive(Clone, Default)]
struct Clock(Rc<Cell<u64>>);

impl MonotonicClock for Clock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

const ZONES: usize = 3;

fuzz_target!(|data: &[u8]| {
    let clock = Clock::default();
    let mut furnace: Furnace<NullPin, Clock, ZONES> = Furnace::new(
        core::array::from_fn(|_| ZoneConfig::default()),
        NullPin,
        clock.clone(),
    );

    for chunk in data.chunks_exact(3) {
        let zone_idx = usize::from(chunk[0] >> 5) % ZONES;
        let arg = i16::from_le_bytes([chunk[1], chunk[2]]);
        let Some(zone) = furnace.zone_mut(zone_idx) else {
            continue;
        };
        match chunk[0] & 0x0F {
            0 => zone.input_temperature(Temperature::from_deci(arg)),
            1 => zone.set_mode(Mode::Off),
            2 => zone.set_mode(Mode::Auto),
            3 => zone.set_mode(Mode::Holiday),
            4 => zone.start_or_extend_boost(),
            5 => zone.stop_boost(),
            6 => zone.set_window_opened(arg & 1 == 1),
            7 => zone.override_target(Temperature::from_deci(arg)),
            8 => zone.reset_target(),
            9 => zone.set_high_target(Temperature::from_deci(arg)),
            10 => zone.set_low_target(Temperature::from_deci(arg)),
            11 => zone.update_schedule_key(chunk[1] % 8, chunk[2] % 25, chunk[2]),
            _ => clock.0.set(clock.0.get() + u64::from(arg.unsigned_abs()) * 1000),
        }

        let demand = furnace.tick();
        let mut any = false;
        for z in furnace.zones() {
            let heating = z.action() == HvacAction::Heating;
            any |= heating;
            if z.window_opened() {
                assert!(!heating, "zone {} heats with window open", z.index());
            }
            if let Some(t) = z.temperature() {
                if t >= Temperature::from_deci(300) && !z.boost_active() {
                    assert!(!heating, "zone {} heats at {}", z.index(), t);
                }
            }
        }
        assert_eq!(demand, any);
        assert_eq!(furnace.is_active(), demand);
    }
});
