//! Fuzz target: register surface + control loop
//!
//! Interprets the input as a stream of 4-byte records `(index, value)`
//! interleaved with ticks, feeding every record through
//! `AppCommand::from_register` and `AppService::handle_command`.  Asserts
//! that nothing panics, rejected writes leave the config untouched, and
//! the outputs never run both pumps at once.
//!
//! cargo fuzz run fuzz_register_writes

#![no_main]

use boilerctl::adapters::nvs::NvsAdapter;
use boilerctl::app::commands::AppCommand;
use boilerctl::app::events::AppEvent;
use boilerctl::app::ports::{ActuatorPort, ClockPort, EventSink, SensorPort, WallClock};
use boilerctl::app::service::AppService;
use boilerctl::config::SystemConfig;
use boilerctl::control::context::{ActuatorState, InputSignals};
use boilerctl::control::runtime::RunTimeTotals;
use libfuzzer_sys::fuzz_target;

struct Plant {
    signals: InputSignals,
}

impl SensorPort for Plant {
    fn read_all(&mut self) -> InputSignals {
        self.signals
    }
}

impl ActuatorPort for Plant {
    fn apply_outputs(&mut self, outputs: &ActuatorState) {
        assert!(!(outputs.pump1 && outputs.pump2), "both pumps commanded on");
    }

    fn set_indicators(&mut self, _alarms: u8) {}

    fn all_off(&mut self) {}
}

struct Clock(u64);

impl ClockPort for Clock {
    fn uptime_ms(&self) -> u64 {
        self.0
    }

    fn wall_clock(&self) -> Option<WallClock> {
        Some(WallClock { year: 2025, month: 1, day: 6, weekday: 1, hour: 9, minute: 0, second: 0 })
    }
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let Ok(mut nvs) = NvsAdapter::new() else {
        return;
    };
    let mut app = AppService::new(SystemConfig::default(), RunTimeTotals::default());
    let mut plant = Plant {
        signals: InputSignals {
            system_enable: true,
            program_selector: true,
            pump1_switch: true,
            pump2_switch: true,
            supervisory_enable: true,
            temperature_raw: 2000,
            ..InputSignals::default()
        },
    };
    let mut clock = Clock(0);
    let mut sink = Discard;
    app.start(&mut plant, &clock, &mut sink);

    for chunk in data.chunks_exact(4) {
        let index = u16::from_le_bytes([chunk[0], chunk[1]]);
        let value = u16::from_le_bytes([chunk[2], chunk[3]]);

        let before = app.config().clone();
        match AppCommand::from_register(index, value) {
            Ok(cmd) => {
                let _ = app.handle_command(cmd, &mut nvs, &mut sink);
            }
            Err(_) => assert_eq!(app.config(), &before, "rejected write changed config"),
        }

        clock.0 += u64::from(value % 1000) * 100;
        plant.signals.temperature_raw = value & 0x0FFF;
        app.tick(&mut plant, &clock, &mut sink);
    }
});
