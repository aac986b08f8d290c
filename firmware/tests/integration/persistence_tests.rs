//! Register and run-time persistence across a simulated reboot, using the
//! NVS adapter's host backend.

use boilerctl::adapters::nvs::{CONFIG_NAMESPACE, NvsAdapter};
use boilerctl::app::commands::AppCommand;
use boilerctl::app::ports::{ConfigPort, StoragePort};
use boilerctl::app::service::AppService;
use boilerctl::control::context::Pump;
use boilerctl::control::runtime::{CounterReset, RunTimeTotals};

use crate::mock_hw::{MockClock, MockHardware, RecordingSink, healthy};

fn boot(nvs: &NvsAdapter, hw: &mut MockHardware, clock: &MockClock, sink: &mut RecordingSink) -> AppService {
    let config = nvs.load().unwrap();
    let totals = RunTimeTotals::load(nvs);
    let mut app = AppService::new(config, totals);
    app.start(hw, clock, sink);
    app
}

#[test]
fn registers_and_totals_survive_reboot() {
    let mut nvs = NvsAdapter::new().unwrap();
    let mut hw = MockHardware::new(healthy());
    let clock = MockClock::new();
    let mut sink = RecordingSink::new();

    let mut app = boot(&nvs, &mut hw, &clock, &mut sink);
    for (index, value) in [(0, 45), (5, 650), (104, 0b0111_1111)] {
        let cmd = AppCommand::from_register(index, value).unwrap();
        app.handle_command(cmd, &mut nvs, &mut sink).unwrap();
    }
    app.tick(&mut hw, &clock, &mut sink);
    clock.advance(90_000);
    app.tick(&mut hw, &clock, &mut sink);
    assert_eq!(app.flush_counters(&mut nvs, &mut sink), Ok(true));

    // Power cycle: fresh service, same flash.
    let clock = MockClock::new();
    let app = boot(&nvs, &mut hw, &clock, &mut sink);
    assert_eq!(app.read_register(0), Ok(45));
    assert_eq!(app.read_register(5), Ok(650));
    assert_eq!(app.read_register(104), Ok(0b0111_1111));
    assert_eq!(app.read_register(1), Ok(10), "unwritten registers keep defaults");
    assert_eq!(app.counters().total_ms(Pump::One), 90_000);
    assert_eq!(app.counters().partial_ms(Pump::One), 0, "partials are RAM only");
}

#[test]
fn total_reset_survives_reboot_without_flush() {
    let mut nvs = NvsAdapter::new().unwrap();
    RunTimeTotals { pump1_ms: 1_000, pump2_ms: 7_200_000 }
        .persist(&mut nvs)
        .unwrap();
    let mut hw = MockHardware::new(healthy());
    let clock = MockClock::new();
    let mut sink = RecordingSink::new();

    let mut app = boot(&nvs, &mut hw, &clock, &mut sink);
    assert_eq!(app.counters().total_ms(Pump::Two), 7_200_000);
    app.handle_command(AppCommand::ResetCounter(CounterReset::Total(Pump::Two)), &mut nvs, &mut sink)
        .unwrap();
    drop(app);

    let app = boot(&nvs, &mut hw, &clock, &mut sink);
    assert_eq!(app.counters().total_ms(Pump::Two), 0);
    assert_eq!(app.counters().total_ms(Pump::One), 1_000);
}

#[test]
fn corrupted_totals_blob_starts_from_zero() {
    let mut nvs = NvsAdapter::new().unwrap();
    nvs.write(CONFIG_NAMESPACE, "runtime", &[0xFF; 3]).unwrap();
    assert_eq!(RunTimeTotals::load(&nvs), RunTimeTotals::default());
}
