//! AppService → arbiter → actuators, driven through mock ports.

use boilerctl::app::commands::AppCommand;
use boilerctl::app::events::AppEvent;
use boilerctl::app::ports::{ConfigError, StorageError, WallClock};
use boilerctl::app::service::AppService;
use boilerctl::config::{ConfigRegister, SystemConfig};
use boilerctl::control::alternation::AlternationTransition;
use boilerctl::control::arbiter::OperatingMode;
use boilerctl::control::context::{ActuatorState, Pump};
use boilerctl::control::post_circulation::{Fallback, PostCirculationEnd};
use boilerctl::control::runtime::{CounterReset, RunTimeTotals};
use boilerctl::error::{Alarm, Error};
use boilerctl::status;

use crate::mock_hw::{MockClock, MockHardware, MockNvs, RecordingSink, healthy, raw_for};

const TICK: u64 = 100;

struct Rig {
    app: AppService,
    hw: MockHardware,
    clock: MockClock,
    nvs: MockNvs,
    sink: RecordingSink,
}

impl Rig {
    fn new(config: SystemConfig) -> Self {
        let mut rig = Self {
            app: AppService::new(config, RunTimeTotals::default()),
            hw: MockHardware::new(healthy()),
            clock: MockClock::new(),
            nvs: MockNvs::new(),
            sink: RecordingSink::new(),
        };
        rig.app.start(&mut rig.hw, &rig.clock, &mut rig.sink);
        rig
    }

    fn tick(&mut self) {
        self.app.tick(&mut self.hw, &self.clock, &mut self.sink);
    }

    /// Advance the clock by `ms`, then run one tick.
    fn step(&mut self, ms: u64) {
        self.clock.advance(ms);
        self.tick();
    }

    fn write(&mut self, index: u16, value: u16) -> boilerctl::error::Result<()> {
        let cmd = AppCommand::from_register(index, value)?;
        self.app.handle_command(cmd, &mut self.nvs, &mut self.sink)
    }
}

fn weekday_at(weekday: u8, hour: u8, minute: u8) -> WallClock {
    WallClock { year: 2025, month: 3, day: 10, weekday, hour, minute, second: 0 }
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_forces_everything_off_and_reports_totals() {
    let rig = Rig::new(SystemConfig::default());
    assert_eq!(rig.hw.all_off_count(), 1);
    assert!(matches!(rig.sink.events[0], AppEvent::Started { .. }));
    assert_eq!(rig.app.outputs(), ActuatorState::all_off());
}

#[test]
fn healthy_plant_runs_pump_one_and_fires_burner() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.tick();
    let out = rig.hw.outputs();
    assert!(out.pump1 && !out.pump2);
    assert!(out.thermal_group, "50 °C is below the band, burner must fire");
    assert!(!out.condensation_pump && !out.post_circulation);
    assert_eq!(rig.app.mode(), OperatingMode::Running);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::ModeChanged { .. })), 1);
}

// ── Priority branches ─────────────────────────────────────────

#[test]
fn emergency_overrides_everything() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.tick();
    rig.hw.signals.emergency = true;
    rig.hw.signals.thermal_relay1_fault = true;
    rig.hw.signals.thermal_relay2_fault = true;
    rig.step(TICK);
    assert_eq!(rig.hw.outputs(), ActuatorState::all_off());
    assert_eq!(rig.app.mode(), OperatingMode::Emergency);
    assert!(rig.hw.indicators() & Alarm::GeneralFault.mask() != 0);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::PostCirculationStarted(_))),
        0,
        "emergency never starts post-circulation"
    );
}

#[test]
fn double_thermal_relay_fault_runs_condensation_only() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.hw.signals.thermal_relay1_fault = true;
    rig.hw.signals.thermal_relay2_fault = true;
    rig.tick();
    let out = rig.hw.outputs();
    assert!(out.condensation_pump);
    assert!(!out.pump1 && !out.pump2 && !out.thermal_group);
    assert_eq!(rig.app.mode(), OperatingMode::ThermalRelayFault);
    let lamps = rig.hw.indicators();
    assert!(lamps & Alarm::Pump1Fault.mask() != 0);
    assert!(lamps & Alarm::Pump2Fault.mask() != 0);
}

#[test]
fn no_available_pump_runs_condensation_pump() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.hw.signals.pump1_switch = false;
    rig.hw.signals.pump2_switch = false;
    rig.tick();
    assert_eq!(
        rig.hw.outputs(),
        ActuatorState { condensation_pump: true, ..ActuatorState::all_off() }
    );
    assert_eq!(rig.app.mode(), OperatingMode::NoPumpAvailable);
}

#[test]
fn supervisory_off_stops_plant() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.hw.signals.supervisory_enable = false;
    rig.tick();
    assert_eq!(rig.hw.outputs(), ActuatorState::all_off());
    assert_eq!(rig.app.mode(), OperatingMode::SupervisoryOff);
}

#[test]
fn hot_supply_keeps_burner_off_but_circulates() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.hw.signals.temperature_raw = raw_for(75.0);
    rig.tick();
    let out = rig.hw.outputs();
    assert!(out.pump1 && !out.thermal_group);
    assert!(rig.hw.indicators() & Alarm::Overheat.mask() != 0);
}

#[test]
fn fixed_sensor_mode_still_regulates_on_temperature() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.write(ConfigRegister::SensorMode.index(), 0).unwrap();
    assert_eq!(rig.app.read_register(ConfigRegister::SensorMode.index()), Ok(0));

    rig.hw.signals.temperature_raw = raw_for(90.0);
    rig.tick();
    let out = rig.hw.outputs();
    assert!(out.pump1, "circulation continues");
    assert!(!out.thermal_group, "burner stays off above the fixed setpoint");

    rig.hw.signals.temperature_raw = raw_for(40.0);
    rig.step(TICK);
    assert!(rig.hw.outputs().thermal_group);
}

// ── Post-circulation ──────────────────────────────────────────

#[test]
fn system_off_after_firing_post_circulates_for_configured_time() {
    let mut rig = Rig::new(SystemConfig::default()); // 10 min
    rig.tick();
    assert!(rig.hw.outputs().thermal_group);

    rig.hw.signals.system_enable = false;
    rig.step(TICK);
    assert_eq!(rig.hw.outputs(), Fallback::Pump(Pump::One).outputs());
    assert_eq!(rig.app.mode(), OperatingMode::SystemOff);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::PostCirculationStarted(_))), 1);

    rig.step(599_999);
    assert!(rig.hw.outputs().post_circulation, "still inside the duration");

    rig.step(1);
    assert_eq!(rig.hw.outputs(), ActuatorState::all_off());
    assert_eq!(
        rig.sink.count(|e| matches!(
            e,
            AppEvent::PostCirculationEnded(_, PostCirculationEnd::Completed)
        )),
        1
    );

    rig.step(TICK);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::PostCirculationStarted(_))), 1);
}

#[test]
fn post_circulation_falls_back_to_available_pump() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.tick();
    rig.hw.signals.system_enable = false;
    rig.hw.signals.pump1_switch = false;
    rig.step(TICK);
    assert_eq!(rig.hw.outputs(), Fallback::Pump(Pump::Two).outputs());
}

#[test]
fn no_post_circulation_when_burner_was_off() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.hw.signals.temperature_raw = raw_for(65.0);
    rig.tick();
    assert!(!rig.hw.outputs().thermal_group);
    rig.hw.signals.system_enable = false;
    rig.step(TICK);
    assert_eq!(rig.hw.outputs(), ActuatorState::all_off());
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::PostCirculationStarted(_))), 0);
}

#[test]
fn returning_to_normal_cancels_post_circulation() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.tick();
    rig.hw.signals.supervisory_enable = false;
    rig.step(TICK);
    assert!(rig.hw.outputs().post_circulation);

    rig.hw.signals.supervisory_enable = true;
    rig.step(TICK);
    assert!(!rig.hw.outputs().post_circulation);
    assert_eq!(rig.app.mode(), OperatingMode::Running);
    assert_eq!(
        rig.sink.count(|e| matches!(
            e,
            AppEvent::PostCirculationEnded(_, PostCirculationEnd::Cancelled)
        )),
        1
    );
}

#[test]
fn emergency_cancels_post_circulation() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.tick();
    rig.hw.signals.system_enable = false;
    rig.step(TICK);
    rig.hw.signals.emergency = true;
    rig.step(TICK);
    assert_eq!(rig.hw.outputs(), ActuatorState::all_off());
    assert_eq!(
        rig.sink.count(|e| matches!(
            e,
            AppEvent::PostCirculationEnded(_, PostCirculationEnd::Cancelled)
        )),
        1
    );
}

// ── Alternation & counters ────────────────────────────────────

#[test]
fn pumps_alternate_each_period_and_partials_restart() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.write(ConfigRegister::AlternationMinutes.index(), 1).unwrap();

    rig.tick();
    assert!(rig.hw.outputs().pump1);

    rig.step(59_999);
    assert!(rig.hw.outputs().pump1, "turn not over yet");

    rig.step(1);
    let out = rig.hw.outputs();
    assert!(out.pump2 && !out.pump1);
    assert_eq!(
        rig.sink.count(|e| matches!(
            e,
            AppEvent::Alternation(AlternationTransition::Switched { from: Pump::One, to: Pump::Two })
        )),
        1
    );
    assert_eq!(rig.app.counters().partial_ms(Pump::One), 60_000);
    assert_eq!(rig.app.counters().partial_ms(Pump::Two), 0);

    rig.step(60_000);
    assert!(rig.hw.outputs().pump1);
    assert_eq!(rig.app.counters().partial_ms(Pump::One), 0, "incoming pump restarts its turn");
    assert_eq!(rig.app.counters().partial_ms(Pump::Two), 60_000);
    assert_eq!(rig.app.counters().total_ms(Pump::One), 60_000);
    assert_eq!(rig.app.counters().total_ms(Pump::Two), 60_000);
}

#[test]
fn tripped_pump_hands_over_and_suspends_alternation() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.tick();
    rig.hw.signals.thermal_relay1_fault = true;
    rig.step(TICK);
    assert!(rig.hw.outputs().pump2 && !rig.hw.outputs().pump1);
    assert!(rig.app.status().alternation_suspended);
    assert_eq!(
        rig.sink.count(|e| matches!(
            e,
            AppEvent::Alternation(AlternationTransition::Suspended { running: Pump::Two })
        )),
        1
    );

    rig.hw.signals.thermal_relay1_fault = false;
    rig.step(TICK);
    assert!(rig.hw.outputs().pump2, "survivor keeps the turn on resume");
    assert!(!rig.app.status().alternation_suspended);
}

// ── Schedule ──────────────────────────────────────────────────

#[test]
fn schedule_gates_program_mode() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.write(ConfigRegister::ScheduleEnable.index(), 1).unwrap();
    rig.hw.signals.program_selector = true;

    // Saturday is outside the default Mon–Fri mask.
    rig.clock.set_wall(Some(weekday_at(6, 9, 0)));
    rig.tick();
    assert_eq!(rig.app.mode(), OperatingMode::ScheduleClosed);
    assert!(rig.hw.indicators() & Alarm::ProgramActive.mask() == 0);

    // Monday, inside the morning window.
    rig.clock.set_wall(Some(weekday_at(1, 9, 0)));
    rig.step(TICK);
    assert_eq!(rig.app.mode(), OperatingMode::Running);
    assert!(rig.hw.indicators() & Alarm::ProgramActive.mask() != 0);

    // Monday, between the windows.
    rig.clock.set_wall(Some(weekday_at(1, 15, 0)));
    rig.step(TICK);
    assert_eq!(rig.app.mode(), OperatingMode::ScheduleClosed);
}

#[test]
fn schedule_fails_open_without_clock() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.write(ConfigRegister::ScheduleEnable.index(), 1).unwrap();
    rig.hw.signals.program_selector = true;
    rig.tick();
    assert_eq!(rig.app.mode(), OperatingMode::Running);
}

#[test]
fn manual_mode_ignores_schedule() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.write(ConfigRegister::ScheduleEnable.index(), 1).unwrap();
    rig.clock.set_wall(Some(weekday_at(0, 3, 0)));
    rig.tick();
    assert_eq!(rig.app.mode(), OperatingMode::Running);
}

// ── Register surface ──────────────────────────────────────────

#[test]
fn register_write_is_persisted_then_applied() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.write(1, 5).unwrap();
    assert_eq!(rig.nvs.saved_register(ConfigRegister::PostCirculationMinutes), Some(5));
    assert_eq!(rig.app.config().post_circulation_minutes, 5);
    assert_eq!(rig.app.read_register(1), Ok(5));
    assert!(rig.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::RegisterWritten { register: ConfigRegister::PostCirculationMinutes, value: 5 }
    )));
}

#[test]
fn failed_persist_leaves_config_untouched() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.nvs.fail_writes = true;
    assert_eq!(rig.write(0, 30), Err(Error::Config(ConfigError::IoError)));
    assert_eq!(rig.app.config().alternation_minutes, 120);
}

#[test]
fn unknown_register_is_rejected() {
    let mut rig = Rig::new(SystemConfig::default());
    assert_eq!(rig.write(7, 1), Err(Error::UnknownRegister(7)));
    assert_eq!(rig.app.read_register(228), Err(Error::UnknownRegister(228)));
}

#[test]
fn out_of_order_setpoints_are_accepted() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.write(ConfigRegister::ThermalMin.index(), 800).unwrap();
    assert_eq!(rig.app.config().thermal_min_x10, 800);
    assert!(!rig.app.config().setpoint_warnings().is_empty());
}

#[test]
fn total_reset_is_persisted_immediately() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.tick();
    rig.step(5_000);
    assert_eq!(rig.app.counters().total_ms(Pump::One), 5_000);

    rig.write(CounterReset::PUMP1_TOTAL, 0).unwrap();
    assert_eq!(rig.app.counters().total_ms(Pump::One), 0);
    assert_eq!(RunTimeTotals::load(&rig.nvs), RunTimeTotals::default());
    assert_eq!(rig.nvs.writes, 1);
}

#[test]
fn partial_reset_stays_in_ram() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.tick();
    rig.step(5_000);
    rig.write(CounterReset::PUMP1_PARTIAL, 1).unwrap();
    assert_eq!(rig.app.counters().partial_ms(Pump::One), 0);
    assert_eq!(rig.app.counters().total_ms(Pump::One), 5_000);
    assert_eq!(rig.nvs.writes, 0);
}

#[test]
fn failed_total_reset_keeps_counter() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.tick();
    rig.step(5_000);
    rig.nvs.fail_writes = true;
    assert_eq!(
        rig.write(CounterReset::PUMP1_TOTAL, 0),
        Err(Error::Storage(StorageError::IoError))
    );
    assert_eq!(rig.app.counters().total_ms(Pump::One), 5_000);
}

// ── Housekeeping ──────────────────────────────────────────────

#[test]
fn counters_flush_on_interval_only_when_changed() {
    let mut rig = Rig::new(SystemConfig::default()); // 60 s interval
    rig.tick();
    rig.step(30_000);
    assert!(!rig.app.persist_counters_if_due(&mut rig.nvs, 30_000, &mut rig.sink));

    rig.step(30_000);
    assert!(rig.app.persist_counters_if_due(&mut rig.nvs, 60_000, &mut rig.sink));
    assert_eq!(RunTimeTotals::load(&rig.nvs).pump1_ms, 60_000);

    // Stop the plant; nothing accrues, nothing is rewritten.
    rig.hw.signals.emergency = true;
    rig.step(TICK);
    assert_eq!(rig.app.flush_counters(&mut rig.nvs, &mut rig.sink), Ok(true));
    let writes = rig.nvs.writes;
    rig.step(60_000);
    assert!(!rig.app.persist_counters_if_due(&mut rig.nvs, 120_200, &mut rig.sink));
    assert_eq!(rig.nvs.writes, writes);
}

#[test]
fn status_report_uses_placeholders_without_clock() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.tick();
    assert!(!rig.app.report_status_if_due(1_000, &mut rig.sink));
    assert!(rig.app.report_status_if_due(5_000, &mut rig.sink));
    let Some(AppEvent::Status(report)) = rig.sink.events.last() else {
        panic!("expected a status event");
    };
    assert_eq!(report.time.as_str(), status::TIME_PLACEHOLDER);
    assert_eq!(report.date.as_str(), status::DATE_PLACEHOLDER);
    assert!(report.pump1.running);
    assert_eq!(report.mode, OperatingMode::Running);
}

#[test]
fn status_report_formats_clock_and_post_circulation() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.clock.set_wall(Some(WallClock {
        year: 2025,
        month: 11,
        day: 4,
        weekday: 2,
        hour: 18,
        minute: 30,
        second: 9,
    }));
    rig.tick();
    rig.hw.signals.system_enable = false;
    rig.step(TICK);
    rig.step(60_000);
    let s = rig.app.status();
    assert_eq!(s.time.as_str(), "18:30:09");
    assert_eq!(s.date.as_str(), "04/11/2025");
    assert_eq!(s.post_circulation_remaining.as_str(), "09:00");
    assert_eq!(s.pump1.total.as_str(), "00:01:00");
}
