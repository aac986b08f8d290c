//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the control context, the arbiter, the alarm monitor
//! and the run-time counters.  It exposes a clean, hardware-agnostic API.
//! All I/O flows through port traits injected at call sites, making the
//! entire service testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────────┐ ──▶ EventSink
//!   ClockPort ──▶ │         AppService         │
//! ActuatorPort ◀──│ Arbiter · Alarms · Counters│ ◀── AppCommand
//!                 └────────────────────────────┘
//!                      │              │
//!                 ConfigPort     StoragePort
//! ```

use log::{info, warn};

use crate::config::{ConfigRegister, SystemConfig};
use crate::control::arbiter::{ControlArbiter, OperatingMode, TickReport};
use crate::control::context::{ActuatorState, ControlContext, Pump};
use crate::control::runtime::{CounterReset, RunTimeCounters, RunTimeTotals};
use crate::control::temperature::estimate_celsius;
use crate::error::{Error, Result};
use crate::safety::AlarmMonitor;
use crate::status::{self, PumpStatus, StatusReport, TemperatureBand};

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{ActuatorPort, ClockPort, ConfigPort, EventSink, SensorPort, StoragePort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    ctx: ControlContext,
    arbiter: ControlArbiter,
    alarms: AlarmMonitor,
    counters: RunTimeCounters,
    /// Totals as last written to storage (skip redundant flash writes).
    persisted_totals: RunTimeTotals,
    last_persist_ms: u64,
    last_status_ms: u64,
}

impl AppService {
    /// Construct the service from the loaded configuration and totals.
    ///
    /// Does **not** touch hardware. Call [`start`](Self::start) next.
    pub fn new(config: SystemConfig, totals: RunTimeTotals) -> Self {
        Self {
            ctx: ControlContext::new(config),
            arbiter: ControlArbiter::new(0),
            alarms: AlarmMonitor::new(),
            counters: RunTimeCounters::new(totals, 0),
            persisted_totals: totals,
            last_persist_ms: 0,
            last_status_ms: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Force every output off and anchor all timers at the current uptime.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, clock: &impl ClockPort, sink: &mut impl EventSink) {
        let now = clock.uptime_ms();
        hw.all_off();
        self.arbiter = ControlArbiter::new(now);
        self.counters = RunTimeCounters::new(self.counters.totals(), now);
        self.ctx.now_ms = now;
        self.last_persist_ms = now;
        self.last_status_ms = now;

        self.log_setpoint_warnings();
        let totals = self.counters.totals();
        sink.emit(&AppEvent::Started { totals });
        info!(
            "AppService started (alternation {} min, post-circulation {} min, sensor mode {:?})",
            self.ctx.config.alternation_minutes,
            self.ctx.config.post_circulation_minutes,
            self.ctx.config.sensor_mode
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle: read inputs → arbiter → counters →
    /// alarms → actuators → events.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`], avoiding a double mutable borrow while keeping the
    /// port boundary explicit.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) {
        let prev_mode = self.ctx.mode;
        let prev_alarms = self.alarms.alarms();

        // 1. Sample inputs and time
        let now = clock.uptime_ms();
        let signals = hw.read_all();
        let temperature_c = estimate_celsius(signals.temperature_raw);
        self.ctx.begin_tick(now, clock.wall_clock(), signals, temperature_c);

        if !self.ctx.signals.digital_eq(&self.ctx.previous_signals) {
            sink.emit(&AppEvent::SignalsChanged {
                from: self.ctx.previous_signals,
                to: self.ctx.signals,
            });
        }

        // 2. Decide outputs
        let report = self.arbiter.decide(&mut self.ctx);

        // 3. Credit run time for the interval just ended
        self.counters
            .update(&self.ctx.previous_outputs, &self.ctx.outputs, now);

        // 4. Indicators
        let alarms = self.alarms.evaluate(
            &self.ctx.signals,
            temperature_c,
            &self.ctx.config,
            self.ctx.wall_clock.as_ref(),
        );

        // 5. Apply via ActuatorPort
        hw.apply_outputs(&self.ctx.outputs);
        hw.set_indicators(alarms);

        // 6. Report what changed
        self.emit_report(report, sink);
        if self.ctx.mode != prev_mode {
            info!("Mode: {} -> {}", prev_mode.name(), self.ctx.mode.name());
            sink.emit(&AppEvent::ModeChanged {
                from: prev_mode,
                to: self.ctx.mode,
            });
        }
        if self.ctx.outputs != self.ctx.previous_outputs {
            sink.emit(&AppEvent::OutputsChanged {
                from: self.ctx.previous_outputs,
                to: self.ctx.outputs,
            });
        }
        if alarms != prev_alarms {
            sink.emit(&AppEvent::AlarmsChanged(alarms));
        }
    }

    fn emit_report(&self, report: TickReport, sink: &mut impl EventSink) {
        if let Some(transition) = report.alternation {
            sink.emit(&AppEvent::Alternation(transition));
        }
        if let Some((seq, end)) = report.post_circulation_ended {
            sink.emit(&AppEvent::PostCirculationEnded(seq, end));
        }
        if let Some(seq) = report.post_circulation_started {
            sink.emit(&AppEvent::PostCirculationStarted(seq));
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external register write.
    ///
    /// Configuration writes are persisted first and only applied once the
    /// store accepted them; a failed write leaves the live config untouched.
    /// Total resets are persisted immediately, partial resets live in RAM.
    ///
    /// `store` satisfies both [`ConfigPort`] and [`StoragePort`]; on the
    /// device both are backed by the same NVS handle.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        store: &mut (impl ConfigPort + StoragePort),
        sink: &mut impl EventSink,
    ) -> Result<()> {
        match cmd {
            AppCommand::WriteRegister { register, value } => {
                store.save_register(register, value)?;
                self.ctx.config.set_register(register, value);
                info!("Register {} ({:?}) = {}", register.index(), register, value);
                if matches!(
                    register,
                    ConfigRegister::ThermalMin | ConfigRegister::ThermalMax | ConfigRegister::ThermalFixed
                ) {
                    self.log_setpoint_warnings();
                }
                sink.emit(&AppEvent::RegisterWritten { register, value });
            }
            AppCommand::ResetCounter(reset) => {
                if let CounterReset::Total(_) = reset {
                    let totals = self.counters.totals_after(reset);
                    totals.persist(store)?;
                    self.persisted_totals = totals;
                }
                self.counters.reset(reset);
                info!("Counter reset: {:?}", reset);
                sink.emit(&AppEvent::CounterReset(reset));
            }
        }
        Ok(())
    }

    // ── Housekeeping ──────────────────────────────────────────

    /// Flush run-time totals once the persist interval has elapsed.
    /// Returns `true` if a write happened.  Failures are logged and retried
    /// on the next interval.
    pub fn persist_counters_if_due(
        &mut self,
        storage: &mut impl StoragePort,
        now_ms: u64,
        sink: &mut impl EventSink,
    ) -> bool {
        let interval_ms = u64::from(self.ctx.config.counter_persist_interval_secs) * 1000;
        if now_ms.saturating_sub(self.last_persist_ms) < interval_ms {
            return false;
        }
        self.last_persist_ms = now_ms;
        match self.flush_counters(storage, sink) {
            Ok(written) => written,
            Err(e) => {
                warn!("Run-time totals flush failed: {}", e);
                false
            }
        }
    }

    /// Write the totals now if they changed since the last flush.
    pub fn flush_counters(&mut self, storage: &mut impl StoragePort, sink: &mut impl EventSink) -> Result<bool> {
        let totals = self.counters.totals();
        if totals == self.persisted_totals {
            return Ok(false);
        }
        totals.persist(storage)?;
        self.persisted_totals = totals;
        sink.emit(&AppEvent::CountersPersisted(totals));
        Ok(true)
    }

    /// Emit a status snapshot once the status interval has elapsed.
    pub fn report_status_if_due(&mut self, now_ms: u64, sink: &mut impl EventSink) -> bool {
        let interval_ms = u64::from(self.ctx.config.status_interval_secs) * 1000;
        if now_ms.saturating_sub(self.last_status_ms) < interval_ms {
            return false;
        }
        self.last_status_ms = now_ms;
        sink.emit(&AppEvent::Status(self.status()));
        true
    }

    // ── Queries ───────────────────────────────────────────────

    /// Status snapshot as of the last tick.
    pub fn status(&self) -> StatusReport {
        let now = self.ctx.now_ms;
        let config = &self.ctx.config;
        let (time, date) = status::format_clock(self.ctx.wall_clock.as_ref());
        StatusReport {
            mode: self.ctx.mode,
            outputs: self.ctx.outputs,
            alarms: self.alarms.alarms(),
            temperature_c: self.ctx.temperature_c,
            temperature_band: TemperatureBand::classify(self.ctx.temperature_c, config),
            setpoint_min_c: config.thermal_min_c(),
            setpoint_fixed_c: config.thermal_fixed_c(),
            setpoint_max_c: config.thermal_max_c(),
            pump1: self.pump_status(Pump::One),
            pump2: self.pump_status(Pump::Two),
            preferred_pump: self.arbiter.preferred_pump(),
            alternation_suspended: self.arbiter.alternation_suspended(),
            alternation_elapsed: status::format_ms(self.arbiter.alternation_elapsed_ms(now)),
            post_circulation_remaining: status::format_ms(
                self.arbiter
                    .post_circulation_remaining_ms(now, config.post_circulation_ms()),
            ),
            time,
            date,
        }
    }

    fn pump_status(&self, pump: Pump) -> PumpStatus {
        PumpStatus {
            running: self.ctx.outputs.pump_on(pump),
            partial: status::format_hms(self.counters.partial_ms(pump)),
            total: status::format_hms(self.counters.total_ms(pump)),
        }
    }

    /// Read back a configuration register by index.
    pub fn read_register(&self, index: u16) -> Result<u16> {
        ConfigRegister::from_index(index)
            .map(|reg| self.ctx.config.register(reg))
            .ok_or(Error::UnknownRegister(index))
    }

    /// Outputs applied on the last tick.
    pub fn outputs(&self) -> ActuatorState {
        self.ctx.outputs
    }

    pub fn mode(&self) -> OperatingMode {
        self.ctx.mode
    }

    pub fn config(&self) -> &SystemConfig {
        &self.ctx.config
    }

    /// Current indicator bitmask.
    pub fn alarms(&self) -> u8 {
        self.alarms.alarms()
    }

    pub fn counters(&self) -> &RunTimeCounters {
        &self.counters
    }

    // ── Internal ──────────────────────────────────────────────

    fn log_setpoint_warnings(&self) {
        for w in self.ctx.config.setpoint_warnings() {
            warn!("Setpoint order: {}", w);
        }
    }
}
