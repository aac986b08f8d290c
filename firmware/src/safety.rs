//! Alarm monitor.
//!
//! Runs **every tick after the arbiter** and derives the indicator lamps
//! from the raw alarm inputs, the supply temperature and the schedule gate.
//! It does not influence the plant outputs; the arbiter already handles
//! every safety branch.  Its job is visibility:
//!
//! 1. A condition becomes true → its bit is set and an error is logged.
//! 2. The condition clears → the bit is cleared and the recovery is logged.
//!
//! Several alarms can be active at once; the combined mask drives the lamps
//! through [`ActuatorPort::set_indicators`](crate::app::ports::ActuatorPort::set_indicators).

use crate::app::ports::WallClock;
use crate::config::SystemConfig;
use crate::control::context::InputSignals;
use crate::error::Alarm;
use crate::schedule;
use log::{error, info};

/// Alarm monitor.
#[derive(Debug, Default)]
pub struct AlarmMonitor {
    /// Current alarm bitmask.
    alarms: u8,
}

impl AlarmMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate every indicator condition.  Returns the updated bitmask.
    pub fn evaluate(
        &mut self,
        signals: &InputSignals,
        temperature_c: f32,
        config: &SystemConfig,
        wall_clock: Option<&WallClock>,
    ) -> u8 {
        // ── Temperature ───────────────────────────────────────────
        self.eval(Alarm::Overheat, temperature_c > config.thermal_max_c());

        // ── Faults ────────────────────────────────────────────────
        self.eval(
            Alarm::GeneralFault,
            signals.emergency
                || signals.thermal_relay1_fault
                || signals.thermal_relay2_fault
                || signals.thermal_group_fault,
        );
        self.eval(Alarm::Pump1Fault, signals.thermal_relay1_fault);
        self.eval(Alarm::Pump2Fault, signals.thermal_relay2_fault);
        self.eval(Alarm::ThermalGroupFault, signals.thermal_group_fault);

        // ── Program lamp ──────────────────────────────────────────
        self.eval(
            Alarm::ProgramActive,
            signals.program_selector && schedule::admits(wall_clock, config),
        );

        self.alarms
    }

    /// Current alarm bitmask.
    pub fn alarms(&self) -> u8 {
        self.alarms
    }

    pub fn is_active(&self, alarm: Alarm) -> bool {
        self.alarms & alarm.mask() != 0
    }

    // ── Internal ──────────────────────────────────────────────────

    fn eval(&mut self, alarm: Alarm, condition: bool) {
        let was = self.is_active(alarm);
        if condition {
            if !was {
                if alarm == Alarm::ProgramActive {
                    info!("Program active");
                } else {
                    error!("ALARM SET: {alarm}");
                }
            }
            self.alarms |= alarm.mask();
        } else {
            if was {
                info!("ALARM CLEARED: {alarm}");
            }
            self.alarms &= !alarm.mask();
        }
    }
}
