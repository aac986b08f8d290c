//! Active-low relay bank: five plant outputs plus five indicator lamps.
//!
//! Dumb actuator.  The arbiter already guarantees the interlocks (one
//! circulation pump at most, no burner without circulation); this driver
//! only maps booleans onto pin levels, LOW = energised.
//!
//! A pin write error is logged and otherwise ignored so one bad channel
//! cannot stall the control loop.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::control::context::ActuatorState;
use crate::error::Alarm;

/// Plant outputs in [`ActuatorState`] field order.
pub struct PlantOutputs<P> {
    pub pump1: P,
    pub pump2: P,
    pub thermal_group: P,
    pub condensation_pump: P,
    pub post_circulation: P,
}

/// Indicator lamps, one per displayed [`Alarm`].
pub struct IndicatorLamps<P> {
    pub overheat: P,
    pub general_fault: P,
    pub program_active: P,
    pub pump1_fault: P,
    pub pump2_fault: P,
}

pub struct RelayBank<P: OutputPin> {
    outputs: PlantOutputs<P>,
    lamps: IndicatorLamps<P>,
    applied: ActuatorState,
}

impl<P: OutputPin> RelayBank<P> {
    /// Take ownership of the pins and de-energise all of them.
    pub fn new(outputs: PlantOutputs<P>, lamps: IndicatorLamps<P>) -> Self {
        let mut bank = Self {
            outputs,
            lamps,
            applied: ActuatorState::all_off(),
        };
        bank.all_off();
        bank
    }

    pub fn apply(&mut self, state: &ActuatorState) {
        drive(&mut self.outputs.pump1, state.pump1, "pump1");
        drive(&mut self.outputs.pump2, state.pump2, "pump2");
        drive(&mut self.outputs.thermal_group, state.thermal_group, "thermal_group");
        drive(&mut self.outputs.condensation_pump, state.condensation_pump, "condensation");
        drive(&mut self.outputs.post_circulation, state.post_circulation, "post_circulation");
        self.applied = *state;
    }

    /// Light the lamps for an alarm bitmask.  Thermal-group faults share
    /// the general fault lamp.
    pub fn set_indicators(&mut self, alarms: u8) {
        let on = |a: Alarm| alarms & a.mask() != 0;
        drive(&mut self.lamps.overheat, on(Alarm::Overheat), "overheat lamp");
        drive(&mut self.lamps.general_fault, on(Alarm::GeneralFault), "fault lamp");
        drive(&mut self.lamps.program_active, on(Alarm::ProgramActive), "program lamp");
        drive(&mut self.lamps.pump1_fault, on(Alarm::Pump1Fault), "pump1 lamp");
        drive(&mut self.lamps.pump2_fault, on(Alarm::Pump2Fault), "pump2 lamp");
    }

    pub fn all_off(&mut self) {
        self.apply(&ActuatorState::all_off());
        self.set_indicators(0);
    }

    /// Outputs as last written.
    pub fn applied(&self) -> ActuatorState {
        self.applied
    }
}

fn drive<P: OutputPin>(pin: &mut P, energised: bool, name: &str) {
    let res = if energised { pin.set_low() } else { pin.set_high() };
    if res.is_err() {
        warn!("Relay write failed: {}", name);
    }
}
