//! Sensor subsystem: input drivers and the aggregating [`SensorHub`].
//!
//! The hub owns every input and produces an [`InputSignals`] snapshot each
//! tick that gets written into `ControlContext.signals`.

pub mod digital;
pub mod temperature;

use embedded_hal::digital::InputPin;

use crate::control::context::InputSignals;
use digital::DigitalInputs;
use temperature::TemperatureProbe;

/// Aggregates the digital inputs and the temperature probe.
pub struct SensorHub<P: InputPin> {
    pub inputs: DigitalInputs<P>,
    pub temperature: TemperatureProbe,
}

impl<P: InputPin> SensorHub<P> {
    /// Construct a new hub.  Pass in pre-built drivers (built in main
    /// where peripheral ownership is established).
    pub fn new(inputs: DigitalInputs<P>, temperature: TemperatureProbe) -> Self {
        Self { inputs, temperature }
    }

    /// Sample every input.  Never fails; a bad read is an inactive signal.
    pub fn read_all(&mut self) -> InputSignals {
        let i = &mut self.inputs;
        InputSignals {
            system_enable: i.system_enable.is_asserted(),
            program_selector: i.program_selector.is_asserted(),
            pump1_switch: i.pump1_switch.is_asserted(),
            pump2_switch: i.pump2_switch.is_asserted(),
            supervisory_enable: i.supervisory_enable.is_asserted(),
            emergency: i.emergency.is_asserted(),
            thermal_relay1_fault: i.thermal_relay1.is_asserted(),
            thermal_relay2_fault: i.thermal_relay2.is_asserted(),
            thermal_group_fault: i.thermal_group_fault.is_asserted(),
            temperature_raw: self.temperature.read_raw(),
        }
    }
}
