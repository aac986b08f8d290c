//! Digital plant inputs with per-signal polarity.
//!
//! Operator switches pull their input to ground (asserted = LOW); alarm
//! contacts drive the input to 3.3 V (asserted = HIGH).  See
//! [`pins`](crate::pins) for the wiring.  A failed read is treated as
//! *not asserted*: a missing switch is off, a missing alarm is quiet.

use embedded_hal::digital::InputPin;

use crate::pins;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    ActiveLow,
    ActiveHigh,
}

pub struct DigitalInput<P: InputPin> {
    pin: P,
    polarity: Polarity,
}

impl<P: InputPin> DigitalInput<P> {
    pub fn new(pin: P, polarity: Polarity) -> Self {
        Self { pin, polarity }
    }

    pub fn is_asserted(&mut self) -> bool {
        let level = match self.polarity {
            Polarity::ActiveLow => self.pin.is_low(),
            Polarity::ActiveHigh => self.pin.is_high(),
        };
        level.unwrap_or(false)
    }
}

/// Every digital input of the board.
pub struct DigitalInputs<P: InputPin> {
    pub system_enable: DigitalInput<P>,
    pub program_selector: DigitalInput<P>,
    pub pump1_switch: DigitalInput<P>,
    pub pump2_switch: DigitalInput<P>,
    pub supervisory_enable: DigitalInput<P>,
    pub emergency: DigitalInput<P>,
    pub thermal_relay1: DigitalInput<P>,
    pub thermal_relay2: DigitalInput<P>,
    pub thermal_group_fault: DigitalInput<P>,
}

impl<P: InputPin> DigitalInputs<P> {
    /// Build the input set from the board pin map; `open` turns a GPIO
    /// number into a pin handle.
    pub fn new(mut open: impl FnMut(i32) -> P) -> Self {
        let mut input = |gpio: i32, polarity: Polarity| DigitalInput::new(open(gpio), polarity);
        Self {
            system_enable: input(pins::SYSTEM_ENABLE_GPIO, Polarity::ActiveLow),
            program_selector: input(pins::PROGRAM_SELECTOR_GPIO, Polarity::ActiveLow),
            pump1_switch: input(pins::PUMP1_SWITCH_GPIO, Polarity::ActiveLow),
            pump2_switch: input(pins::PUMP2_SWITCH_GPIO, Polarity::ActiveLow),
            supervisory_enable: input(pins::SUPERVISORY_ENABLE_GPIO, Polarity::ActiveLow),
            emergency: input(pins::EMERGENCY_GPIO, Polarity::ActiveHigh),
            thermal_relay1: input(pins::THERMAL_RELAY1_GPIO, Polarity::ActiveHigh),
            thermal_relay2: input(pins::THERMAL_RELAY2_GPIO, Polarity::ActiveHigh),
            thermal_group_fault: input(pins::THERMAL_GROUP_FAULT_GPIO, Polarity::ActiveHigh),
        }
    }
}
