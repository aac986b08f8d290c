//! Hardware adapter: bridges the board to the domain port traits.
//!
//! Owns the [`SensorHub`] and the [`RelayBank`], exposing them through
//! [`SensorPort`] and [`ActuatorPort`].  Generic over the pin type so the
//! same adapter runs on the board ([`GpioPin`](crate::drivers::gpio::GpioPin))
//! and against in-memory pins in tests.

use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::control::context::{ActuatorState, InputSignals};
use crate::drivers::relay::RelayBank;
use crate::sensors::SensorHub;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<I: InputPin, O: OutputPin> {
    sensor_hub: SensorHub<I>,
    relays: RelayBank<O>,
}

impl<I: InputPin, O: OutputPin> HardwareAdapter<I, O> {
    pub fn new(sensor_hub: SensorHub<I>, relays: RelayBank<O>) -> Self {
        Self { sensor_hub, relays }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<I: InputPin, O: OutputPin> SensorPort for HardwareAdapter<I, O> {
    fn read_all(&mut self) -> InputSignals {
        self.sensor_hub.read_all()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<I: InputPin, O: OutputPin> ActuatorPort for HardwareAdapter<I, O> {
    fn apply_outputs(&mut self, outputs: &ActuatorState) {
        self.relays.apply(outputs);
    }

    fn set_indicators(&mut self, alarms: u8) {
        self.relays.set_indicators(alarms);
    }

    fn all_off(&mut self) {
        self.relays.all_off();
    }
}
