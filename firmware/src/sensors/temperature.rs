//! Supply temperature probe (0–3.3 V transmitter on ADC1).
//!
//! Only samples the raw 12-bit value; conversion to °C is done by
//! [`estimate_celsius`](crate::control::temperature::estimate_celsius) in
//! the decision core so the raw count can be logged and mirrored as-is.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1 via the oneshot API (initialised by hw_init).
//! On host/test: reads the value injected with
//! [`hw_init::sim_set_temperature_adc`](crate::drivers::hw_init::sim_set_temperature_adc).

use crate::drivers::hw_init;

pub struct TemperatureProbe {
    channel: u32,
}

impl TemperatureProbe {
    pub fn new(channel: u32) -> Self {
        Self { channel }
    }

    /// Raw sample, 0 when the conversion fails.
    pub fn read_raw(&self) -> u16 {
        hw_init::adc1_read(self.channel)
    }
}

impl Default for TemperatureProbe {
    fn default() -> Self {
        Self::new(hw_init::ADC1_CH_TEMPERATURE)
    }
}
