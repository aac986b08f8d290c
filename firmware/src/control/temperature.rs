//! Supply temperature estimate from the raw probe sample.
//!
//! Linear map of the 12-bit ADC range onto 0–100 °C (0–3.3 V full scale),
//! saturated at both ends.  A disconnected probe therefore reads 0 °C and
//! a shorted one 100 °C; neither is an error.

const ADC_MAX: f32 = 4095.0;
const V_REF: f32 = 3.3;
/// Degrees per volt of the probe transmitter.
const C_PER_VOLT: f32 = 100.0 / V_REF;

pub const MIN_C: f32 = 0.0;
pub const MAX_C: f32 = 100.0;

pub fn estimate_celsius(raw: u16) -> f32 {
    let voltage = f32::from(raw) / ADC_MAX * V_REF;
    (voltage * C_PER_VOLT).clamp(MIN_C, MAX_C)
}
