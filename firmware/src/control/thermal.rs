//! Thermal-group (burner) regulation.
//!
//! Bang-bang control with an explicit hysteresis band below the fixed
//! setpoint: fire below `fixed − 2.0 °C`, stop above `fixed`, hold in
//! between.  The burner never fires without circulation.

use crate::config::SystemConfig;

/// Width of the band below the fixed setpoint (°C).
pub const HYSTERESIS_C: f32 = 2.0;

/// Decide the burner relay for this tick.
///
/// The sensor mode register is stored and reported only; regulation always
/// runs against the fixed setpoint.
pub fn regulate(temperature_c: f32, config: &SystemConfig, pumps_running: bool, was_on: bool) -> bool {
    if !pumps_running {
        return false;
    }
    let setpoint = config.thermal_fixed_c();
    if temperature_c < setpoint - HYSTERESIS_C {
        true
    } else if temperature_c > setpoint {
        false
    } else {
        was_on
    }
}
