//! GPIO / peripheral pin assignments for the boiler-room controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.
//!
//! ## Polarity
//!
//! | Group                                  | Asserted level |
//! |----------------------------------------|----------------|
//! | Operator switches, supervisory enable  | LOW (contact to 0 V, internal pull-up) |
//! | Emergency, thermal relays, burner fault| HIGH (3.3 V = alarm) |
//! | Relay and lamp outputs                 | LOW (opto-isolated relay boards) |

// ---------------------------------------------------------------------------
// Digital inputs: operator switches (active LOW)
// ---------------------------------------------------------------------------

/// Main system enable switch.
pub const SYSTEM_ENABLE_GPIO: i32 = 4;
/// Program selector (enables the weekly schedule gate).
pub const PROGRAM_SELECTOR_GPIO: i32 = 5;
/// Pump 1 selector switch.
pub const PUMP1_SWITCH_GPIO: i32 = 6;
/// Pump 2 selector switch.
pub const PUMP2_SWITCH_GPIO: i32 = 7;
/// Remote enable from the building management panel.
pub const SUPERVISORY_ENABLE_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// Digital inputs: alarm contacts (active HIGH)
// ---------------------------------------------------------------------------

/// Emergency stop chain.
pub const EMERGENCY_GPIO: i32 = 8;
/// Pump 1 motor thermal relay.
pub const THERMAL_RELAY1_GPIO: i32 = 9;
/// Pump 2 motor thermal relay.
pub const THERMAL_RELAY2_GPIO: i32 = 10;
/// Burner (thermal group) fault contact.
pub const THERMAL_GROUP_FAULT_GPIO: i32 = 11;

// ---------------------------------------------------------------------------
// Analog input
// ---------------------------------------------------------------------------

/// Supply temperature transmitter, 0–3.3 V = 0–100 °C.
/// ADC1 channel 0 (GPIO 1 on ESP32-S3), 12 dB attenuation.
pub const TEMPERATURE_ADC_GPIO: i32 = 1;

// ---------------------------------------------------------------------------
// Plant outputs (active LOW)
// ---------------------------------------------------------------------------

/// Pump 1 contactor.
pub const PUMP1_CONTACTOR_GPIO: i32 = 12;
/// Pump 2 contactor.
pub const PUMP2_CONTACTOR_GPIO: i32 = 13;
/// Burner (thermal group) enable relay.
pub const THERMAL_GROUP_RELAY_GPIO: i32 = 14;
/// Condensation pump relay.
pub const CONDENSATION_PUMP_RELAY_GPIO: i32 = 21;
/// Post-circulation indicator.
pub const POST_CIRCULATION_GPIO: i32 = 47;

// ---------------------------------------------------------------------------
// Indicator lamps (active LOW)
// ---------------------------------------------------------------------------

pub const OVERHEAT_LAMP_GPIO: i32 = 38;
pub const GENERAL_FAULT_LAMP_GPIO: i32 = 40;
pub const PROGRAM_ACTIVE_LAMP_GPIO: i32 = 42;
pub const PUMP1_FAULT_LAMP_GPIO: i32 = 39;
pub const PUMP2_FAULT_LAMP_GPIO: i32 = 41;

// ---------------------------------------------------------------------------
// Groupings used by hw_init
// ---------------------------------------------------------------------------

/// Inputs with an internal pull-up (switch contacts to ground).
pub const PULLUP_INPUTS: [i32; 5] = [
    SYSTEM_ENABLE_GPIO,
    PROGRAM_SELECTOR_GPIO,
    PUMP1_SWITCH_GPIO,
    PUMP2_SWITCH_GPIO,
    SUPERVISORY_ENABLE_GPIO,
];

/// Inputs driven by external alarm contacts (pull-down).
pub const ALARM_INPUTS: [i32; 4] = [
    EMERGENCY_GPIO,
    THERMAL_RELAY1_GPIO,
    THERMAL_RELAY2_GPIO,
    THERMAL_GROUP_FAULT_GPIO,
];

/// Every active-low relay or lamp output, driven HIGH (off) at boot.
pub const RELAY_OUTPUTS: [i32; 10] = [
    PUMP1_CONTACTOR_GPIO,
    PUMP2_CONTACTOR_GPIO,
    THERMAL_GROUP_RELAY_GPIO,
    CONDENSATION_PUMP_RELAY_GPIO,
    POST_CIRCULATION_GPIO,
    OVERHEAT_LAMP_GPIO,
    GENERAL_FAULT_LAMP_GPIO,
    PROGRAM_ACTIVE_LAMP_GPIO,
    PUMP1_FAULT_LAMP_GPIO,
    PUMP2_FAULT_LAMP_GPIO,
];

// ---------------------------------------------------------------------------
// Task watchdog
// ---------------------------------------------------------------------------

/// Main loop watchdog timeout.  Several control ticks of slack.
pub const WATCHDOG_TIMEOUT_MS: u32 = 5_000;
