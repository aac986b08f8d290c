//! System configuration parameters
//!
//! All operator-tunable parameters for the boiler controller, plus the
//! numeric register surface used to read and write them one field at a time.
//! Values are persisted per register via [`ConfigPort`](crate::app::ports::ConfigPort).

use serde::{Deserialize, Serialize};

/// Whether the thermal group is regulated from the supply probe or simply
/// follows circulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum SensorMode {
    /// Probe ignored: the burner runs whenever a circulation pump runs.
    Fixed = 0,
    /// Hysteresis regulation against the fixed setpoint using the live probe.
    Probe = 1,
}

impl SensorMode {
    pub fn from_register(value: u16) -> Self {
        if value == 0 { Self::Fixed } else { Self::Probe }
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Circulation ---
    /// Pump alternation period (minutes). 0 flips on every tick.
    pub alternation_minutes: u16,
    /// Post-circulation duration after a forced burner stop (minutes).
    pub post_circulation_minutes: u16,

    // --- Thermal group setpoints (tenths of °C) ---
    pub thermal_min_x10: i16,
    pub thermal_max_x10: i16,
    pub thermal_fixed_x10: i16,
    pub sensor_mode: SensorMode,

    // --- Schedule ---
    pub schedule_enabled: bool,
    /// Window boundaries as minutes after midnight, half-open `[on, off)`.
    pub morning_on_min: u16,
    pub morning_off_min: u16,
    pub afternoon_on_min: u16,
    pub afternoon_off_min: u16,
    /// Bit `n` admits weekday `n` (0 = Sunday).
    pub schedule_day_mask: u8,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
    /// How often accumulated run-time totals are flushed to NVS (seconds)
    pub counter_persist_interval_secs: u32,
    /// Status report interval (seconds)
    pub status_interval_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Circulation
            alternation_minutes: 120,
            post_circulation_minutes: 10,

            // Setpoints
            thermal_min_x10: 550,   // 55.0 °C
            thermal_max_x10: 700,   // 70.0 °C
            thermal_fixed_x10: 600, // 60.0 °C
            sensor_mode: SensorMode::Probe,

            // Schedule
            schedule_enabled: false,
            morning_on_min: 8 * 60,
            morning_off_min: 14 * 60,
            afternoon_on_min: 16 * 60,
            afternoon_off_min: 22 * 60,
            schedule_day_mask: 0b0111_110, // Mon–Fri

            // Timing
            control_loop_interval_ms: 100,      // 10 Hz
            counter_persist_interval_secs: 60,  // 1/min
            status_interval_secs: 5,
        }
    }
}

impl SystemConfig {
    pub fn alternation_period_ms(&self) -> u64 {
        u64::from(self.alternation_minutes) * 60_000
    }

    pub fn post_circulation_ms(&self) -> u64 {
        u64::from(self.post_circulation_minutes) * 60_000
    }

    pub fn thermal_min_c(&self) -> f32 {
        f32::from(self.thermal_min_x10) / 10.0
    }

    pub fn thermal_max_c(&self) -> f32 {
        f32::from(self.thermal_max_x10) / 10.0
    }

    pub fn thermal_fixed_c(&self) -> f32 {
        f32::from(self.thermal_fixed_x10) / 10.0
    }

    /// Raw register value for `reg`, as exposed on the register surface.
    pub fn register(&self, reg: ConfigRegister) -> u16 {
        match reg {
            ConfigRegister::AlternationMinutes => self.alternation_minutes,
            ConfigRegister::PostCirculationMinutes => self.post_circulation_minutes,
            ConfigRegister::ThermalMin => self.thermal_min_x10 as u16,
            ConfigRegister::ThermalMax => self.thermal_max_x10 as u16,
            ConfigRegister::SensorMode => self.sensor_mode as u16,
            ConfigRegister::ThermalFixed => self.thermal_fixed_x10 as u16,
            ConfigRegister::ScheduleEnable => u16::from(self.schedule_enabled),
            ConfigRegister::MorningOn => self.morning_on_min,
            ConfigRegister::MorningOff => self.morning_off_min,
            ConfigRegister::AfternoonOn => self.afternoon_on_min,
            ConfigRegister::AfternoonOff => self.afternoon_off_min,
            ConfigRegister::DayMask => u16::from(self.schedule_day_mask),
        }
    }

    /// Apply a raw register write.  Values are taken as-is; setpoints are
    /// two's-complement tenths of °C and the day mask keeps its low 7 bits.
    pub fn set_register(&mut self, reg: ConfigRegister, value: u16) {
        match reg {
            ConfigRegister::AlternationMinutes => self.alternation_minutes = value,
            ConfigRegister::PostCirculationMinutes => self.post_circulation_minutes = value,
            ConfigRegister::ThermalMin => self.thermal_min_x10 = value as i16,
            ConfigRegister::ThermalMax => self.thermal_max_x10 = value as i16,
            ConfigRegister::SensorMode => self.sensor_mode = SensorMode::from_register(value),
            ConfigRegister::ThermalFixed => self.thermal_fixed_x10 = value as i16,
            ConfigRegister::ScheduleEnable => self.schedule_enabled = value != 0,
            ConfigRegister::MorningOn => self.morning_on_min = value,
            ConfigRegister::MorningOff => self.morning_off_min = value,
            ConfigRegister::AfternoonOn => self.afternoon_on_min = value,
            ConfigRegister::AfternoonOff => self.afternoon_off_min = value,
            ConfigRegister::DayMask => self.schedule_day_mask = (value & 0x7F) as u8,
        }
    }

    /// Setpoint orderings that are accepted but probably not intended.
    pub fn setpoint_warnings(&self) -> heapless::Vec<&'static str, 3> {
        let mut out = heapless::Vec::new();
        if self.thermal_min_x10 > self.thermal_fixed_x10 {
            let _ = out.push("minimum setpoint above fixed setpoint");
        }
        if self.thermal_fixed_x10 > self.thermal_max_x10 {
            let _ = out.push("fixed setpoint above maximum setpoint");
        }
        if self.thermal_min_x10 > self.thermal_max_x10 {
            let _ = out.push("minimum setpoint above maximum setpoint");
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Register surface
// ---------------------------------------------------------------------------

/// Stable numeric indices of the configuration registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum ConfigRegister {
    AlternationMinutes = 0,
    PostCirculationMinutes = 1,
    ThermalMin = 2,
    ThermalMax = 3,
    SensorMode = 4,
    ThermalFixed = 5,
    ScheduleEnable = 6,
    MorningOn = 100,
    MorningOff = 101,
    AfternoonOn = 102,
    AfternoonOff = 103,
    DayMask = 104,
}

impl ConfigRegister {
    pub const ALL: [Self; 12] = [
        Self::AlternationMinutes,
        Self::PostCirculationMinutes,
        Self::ThermalMin,
        Self::ThermalMax,
        Self::SensorMode,
        Self::ThermalFixed,
        Self::ScheduleEnable,
        Self::MorningOn,
        Self::MorningOff,
        Self::AfternoonOn,
        Self::AfternoonOff,
        Self::DayMask,
    ];

    /// Look up a register by its numeric index.
    pub fn from_index(idx: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|r| *r as u16 == idx)
    }

    pub const fn index(self) -> u16 {
        self as u16
    }

    /// NVS key under which this register is persisted (≤ 15 bytes).
    pub const fn nvs_key(self) -> &'static str {
        match self {
            Self::AlternationMinutes => "alt_min",
            Self::PostCirculationMinutes => "post_min",
            Self::ThermalMin => "t_min",
            Self::ThermalMax => "t_max",
            Self::SensorMode => "sensor_mode",
            Self::ThermalFixed => "t_fixed",
            Self::ScheduleEnable => "sched_en",
            Self::MorningOn => "morning_on",
            Self::MorningOff => "morning_off",
            Self::AfternoonOn => "afternoon_on",
            Self::AfternoonOff => "afternoon_off",
            Self::DayMask => "day_mask",
        }
    }
}
