//! Status surface: a serialisable snapshot of everything an operator
//! panel or register mirror wants to show.
//!
//! Durations are pre-formatted (`HH:MM:SS`, `MM:SS`) into fixed-capacity
//! strings so building a report never allocates.

use core::fmt::Write;

use heapless::String;
use serde::Serialize;

use crate::app::ports::WallClock;
use crate::config::SystemConfig;
use crate::control::arbiter::OperatingMode;
use crate::control::context::{ActuatorState, Pump};

/// Placeholder shown while the wall clock is not set.
pub const TIME_PLACEHOLDER: &str = "--:--:--";
/// Placeholder shown while the wall clock is not set.
pub const DATE_PLACEHOLDER: &str = "--/--/----";

pub type Text = String<24>;

/// Supply temperature relative to the setpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TemperatureBand {
    /// Above the maximum setpoint.
    Above,
    /// Below the fixed setpoint.
    Below,
    Normal,
}

impl TemperatureBand {
    pub fn classify(temperature_c: f32, config: &SystemConfig) -> Self {
        if temperature_c > config.thermal_max_c() {
            Self::Above
        } else if temperature_c < config.thermal_fixed_c() {
            Self::Below
        } else {
            Self::Normal
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PumpStatus {
    pub running: bool,
    pub partial: Text,
    pub total: Text,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub mode: OperatingMode,
    pub outputs: ActuatorState,
    pub alarms: u8,
    pub temperature_c: f32,
    pub temperature_band: TemperatureBand,
    pub setpoint_min_c: f32,
    pub setpoint_fixed_c: f32,
    pub setpoint_max_c: f32,
    pub pump1: PumpStatus,
    pub pump2: PumpStatus,
    pub preferred_pump: Pump,
    pub alternation_suspended: bool,
    pub alternation_elapsed: Text,
    pub post_circulation_remaining: Text,
    pub time: Text,
    pub date: Text,
}

// ── Formatting ────────────────────────────────────────────────

/// `HH:MM:SS`; hours grow past two digits instead of wrapping.
pub fn format_hms(ms: u64) -> Text {
    let secs = ms / 1000;
    let mut s = Text::new();
    let _ = write!(s, "{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60);
    s
}

/// `MM:SS`; minutes grow past two digits instead of wrapping.
pub fn format_ms(ms: u64) -> Text {
    let secs = ms / 1000;
    let mut s = Text::new();
    let _ = write!(s, "{:02}:{:02}", secs / 60, secs % 60);
    s
}

/// Wall-clock time and date strings, or placeholders without a clock.
pub fn format_clock(clock: Option<&WallClock>) -> (Text, Text) {
    let mut time = Text::new();
    let mut date = Text::new();
    match clock {
        Some(c) => {
            let _ = write!(time, "{:02}:{:02}:{:02}", c.hour, c.minute, c.second);
            let _ = write!(date, "{:02}/{:02}/{:04}", c.day, c.month, c.year);
        }
        None => {
            let _ = time.push_str(TIME_PLACEHOLDER);
            let _ = date.push_str(DATE_PLACEHOLDER);
        }
    }
    (time, date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hms_formatting() {
        assert_eq!(format_hms(0).as_str(), "00:00:00");
        assert_eq!(format_hms(3_723_999).as_str(), "01:02:03");
        assert_eq!(format_hms(360_000_000).as_str(), "100:00:00");
    }

    #[test]
    fn minutes_seconds_formatting() {
        assert_eq!(format_ms(61_000).as_str(), "01:01");
        assert_eq!(format_ms(120 * 60_000).as_str(), "120:00");
    }

    #[test]
    fn clock_placeholders() {
        let (t, d) = format_clock(None);
        assert_eq!(t.as_str(), TIME_PLACEHOLDER);
        assert_eq!(d.as_str(), DATE_PLACEHOLDER);
        let c = WallClock { year: 2025, month: 1, day: 9, weekday: 4, hour: 7, minute: 5, second: 3 };
        let (t, d) = format_clock(Some(&c));
        assert_eq!(t.as_str(), "07:05:03");
        assert_eq!(d.as_str(), "09/01/2025");
    }

    #[test]
    fn temperature_bands() {
        let c = SystemConfig::default(); // fixed 60, max 70
        assert_eq!(TemperatureBand::classify(70.1, &c), TemperatureBand::Above);
        assert_eq!(TemperatureBand::classify(70.0, &c), TemperatureBand::Normal);
        assert_eq!(TemperatureBand::classify(60.0, &c), TemperatureBand::Normal);
        assert_eq!(TemperatureBand::classify(59.9, &c), TemperatureBand::Below);
    }
}
