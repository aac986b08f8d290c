//! Weekly operating schedule gate.
//!
//! Two daily windows (morning, afternoon) restricted to a set of weekdays.
//! The gate only matters while the program selector is on; the arbiter
//! consults it and stops the plant when it denies.
//!
//! ```text
//!   schedule disabled ───────────────────────▶ admit
//!   no wall clock     ───────────────────────▶ admit (fail open)
//!   weekday bit clear ───────────────────────▶ deny
//!   minute ∈ [m_on, m_off) ∪ [a_on, a_off) ──▶ admit, else deny
//! ```

use crate::app::ports::WallClock;
use crate::config::SystemConfig;

// ═══════════════════════════════════════════════════════════════
//  Windows
// ═══════════════════════════════════════════════════════════════

/// Half-open `[on, off)` window in minutes after midnight.
/// Windows do not wrap midnight: `on ≥ off` admits nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleWindow {
    pub on_min: u16,
    pub off_min: u16,
}

impl ScheduleWindow {
    pub fn contains(&self, minute_of_day: u16) -> bool {
        self.on_min <= minute_of_day && minute_of_day < self.off_min
    }
}

/// The two configured windows, morning first.
pub fn windows(config: &SystemConfig) -> [ScheduleWindow; 2] {
    [
        ScheduleWindow { on_min: config.morning_on_min, off_min: config.morning_off_min },
        ScheduleWindow { on_min: config.afternoon_on_min, off_min: config.afternoon_off_min },
    ]
}

// ═══════════════════════════════════════════════════════════════
//  Gate
// ═══════════════════════════════════════════════════════════════

/// Whether `weekday` (0 = Sunday) is enabled in the day mask.
pub fn day_enabled(mask: u8, weekday: u8) -> bool {
    weekday < 7 && mask & (1 << weekday) != 0
}

/// Does the schedule allow operation at `now`?
pub fn admits(now: Option<&WallClock>, config: &SystemConfig) -> bool {
    if !config.schedule_enabled {
        return true;
    }
    let Some(now) = now else {
        return true;
    };
    if !day_enabled(config.schedule_day_mask, now.weekday) {
        return false;
    }
    let minute = now.minute_of_day();
    windows(config).iter().any(|w| w.contains(minute))
}
