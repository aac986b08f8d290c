//! ESP32 time adapter.
//!
//! Implements [`ClockPort`] for the boiler controller.
//!
//! - **`target_os = "espidf"`**: monotonic time from `esp_timer_get_time()`,
//!   wall clock from `gettimeofday` + `localtime_r` (set by SNTP or the RTC).
//! - **`not(target_os = "espidf")`**: `std::time::Instant` for uptime and
//!   an injectable wall clock for host-side simulation.

use crate::app::ports::{ClockPort, WallClock};

/// Anything before 2020-01-01 means the clock was never set.
#[cfg(target_os = "espidf")]
const EPOCH_2020: i64 = 1_577_836_800;

/// Time adapter for the ESP32-S3 platform.
pub struct Esp32TimeAdapter {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
    #[cfg(not(target_os = "espidf"))]
    wall_clock: std::cell::Cell<Option<WallClock>>,
}

impl Default for Esp32TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
            #[cfg(not(target_os = "espidf"))]
            wall_clock: std::cell::Cell::new(None),
        }
    }

    /// Simulation only: pin the wall clock (or clear it with `None`).
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_wall_clock(&self, clock: Option<WallClock>) {
        self.wall_clock.set(clock);
    }
}

impl ClockPort for Esp32TimeAdapter {
    #[cfg(target_os = "espidf")]
    fn uptime_ms(&self) -> u64 {
        // SAFETY: esp_timer_get_time reads the monotonic high-resolution timer.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1_000
    }

    #[cfg(not(target_os = "espidf"))]
    fn uptime_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    #[cfg(target_os = "espidf")]
    fn wall_clock(&self) -> Option<WallClock> {
        let mut tv = esp_idf_svc::sys::timeval { tv_sec: 0, tv_usec: 0 };
        // SAFETY: tv is a valid out-pointer; a null timezone is allowed.
        if unsafe { esp_idf_svc::sys::gettimeofday(&mut tv, core::ptr::null_mut()) } != 0 {
            return None;
        }
        if (tv.tv_sec as i64) < EPOCH_2020 {
            return None;
        }
        let secs = tv.tv_sec as esp_idf_svc::sys::time_t;
        // SAFETY: tm is plain data, fully written by localtime_r on success.
        let mut tm: esp_idf_svc::sys::tm = unsafe { core::mem::zeroed() };
        if unsafe { esp_idf_svc::sys::localtime_r(&secs, &mut tm) }.is_null() {
            return None;
        }
        Some(WallClock {
            year: (tm.tm_year + 1900) as u16,
            month: (tm.tm_mon + 1) as u8,
            day: tm.tm_mday as u8,
            weekday: tm.tm_wday as u8,
            hour: tm.tm_hour as u8,
            minute: tm.tm_min as u8,
            second: tm.tm_sec.min(59) as u8,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn wall_clock(&self) -> Option<WallClock> {
        self.wall_clock.get()
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn simulated_clock_starts_unset() {
        let t = Esp32TimeAdapter::new();
        assert!(t.wall_clock().is_none());
        let now = WallClock { year: 2024, month: 1, day: 1, weekday: 1, hour: 8, minute: 0, second: 0 };
        t.sim_set_wall_clock(Some(now));
        assert_eq!(t.wall_clock(), Some(now));
    }

    #[test]
    fn uptime_is_monotonic() {
        let t = Esp32TimeAdapter::new();
        let a = t.uptime_ms();
        let b = t.uptime_ms();
        assert!(b >= a);
    }
}
