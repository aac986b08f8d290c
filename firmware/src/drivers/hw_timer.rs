//! Hardware timer module using ESP-IDF's esp_timer API.
//!
//! Creates two periodic timers that push events into the lock-free SPSC
//! queue: the control tick at the configured loop interval and a 1 Hz
//! housekeeping tick.  Host builds start nothing; tests call
//! `AppService::tick` directly.
//!
//! Timer callbacks execute in the ESP timer task context (not ISR), so
//! they can safely call push_event() which uses atomics only.

#[cfg(target_os = "espidf")]
use crate::events::{push_event, Event};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::{error, info};

/// Housekeeping period (µs).
pub const HOUSEKEEPING_PERIOD_US: u64 = 1_000_000;

#[cfg(target_os = "espidf")]
static mut CONTROL_TIMER: esp_timer_handle_t = core::ptr::null_mut();
#[cfg(target_os = "espidf")]
static mut HOUSEKEEPING_TIMER: esp_timer_handle_t = core::ptr::null_mut();

#[cfg(target_os = "espidf")]
unsafe extern "C" fn control_tick_cb(_arg: *mut core::ffi::c_void) {
    push_event(Event::ControlTick);
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn housekeeping_tick_cb(_arg: *mut core::ffi::c_void) {
    push_event(Event::HousekeepingTick);
}

/// Create and start one periodic timer.  Returns `false` on failure.
///
/// SAFETY: `handle` must point at one of this module's handle statics and
/// be written only from the main task before callbacks fire.
#[cfg(target_os = "espidf")]
unsafe fn start_periodic(
    handle: *mut esp_timer_handle_t,
    callback: unsafe extern "C" fn(*mut core::ffi::c_void),
    name: &'static [u8],
    period_us: u64,
) -> bool {
    let args = esp_timer_create_args_t {
        callback: Some(callback),
        arg: core::ptr::null_mut(),
        dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
        name: name.as_ptr() as *const _,
        skip_unhandled_events: true,
    };
    let ret = unsafe { esp_timer_create(&args, handle) };
    if ret != ESP_OK as i32 {
        error!("hw_timer: create failed (rc={})", ret);
        return false;
    }
    let ret = unsafe { esp_timer_start_periodic(*handle, period_us) };
    if ret != ESP_OK as i32 {
        error!("hw_timer: start failed (rc={})", ret);
        return false;
    }
    true
}

/// Start the control and housekeeping timers.
#[cfg(target_os = "espidf")]
pub fn start_timers(control_interval_ms: u32) {
    // SAFETY: both handles are written here once at boot from the single
    // main-task context before any timer callback fires.
    unsafe {
        if !start_periodic(
            &raw mut CONTROL_TIMER,
            control_tick_cb,
            b"control\0",
            u64::from(control_interval_ms) * 1_000,
        ) {
            return;
        }
        if !start_periodic(
            &raw mut HOUSEKEEPING_TIMER,
            housekeeping_tick_cb,
            b"housekeep\0",
            HOUSEKEEPING_PERIOD_US,
        ) {
            return;
        }
    }
    info!("hw_timer: control@{}ms + housekeeping@1s started", control_interval_ms);
}

#[cfg(not(target_os = "espidf"))]
pub fn start_timers(control_interval_ms: u32) {
    log::info!("hw_timer(sim): timers not started ({} ms control period)", control_interval_ms);
}
