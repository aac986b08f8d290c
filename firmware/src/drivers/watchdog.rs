//! Task Watchdog Timer (TWDT) driver.
//!
//! Wraps the ESP-IDF TWDT API to reset the device if the main loop
//! stalls.  A stalled loop would freeze the relays in their last state,
//! so the watchdog panics and the reboot path de-energises everything.
//!
//! The main loop must call `feed()` on every iteration.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

pub struct Watchdog {
    #[cfg(target_os = "espidf")]
    subscribed: bool,
    timeout_ms: u32,
}

impl Watchdog {
    /// Initialise and subscribe the current task to the TWDT.
    pub fn new(timeout_ms: u32) -> Self {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: TWDT configuration from the main task during boot.
            unsafe {
                let cfg = esp_task_wdt_config_t {
                    timeout_ms,
                    idle_core_mask: 0,
                    trigger_panic: true,
                };
                let ret = esp_task_wdt_reconfigure(&cfg);
                if ret != ESP_OK as i32 {
                    log::warn!("TWDT reconfigure returned {} (may already be configured)", ret);
                }

                let ret = esp_task_wdt_add(core::ptr::null_mut());
                let subscribed = ret == ESP_OK as i32;
                if subscribed {
                    info!("Watchdog: subscribed ({} ms timeout, panic on trigger)", timeout_ms);
                } else {
                    log::warn!("Watchdog: failed to subscribe ({})", ret);
                }

                Self { subscribed, timeout_ms }
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            log::info!("Watchdog(sim): no-op ({} ms)", timeout_ms);
            Self { timeout_ms }
        }
    }

    /// Feed the watchdog.  Must be called at least once per timeout.
    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        {
            if self.subscribed {
                // SAFETY: resets the TWDT for the subscribed current task.
                unsafe {
                    esp_task_wdt_reset();
                }
            }
        }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }
}
