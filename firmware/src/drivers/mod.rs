//! Relay drivers, pin handles, hardware initialisation and timers.

pub mod gpio;
pub mod hw_init;
pub mod hw_timer;
pub mod relay;
pub mod watchdog;
