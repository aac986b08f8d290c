//! Application core: orchestration around the decision core, zero I/O.
//!
//! Ties the control arbiter, alarm monitor and run-time counters into one
//! per-tick cycle and turns register writes into persisted configuration.
//! All interaction with hardware and storage happens through **port traits**
//! defined in [`ports`], keeping this layer fully testable without real
//! peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
