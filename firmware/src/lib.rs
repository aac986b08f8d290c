//! Boiler / pump-room controller firmware library.
//!
//! Exposes the decision core, the application service and the adapters for
//! integration testing and for the firmware binary. All ESP-IDF-specific
//! code is guarded by `#[cfg(target_os = "espidf")]` within each module;
//! on the host the drivers fall back to simulation stubs.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod events;
pub mod pins;
pub mod safety;
pub mod schedule;
pub mod status;

pub mod adapters;
pub mod drivers;
pub mod sensors;
