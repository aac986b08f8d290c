//! Inbound commands to the application service.
//!
//! These represent register writes requested by the outside world (operator
//! panel, Modbus bridge, serial console) that the
//! [`AppService`](super::service::AppService) persists and applies.

use crate::config::ConfigRegister;
use crate::control::runtime::CounterReset;
use crate::error::{Error, Result};

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Write a configuration register (persisted, then applied).
    WriteRegister { register: ConfigRegister, value: u16 },

    /// Zero a run-time counter.  The written value is ignored.
    ResetCounter(CounterReset),
}

impl AppCommand {
    /// Decode a raw `(index, value)` register write.
    pub fn from_register(index: u16, value: u16) -> Result<Self> {
        if let Some(register) = ConfigRegister::from_index(index) {
            return Ok(Self::WriteRegister { register, value });
        }
        CounterReset::from_register(index)
            .map(Self::ResetCounter)
            .ok_or(Error::UnknownRegister(index))
    }
}
