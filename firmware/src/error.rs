//! Unified error types for the boiler controller firmware.
//!
//! The decision core itself has no error paths: missing sensors read as
//! inactive and missing resources map to fail-safe operating modes.  Errors
//! only exist at the boundary (persistence and the register surface);
//! peripheral init reports its own `HwInitError`.  All variants are `Copy`
//! so they pass through the service without allocation.

use core::fmt;

use crate::app::ports::{ConfigError, StorageError};

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible boundary operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Persisting or loading a configuration register failed.
    Config(ConfigError),
    /// The key-value store rejected a read or write.
    Storage(StorageError),
    /// A register index outside the configuration/reset surface.
    UnknownRegister(u16),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::UnknownRegister(idx) => write!(f, "unknown register {idx}"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Alarm indicators
// ---------------------------------------------------------------------------

/// Derived alarm and indicator conditions.  Accumulated in a bitfield by the
/// [`AlarmMonitor`](crate::safety::AlarmMonitor) so several can be active at
/// once and each is logged when it sets or clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Alarm {
    /// Supply temperature above the maximum setpoint.
    Overheat = 0b0000_0001,
    /// Any of emergency, thermal relay 1/2 or thermal-group fault.
    GeneralFault = 0b0000_0010,
    /// Pump 1 thermal relay tripped.
    Pump1Fault = 0b0000_0100,
    /// Pump 2 thermal relay tripped.
    Pump2Fault = 0b0000_1000,
    /// Burner (thermal group) reports a fault.
    ThermalGroupFault = 0b0001_0000,
    /// Program selector on and the schedule currently admits operation.
    ProgramActive = 0b0010_0000,
}

impl Alarm {
    pub const ALL: [Self; 6] = [
        Self::Overheat,
        Self::GeneralFault,
        Self::Pump1Fault,
        Self::Pump2Fault,
        Self::ThermalGroupFault,
        Self::ProgramActive,
    ];

    /// Return the bitmask for this alarm.
    pub const fn mask(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Alarm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overheat => write!(f, "overheat"),
            Self::GeneralFault => write!(f, "general fault"),
            Self::Pump1Fault => write!(f, "pump 1 thermal relay"),
            Self::Pump2Fault => write!(f, "pump 2 thermal relay"),
            Self::ThermalGroupFault => write!(f, "thermal group fault"),
            Self::ProgramActive => write!(f, "program active"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alarm_masks_are_distinct() {
        let combined = Alarm::ALL.iter().fold(0u8, |acc, a| {
            assert_eq!(acc & a.mask(), 0, "{a} overlaps");
            acc | a.mask()
        });
        assert_eq!(combined.count_ones() as usize, Alarm::ALL.len());
    }

    #[test]
    fn port_errors_convert() {
        let e: Error = StorageError::Full.into();
        assert_eq!(e, Error::Storage(StorageError::Full));
        assert_eq!(format!("{}", Error::UnknownRegister(42)), "unknown register 42");
        assert_eq!(format!("{}", Error::Storage(StorageError::Full)), format!("storage: {}", StorageError::Full));
    }
}
