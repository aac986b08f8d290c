//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (inputs, relays, clock, event sinks, storage) implement
//! these traits.  The [`AppService`](super::service::AppService) consumes them
//! via generics, so the decision core never touches hardware directly.
//!
//! ## Persistence notes
//!
//! - **ConfigPort** persists one register at a time; a write is durable
//!   before it is applied.
//! - **StoragePort** writes MUST be atomic: no partial writes on power loss.
//! - All port errors are typed and `Copy`.

use crate::config::{ConfigRegister, SystemConfig};
use crate::control::context::{ActuatorState, InputSignals};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per tick.
pub trait SensorPort {
    /// Sample every digital input (asserted polarity) and the raw
    /// temperature channel.  Never fails: absent inputs read as inactive.
    fn read_all(&mut self) -> InputSignals;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to drive relays and lamps.
pub trait ActuatorPort {
    /// Drive the five plant outputs from the arbiter's decision.
    fn apply_outputs(&mut self, outputs: &ActuatorState);

    /// Drive the indicator lamps from an alarm bitmask
    /// (see [`Alarm::mask`](crate::error::Alarm::mask)).
    fn set_indicators(&mut self, alarms: u8);

    /// De-energise every relay and lamp: safe shutdown.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: RTC / SNTP → domain)
// ───────────────────────────────────────────────────────────────

/// Broken-down local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallClock {
    pub year: u16,
    /// 1–12
    pub month: u8,
    /// 1–31
    pub day: u8,
    /// 0 = Sunday … 6 = Saturday
    pub weekday: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl WallClock {
    /// Minutes elapsed since local midnight.
    pub fn minute_of_day(&self) -> u16 {
        u16::from(self.hour) * 60 + u16::from(self.minute)
    }
}

/// Monotonic time plus an optional wall clock.
pub trait ClockPort {
    /// Milliseconds since boot.  Never goes backwards.
    fn uptime_ms(&self) -> u64;

    /// Local wall-clock time, or `None` while the clock is not set.
    fn wall_clock(&self) -> Option<WallClock>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, register
/// mirror, web status page, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists the operator configuration, one register per key.
///
/// Values are stored exactly as written.  Out-of-order setpoints are an
/// operator decision and are not rejected here.
pub trait ConfigPort {
    /// Load every register.  Missing keys fall back to
    /// [`SystemConfig::default()`] field by field.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Durably persist a single register value.
    fn save_register(&self, register: ConfigRegister, value: u16) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ NVS / flash)
// ───────────────────────────────────────────────────────────────

/// Persistent key-value storage (run-time totals, future blobs).
///
/// - Keys are namespaced to prevent collisions between subsystems.
/// - Write operations MUST be atomic: no partial writes on power loss.
///   The ESP-IDF NVS API guarantees this natively; in-memory simulation
///   achieves it trivially.
pub trait StoragePort {
    /// Read a value.  Returns the number of bytes written to `buf`.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored register failed to decode.
    Corrupted,
    /// Underlying storage is full.
    StorageFull,
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Storage partition is full.
    Full,
    /// Stored blob failed to decode.
    Corrupted,
    /// Generic I/O error.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::StorageFull => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "storage full"),
            Self::Corrupted => write!(f, "blob corrupted"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
