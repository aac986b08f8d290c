//! Mock adapters for integration tests.
//!
//! Inputs are plain fields the test flips between ticks; every actuator
//! call is recorded so tests can assert on the full output history without
//! touching real GPIO.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use boilerctl::app::events::AppEvent;
use boilerctl::app::ports::{
    ActuatorPort, ClockPort, ConfigError, ConfigPort, EventSink, SensorPort, StorageError,
    StoragePort, WallClock,
};
use boilerctl::config::{ConfigRegister, SystemConfig};
use boilerctl::control::context::{ActuatorState, InputSignals};

/// Raw ADC counts for roughly `celsius` on the 0–100 °C probe.
pub fn raw_for(celsius: f32) -> u16 {
    (celsius / 100.0 * 4095.0).round() as u16
}

/// Plant switched on and healthy: both pumps available, supply at 50 °C.
pub fn healthy() -> InputSignals {
    InputSignals {
        system_enable: true,
        program_selector: false,
        pump1_switch: true,
        pump2_switch: true,
        supervisory_enable: true,
        emergency: false,
        thermal_relay1_fault: false,
        thermal_relay2_fault: false,
        thermal_group_fault: false,
        temperature_raw: raw_for(50.0),
    }
}

// ── MockHardware ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActuatorCall {
    Outputs(ActuatorState),
    Indicators(u8),
    AllOff,
}

pub struct MockHardware {
    pub signals: InputSignals,
    pub calls: Vec<ActuatorCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new(signals: InputSignals) -> Self {
        Self {
            signals,
            calls: Vec::new(),
        }
    }

    /// Outputs from the most recent `apply_outputs` (all off before the first).
    pub fn outputs(&self) -> ActuatorState {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Outputs(o) => Some(*o),
                ActuatorCall::AllOff => Some(ActuatorState::all_off()),
                ActuatorCall::Indicators(_) => None,
            })
            .unwrap_or_default()
    }

    pub fn indicators(&self) -> u8 {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Indicators(m) => Some(*m),
                ActuatorCall::AllOff => Some(0),
                ActuatorCall::Outputs(_) => None,
            })
            .unwrap_or(0)
    }

    pub fn all_off_count(&self) -> usize {
        self.calls.iter().filter(|c| **c == ActuatorCall::AllOff).count()
    }
}

impl SensorPort for MockHardware {
    fn read_all(&mut self) -> InputSignals {
        self.signals
    }
}

impl ActuatorPort for MockHardware {
    fn apply_outputs(&mut self, outputs: &ActuatorState) {
        self.calls.push(ActuatorCall::Outputs(*outputs));
    }

    fn set_indicators(&mut self, alarms: u8) {
        self.calls.push(ActuatorCall::Indicators(alarms));
    }

    fn all_off(&mut self) {
        self.calls.push(ActuatorCall::AllOff);
    }
}

// ── MockClock ─────────────────────────────────────────────────

pub struct MockClock {
    now_ms: Cell<u64>,
    wall: Cell<Option<WallClock>>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn new() -> Self {
        Self {
            now_ms: Cell::new(0),
            wall: Cell::new(None),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }

    pub fn set_wall(&self, wall: Option<WallClock>) {
        self.wall.set(wall);
    }
}

impl ClockPort for MockClock {
    fn uptime_ms(&self) -> u64 {
        self.now_ms.get()
    }

    fn wall_clock(&self) -> Option<WallClock> {
        self.wall.get()
    }
}

// ── MockNvs ───────────────────────────────────────────────────

/// In-memory store backing both config registers and run-time blobs.
/// Set `fail_writes` to make every write fail with an I/O error.
pub struct MockNvs {
    store: HashMap<String, Vec<u8>>,
    registers: RefCell<HashMap<ConfigRegister, u16>>,
    pub fail_writes: bool,
    pub writes: usize,
}

#[allow(dead_code)]
impl MockNvs {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
            registers: RefCell::new(HashMap::new()),
            fail_writes: false,
            writes: 0,
        }
    }

    pub fn saved_register(&self, register: ConfigRegister) -> Option<u16> {
        self.registers.borrow().get(&register).copied()
    }
}

fn key(namespace: &str, key: &str) -> String {
    format!("{}::{}", namespace, key)
}

impl StoragePort for MockNvs {
    fn read(&self, namespace: &str, k: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        match self.store.get(&key(namespace, k)) {
            Some(v) => {
                let n = v.len().min(buf.len());
                buf[..n].copy_from_slice(&v[..n]);
                Ok(n)
            }
            None => Err(StorageError::NotFound),
        }
    }

    fn write(&mut self, namespace: &str, k: &str, data: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::IoError);
        }
        self.writes += 1;
        self.store.insert(key(namespace, k), data.to_vec());
        Ok(())
    }
}

impl ConfigPort for MockNvs {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let mut config = SystemConfig::default();
        for (register, value) in self.registers.borrow().iter() {
            config.set_register(*register, *value);
        }
        Ok(config)
    }

    fn save_register(&self, register: ConfigRegister, value: u16) -> Result<(), ConfigError> {
        if self.fail_writes {
            return Err(ConfigError::IoError);
        }
        self.registers.borrow_mut().insert(register, value);
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
