//! Pump run-time counters.
//!
//! Each pump has a *partial* counter (time in the current duty turn,
//! operator-resettable, RAM only) and a *total* counter (lifetime hours,
//! persisted to NVS at most once per flush interval).
//!
//! Time is credited from the monotonic clock: the interval since the last
//! update goes to whichever pumps were on during it (the previous tick's
//! outputs).

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::{StorageError, StoragePort};

use super::context::{ActuatorState, Pump};

const TOTALS_NAMESPACE: &str = "boiler";
const TOTALS_KEY: &str = "runtime";

/// Persisted lifetime totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTimeTotals {
    pub pump1_ms: u64,
    pub pump2_ms: u64,
}

impl RunTimeTotals {
    /// Load totals from storage.  A missing or undecodable blob starts
    /// both counters at zero.
    pub fn load(storage: &impl StoragePort) -> Self {
        let mut buf = [0u8; 32];
        match storage.read(TOTALS_NAMESPACE, TOTALS_KEY, &mut buf) {
            Ok(len) => match postcard::from_bytes::<Self>(&buf[..len]) {
                Ok(totals) => {
                    info!(
                        "Run-time totals loaded: pump1={}s pump2={}s",
                        totals.pump1_ms / 1000,
                        totals.pump2_ms / 1000
                    );
                    totals
                }
                Err(_) => {
                    warn!("Run-time totals blob corrupted, starting from zero");
                    Self::default()
                }
            },
            Err(StorageError::NotFound) => Self::default(),
            Err(e) => {
                warn!("Run-time totals unreadable ({}), starting from zero", e);
                Self::default()
            }
        }
    }

    pub fn persist(&self, storage: &mut impl StoragePort) -> Result<(), StorageError> {
        let bytes = postcard::to_allocvec(self).map_err(|_| StorageError::IoError)?;
        storage.write(TOTALS_NAMESPACE, TOTALS_KEY, &bytes)
    }

    pub fn get(&self, pump: Pump) -> u64 {
        match pump {
            Pump::One => self.pump1_ms,
            Pump::Two => self.pump2_ms,
        }
    }

    fn get_mut(&mut self, pump: Pump) -> &mut u64 {
        match pump {
            Pump::One => &mut self.pump1_ms,
            Pump::Two => &mut self.pump2_ms,
        }
    }
}

/// Which counter an operator reset targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CounterReset {
    Partial(Pump),
    Total(Pump),
}

impl CounterReset {
    pub const PUMP1_PARTIAL: u16 = 227;
    pub const PUMP1_TOTAL: u16 = 228;
    pub const PUMP2_PARTIAL: u16 = 229;
    pub const PUMP2_TOTAL: u16 = 230;

    /// Map a reset-surface register index to the counter it clears.
    pub fn from_register(idx: u16) -> Option<Self> {
        match idx {
            Self::PUMP1_PARTIAL => Some(Self::Partial(Pump::One)),
            Self::PUMP1_TOTAL => Some(Self::Total(Pump::One)),
            Self::PUMP2_PARTIAL => Some(Self::Partial(Pump::Two)),
            Self::PUMP2_TOTAL => Some(Self::Total(Pump::Two)),
            _ => None,
        }
    }
}

pub struct RunTimeCounters {
    partial_ms: [u64; 2],
    totals: RunTimeTotals,
    last_update_ms: u64,
}

const fn slot(pump: Pump) -> usize {
    match pump {
        Pump::One => 0,
        Pump::Two => 1,
    }
}

impl RunTimeCounters {
    pub fn new(totals: RunTimeTotals, now_ms: u64) -> Self {
        Self {
            partial_ms: [0; 2],
            totals,
            last_update_ms: now_ms,
        }
    }

    /// Credit the elapsed interval and handle the partial reset edge.
    ///
    /// When a pump switches on and the other pump was running on the
    /// previous tick, its partial counter restarts from zero.  An idle tick
    /// in between breaks the handover.
    pub fn update(&mut self, previous: &ActuatorState, current: &ActuatorState, now_ms: u64) {
        let delta = now_ms.saturating_sub(self.last_update_ms);
        self.last_update_ms = now_ms;

        for pump in [Pump::One, Pump::Two] {
            if previous.pump_on(pump) {
                self.partial_ms[slot(pump)] += delta;
                *self.totals.get_mut(pump) += delta;
            }
        }

        if let Some(pump) = current.running_pump() {
            if previous.running_pump() == Some(pump.other()) {
                self.partial_ms[slot(pump)] = 0;
            }
        }
    }

    /// Totals as they would look after `reset`.
    pub fn totals_after(&self, reset: CounterReset) -> RunTimeTotals {
        let mut totals = self.totals;
        if let CounterReset::Total(pump) = reset {
            *totals.get_mut(pump) = 0;
        }
        totals
    }

    pub fn reset(&mut self, reset: CounterReset) {
        match reset {
            CounterReset::Partial(pump) => self.partial_ms[slot(pump)] = 0,
            CounterReset::Total(pump) => *self.totals.get_mut(pump) = 0,
        }
    }

    pub fn partial_ms(&self, pump: Pump) -> u64 {
        self.partial_ms[slot(pump)]
    }

    pub fn total_ms(&self, pump: Pump) -> u64 {
        self.totals.get(pump)
    }

    pub fn totals(&self) -> RunTimeTotals {
        self.totals
    }
}
