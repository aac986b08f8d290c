//! Duty/standby alternation between the two circulation pumps.
//!
//! The engine keeps a *preferred* pump and the time its turn began.  Once
//! the turn has lasted the configured period it hands over to the other
//! pump.  When only one pump is usable the engine is *suspended*: it runs
//! the survivor without advancing turn timing, and resumes alternation with
//! a fresh turn as soon as both pumps are available again.

use log::{info, warn};
use serde::Serialize;

use super::context::{InputSignals, Pump};

/// State change worth reporting upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlternationTransition {
    /// The turn expired and duty moved to the other pump.
    Switched { from: Pump, to: Pump },
    /// Only `running` is available; turn timing is frozen.
    Suspended { running: Pump },
    /// Both pumps are available again; a new turn starts for `preferred`.
    Resumed { preferred: Pump },
}

pub struct AlternationEngine {
    preferred: Pump,
    turn_start_ms: u64,
    suspended: bool,
    transition: Option<AlternationTransition>,
}

impl Default for AlternationEngine {
    fn default() -> Self {
        Self::new(0)
    }
}

impl AlternationEngine {
    /// Pump 1 starts with a turn beginning at `now_ms`.
    pub fn new(now_ms: u64) -> Self {
        Self {
            preferred: Pump::One,
            turn_start_ms: now_ms,
            suspended: false,
            transition: None,
        }
    }

    /// Choose the pump that should run this tick.
    ///
    /// Returns `None` only when neither pump is available, in which case the
    /// engine state is left untouched.  The hand-over happens on the first
    /// tick where the turn has lasted at least `period_ms`.
    pub fn select(&mut self, signals: &InputSignals, period_ms: u64, now_ms: u64) -> Option<Pump> {
        let p1 = signals.pump_available(Pump::One);
        let p2 = signals.pump_available(Pump::Two);
        if !p1 && !p2 {
            return None;
        }

        if self.suspended {
            if p1 && p2 {
                self.suspended = false;
                self.turn_start_ms = now_ms;
                info!("Alternation resumed, pump {} keeps the turn", self.preferred.number());
                self.transition = Some(AlternationTransition::Resumed { preferred: self.preferred });
                return Some(self.preferred);
            }
            let only = if p1 { Pump::One } else { Pump::Two };
            if only != self.preferred {
                self.suspend_on(only);
            }
            return Some(only);
        }

        let current = self.preferred;
        let other = current.other();
        if !signals.pump_available(current) {
            self.suspend_on(other);
            return Some(other);
        }

        if now_ms.saturating_sub(self.turn_start_ms) >= period_ms {
            if signals.pump_available(other) {
                self.preferred = other;
                self.turn_start_ms = now_ms;
                info!("Alternation: pump {} -> pump {}", current.number(), other.number());
                self.transition = Some(AlternationTransition::Switched { from: current, to: other });
                return Some(other);
            }
            self.suspend_on(current);
        }
        Some(current)
    }

    fn suspend_on(&mut self, pump: Pump) {
        warn!("Alternation suspended, only pump {} available", pump.number());
        self.preferred = pump;
        self.suspended = true;
        self.transition = Some(AlternationTransition::Suspended { running: pump });
    }

    /// Take the transition recorded by the last [`select`](Self::select), if any.
    pub fn take_transition(&mut self) -> Option<AlternationTransition> {
        self.transition.take()
    }

    pub fn preferred(&self) -> Pump {
        self.preferred
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Time into the current turn (0 while suspended).
    pub fn turn_elapsed_ms(&self, now_ms: u64) -> u64 {
        if self.suspended {
            0
        } else {
            now_ms.saturating_sub(self.turn_start_ms)
        }
    }
}
