//! Post-circulation sequencer.
//!
//! When the burner is forced off while it was firing, residual heat must be
//! carried away.  The sequencer keeps one actuator (a circulation pump, or
//! the condensation pump as a last resort) running for the configured
//! duration after the stop.
//!
//! ```text
//!          trigger (group was on)
//!   Idle ─────────────────────────▶ Active{start, fallback, reason}
//!    ▲                                 │
//!    └──── elapsed ≥ duration ─────────┤
//!    └──── cancel (emergency/normal) ──┘
//! ```

use log::info;
use serde::Serialize;

use super::context::{ActuatorState, InputSignals, Pump};

/// Actuator kept running during post-circulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Fallback {
    Pump(Pump),
    CondensationPump,
}

impl Fallback {
    /// Pump 1 if available, else pump 2 if available, else the condensation pump.
    pub fn choose(signals: &InputSignals) -> Self {
        if signals.pump_available(Pump::One) {
            Self::Pump(Pump::One)
        } else if signals.pump_available(Pump::Two) {
            Self::Pump(Pump::Two)
        } else {
            Self::CondensationPump
        }
    }

    /// Actuator record with only this fallback running and the
    /// post-circulation indicator lit.
    pub fn outputs(self) -> ActuatorState {
        ActuatorState {
            pump1: self == Self::Pump(Pump::One),
            pump2: self == Self::Pump(Pump::Two),
            thermal_group: false,
            condensation_pump: self == Self::CondensationPump,
            post_circulation: true,
        }
    }
}

/// Stop condition that forced the burner off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopReason {
    SystemOff,
    SupervisoryOff,
    ScheduleClosed,
}

/// A running post-circulation sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PostCirculation {
    pub started_ms: u64,
    pub fallback: Fallback,
    pub reason: StopReason,
}

impl PostCirculation {
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_ms)
    }
}

/// How a sequence ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PostCirculationEnd {
    Completed,
    Cancelled,
}

#[derive(Debug, Default)]
pub struct PostCirculationSequencer {
    active: Option<PostCirculation>,
}

impl PostCirculationSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a sequence.  Returns the new sequence, or `None` if one was
    /// already running (the running one keeps its start time and fallback).
    pub fn trigger(
        &mut self,
        reason: StopReason,
        signals: &InputSignals,
        now_ms: u64,
    ) -> Option<PostCirculation> {
        if self.active.is_some() {
            return None;
        }
        let seq = PostCirculation {
            started_ms: now_ms,
            fallback: Fallback::choose(signals),
            reason,
        };
        info!("Post-circulation started ({:?}, fallback {:?})", reason, seq.fallback);
        self.active = Some(seq);
        Some(seq)
    }

    /// Finish the sequence once it has run for `duration_ms`.  Evaluated
    /// once per tick, before the arbiter decides.
    pub fn advance(&mut self, now_ms: u64, duration_ms: u64) -> Option<PostCirculation> {
        let seq = self.active?;
        if seq.elapsed_ms(now_ms) < duration_ms {
            return None;
        }
        info!("Post-circulation finished after {} ms", seq.elapsed_ms(now_ms));
        self.active = None;
        Some(seq)
    }

    /// Abort a running sequence.
    pub fn cancel(&mut self) -> Option<PostCirculation> {
        let seq = self.active.take()?;
        info!("Post-circulation cancelled");
        Some(seq)
    }

    pub fn active(&self) -> Option<&PostCirculation> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Time left in the running sequence (0 when idle or overdue).
    pub fn remaining_ms(&self, now_ms: u64, duration_ms: u64) -> u64 {
        self.active
            .map_or(0, |seq| duration_ms.saturating_sub(seq.elapsed_ms(now_ms)))
    }
}
