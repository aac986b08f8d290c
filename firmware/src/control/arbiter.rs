//! Control arbiter: strict-priority decision over the plant outputs.
//!
//! ```text
//! ┌───┬──────────────────────────────┬──────────────────────────────────────┐
//! │ # │ Condition                    │ Outputs                              │
//! ├───┼──────────────────────────────┼──────────────────────────────────────┤
//! │ 1 │ emergency                    │ everything off, post-circ cancelled  │
//! │ 2 │ system enable off            │ burner off, post-circ if it was on   │
//! │ 3 │ both thermal relays tripped  │ condensation pump only               │
//! │ 4 │ supervisory enable off       │ as 2                                 │
//! │ 5 │ program on, schedule closed  │ as 2                                 │
//! │ 6 │ normal                       │ alternation + thermal regulation     │
//! └───┴──────────────────────────────┴──────────────────────────────────────┘
//! ```
//!
//! The first matching row wins and every row writes the complete actuator
//! record, so at most one circulation pump is ever on.

use log::warn;
use serde::Serialize;

use crate::schedule;

use super::alternation::{AlternationEngine, AlternationTransition};
use super::context::{ActuatorState, ControlContext, Pump};
use super::post_circulation::{PostCirculation, PostCirculationEnd, PostCirculationSequencer, StopReason};
use super::thermal;

// ---------------------------------------------------------------------------
// Operating mode
// ---------------------------------------------------------------------------

/// Which priority branch produced the outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum OperatingMode {
    Emergency = 0,
    SystemOff = 1,
    ThermalRelayFault = 2,
    SupervisoryOff = 3,
    ScheduleClosed = 4,
    NoPumpAvailable = 5,
    Running = 6,
}

impl OperatingMode {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Emergency => "emergency",
            Self::SystemOff => "system off",
            Self::ThermalRelayFault => "thermal relay fault",
            Self::SupervisoryOff => "supervisory off",
            Self::ScheduleClosed => "schedule closed",
            Self::NoPumpAvailable => "no pump available",
            Self::Running => "running",
        }
    }
}

// ---------------------------------------------------------------------------
// Tick report
// ---------------------------------------------------------------------------

/// Side effects of one arbiter tick worth reporting upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub post_circulation_started: Option<PostCirculation>,
    pub post_circulation_ended: Option<(PostCirculation, PostCirculationEnd)>,
    pub alternation: Option<AlternationTransition>,
}

// ---------------------------------------------------------------------------
// Arbiter
// ---------------------------------------------------------------------------

/// Owns the stateful sub-engines and applies the priority table.
#[derive(Default)]
pub struct ControlArbiter {
    alternation: AlternationEngine,
    post_circulation: PostCirculationSequencer,
}

impl ControlArbiter {
    pub fn new(now_ms: u64) -> Self {
        Self {
            alternation: AlternationEngine::new(now_ms),
            post_circulation: PostCirculationSequencer::new(),
        }
    }

    /// Decide this tick's outputs.  Reads `ctx.previous_outputs` for the
    /// burner edge and writes `ctx.outputs` and `ctx.mode`.
    pub fn decide(&mut self, ctx: &mut ControlContext) -> TickReport {
        let mut report = TickReport::default();
        let now = ctx.now_ms;
        let s = ctx.signals;

        if let Some(seq) = self
            .post_circulation
            .advance(now, ctx.config.post_circulation_ms())
        {
            report.post_circulation_ended = Some((seq, PostCirculationEnd::Completed));
        }

        // 1. Emergency
        if s.emergency {
            if let Some(seq) = self.post_circulation.cancel() {
                report.post_circulation_ended = Some((seq, PostCirculationEnd::Cancelled));
            }
            ctx.outputs = ActuatorState::all_off();
            ctx.mode = OperatingMode::Emergency;
            return report;
        }

        // 2. System enable off
        if !s.system_enable {
            self.forced_stop(ctx, StopReason::SystemOff, &mut report);
            return report;
        }

        // 3. Both thermal relays tripped
        if s.thermal_relay1_fault && s.thermal_relay2_fault {
            if ctx.mode != OperatingMode::ThermalRelayFault {
                warn!("Both pump thermal relays tripped, running condensation pump");
            }
            ctx.outputs = ActuatorState {
                condensation_pump: true,
                post_circulation: self.post_circulation.is_active(),
                ..ActuatorState::all_off()
            };
            ctx.mode = OperatingMode::ThermalRelayFault;
            return report;
        }

        // 4. Supervisory enable off
        if !s.supervisory_enable {
            self.forced_stop(ctx, StopReason::SupervisoryOff, &mut report);
            return report;
        }

        // 5. Program selector on and the schedule is closed
        if s.program_selector && !schedule::admits(ctx.wall_clock.as_ref(), &ctx.config) {
            self.forced_stop(ctx, StopReason::ScheduleClosed, &mut report);
            return report;
        }

        // 6. Normal operation
        if let Some(seq) = self.post_circulation.cancel() {
            report.post_circulation_ended = Some((seq, PostCirculationEnd::Cancelled));
        }

        let pump = self
            .alternation
            .select(&s, ctx.config.alternation_period_ms(), now);
        report.alternation = self.alternation.take_transition();

        match pump {
            None => {
                ctx.outputs = ActuatorState {
                    condensation_pump: true,
                    ..ActuatorState::all_off()
                };
                ctx.mode = OperatingMode::NoPumpAvailable;
            }
            Some(p) => {
                let mut outputs = ActuatorState::circulating(Some(p));
                outputs.thermal_group = thermal::regulate(
                    ctx.temperature_c,
                    &ctx.config,
                    true,
                    ctx.previous_outputs.thermal_group,
                );
                ctx.outputs = outputs;
                ctx.mode = OperatingMode::Running;
            }
        }
        report
    }

    /// Branches 2, 4 and 5: burner off, post-circulation if it was firing.
    /// A zero duration never starts a sequence.
    fn forced_stop(&mut self, ctx: &mut ControlContext, reason: StopReason, report: &mut TickReport) {
        if ctx.previous_outputs.thermal_group && ctx.config.post_circulation_ms() > 0 {
            report.post_circulation_started =
                self.post_circulation.trigger(reason, &ctx.signals, ctx.now_ms);
        }
        ctx.outputs = match self.post_circulation.active() {
            Some(seq) => seq.fallback.outputs(),
            None => ActuatorState::all_off(),
        };
        ctx.mode = match reason {
            StopReason::SystemOff => OperatingMode::SystemOff,
            StopReason::SupervisoryOff => OperatingMode::SupervisoryOff,
            StopReason::ScheduleClosed => OperatingMode::ScheduleClosed,
        };
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn post_circulation(&self) -> Option<&PostCirculation> {
        self.post_circulation.active()
    }

    pub fn post_circulation_remaining_ms(&self, now_ms: u64, duration_ms: u64) -> u64 {
        self.post_circulation.remaining_ms(now_ms, duration_ms)
    }

    pub fn preferred_pump(&self) -> Pump {
        self.alternation.preferred()
    }

    pub fn alternation_suspended(&self) -> bool {
        self.alternation.is_suspended()
    }

    pub fn alternation_elapsed_ms(&self, now_ms: u64) -> u64 {
        self.alternation.turn_elapsed_ms(now_ms)
    }
}
