//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to serial, mirror into holding
//! registers, feed a status page.

use crate::config::ConfigRegister;
use crate::control::alternation::AlternationTransition;
use crate::control::arbiter::OperatingMode;
use crate::control::context::{ActuatorState, InputSignals};
use crate::control::post_circulation::{PostCirculation, PostCirculationEnd};
use crate::control::runtime::{CounterReset, RunTimeTotals};
use crate::status::StatusReport;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service has started (carries the restored run-time totals).
    Started { totals: RunTimeTotals },

    /// A different priority branch now drives the outputs.
    ModeChanged { from: OperatingMode, to: OperatingMode },

    /// The applied actuator record changed.
    OutputsChanged { from: ActuatorState, to: ActuatorState },

    /// One or more digital inputs changed since the previous tick.
    SignalsChanged { from: InputSignals, to: InputSignals },

    PostCirculationStarted(PostCirculation),
    PostCirculationEnded(PostCirculation, PostCirculationEnd),

    /// Pump handover, suspension or resumption.
    Alternation(AlternationTransition),

    /// The indicator bitmask changed (carries the new mask).
    AlarmsChanged(u8),

    /// A configuration register was persisted and applied.
    RegisterWritten { register: ConfigRegister, value: u16 },

    CounterReset(CounterReset),

    /// Run-time totals were flushed to storage.
    CountersPersisted(RunTimeTotals),

    /// Periodic status snapshot.
    Status(StatusReport),
}
