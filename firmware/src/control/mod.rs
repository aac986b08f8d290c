//! Decision core: pure control logic, zero I/O.
//!
//! ```text
//!   InputSignals ──▶ ControlArbiter ──▶ ActuatorState
//!                     │  schedule gate
//!                     │  alternation engine
//!                     │  thermal regulator
//!                     └  post-circulation sequencer
//! ```
//!
//! Everything here runs inside one control tick and never blocks.  Timing
//! is elapsed-time comparison against the monotonic clock carried in
//! [`ControlContext`](context::ControlContext).

pub mod alternation;
pub mod arbiter;
pub mod context;
pub mod post_circulation;
pub mod runtime;
pub mod temperature;
pub mod thermal;
