//! Shared per-tick context threaded through the control arbiter.
//!
//! `ControlContext` is the "blackboard" the decision core reads from and
//! writes to: the latest input snapshot and the one before it, the estimated
//! temperature, the wall clock for this tick, the configuration, and the
//! actuator record with its previous-tick copy for edge detection.

use serde::Serialize;

use crate::app::ports::WallClock;
use crate::config::SystemConfig;

use super::arbiter::OperatingMode;

// ---------------------------------------------------------------------------
// Pumps
// ---------------------------------------------------------------------------

/// One of the two redundant circulation pumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Pump {
    One,
    Two,
}

impl Pump {
    pub const fn other(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    /// Human-facing pump number (1 or 2).
    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Input snapshot (written by the sensor port, read-only to the arbiter)
// ---------------------------------------------------------------------------

/// One tick's worth of inputs, already translated to "asserted" booleans.
/// `Default` is the all-inactive snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InputSignals {
    pub system_enable: bool,
    pub program_selector: bool,
    pub pump1_switch: bool,
    pub pump2_switch: bool,
    /// Remote supervisory enable from the building management panel.
    pub supervisory_enable: bool,
    pub emergency: bool,
    pub thermal_relay1_fault: bool,
    pub thermal_relay2_fault: bool,
    pub thermal_group_fault: bool,
    /// Raw 12-bit supply temperature sample.
    pub temperature_raw: u16,
}

impl InputSignals {
    /// A pump is available when its selector switch is on and its thermal
    /// relay has not tripped.
    pub fn pump_available(&self, pump: Pump) -> bool {
        match pump {
            Pump::One => self.pump1_switch && !self.thermal_relay1_fault,
            Pump::Two => self.pump2_switch && !self.thermal_relay2_fault,
        }
    }

    pub fn any_pump_available(&self) -> bool {
        self.pump_available(Pump::One) || self.pump_available(Pump::Two)
    }

    /// Compare only the digital channels; the analog sample jitters every tick.
    pub fn digital_eq(&self, other: &Self) -> bool {
        Self { temperature_raw: 0, ..*self } == Self { temperature_raw: 0, ..*other }
    }
}

// ---------------------------------------------------------------------------
// Actuator record (written by the arbiter, consumed by the actuator port)
// ---------------------------------------------------------------------------

/// The five plant outputs.  Rewritten in full by every arbiter branch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActuatorState {
    pub pump1: bool,
    pub pump2: bool,
    pub thermal_group: bool,
    pub condensation_pump: bool,
    /// Post-circulation indicator.
    pub post_circulation: bool,
}

impl ActuatorState {
    /// All outputs off: safe default.
    pub fn all_off() -> Self {
        Self::default()
    }

    pub fn pump_on(&self, pump: Pump) -> bool {
        match pump {
            Pump::One => self.pump1,
            Pump::Two => self.pump2,
        }
    }

    /// The circulation pump currently running, if any.
    pub fn running_pump(&self) -> Option<Pump> {
        if self.pump1 {
            Some(Pump::One)
        } else if self.pump2 {
            Some(Pump::Two)
        } else {
            None
        }
    }

    /// Only `pump` running (or nothing), burner and condensation off.
    pub fn circulating(pump: Option<Pump>) -> Self {
        Self {
            pump1: pump == Some(Pump::One),
            pump2: pump == Some(Pump::Two),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// ControlContext
// ---------------------------------------------------------------------------

/// The shared context handed to the arbiter every tick.
pub struct ControlContext {
    // -- Timing --
    /// Monotonic milliseconds at the start of this tick.
    pub now_ms: u64,
    /// Wall clock for this tick, if the clock is set.
    pub wall_clock: Option<WallClock>,

    // -- Inputs --
    pub signals: InputSignals,
    /// Snapshot from the previous tick (change detection only).
    pub previous_signals: InputSignals,
    /// Estimated supply temperature (°C).
    pub temperature_c: f32,

    // -- Outputs --
    pub outputs: ActuatorState,
    /// Outputs as applied on the previous tick (edge detection).
    pub previous_outputs: ActuatorState,
    /// Priority branch that produced `outputs`.
    pub mode: OperatingMode,

    // -- Configuration --
    pub config: SystemConfig,
}

impl ControlContext {
    pub fn new(config: SystemConfig) -> Self {
        Self {
            now_ms: 0,
            wall_clock: None,
            signals: InputSignals::default(),
            previous_signals: InputSignals::default(),
            temperature_c: 0.0,
            outputs: ActuatorState::all_off(),
            previous_outputs: ActuatorState::all_off(),
            mode: OperatingMode::SystemOff,
            config,
        }
    }

    /// Roll the current snapshot into the "previous" slots and install the
    /// new tick's inputs.
    pub fn begin_tick(
        &mut self,
        now_ms: u64,
        wall_clock: Option<WallClock>,
        signals: InputSignals,
        temperature_c: f32,
    ) {
        self.now_ms = now_ms;
        self.wall_clock = wall_clock;
        self.previous_signals = self.signals;
        self.signals = signals;
        self.temperature_c = temperature_c;
        self.previous_outputs = self.outputs;
    }
}
