//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! Status snapshots are emitted as one JSON line so a panel or a serial
//! logger can parse them.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::control::alternation::AlternationTransition;
use crate::control::context::{ActuatorState, InputSignals};

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

fn on_off(b: bool) -> &'static str {
    if b { "ON" } else { "off" }
}

fn outputs_line(o: &ActuatorState) -> impl core::fmt::Display + '_ {
    struct Line<'a>(&'a ActuatorState);
    impl core::fmt::Display for Line<'_> {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            let o = self.0;
            write!(
                f,
                "B1={} B2={} GT={} BC={} POST={}",
                on_off(o.pump1),
                on_off(o.pump2),
                on_off(o.thermal_group),
                on_off(o.condensation_pump),
                on_off(o.post_circulation)
            )
        }
    }
    Line(o)
}

fn log_signal_changes(from: &InputSignals, to: &InputSignals) {
    let pairs = [
        ("system_enable", from.system_enable, to.system_enable),
        ("program", from.program_selector, to.program_selector),
        ("pump1_switch", from.pump1_switch, to.pump1_switch),
        ("pump2_switch", from.pump2_switch, to.pump2_switch),
        ("supervisory", from.supervisory_enable, to.supervisory_enable),
        ("emergency", from.emergency, to.emergency),
        ("thermal_relay1", from.thermal_relay1_fault, to.thermal_relay1_fault),
        ("thermal_relay2", from.thermal_relay2_fault, to.thermal_relay2_fault),
        ("thermal_group_fault", from.thermal_group_fault, to.thermal_group_fault),
    ];
    for (name, old, new) in pairs {
        if old != new {
            info!("INPUT | {} {} -> {}", name, on_off(old), on_off(new));
        }
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { totals } => {
                info!(
                    "START | totals pump1={}s pump2={}s",
                    totals.pump1_ms / 1000,
                    totals.pump2_ms / 1000
                );
            }
            AppEvent::ModeChanged { from, to } => {
                info!("MODE | {} -> {}", from.name(), to.name());
            }
            AppEvent::OutputsChanged { to, .. } => {
                info!("OUT | {}", outputs_line(to));
            }
            AppEvent::SignalsChanged { from, to } => log_signal_changes(from, to),
            AppEvent::PostCirculationStarted(seq) => {
                info!("POST | started ({:?}, fallback {:?})", seq.reason, seq.fallback);
            }
            AppEvent::PostCirculationEnded(seq, end) => {
                info!("POST | {:?} ({:?})", end, seq.reason);
            }
            AppEvent::Alternation(t) => match t {
                AlternationTransition::Switched { from, to } => {
                    info!("ALT | pump {} -> pump {}", from.number(), to.number());
                }
                AlternationTransition::Suspended { running } => {
                    warn!("ALT | suspended, only pump {} available", running.number());
                }
                AlternationTransition::Resumed { preferred } => {
                    info!("ALT | resumed, pump {} on turn", preferred.number());
                }
            },
            AppEvent::AlarmsChanged(mask) => {
                info!("ALARM | mask=0b{:06b}", mask);
            }
            AppEvent::RegisterWritten { register, value } => {
                info!("REG | {} ({:?}) = {}", register.index(), register, value);
            }
            AppEvent::CounterReset(reset) => {
                info!("REG | counter reset {:?}", reset);
            }
            AppEvent::CountersPersisted(totals) => {
                debug!(
                    "NVS | totals saved pump1={}s pump2={}s",
                    totals.pump1_ms / 1000,
                    totals.pump2_ms / 1000
                );
            }
            AppEvent::Status(report) => match serde_json::to_string(report) {
                Ok(json) => info!("STATUS | {}", json),
                Err(e) => warn!("STATUS | serialise failed: {}", e),
            },
        }
    }
}
