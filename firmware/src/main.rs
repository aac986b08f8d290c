//! Boiler controller firmware: main entry point.
//!
//! Hexagonal architecture with timer-driven execution.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   NvsAdapter   Esp32Time       │
//! │  (Sensor+Actuator) (EventSink)    (Config+NVS) (ClockPort)     │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Arbiter · Alternation · Post-circulation · Alarms     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use boilerctl::adapters::hardware::HardwareAdapter;
use boilerctl::adapters::log_sink::LogEventSink;
use boilerctl::adapters::nvs::NvsAdapter;
use boilerctl::adapters::time::Esp32TimeAdapter;
use boilerctl::app::ports::{ClockPort, ConfigPort};
use boilerctl::app::service::AppService;
use boilerctl::config::SystemConfig;
use boilerctl::control::runtime::RunTimeTotals;
use boilerctl::drivers::gpio::GpioPin;
use boilerctl::drivers::relay::{IndicatorLamps, PlantOutputs, RelayBank};
use boilerctl::drivers::{hw_init, hw_timer, watchdog::Watchdog};
use boilerctl::events::{self, Event};
use boilerctl::pins;
use boilerctl::sensors::digital::DigitalInputs;
use boilerctl::sensors::temperature::TemperatureProbe;
use boilerctl::sensors::SensorHub;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Boiler controller v{}            ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Peripherals (relays latched off before anything else) ──
    hw_init::init_peripherals().map_err(|e| anyhow::anyhow!("HAL init failed: {e}"))?;
    let watchdog = Watchdog::new(pins::WATCHDOG_TIMEOUT_MS);
    info!("Watchdog armed ({} ms)", watchdog.timeout_ms());

    // ── 3. Persistent state ───────────────────────────────────
    let mut nvs = NvsAdapter::new().map_err(|e| anyhow::anyhow!("NVS init failed: {e}"))?;
    let config = nvs.load().unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        SystemConfig::default()
    });
    let totals = RunTimeTotals::load(&nvs);

    // ── 4. Adapters ───────────────────────────────────────────
    let sensor_hub = SensorHub::new(DigitalInputs::new(GpioPin::new), TemperatureProbe::default());
    let relays = RelayBank::new(
        PlantOutputs {
            pump1: GpioPin::new(pins::PUMP1_CONTACTOR_GPIO),
            pump2: GpioPin::new(pins::PUMP2_CONTACTOR_GPIO),
            thermal_group: GpioPin::new(pins::THERMAL_GROUP_RELAY_GPIO),
            condensation_pump: GpioPin::new(pins::CONDENSATION_PUMP_RELAY_GPIO),
            post_circulation: GpioPin::new(pins::POST_CIRCULATION_GPIO),
        },
        IndicatorLamps {
            overheat: GpioPin::new(pins::OVERHEAT_LAMP_GPIO),
            general_fault: GpioPin::new(pins::GENERAL_FAULT_LAMP_GPIO),
            program_active: GpioPin::new(pins::PROGRAM_ACTIVE_LAMP_GPIO),
            pump1_fault: GpioPin::new(pins::PUMP1_FAULT_LAMP_GPIO),
            pump2_fault: GpioPin::new(pins::PUMP2_FAULT_LAMP_GPIO),
        },
    );
    let mut hw = HardwareAdapter::new(sensor_hub, relays);
    let clock = Esp32TimeAdapter::new();
    let mut log_sink = LogEventSink::new();

    // ── 5. Application service ────────────────────────────────
    let control_interval_ms = config.control_loop_interval_ms;
    let mut app = AppService::new(config, totals);
    app.start(&mut hw, &clock, &mut log_sink);
    hw_timer::start_timers(control_interval_ms);

    info!("System ready. Entering event loop.");

    // ── 6. Event loop ─────────────────────────────────────────
    loop {
        events::drain_events(|event| match event {
            Event::ControlTick => app.tick(&mut hw, &clock, &mut log_sink),
            Event::HousekeepingTick => {
                let now = clock.uptime_ms();
                app.persist_counters_if_due(&mut nvs, now, &mut log_sink);
                app.report_status_if_due(now, &mut log_sink);
            }
        });

        watchdog.feed();

        if events::queue_len() == 0 {
            // Yield to the idle task until the next timer event.
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
    }
}
