//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to              |
//! |----------------|--------------------|--------------------------|
//! | `hardware`     | SensorPort         | GPIO inputs, ADC1        |
//! |                | ActuatorPort       | Active-low relay board   |
//! | `log_sink`     | EventSink          | Serial log output        |
//! | `nvs`          | ConfigPort         | NVS / in-memory store    |
//! |                | StoragePort        |                          |
//! | `time`         | ClockPort          | esp_timer + SNTP/RTC     |

pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod time;
