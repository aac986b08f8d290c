//! One-shot hardware peripheral initialization.
//!
//! Configures the ADC channel and GPIO directions using raw ESP-IDF sys
//! calls.  Called once from `main()` before the event loop starts.
//!
//! On host builds every pin level lives in one atomic bitmap that tests
//! drive with [`sim_set_level`]; the temperature channel reads a separate
//! atomic set by [`sim_set_temperature_adc`].

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, AtomicU64, Ordering};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;
#[cfg(target_os = "espidf")]
use log::info;

use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
        }
    }
}

/// ADC1 channel wired to the supply temperature transmitter.
pub const ADC1_CH_TEMPERATURE: u32 = 0;

/// Pin levels of an idle, de-energised board: pulled-up switch inputs
/// HIGH, alarm inputs LOW, active-low outputs HIGH.
pub const fn idle_levels() -> u64 {
    let mut mask = 0u64;
    let mut i = 0;
    while i < pins::PULLUP_INPUTS.len() {
        mask |= 1 << pins::PULLUP_INPUTS[i];
        i += 1;
    }
    let mut i = 0;
    while i < pins::RELAY_OUTPUTS.len() {
        mask |= 1 << pins::RELAY_OUTPUTS[i];
        i += 1;
    }
    mask
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before event loop; single-threaded.
    unsafe {
        init_adc()?;
        init_gpio_inputs()?;
        init_gpio_outputs()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path.  `init_adc()` completes before the event loop
/// starts.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), ADC1_CH_TEMPERATURE, &chan_cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    info!("hw_init: ADC1 configured (CH{}=supply temperature)", ADC1_CH_TEMPERATURE);
    Ok(())
}

/// Raw 12-bit sample.  A failed conversion reads as 0.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract: single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return 0;
    }
    raw.clamp(0, 4095) as u16
}

#[cfg(not(target_os = "espidf"))]
static SIM_TEMPERATURE_ADC: AtomicU16 = AtomicU16::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_temperature_adc(raw: u16) {
    SIM_TEMPERATURE_ADC.store(raw, Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(_channel: u32) -> u16 {
    SIM_TEMPERATURE_ADC.load(Ordering::Relaxed)
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn configure_input(pin: i32, pull_up: bool) -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: if pull_up { gpio_pullup_t_GPIO_PULLUP_ENABLE } else { gpio_pullup_t_GPIO_PULLUP_DISABLE },
        pull_down_en: if pull_up { gpio_pulldown_t_GPIO_PULLDOWN_DISABLE } else { gpio_pulldown_t_GPIO_PULLDOWN_ENABLE },
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    for &pin in &pins::PULLUP_INPUTS {
        unsafe { configure_input(pin, true)? };
    }
    for &pin in &pins::ALARM_INPUTS {
        unsafe { configure_input(pin, false)? };
    }
    info!("hw_init: GPIO inputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
static SIM_LEVELS: AtomicU64 = AtomicU64::new(idle_levels());

/// Drive a simulated pin level (inputs for tests, outputs by the relay bank).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_level(pin: i32, high: bool) {
    let bit = 1u64 << pin;
    if high {
        SIM_LEVELS.fetch_or(bit, Ordering::Relaxed);
    } else {
        SIM_LEVELS.fetch_and(!bit, Ordering::Relaxed);
    }
}

/// Restore every simulated pin to its idle level.
#[cfg(not(target_os = "espidf"))]
pub fn sim_reset_levels() {
    SIM_LEVELS.store(idle_levels(), Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(pin: i32) -> bool {
    SIM_LEVELS.load(Ordering::Relaxed) & (1u64 << pin) != 0
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    for &pin in &pins::RELAY_OUTPUTS {
        // Latch the off level before switching the pad to output so the
        // relay never pulses during boot.
        unsafe { gpio_set_level(pin, 1) };
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        unsafe { gpio_set_level(pin, 1) };
    }
    info!("hw_init: {} relay outputs configured (all off)", pins::RELAY_OUTPUTS.len());
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an output pin configured in
    // init_gpio_outputs(). Main-loop only.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) {
    sim_set_level(pin, high);
}
