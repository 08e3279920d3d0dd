//! One-shot hardware peripheral initialization.
//!
//! Configures the relay output pin using raw ESP-IDF sys calls and exposes
//! it as an `embedded-hal` output.  Called once during boot, before the
//! tasks exist.  The UART is brought up separately by `UartDriver::open`.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use crate::error::{Error, StartupError};
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
        }
    }
}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        log::error!("hw_init: {}", e);
        Error::Startup(StartupError::Peripheral("gpio"))
    }
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once during boot before any task is spawned.
    unsafe { init_gpio_outputs()? };
    log::info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::DEVICE_GPIO,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    // Relay starts de-energised, matching the initial device state.
    unsafe { gpio_set_level(pins::DEVICE_GPIO, 0) };

    log::info!("hw_init: relay output on GPIO{} configured", pins::DEVICE_GPIO);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was configured during init_gpio_outputs().
    unsafe { gpio_set_level(pin, u32::from(high)) };
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

/// A configured GPIO output behind the `embedded-hal` pin trait.
///
/// On the host the level is only tracked in memory.
#[derive(Debug)]
pub struct GpioOutput {
    pin: i32,
    high: bool,
}

impl GpioOutput {
    pub fn new(pin: i32) -> Self {
        Self { pin, high: false }
    }

    pub fn is_set_high(&self) -> bool {
        self.high
    }
}

impl ErrorType for GpioOutput {
    type Error = Infallible;
}

impl OutputPin for GpioOutput {
    fn set_low(&mut self) -> Result<(), Infallible> {
        gpio_write(self.pin, false);
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        gpio_write(self.pin, true);
        self.high = true;
        Ok(())
    }
}
