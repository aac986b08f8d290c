//! `embedded-hal` pin handle over the raw `hw_init` GPIO helpers.
//!
//! The sensor and relay layers are generic over
//! [`InputPin`]/[`OutputPin`]; this type is what they get on the board (and
//! in the host simulation, where levels live in the `hw_init` bitmap).
//! Raw pad access cannot fail once `hw_init` configured the pin.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use super::hw_init;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioPin {
    pin: i32,
}

impl GpioPin {
    pub const fn new(pin: i32) -> Self {
        Self { pin }
    }
}

impl ErrorType for GpioPin {
    type Error = Infallible;
}

impl InputPin for GpioPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(hw_init::gpio_read(self.pin))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!hw_init::gpio_read(self.pin))
    }
}

impl OutputPin for GpioPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.pin, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.pin, true);
        Ok(())
    }
}
