//! In-memory pins for the host build and tests.
//!
//! [`SimPin`] and [`SimPwm`] implement the same `embedded-hal` traits as
//! the board's GPIO and LEDC drivers, so the actuator drivers above them
//! are exercised unchanged.  Both are infallible.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType as DigitalErrorType, OutputPin, StatefulOutputPin};
use embedded_hal::pwm::{ErrorType as PwmErrorType, SetDutyCycle};

/// Push-pull output that remembers its level and counts writes.
#[derive(Debug, Default, Clone)]
pub struct SimPin {
    high: bool,
    writes: u32,
}

impl SimPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_high(&self) -> bool {
        self.high
    }

    /// Number of level writes since construction.
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl DigitalErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        self.writes += 1;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = true;
        self.writes += 1;
        Ok(())
    }
}

impl StatefulOutputPin for SimPin {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.high)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.high)
    }
}

/// PWM channel with a configurable resolution.
#[derive(Debug, Clone)]
pub struct SimPwm {
    max_duty: u16,
    duty: u16,
}

impl SimPwm {
    /// `max_duty` is the full-scale count, e.g. `(1 << 14) - 1`.
    pub fn new(max_duty: u16) -> Self {
        Self { max_duty, duty: 0 }
    }

    pub fn duty(&self) -> u16 {
        self.duty
    }
}

impl Default for SimPwm {
    fn default() -> Self {
        Self::new((1 << 14) - 1)
    }
}

impl PwmErrorType for SimPwm {
    type Error = Infallible;
}

impl SetDutyCycle for SimPwm {
    fn max_duty_cycle(&self) -> u16 {
        self.max_duty
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duty = duty.min(self.max_duty);
        Ok(())
    }
}
