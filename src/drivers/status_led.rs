//! Warning LED driver.
//!
//! A single discrete LED, active high.  Solid while the environment is
//! fine, blinking while a warning is active; the pattern itself lives in
//! the alert arbiter.

use embedded_hal::digital::OutputPin;
use log::warn;

pub struct StatusLed<P: OutputPin> {
    pin: P,
    lit: Option<bool>,
}

impl<P: OutputPin> StatusLed<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, lit: None }
    }

    pub fn set(&mut self, lit: bool) {
        if self.lit == Some(lit) {
            return;
        }
        let res = if lit { self.pin.set_high() } else { self.pin.set_low() };
        match res {
            Ok(()) => self.lit = Some(lit),
            Err(_) => warn!("StatusLed: pin write failed (lit={lit})"),
        }
    }

    pub fn is_lit(&self) -> bool {
        self.lit.unwrap_or(false)
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::sim_pin::SimPin;

    #[test]
    fn first_write_always_reaches_pin() {
        let mut led = StatusLed::new(SimPin::new());
        led.set(false);
        assert_eq!(led.pin().writes(), 1);
        led.set(false);
        assert_eq!(led.pin().writes(), 1);
    }

    #[test]
    fn follows_requested_level() {
        let mut led = StatusLed::new(SimPin::new());
        led.set(true);
        assert!(led.is_lit());
        assert!(led.pin().is_high());
        led.set(false);
        assert!(!led.is_lit());
        assert!(!led.pin().is_high());
    }
}
