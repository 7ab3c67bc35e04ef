//! Piezo buzzer on a plain GPIO.
//!
//! The beep cadence is decided by the alert arbiter; this driver is a dumb
//! on/off actuator.  Only level changes reach the pin.
//!
//! Generic over any `embedded-hal` [`OutputPin`]: the ESP-IDF
//! `PinDriver` on the board, [`SimPin`](super::sim_pin::SimPin) on host.

use embedded_hal::digital::OutputPin;
use log::warn;

pub struct Buzzer<P: OutputPin> {
    pin: P,
    on: bool,
}

impl<P: OutputPin> Buzzer<P> {
    /// Takes ownership of the pin and drives it low.
    pub fn new(mut pin: P) -> Self {
        if pin.set_low().is_err() {
            warn!("Buzzer: initial set_low failed");
        }
        Self { pin, on: false }
    }

    pub fn set(&mut self, on: bool) {
        if on == self.on {
            return;
        }
        let res = if on { self.pin.set_high() } else { self.pin.set_low() };
        match res {
            Ok(()) => self.on = on,
            Err(_) => warn!("Buzzer: pin write failed (on={on})"),
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }
}
