//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and all actuator drivers, exposing them
//! through [`SensorPort`] and [`ActuatorPort`].  Generic over the pin
//! types so the same adapter runs on ESP-IDF `PinDriver`/`LedcDriver`
//! and on the host simulation pins.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::buzzer::Buzzer;
use crate::drivers::servo::Servo;
use crate::drivers::status_led::StatusLed;
use crate::sensors::SensorHub;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<B: OutputPin, L: OutputPin, S: SetDutyCycle> {
    sensor_hub: SensorHub,
    buzzer: Buzzer<B>,
    led: StatusLed<L>,
    servo: Servo<S>,
}

impl<B: OutputPin, L: OutputPin, S: SetDutyCycle> HardwareAdapter<B, L, S> {
    pub fn new(sensor_hub: SensorHub, buzzer: Buzzer<B>, led: StatusLed<L>, servo: Servo<S>) -> Self {
        Self {
            sensor_hub,
            buzzer,
            led,
            servo,
        }
    }

    pub fn sensors(&self) -> &SensorHub {
        &self.sensor_hub
    }

    pub fn buzzer(&self) -> &Buzzer<B> {
        &self.buzzer
    }

    pub fn led(&self) -> &StatusLed<L> {
        &self.led
    }

    pub fn servo(&self) -> &Servo<S> {
        &self.servo
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<B: OutputPin, L: OutputPin, S: SetDutyCycle> SensorPort for HardwareAdapter<B, L, S> {
    fn read_temperature_c(&mut self) -> f32 {
        self.sensor_hub.temperature_c()
    }

    fn read_humidity_pct(&mut self) -> f32 {
        self.sensor_hub.humidity_pct()
    }

    fn read_light_raw(&mut self) -> u16 {
        self.sensor_hub.light_raw()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<B: OutputPin, L: OutputPin, S: SetDutyCycle> ActuatorPort for HardwareAdapter<B, L, S> {
    fn set_buzzer(&mut self, on: bool) {
        self.buzzer.set(on);
    }

    fn set_led(&mut self, on: bool) {
        self.led.set(on);
    }

    fn set_servo_angle(&mut self, degrees: f32) {
        self.servo.set_angle(degrees);
    }
}
