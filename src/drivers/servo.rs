//! Hobby servo for the shade, on a 50 Hz PWM channel.
//!
//! ```text
//!   angle 0° ──▶  500 µs ┐
//!   angle 90° ─▶ 1500 µs ├─ of a 20 000 µs period
//!   angle 180° ▶ 2500 µs ┘
//! ```
//!
//! The control law already clamps to [min angle, 180]; the driver clamps
//! again to the mechanical range so a bad caller cannot stall the horn.

use embedded_hal::pwm::SetDutyCycle;
use log::warn;

/// PWM frequency the channel must be configured for.
pub const SERVO_PWM_FREQ_HZ: u32 = 50;

const PERIOD_US: f32 = 20_000.0;
const MIN_PULSE_US: f32 = 500.0;
const MAX_PULSE_US: f32 = 2_500.0;
const MAX_ANGLE: f32 = 180.0;

/// Pulse width for an angle, clamped to the mechanical range.
pub fn pulse_width_us(angle_deg: f32) -> f32 {
    let angle = if angle_deg.is_nan() { 0.0 } else { angle_deg.clamp(0.0, MAX_ANGLE) };
    MIN_PULSE_US + (MAX_PULSE_US - MIN_PULSE_US) * angle / MAX_ANGLE
}

pub struct Servo<P: SetDutyCycle> {
    pwm: P,
    angle_deg: Option<f32>,
}

impl<P: SetDutyCycle> Servo<P> {
    pub fn new(pwm: P) -> Self {
        Self { pwm, angle_deg: None }
    }

    /// Command an angle.  Repeats of the current angle are dropped.
    pub fn set_angle(&mut self, angle_deg: f32) {
        if self.angle_deg.is_some_and(|a| (a - angle_deg).abs() < f32::EPSILON) {
            return;
        }
        let max = f32::from(self.pwm.max_duty_cycle());
        let duty = (pulse_width_us(angle_deg) / PERIOD_US * max).round() as u16;
        match self.pwm.set_duty_cycle(duty) {
            Ok(()) => self.angle_deg = Some(angle_deg),
            Err(_) => warn!("Servo: duty write failed ({angle_deg:.1}°)"),
        }
    }

    /// Last angle successfully commanded.
    pub fn angle_deg(&self) -> Option<f32> {
        self.angle_deg
    }

    pub fn pwm(&self) -> &P {
        &self.pwm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::sim_pin::SimPwm;

    #[test]
    fn pulse_width_spans_mechanical_range() {
        assert!((pulse_width_us(0.0) - 500.0).abs() < 1e-3);
        assert!((pulse_width_us(90.0) - 1500.0).abs() < 1e-3);
        assert!((pulse_width_us(180.0) - 2500.0).abs() < 1e-3);
        assert!((pulse_width_us(400.0) - 2500.0).abs() < 1e-3);
        assert!((pulse_width_us(f32::NAN) - 500.0).abs() < 1e-3);
    }

    #[test]
    fn duty_scales_with_channel_resolution() {
        let mut servo = Servo::new(SimPwm::new(16_383));
        servo.set_angle(90.0);
        assert_eq!(servo.pwm().duty(), 1229);
        assert_eq!(servo.angle_deg(), Some(90.0));

        servo.set_angle(30.0);
        // 833.3 µs of 20 ms
        assert_eq!(servo.pwm().duty(), 683);
    }
}
