//! Light-driven shade controller
//!
//! Samples the LDR on the configured sampling interval, averages the
//! samples over the sending interval for publication, and recomputes the
//! servo angle every tick from the instantaneous light level and the last
//! temperature reading:
//!
//! ```text
//! θ = θmin + (180 − θmin) · I · γ · ln(ts / tu) · (T / Tmed)
//! ```
//!
//! `ln(ts / tu)` is negative whenever sampling is faster than sending,
//! which is the normal configuration, so θ usually clamps to θmin.  That
//! sign is kept as calibrated on the board.  A NaN result (zero interval,
//! NaN temperature, ∞·0) holds the previous angle; ±∞ clamps.

use crate::config::ControlParameters;
use crate::scheduler::Interval;

/// Full-scale reading of the 12-bit ADC.
pub const LIGHT_RAW_MAX: u16 = 4095;

/// Upper servo limit (degrees).
pub const MAX_ANGLE_DEG: f32 = 180.0;

/// Raw LDR reading → intensity in [0, 1].  The divider is wired so a
/// higher raw value means darker, hence the inversion.
pub fn normalize_light(raw: u16) -> f32 {
    let ratio = f32::from(raw) / f32::from(LIGHT_RAW_MAX);
    (1.0 - ratio).clamp(0.0, 1.0)
}

/// Evaluate the control law.  `None` when the formula is undefined.
pub fn control_angle(params: &ControlParameters, light: f32, temperature_c: f32) -> Option<f32> {
    let log_term = (params.sampling_interval_ms as f32 / params.sending_interval_ms as f32).ln();
    let theta = params.min_angle_deg
        + (MAX_ANGLE_DEG - params.min_angle_deg)
            * light
            * params.control_factor
            * log_term
            * (temperature_c / params.target_temp_c);

    if theta.is_nan() {
        return None;
    }
    // max/min instead of clamp: never panics on a degenerate lower bound.
    let lo = params.min_angle_deg.min(MAX_ANGLE_DEG);
    Some(theta.max(lo).min(MAX_ANGLE_DEG))
}

/// Result of one controller poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlOutcome {
    /// Angle to command this tick.
    pub angle_deg: f32,
    /// Instantaneous normalised light used for the angle.
    pub light: f32,
    /// Sample accumulated this tick, if the sampling interval elapsed.
    pub sampled: Option<f32>,
    /// Average over the sending window, if it closed this tick.
    pub average: Option<f32>,
}

/// Sampling accumulator and angle memory.
pub struct ActuatorController {
    sampling: Interval,
    sending: Interval,
    sum: f32,
    count: u32,
    angle_deg: f32,
}

impl ActuatorController {
    pub fn new(params: &ControlParameters) -> Self {
        Self {
            sampling: Interval::new(),
            sending: Interval::starting_at(0),
            sum: 0.0,
            count: 0,
            angle_deg: params.min_angle_deg,
        }
    }

    /// One tick.  `params` is re-read every tick so remote updates take
    /// effect immediately.
    pub fn poll(
        &mut self,
        now_ms: u64,
        params: &ControlParameters,
        light_raw: u16,
        temperature_c: f32,
    ) -> ControlOutcome {
        let light = normalize_light(light_raw);

        let sampled = if self.sampling.poll(now_ms, u64::from(params.sampling_interval_ms)) {
            self.sum += light;
            self.count += 1;
            Some(light)
        } else {
            None
        };

        let average = if self.sending.poll(now_ms, u64::from(params.sending_interval_ms)) {
            self.take_average()
        } else {
            None
        };

        if let Some(angle) = control_angle(params, light, temperature_c) {
            self.angle_deg = angle;
        }

        ControlOutcome {
            angle_deg: self.angle_deg,
            light,
            sampled,
            average,
        }
    }

    pub fn angle_deg(&self) -> f32 {
        self.angle_deg
    }

    pub fn pending_samples(&self) -> u32 {
        self.count
    }

    /// Mean of the window and reset.  An empty window yields nothing.
    fn take_average(&mut self) -> Option<f32> {
        let avg = (self.count > 0).then(|| self.sum / self.count as f32);
        self.sum = 0.0;
        self.count = 0;
        avg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ControlParameters {
        ControlParameters::default()
    }

    #[test]
    fn light_is_inverted_and_bounded() {
        assert!((normalize_light(0) - 1.0).abs() < f32::EPSILON);
        assert!(normalize_light(LIGHT_RAW_MAX).abs() < f32::EPSILON);
        let mid = normalize_light(2048);
        assert!(mid > 0.49 && mid < 0.51);
    }

    #[test]
    fn default_calibration_clamps_to_min_angle() {
        // ln(5000 / 120000) < 0 so any light pushes θ below θmin.
        let a = control_angle(&params(), 1.0, 30.0).unwrap();
        assert!((a - 30.0).abs() < f32::EPSILON);
    }

    #[test]
    fn positive_log_term_opens_the_shade() {
        let p = ControlParameters {
            sampling_interval_ms: 120_000,
            sending_interval_ms: 5_000,
            ..params()
        };
        let a = control_angle(&p, 0.2, 30.0).unwrap();
        assert!(a > 30.0 && a <= 180.0);
    }

    #[test]
    fn dark_box_rests_at_min_angle() {
        let a = control_angle(&params(), 0.0, 30.0).unwrap();
        assert!((a - 30.0).abs() < f32::EPSILON);
    }

    #[test]
    fn undefined_formula_yields_none() {
        assert_eq!(control_angle(&params(), 0.5, f32::NAN), None);
        let zero = ControlParameters {
            sampling_interval_ms: 0,
            sending_interval_ms: 0,
            ..params()
        };
        assert_eq!(control_angle(&zero, 0.5, 30.0), None);
    }

    #[test]
    fn infinite_result_clamps() {
        let p = ControlParameters {
            sending_interval_ms: 0,
            ..params()
        };
        // ln(∞) = ∞ → clamps high.
        assert_eq!(control_angle(&p, 0.5, 30.0), Some(180.0));
        let p = ControlParameters {
            sampling_interval_ms: 0,
            ..params()
        };
        // ln(0) = -∞ → clamps low.
        assert_eq!(control_angle(&p, 0.5, 30.0), Some(30.0));
    }

    #[test]
    fn min_angle_above_servo_range_does_not_panic() {
        let p = ControlParameters {
            min_angle_deg: 200.0,
            ..params()
        };
        assert_eq!(control_angle(&p, 0.5, 30.0), Some(180.0));
    }

    #[test]
    fn nan_holds_previous_angle() {
        let p = ControlParameters {
            sampling_interval_ms: 120_000,
            sending_interval_ms: 5_000,
            ..params()
        };
        let mut ctl = ActuatorController::new(&p);
        let first = ctl.poll(0, &p, 3000, 30.0).angle_deg;
        let held = ctl.poll(100, &p, 3000, f32::NAN).angle_deg;
        assert!((first - held).abs() < f32::EPSILON);
    }

    #[test]
    fn samples_accumulate_and_average_is_published() {
        let p = ControlParameters {
            sampling_interval_ms: 1_000,
            sending_interval_ms: 3_000,
            ..params()
        };
        let mut ctl = ActuatorController::new(&p);

        assert!(ctl.poll(0, &p, 0, 30.0).sampled.is_some());
        assert!(ctl.poll(500, &p, 0, 30.0).sampled.is_none());
        ctl.poll(1_000, &p, LIGHT_RAW_MAX, 30.0);
        ctl.poll(2_000, &p, LIGHT_RAW_MAX, 30.0);
        assert_eq!(ctl.pending_samples(), 3);

        let out = ctl.poll(3_000, &p, 0, 30.0);
        // Samples: 1.0, 0.0, 0.0, 1.0 (the 3 s sample lands before the window closes)
        let avg = out.average.unwrap();
        assert!((avg - 0.5).abs() < 1e-6);
        assert_eq!(ctl.pending_samples(), 0);
    }

    #[test]
    fn empty_window_publishes_nothing() {
        let p = ControlParameters {
            sampling_interval_ms: 10_000,
            sending_interval_ms: 1_000,
            ..params()
        };
        let mut ctl = ActuatorController::new(&p);
        ctl.poll(0, &p, 0, 30.0);
        assert!(ctl.poll(1_000, &p, 0, 30.0).average.is_some());
        assert!(ctl.poll(2_000, &p, 0, 30.0).average.is_none());
    }
}
