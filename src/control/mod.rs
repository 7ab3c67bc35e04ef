//! Shade control: light sampling, averaging and the servo control law.

pub mod actuator;

pub use actuator::{ActuatorController, ControlOutcome, control_angle, normalize_light};
