//! Actuator drivers, button ISR glue, and simulation pins.

pub mod button;
pub mod buzzer;
pub mod servo;
pub mod sim_pin;
pub mod status_led;
