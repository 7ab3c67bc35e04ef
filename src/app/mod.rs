//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for the Medibox: navigation,
//! alarm evaluation, environment supervision, alert arbitration and shade
//! control, orchestrated once per tick.  All interaction with hardware
//! happens through **port traits** defined in [`ports`], keeping this
//! layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
