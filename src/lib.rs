//! Medibox firmware library.
//!
//! Exposes the pure-logic modules for integration testing and host
//! simulation.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod alarms;
pub mod alert;
pub mod app;
pub mod clock;
pub mod config;
pub mod control;
pub mod environment;
pub mod error;
pub mod fsm;
pub mod input;
pub mod remote;
pub mod render;
pub mod scheduler;

pub mod pins;

// Board-facing layers; cfg-gated simulation stubs inside keep them
// compiling on the host.
pub mod adapters;
pub mod drivers;
pub mod sensors;
