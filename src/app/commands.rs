//! Inbound commands to the application service.
//!
//! These represent actions requested from outside the per-tick input
//! drain (the immediate alarm intents raised by the button ISR, the host
//! console) that the [`AppService`](super::service::AppService) interprets
//! and acts upon.

use crate::input::Button;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Silence every alarm.  Honoured only on the alarm screen.
    StopAlarm,

    /// Snooze the displayed alarm.  Honoured only on the alarm screen.
    SnoozeAlarm,

    /// One logical button press.
    Press(Button),
}
