//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to serial, publish to the remote
//! broker, record in a test.

use serde::Serialize;

use crate::alarms::{ALARM_COUNT, Alarm};
use crate::clock::WallTime;
use crate::fsm::Screen;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The application service has started (carries the initial screen).
    Started(Screen),

    /// The navigation state machine switched screens.
    ScreenChanged { from: Screen, to: Screen },

    /// An alarm started ringing (lowest ringing index).
    AlarmTriggered(usize),

    /// Stop: every alarm silenced.
    AlarmStopped,

    /// One alarm snoozed until the given monotonic deadline.
    AlarmSnoozed { alarm: usize, until_ms: u64 },

    /// Environment left the safe envelope (fault bitmask).
    EnvironmentWarning(u8),

    /// Environment back within bounds.
    EnvironmentCleared,

    /// Averaged normalised light over the last sending window.
    LightAverage(f32),

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryData {
    pub uptime_ms: u64,
    pub screen: Screen,
    pub time: WallTime,
    pub utc_offset_secs: i32,
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub env_faults: u8,
    pub alarms: [Alarm; ALARM_COUNT],
    pub buzzer_on: bool,
    pub led_on: bool,
    pub servo_angle_deg: f32,
}
