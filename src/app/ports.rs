//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, clock, display, event sinks)
//! implement these traits.  The [`AppService`](super::service::AppService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.
//!
//! ## Failure model
//!
//! - **SensorPort** never fails: a bad read comes back as NaN and the
//!   environment monitor turns it into a warning.
//! - **ActuatorPort** is fire-and-forget; adapters log pin errors.
//! - **DisplayPort::init** is the only fallible call.  Without a panel the
//!   device is unusable, so bring-up stops there.

use crate::clock::WallTime;
use crate::error::DisplayError;
use crate::render::View;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain sensor data.
pub trait SensorPort {
    /// DHT11 temperature (°C).  NaN on a failed read.
    fn read_temperature_c(&mut self) -> f32;

    /// DHT11 relative humidity (%RH).  NaN on a failed read.
    fn read_humidity_pct(&mut self) -> f32;

    /// LDR level, 0..=4095.  Higher is darker.
    fn read_light_raw(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
pub trait ActuatorPort {
    fn set_buzzer(&mut self, on: bool);

    fn set_led(&mut self, on: bool);

    /// Shade servo, degrees in [min angle, 180].
    fn set_servo_angle(&mut self, degrees: f32);
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: time source ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Wall-clock source.  Synchronisation is the adapter's business; the
/// core only asks for "now" and pushes the user's UTC offset.
pub trait ClockPort {
    /// Current local time (offset applied).
    fn now(&self) -> WallTime;

    /// Set the offset added to UTC, seconds within ±86 400.
    fn set_utc_offset(&mut self, offset_secs: i32);
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → panel)
// ───────────────────────────────────────────────────────────────

/// Whole-frame display.  Every `render` replaces the previous frame.
pub trait DisplayPort {
    /// Bring the panel up.  Failure is fatal at boot.
    fn init(&mut self) -> Result<(), DisplayError>;

    fn render(&mut self, view: &View);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, the
/// remote broker, a test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

/// Fan one event out to two sinks.
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn emit(&mut self, event: &super::events::AppEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}
