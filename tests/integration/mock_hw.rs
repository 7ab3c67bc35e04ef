//! Mock adapters for integration tests.
//!
//! Records every actuator call, every rendered view and every emitted
//! event so tests can assert on the full history without touching real
//! GPIO, PWM or I²C.

use medibox::app::events::AppEvent;
use medibox::app::ports::{ActuatorPort, ClockPort, DisplayPort, EventSink, SensorPort};
use medibox::clock::WallTime;
use medibox::error::DisplayError;
use medibox::render::View;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    Buzzer(bool),
    Led(bool),
    Servo(f32),
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub light_raw: u16,
    pub calls: Vec<ActuatorCall>,
}

#[allow(dead_code)]
impl MockHardware {
    /// Comfortable environment: 27 °C, 70 %RH, mid light.
    pub fn new() -> Self {
        Self {
            temperature_c: 27.0,
            humidity_pct: 70.0,
            light_raw: 2048,
            calls: Vec::new(),
        }
    }

    pub fn buzzer_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Buzzer(on) => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn led_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Led(on) => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn servo_angle(&self) -> Option<f32> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::Servo(a) => Some(*a),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_temperature_c(&mut self) -> f32 {
        self.temperature_c
    }

    fn read_humidity_pct(&mut self) -> f32 {
        self.humidity_pct
    }

    fn read_light_raw(&mut self) -> u16 {
        self.light_raw
    }
}

impl ActuatorPort for MockHardware {
    fn set_buzzer(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Buzzer(on));
    }

    fn set_led(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Led(on));
    }

    fn set_servo_angle(&mut self, degrees: f32) {
        self.calls.push(ActuatorCall::Servo(degrees));
    }
}

// ── MockClock ─────────────────────────────────────────────────

/// Wall clock the test sets by hand.  Records every offset pushed.
pub struct MockClock {
    pub now: WallTime,
    pub offsets: Vec<i32>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn at(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            now: WallTime::at(hour, minute, second),
            offsets: Vec::new(),
        }
    }

    pub fn set(&mut self, hour: u8, minute: u8, second: u8) {
        self.now = WallTime::at(hour, minute, second);
    }
}

impl ClockPort for MockClock {
    fn now(&self) -> WallTime {
        self.now
    }

    fn set_utc_offset(&mut self, offset_secs: i32) {
        self.offsets.push(offset_secs);
    }
}

// ── RecordingDisplay ──────────────────────────────────────────

pub struct RecordingDisplay {
    pub fail_init: bool,
    pub views: Vec<View>,
}

#[allow(dead_code)]
impl RecordingDisplay {
    pub fn new() -> Self {
        Self {
            fail_init: false,
            views: Vec::new(),
        }
    }

    pub fn last(&self) -> Option<&View> {
        self.views.last()
    }

    /// Text of the last frame, lines joined with `|`.
    pub fn last_text(&self) -> String {
        self.last()
            .map(|v| {
                v.frame()
                    .iter()
                    .map(|l| l.text.as_str())
                    .collect::<Vec<_>>()
                    .join("|")
            })
            .unwrap_or_default()
    }
}

impl Default for RecordingDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPort for RecordingDisplay {
    fn init(&mut self) -> Result<(), DisplayError> {
        if self.fail_init {
            Err(DisplayError::NotResponding(0x3C))
        } else {
            Ok(())
        }
    }

    fn render(&mut self, view: &View) {
        self.views.push(view.clone());
    }
}

// ── LogSink ───────────────────────────────────────────────────

/// Event sink that records everything it receives.
pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
