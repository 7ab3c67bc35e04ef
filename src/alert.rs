//! Alert arbiter: sole owner of the buzzer and the status LED.
//!
//! Two subsystems want the buzzer: the environment monitor (solid tone
//! while out of bounds) and the alarm registry (beeping while an alarm
//! rings).  The arbiter resolves them each tick by priority.
//!
//! ## Buzzer priority (highest first)
//!
//! 1. **Alarm ringing**: 500 ms on / 500 ms off square wave, starting on.
//! 2. **Environment warning**: solid on.
//! 3. Otherwise off.
//!
//! The LED is independent of alarms:
//!
//! | Warning | LED                          |
//! |---------|------------------------------|
//! | yes     | toggles every 500 ms         |
//! | no      | solid on (resting state)     |

use crate::scheduler::Interval;

/// Which requester currently drives the buzzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuzzerOwner {
    Idle,
    Environment,
    Alarm,
}

/// Levels for the two output pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertOutput {
    pub buzzer_on: bool,
    pub led_on: bool,
    pub owner: BuzzerOwner,
}

/// Blink/beep phase state.  One instance, updated once per tick (and on
/// the alarm fast path).
pub struct AlertArbiter {
    blink_ms: u64,
    beep_ms: u64,
    buzzer_on: bool,
    led_on: bool,
    owner: BuzzerOwner,
    blink: Interval,
    beep: Interval,
    warning_active: bool,
}

impl AlertArbiter {
    pub fn new(blink_interval_ms: u32, beep_interval_ms: u32) -> Self {
        Self {
            blink_ms: u64::from(blink_interval_ms),
            beep_ms: u64::from(beep_interval_ms),
            buzzer_on: false,
            led_on: true,
            owner: BuzzerOwner::Idle,
            blink: Interval::new(),
            beep: Interval::new(),
            warning_active: false,
        }
    }

    /// Resolve both outputs for this instant.
    pub fn update(&mut self, now_ms: u64, warning: bool, ringing: bool) -> AlertOutput {
        self.update_buzzer(now_ms, warning, ringing);
        self.update_led(now_ms, warning);
        self.output()
    }

    pub fn output(&self) -> AlertOutput {
        AlertOutput {
            buzzer_on: self.buzzer_on,
            led_on: self.led_on,
            owner: self.owner,
        }
    }

    fn update_buzzer(&mut self, now_ms: u64, warning: bool, ringing: bool) {
        if ringing {
            if self.owner != BuzzerOwner::Alarm {
                self.owner = BuzzerOwner::Alarm;
                self.buzzer_on = true;
                self.beep.restart(now_ms);
            } else if self.beep.poll(now_ms, self.beep_ms) {
                self.buzzer_on = !self.buzzer_on;
            }
            return;
        }

        self.owner = if warning {
            BuzzerOwner::Environment
        } else {
            BuzzerOwner::Idle
        };
        self.buzzer_on = warning;
    }

    fn update_led(&mut self, now_ms: u64, warning: bool) {
        if !warning {
            self.warning_active = false;
            self.led_on = true;
            return;
        }
        if !self.warning_active {
            self.warning_active = true;
            self.led_on = true;
            self.blink.restart(now_ms);
        } else if self.blink.poll(now_ms, self.blink_ms) {
            self.led_on = !self.led_on;
        }
    }
}
