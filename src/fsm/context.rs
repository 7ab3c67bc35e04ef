//! Mutable context threaded through every screen handler.
//!
//! `NavContext` is the blackboard the press handlers read from and write
//! to: the navigation cursors, the live alarm records they edit in place,
//! and the current monotonic time (needed by the snooze action).

use crate::alarms::{ALARM_COUNT, AlarmRegistry};
use crate::clock::wrap_utc_offset;

/// Number of entries in the main menu.
pub const MENU_ITEM_COUNT: u8 = 4;

/// Main menu entries, in cursor order.
pub const MENU_ITEMS: [&str; MENU_ITEM_COUNT as usize] =
    ["Set Alarm 1", "Set Alarm 2", "Set Timezone", "View Alarms"];

/// Timezone editor step (seconds).
pub const UTC_OFFSET_STEP_SECS: i32 = 1_800;

// ---------------------------------------------------------------------------
// Navigation state
// ---------------------------------------------------------------------------

/// Cursors and in-progress edit selections.  The screen itself lives in
/// the [`Navigator`](super::Navigator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationState {
    /// Main menu cursor, 0..4.
    pub menu_cursor: u8,
    /// View-alarms selection, 0..2.
    pub view_cursor: u8,
    /// Alarm slot the hour/minute editors work on.
    pub editing_alarm: usize,
    /// Offset pushed to the time source, within ±86 400 s.
    pub utc_offset_secs: i32,
}

impl NavigationState {
    pub fn new(utc_offset_secs: i32) -> Self {
        Self {
            menu_cursor: 0,
            view_cursor: 0,
            editing_alarm: 0,
            utc_offset_secs: wrap_utc_offset(utc_offset_secs),
        }
    }

    pub fn menu_up(&mut self) {
        self.menu_cursor = (self.menu_cursor + MENU_ITEM_COUNT - 1) % MENU_ITEM_COUNT;
    }

    pub fn menu_down(&mut self) {
        self.menu_cursor = (self.menu_cursor + 1) % MENU_ITEM_COUNT;
    }

    /// Two entries, so up and down both toggle.
    pub fn view_toggle(&mut self) {
        self.view_cursor = (self.view_cursor + 1) % ALARM_COUNT as u8;
    }

    pub fn view_selection(&self) -> usize {
        usize::from(self.view_cursor)
    }

    pub fn shift_utc_offset(&mut self, delta_secs: i32) {
        self.utc_offset_secs = wrap_utc_offset(self.utc_offset_secs + delta_secs);
    }
}

// ---------------------------------------------------------------------------
// NavContext
// ---------------------------------------------------------------------------

/// The blackboard handed to every screen handler.
pub struct NavContext {
    pub nav: NavigationState,
    pub alarms: AlarmRegistry,
    /// Monotonic milliseconds at the time of the press.
    pub now_ms: u64,
}

impl NavContext {
    pub fn new(alarms: AlarmRegistry, utc_offset_secs: i32) -> Self {
        Self {
            nav: NavigationState::new(utc_offset_secs),
            alarms,
            now_ms: 0,
        }
    }

    /// Adjust the hour of the alarm being edited, wrapping mod 24.
    pub fn step_editing_hour(&mut self, up: bool) {
        if let Some(alarm) = self.alarms.alarm_mut(self.nav.editing_alarm) {
            alarm.hour = step_mod(alarm.hour, up, 24);
        }
    }

    /// Adjust the minute of the alarm being edited, wrapping mod 60.
    pub fn step_editing_minute(&mut self, up: bool) {
        if let Some(alarm) = self.alarms.alarm_mut(self.nav.editing_alarm) {
            alarm.minute = step_mod(alarm.minute, up, 60);
        }
    }
}

fn step_mod(value: u8, up: bool, modulus: u8) -> u8 {
    if up {
        (value + 1) % modulus
    } else {
        (value + modulus - 1) % modulus
    }
}
