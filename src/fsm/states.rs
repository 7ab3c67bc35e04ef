//! Concrete screen handlers and table builder.
//!
//! Each screen is a pair of plain `fn` pointers.  No closures, no dynamic
//! dispatch, no heap.
//!
//! ```text
//!  WELCOME ──R──▶ SHOW_TIME ──R──▶ MAIN_MENU ──R[0,1]──▶ SET_HOUR ──R──▶ SET_MINUTE
//!     ▲              │  ▲  ▲          │  │  │                │  L            │ R(arm) / L
//!     └──────L───────┘  │  │          │  │  └─R[2]─▶ SET_TZ  ▼               ▼
//!                       │  │          │  │            R/L ─▶ MAIN_MENU ◀─────┘
//!                       │  └────L─────┘  └─R[3]─▶ VIEW_ALARMS ──R(active)──▶ CONFIRM_DELETE
//!                       └──────────────────L──────────┘   ▲                    │ U(delete) / D
//!                                                         └────────────────────┘
//!
//!  Any screen ──[alarm rings]──▶ ALARM_TRIGGERED ──R(stop) / D(snooze)──▶ SHOW_TIME
//! ```
//!
//! Edits are applied to the live alarm record and offset as the user
//! presses Up/Down.  Left backs out without undoing them.

use super::context::{NavContext, UTC_OFFSET_STEP_SECS};
use super::{Screen, ScreenDescriptor};
use crate::input::Button;
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static screen table.  Called once at startup.
pub fn build_screen_table() -> [ScreenDescriptor; Screen::COUNT] {
    [
        // Index 0: Welcome
        ScreenDescriptor {
            id: Screen::Welcome,
            name: "Welcome",
            on_enter: None,
            on_press: welcome_press,
        },
        // Index 1: ShowTime
        ScreenDescriptor {
            id: Screen::ShowTime,
            name: "ShowTime",
            on_enter: None,
            on_press: show_time_press,
        },
        // Index 2: MainMenu
        ScreenDescriptor {
            id: Screen::MainMenu,
            name: "MainMenu",
            on_enter: None,
            on_press: main_menu_press,
        },
        // Index 3: SetAlarmHour
        ScreenDescriptor {
            id: Screen::SetAlarmHour,
            name: "SetAlarmHour",
            on_enter: Some(set_alarm_hour_enter),
            on_press: set_alarm_hour_press,
        },
        // Index 4: SetAlarmMinute
        ScreenDescriptor {
            id: Screen::SetAlarmMinute,
            name: "SetAlarmMinute",
            on_enter: None,
            on_press: set_alarm_minute_press,
        },
        // Index 5: SetTimezone
        ScreenDescriptor {
            id: Screen::SetTimezone,
            name: "SetTimezone",
            on_enter: None,
            on_press: set_timezone_press,
        },
        // Index 6: ViewAlarms
        ScreenDescriptor {
            id: Screen::ViewAlarms,
            name: "ViewAlarms",
            on_enter: None,
            on_press: view_alarms_press,
        },
        // Index 7: AlarmTriggered
        ScreenDescriptor {
            id: Screen::AlarmTriggered,
            name: "AlarmTriggered",
            on_enter: Some(alarm_triggered_enter),
            on_press: alarm_triggered_press,
        },
        // Index 8: ConfirmDelete
        ScreenDescriptor {
            id: Screen::ConfirmDelete,
            name: "ConfirmDelete",
            on_enter: None,
            on_press: confirm_delete_press,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  WELCOME / SHOW_TIME
// ═══════════════════════════════════════════════════════════════════════════

fn welcome_press(_ctx: &mut NavContext, button: Button) -> Option<Screen> {
    (button == Button::Right).then_some(Screen::ShowTime)
}

fn show_time_press(ctx: &mut NavContext, button: Button) -> Option<Screen> {
    match button {
        Button::Right => {
            ctx.nav.menu_cursor = 0;
            Some(Screen::MainMenu)
        }
        Button::Left => Some(Screen::Welcome),
        Button::Up | Button::Down => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  MAIN_MENU
// ═══════════════════════════════════════════════════════════════════════════

fn main_menu_press(ctx: &mut NavContext, button: Button) -> Option<Screen> {
    match button {
        Button::Up => {
            ctx.nav.menu_up();
            None
        }
        Button::Down => {
            ctx.nav.menu_down();
            None
        }
        Button::Left => Some(Screen::ShowTime),
        Button::Right => match ctx.nav.menu_cursor {
            0 | 1 => Some(Screen::SetAlarmHour),
            2 => Some(Screen::SetTimezone),
            _ => {
                ctx.nav.view_cursor = 0;
                Some(Screen::ViewAlarms)
            }
        },
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  SET_ALARM_HOUR / SET_ALARM_MINUTE: live edit of the selected slot
// ═══════════════════════════════════════════════════════════════════════════

fn set_alarm_hour_enter(ctx: &mut NavContext) {
    // Only reachable from the first two menu entries.
    ctx.nav.editing_alarm = usize::from(ctx.nav.menu_cursor.min(1));
    debug!("Editing alarm {}", ctx.nav.editing_alarm + 1);
}

fn set_alarm_hour_press(ctx: &mut NavContext, button: Button) -> Option<Screen> {
    match button {
        Button::Up | Button::Down => {
            ctx.step_editing_hour(button == Button::Up);
            None
        }
        Button::Right => Some(Screen::SetAlarmMinute),
        Button::Left => Some(Screen::MainMenu),
    }
}

fn set_alarm_minute_press(ctx: &mut NavContext, button: Button) -> Option<Screen> {
    match button {
        Button::Up | Button::Down => {
            ctx.step_editing_minute(button == Button::Up);
            None
        }
        Button::Right => {
            ctx.alarms.arm(ctx.nav.editing_alarm);
            Some(Screen::MainMenu)
        }
        Button::Left => Some(Screen::MainMenu),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  SET_TIMEZONE
// ═══════════════════════════════════════════════════════════════════════════

fn set_timezone_press(ctx: &mut NavContext, button: Button) -> Option<Screen> {
    match button {
        Button::Up => {
            ctx.nav.shift_utc_offset(UTC_OFFSET_STEP_SECS);
            None
        }
        Button::Down => {
            ctx.nav.shift_utc_offset(-UTC_OFFSET_STEP_SECS);
            None
        }
        Button::Right | Button::Left => Some(Screen::MainMenu),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  VIEW_ALARMS / CONFIRM_DELETE
// ═══════════════════════════════════════════════════════════════════════════

fn view_alarms_press(ctx: &mut NavContext, button: Button) -> Option<Screen> {
    match button {
        Button::Up | Button::Down => {
            ctx.nav.view_toggle();
            None
        }
        Button::Left => Some(Screen::ShowTime),
        Button::Right => {
            let active = ctx
                .alarms
                .alarm(ctx.nav.view_selection())
                .is_some_and(|a| a.is_active());
            active.then_some(Screen::ConfirmDelete)
        }
    }
}

fn confirm_delete_press(ctx: &mut NavContext, button: Button) -> Option<Screen> {
    match button {
        Button::Right | Button::Up => {
            ctx.alarms.delete(ctx.nav.view_selection());
            Some(Screen::ViewAlarms)
        }
        Button::Down => Some(Screen::ViewAlarms),
        Button::Left => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  ALARM_TRIGGERED: left only through Stop or Snooze
// ═══════════════════════════════════════════════════════════════════════════

fn alarm_triggered_enter(ctx: &mut NavContext) {
    if let Some(i) = ctx.alarms.ringing_index() {
        info!("ALARM {}: RIGHT to stop, DOWN to snooze", i + 1);
    }
}

fn alarm_triggered_press(ctx: &mut NavContext, button: Button) -> Option<Screen> {
    match button {
        Button::Right => {
            ctx.alarms.stop_all();
            Some(Screen::ShowTime)
        }
        Button::Down => {
            if let Some(i) = ctx.alarms.ringing_index() {
                ctx.alarms.snooze(i, ctx.now_ms);
            }
            // Snooze leaves for ShowTime only once nothing rings.  With two
            // alarms in the same minute, the first Down snoozes alarm 1 and
            // the screen stays up showing alarm 2.
            if ctx.alarms.any_ringing() {
                None
            } else {
                Some(Screen::ShowTime)
            }
        }
        Button::Up | Button::Left => None,
    }
}
