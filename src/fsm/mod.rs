//! Function-pointer navigation state machine.
//!
//! One row per screen:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  ScreenTable                                             │
//! │  ┌────────────────┬───────────┬────────────────────────┐ │
//! │  │ Screen         │ on_enter  │ on_press               │ │
//! │  ├────────────────┼───────────┼────────────────────────┤ │
//! │  │ Welcome        │ -         │ fn(ctx, btn)->Option<> │ │
//! │  │ ShowTime       │ -         │ fn(ctx, btn)->Option<> │ │
//! │  │ MainMenu       │ -         │ fn(ctx, btn)->Option<> │ │
//! │  │ SetAlarmHour   │ fn(ctx)   │ fn(ctx, btn)->Option<> │ │
//! │  │ ...            │           │                        │ │
//! │  └────────────────┴───────────┴────────────────────────┘ │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Each logical press is routed to `on_press` of the **current** screen.
//! If it returns `Some(next)` the engine switches screens and runs the
//! next screen's `on_enter`.  Handlers may also mutate the alarms and
//! cursors through `&mut NavContext`.
//!
//! `AlarmTriggered` is entered from anywhere via [`Navigator::force`],
//! driven by the alarm registry rather than by a press.

pub mod context;
pub mod states;

use context::NavContext;
use log::info;
use serde::Serialize;

use crate::input::Button;

// ---------------------------------------------------------------------------
// Screen identity
// ---------------------------------------------------------------------------

/// Every screen the device can show.
/// Must stay in sync with the table built in [`states::build_screen_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum Screen {
    Welcome = 0,
    ShowTime = 1,
    MainMenu = 2,
    SetAlarmHour = 3,
    SetAlarmMinute = 4,
    SetTimezone = 5,
    ViewAlarms = 6,
    AlarmTriggered = 7,
    ConfirmDelete = 8,
}

impl Screen {
    /// Total number of screens, used to size the table array.
    pub const COUNT: usize = 9;

    /// Convert an index back to `Screen`.  Out-of-range indices are a bug;
    /// release builds fall back to `ShowTime`.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Welcome,
            1 => Self::ShowTime,
            2 => Self::MainMenu,
            3 => Self::SetAlarmHour,
            4 => Self::SetAlarmMinute,
            5 => Self::SetTimezone,
            6 => Self::ViewAlarms,
            7 => Self::AlarmTriggered,
            8 => Self::ConfirmDelete,
            _ => {
                debug_assert!(false, "invalid screen index: {idx}");
                Self::ShowTime
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Runs once each time a screen is entered.
pub type ScreenActionFn = fn(&mut NavContext);

/// Handles one logical press.  Returns `Some(next)` to switch screens.
pub type PressHandlerFn = fn(&mut NavContext, Button) -> Option<Screen>;

/// Static descriptor for one screen.
pub struct ScreenDescriptor {
    pub id: Screen,
    pub name: &'static str,
    pub on_enter: Option<ScreenActionFn>,
    pub on_press: PressHandlerFn,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Owns the screen table and the current screen.
pub struct Navigator {
    table: [ScreenDescriptor; Screen::COUNT],
    current: usize,
    transitions: u32,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(states::build_screen_table(), Screen::Welcome)
    }
}

impl Navigator {
    pub fn new(table: [ScreenDescriptor; Screen::COUNT], initial: Screen) -> Self {
        Self {
            table,
            current: initial as usize,
            transitions: 0,
        }
    }

    /// Run the initial screen's `on_enter`.  Call once before the first press.
    pub fn start(&mut self, ctx: &mut NavContext) {
        info!("Navigation starting on screen: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Route one logical press.  Returns the new screen if it changed.
    pub fn handle_press(&mut self, button: Button, ctx: &mut NavContext) -> Option<Screen> {
        let next = (self.table[self.current].on_press)(ctx, button)?;
        if next as usize == self.current {
            return None;
        }
        self.transition(next, ctx);
        Some(next)
    }

    /// Jump to `next` regardless of the current screen (alarm trigger,
    /// alarm actions raised outside the press path).
    pub fn force(&mut self, next: Screen, ctx: &mut NavContext) -> bool {
        if next as usize == self.current {
            return false;
        }
        self.transition(next, ctx);
        true
    }

    pub fn screen(&self) -> Screen {
        Screen::from_index(self.current)
    }

    pub fn screen_name(&self) -> &'static str {
        self.table[self.current].name
    }

    /// Screen switches since boot.
    pub fn transitions(&self) -> u32 {
        self.transitions
    }

    fn transition(&mut self, next: Screen, ctx: &mut NavContext) {
        let next_idx = next as usize;
        info!(
            "Screen: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );
        self.current = next_idx;
        self.transitions = self.transitions.wrapping_add(1);
        if let Some(enter) = self.table[next_idx].on_enter {
            enter(ctx);
        }
    }
}
