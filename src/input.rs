//! ISR-fed input latch with a global debounce window.
//!
//! ## Hardware
//!
//! Four active-low momentary switches (Up, Left, Down, Right) with pull-ups.
//! Each GPIO fires on its falling edge and the ISR calls
//! [`InputLatch::on_edge`].  The main loop calls [`InputLatch::drain`] once
//! per control tick.
//!
//! ## Debounce
//!
//! There is **one** "last accepted edge" timestamp shared by all four
//! buttons.  An edge is accepted only when at least the debounce window has
//! elapsed since the previous accepted edge of *any* button, so a bounce on
//! one switch also masks a press on another.  Navigation relies on this:
//! at most one logical press is produced per window, and the window is
//! longer than a control tick.
//!
//! ## Field ownership
//!
//! | Field            | Written by                     | Read by     |
//! |------------------|--------------------------------|-------------|
//! | `debounce_ms`    | main loop (at start-up)        | ISR         |
//! | `last_accept_ms` | ISR (compare-exchange)         | ISR         |
//! | `pressed[b]`     | ISR sets, main loop clears     | main loop   |
//! | `stop_intent`    | ISR sets, main loop clears     | main loop   |
//! | `snooze_intent`  | ISR sets, main loop clears     | main loop   |
//! | `alarm_screen`   | main loop                      | ISR         |
//!
//! Every access is a single atomic operation; nothing here blocks.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Default spacing between accepted edges.
pub const DEFAULT_DEBOUNCE_MS: u32 = 200;

/// Front-panel buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Button {
    Up = 0,
    Left = 1,
    Down = 2,
    Right = 3,
}

impl Button {
    pub const COUNT: usize = 4;

    /// Order in which drained presses are handed to navigation.
    pub const DISPATCH_ORDER: [Button; Button::COUNT] =
        [Button::Right, Button::Left, Button::Up, Button::Down];

    pub fn name(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Left => "LEFT",
            Self::Down => "DOWN",
            Self::Right => "RIGHT",
        }
    }
}

/// Immediate alarm actions raised from the edge handler while the alarm
/// screen is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlarmIntents {
    pub stop: bool,
    pub snooze: bool,
}

impl AlarmIntents {
    pub fn any(&self) -> bool {
        self.stop || self.snooze
    }
}

/// Everything the ISR published since the previous drain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputBatch {
    pressed: [bool; Button::COUNT],
    pub intents: AlarmIntents,
}

impl InputBatch {
    pub fn is_pressed(&self, button: Button) -> bool {
        self.pressed[button as usize]
    }

    /// Pressed buttons in dispatch order.
    pub fn presses(&self) -> impl Iterator<Item = Button> + '_ {
        Button::DISPATCH_ORDER
            .into_iter()
            .filter(|b| self.pressed[*b as usize])
    }

    pub fn is_empty(&self) -> bool {
        !self.pressed.iter().any(|p| *p) && !self.intents.any()
    }
}

/// Lock-free mailbox between the button ISRs and the control loop.
///
/// Const-constructible so the firmware can keep it in a `static` that the
/// ISR reaches without a handle.
pub struct InputLatch {
    debounce_ms: AtomicU32,
    last_accept_ms: AtomicU32,
    pressed: [AtomicBool; Button::COUNT],
    stop_intent: AtomicBool,
    snooze_intent: AtomicBool,
    alarm_screen: AtomicBool,
}

impl Default for InputLatch {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

impl InputLatch {
    pub const fn new(debounce_ms: u32) -> Self {
        Self {
            debounce_ms: AtomicU32::new(debounce_ms),
            last_accept_ms: AtomicU32::new(0),
            pressed: [
                AtomicBool::new(false),
                AtomicBool::new(false),
                AtomicBool::new(false),
                AtomicBool::new(false),
            ],
            stop_intent: AtomicBool::new(false),
            snooze_intent: AtomicBool::new(false),
            alarm_screen: AtomicBool::new(false),
        }
    }

    /// Edge handler.  Safe to call from interrupt context.
    ///
    /// `now_ms` is the monotonic uptime truncated to `u32` (wraps after
    /// ~49 days; the elapsed-time check uses wrapping arithmetic).
    /// Returns `true` if the edge was accepted.
    pub fn on_edge(&self, button: Button, now_ms: u32) -> bool {
        let last = self.last_accept_ms.load(Ordering::Acquire);
        if now_ms.wrapping_sub(last) < self.debounce_ms.load(Ordering::Relaxed) {
            return false;
        }
        // Two ISRs racing inside the same window: only one may claim it.
        if self
            .last_accept_ms
            .compare_exchange(last, now_ms, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        self.pressed[button as usize].store(true, Ordering::Release);
        if self.alarm_screen.load(Ordering::Acquire) {
            match button {
                Button::Right => self.stop_intent.store(true, Ordering::Release),
                Button::Down => self.snooze_intent.store(true, Ordering::Release),
                Button::Up | Button::Left => {}
            }
        }
        true
    }

    /// Take the pending alarm intents.
    ///
    /// The press that raised an intent is consumed with it, so the same
    /// edge is never acted on twice (once as Stop, once as a menu press on
    /// the screen Stop returns to).
    pub fn take_intents(&self) -> AlarmIntents {
        let stop = self.stop_intent.swap(false, Ordering::AcqRel);
        if stop {
            self.pressed[Button::Right as usize].store(false, Ordering::Release);
        }
        let snooze = self.snooze_intent.swap(false, Ordering::AcqRel);
        if snooze {
            self.pressed[Button::Down as usize].store(false, Ordering::Release);
        }
        AlarmIntents { stop, snooze }
    }

    /// Take everything pending.  Each flag is handed out at most once.
    pub fn drain(&self) -> InputBatch {
        let intents = self.take_intents();
        let mut pressed = [false; Button::COUNT];
        for (slot, flag) in pressed.iter_mut().zip(self.pressed.iter()) {
            *slot = flag.swap(false, Ordering::AcqRel);
        }
        InputBatch { pressed, intents }
    }

    /// Tell the ISR whether the alarm screen is up.  Main loop only.
    pub fn set_alarm_screen(&self, showing: bool) {
        self.alarm_screen.store(showing, Ordering::Release);
    }

    /// Replace the debounce window.  Applies from the next edge on.
    pub fn set_debounce_ms(&self, window_ms: u32) {
        self.debounce_ms.store(window_ms, Ordering::Relaxed);
    }

    pub fn debounce_ms(&self) -> u32 {
        self.debounce_ms.load(Ordering::Relaxed)
    }
}
