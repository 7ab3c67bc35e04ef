//! Screen renderer.
//!
//! [`render`] is a pure function from the navigation state and the domain
//! data to a [`View`]: one variant per [`Screen`], carrying exactly the
//! values that screen shows.  Adding a screen forces a compile error here
//! and in the screen table.
//!
//! [`View::frame`] lays a view out as text lines for the 128×64 panel.
//! Lines marked `large` use the 2× font.

use core::fmt::{self, Write};

use heapless::{String, Vec};

use crate::alarms::{ALARM_COUNT, AlarmRegistry};
use crate::clock::{UtcOffset, WallTime};
use crate::environment::EnvironmentReading;
use crate::fsm::Screen;
use crate::fsm::context::{MENU_ITEMS, NavigationState};

/// Longest line the panel fits at the small font, with margin.
pub const LINE_CAPACITY: usize = 40;
/// Most lines any screen uses.
pub const MAX_LINES: usize = 8;

pub type LineText = String<LINE_CAPACITY>;

/// One text row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: LineText,
    pub large: bool,
}

/// A complete screen.  Replaces the previous frame wholesale.
pub type Frame = Vec<Line, MAX_LINES>;

/// What to draw, per screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    Welcome,
    ShowTime {
        time: WallTime,
        env: EnvironmentReading,
        active: [bool; ALARM_COUNT],
    },
    MainMenu {
        cursor: u8,
    },
    SetAlarmHour {
        alarm: usize,
        hour: u8,
    },
    SetAlarmMinute {
        alarm: usize,
        minute: u8,
    },
    SetTimezone {
        offset_secs: i32,
    },
    ViewAlarms {
        /// `Some((hour, minute))` for active slots.
        alarms: [Option<(u8, u8)>; ALARM_COUNT],
        selection: usize,
    },
    AlarmTriggered {
        time: WallTime,
        env: EnvironmentReading,
        alarm: usize,
    },
    ConfirmDelete {
        alarm: usize,
        hour: u8,
        minute: u8,
    },
}

/// Build the view for `screen`.
pub fn render(
    screen: Screen,
    nav: &NavigationState,
    alarms: &AlarmRegistry,
    env: &EnvironmentReading,
    now: &WallTime,
) -> View {
    let slot = |i: usize| alarms.alarm(i).copied().unwrap_or_default();

    match screen {
        Screen::Welcome => View::Welcome,
        Screen::ShowTime => View::ShowTime {
            time: *now,
            env: *env,
            active: core::array::from_fn(|i| slot(i).is_active()),
        },
        Screen::MainMenu => View::MainMenu {
            cursor: nav.menu_cursor,
        },
        Screen::SetAlarmHour => View::SetAlarmHour {
            alarm: nav.editing_alarm,
            hour: slot(nav.editing_alarm).hour,
        },
        Screen::SetAlarmMinute => View::SetAlarmMinute {
            alarm: nav.editing_alarm,
            minute: slot(nav.editing_alarm).minute,
        },
        Screen::SetTimezone => View::SetTimezone {
            offset_secs: nav.utc_offset_secs,
        },
        Screen::ViewAlarms => View::ViewAlarms {
            alarms: core::array::from_fn(|i| {
                let a = slot(i);
                a.is_active().then_some((a.hour, a.minute))
            }),
            selection: nav.view_selection(),
        },
        Screen::AlarmTriggered => View::AlarmTriggered {
            time: *now,
            env: *env,
            alarm: alarms.ringing_index().unwrap_or(0),
        },
        Screen::ConfirmDelete => {
            let a = slot(nav.view_selection());
            View::ConfirmDelete {
                alarm: nav.view_selection(),
                hour: a.hour,
                minute: a.minute,
            }
        }
    }
}

impl View {
    pub fn screen(&self) -> Screen {
        match self {
            Self::Welcome => Screen::Welcome,
            Self::ShowTime { .. } => Screen::ShowTime,
            Self::MainMenu { .. } => Screen::MainMenu,
            Self::SetAlarmHour { .. } => Screen::SetAlarmHour,
            Self::SetAlarmMinute { .. } => Screen::SetAlarmMinute,
            Self::SetTimezone { .. } => Screen::SetTimezone,
            Self::ViewAlarms { .. } => Screen::ViewAlarms,
            Self::AlarmTriggered { .. } => Screen::AlarmTriggered,
            Self::ConfirmDelete { .. } => Screen::ConfirmDelete,
        }
    }

    /// Lay the view out as text lines.
    pub fn frame(&self) -> Frame {
        let mut f = FrameBuilder::default();
        match self {
            Self::Welcome => {
                f.large(format_args!("MEDIBOX"));
                f.small(format_args!("Press RIGHT to begin"));
            }
            Self::ShowTime { time, env, active } => {
                if env.warning {
                    let mut warn = LineText::new();
                    for fault in env.active_faults() {
                        let _ = write!(warn, "{} ", fault.label());
                    }
                    f.small(format_args!("{}", warn.trim_end()));
                }
                f.large(format_args!("{}", time.hms()));
                f.small(format_args!("{}", time.date()));
                let marker = if env.warning { " !" } else { "" };
                f.small(format_args!(
                    "{:.1}C {:.0}%{marker}",
                    env.temperature_c, env.humidity_pct
                ));
                let mut flags = LineText::new();
                for (i, on) in active.iter().enumerate() {
                    if *on {
                        let _ = write!(flags, "A{} ", i + 1);
                    }
                }
                if !flags.is_empty() {
                    f.small(format_args!("{}", flags.trim_end()));
                }
            }
            Self::MainMenu { cursor } => {
                f.small(format_args!("Main Menu:"));
                for (i, item) in MENU_ITEMS.iter().enumerate() {
                    let mark = if i == usize::from(*cursor) { ">" } else { " " };
                    f.small(format_args!("{mark} {item}"));
                }
                f.small(format_args!("LEFT:Exit RIGHT:Select"));
            }
            Self::SetAlarmHour { alarm, hour } => {
                f.small(format_args!("Set Alarm {} Hour:", alarm + 1));
                f.large(format_args!("{hour:02}"));
                f.small(format_args!("UP/DOWN:Change RIGHT:Next"));
            }
            Self::SetAlarmMinute { alarm, minute } => {
                f.small(format_args!("Set Alarm {} Minute:", alarm + 1));
                f.large(format_args!("{minute:02}"));
                f.small(format_args!("UP/DOWN:Change RIGHT:Save"));
            }
            Self::SetTimezone { offset_secs } => {
                let sign = if *offset_secs < 0 { '-' } else { '+' };
                let abs = offset_secs.unsigned_abs();
                f.small(format_args!("Set Timezone Offset"));
                f.small(format_args!("{}", UtcOffset(*offset_secs)));
                f.small(format_args!("({sign}{}h {:02}m)", abs / 3600, (abs % 3600) / 60));
                f.small(format_args!("UP/DOWN:Change RIGHT:Save"));
            }
            Self::ViewAlarms { alarms, selection } => {
                f.small(format_args!("Active Alarms:"));
                for (i, slot) in alarms.iter().enumerate() {
                    let mark = if i == *selection { ">" } else { " " };
                    match slot {
                        Some((h, m)) => f.small(format_args!("{mark} Alarm {}: {h:02}:{m:02}", i + 1)),
                        None => f.small(format_args!("{mark} Alarm {}: Not set", i + 1)),
                    }
                }
                let deletable = alarms.get(*selection).is_some_and(Option::is_some);
                if deletable {
                    f.small(format_args!("LEFT:Exit RIGHT:Delete"));
                } else {
                    f.small(format_args!("LEFT:Exit"));
                }
            }
            Self::AlarmTriggered { time, env, alarm } => {
                f.small(format_args!(
                    "{} {:.1}C {:.0}%",
                    time.hms(),
                    env.temperature_c,
                    env.humidity_pct
                ));
                f.large(format_args!("ALARM {}", alarm + 1));
                f.small(format_args!("RIGHT: Stop Alarm"));
                f.small(format_args!("DOWN: Snooze (2min)"));
            }
            Self::ConfirmDelete { alarm, hour, minute } => {
                f.small(format_args!("Delete Alarm {}?", alarm + 1));
                f.small(format_args!("{hour:02}:{minute:02}"));
                f.small(format_args!("UP: Yes, DOWN: No"));
            }
        }
        f.finish()
    }
}

#[derive(Default)]
struct FrameBuilder {
    frame: Frame,
}

impl FrameBuilder {
    fn small(&mut self, args: fmt::Arguments<'_>) {
        self.push(args, false);
    }

    fn large(&mut self, args: fmt::Arguments<'_>) {
        self.push(args, true);
    }

    // Overlong text is cut at capacity; extra lines are dropped.
    fn push(&mut self, args: fmt::Arguments<'_>, large: bool) {
        let mut text = LineText::new();
        let _ = text.write_fmt(args);
        let _ = self.frame.push(Line { text, large });
    }

    fn finish(self) -> Frame {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{EnvFault, classify};
    use crate::config::EnvironmentBounds;

    fn texts(view: &View) -> std::vec::Vec<std::string::String> {
        view.frame().iter().map(|l| l.text.as_str().into()).collect()
    }

    fn env(temp: f32, hum: f32) -> EnvironmentReading {
        let faults = classify(temp, hum, &EnvironmentBounds::default());
        EnvironmentReading {
            temperature_c: temp,
            humidity_pct: hum,
            sampled_at_ms: 0,
            faults,
            warning: faults != 0,
        }
    }

    fn registry() -> AlarmRegistry {
        AlarmRegistry::new(120_000)
    }

    #[test]
    fn every_screen_renders_its_own_view() {
        let nav = NavigationState::new(0);
        let reg = registry();
        for i in 0..Screen::COUNT {
            let screen = Screen::from_index(i);
            let view = render(screen, &nav, &reg, &env(28.0, 70.0), &WallTime::default());
            assert_eq!(view.screen(), screen);
            assert!(!view.frame().is_empty());
        }
    }

    #[test]
    fn welcome_banner() {
        assert_eq!(texts(&View::Welcome), ["MEDIBOX", "Press RIGHT to begin"]);
    }

    #[test]
    fn time_screen_without_warning() {
        let view = View::ShowTime {
            time: WallTime::from_epoch_secs(1_710_487_805),
            env: env(28.0, 70.0),
            active: [true, false],
        };
        assert_eq!(
            texts(&view),
            ["07:30:05", "15/03/2024 Fri", "28.0C 70%", "A1"]
        );
        assert!(view.frame()[0].large);
    }

    #[test]
    fn time_screen_lists_each_fault() {
        let reading = env(35.0, 90.0);
        assert!(reading.has_fault(EnvFault::HighTemperature));
        let view = View::ShowTime {
            time: WallTime::default(),
            env: reading,
            active: [false, false],
        };
        let lines = texts(&view);
        assert_eq!(lines[0], "HIGH TEMP! HIGH HUM!");
        assert_eq!(lines[3], "35.0C 90% !");
    }

    #[test]
    fn menu_marks_cursor() {
        let lines = texts(&View::MainMenu { cursor: 3 });
        assert_eq!(lines[1], "  Set Alarm 1");
        assert_eq!(lines[4], "> View Alarms");
    }

    #[test]
    fn timezone_labels() {
        let lines = texts(&View::SetTimezone { offset_secs: -19_800 });
        assert_eq!(lines[1], "UTC-05:30");
        assert_eq!(lines[2], "(-5h 30m)");
    }

    #[test]
    fn view_alarms_offers_delete_only_for_active() {
        let view = View::ViewAlarms {
            alarms: [None, Some((7, 30))],
            selection: 0,
        };
        let lines = texts(&view);
        assert_eq!(lines[1], "> Alarm 1: Not set");
        assert_eq!(lines[2], "  Alarm 2: 07:30");
        assert_eq!(lines[3], "LEFT:Exit");

        let view = View::ViewAlarms {
            alarms: [None, Some((7, 30))],
            selection: 1,
        };
        assert_eq!(texts(&view)[3], "LEFT:Exit RIGHT:Delete");
    }

    #[test]
    fn alarm_screen_names_lowest_ringing() {
        let mut reg = registry();
        for i in 0..ALARM_COUNT {
            let a = reg.alarm_mut(i).unwrap();
            a.hour = 6;
            reg.arm(i);
        }
        reg.evaluate(6, 0, 0);
        let view = render(
            Screen::AlarmTriggered,
            &NavigationState::new(0),
            &reg,
            &env(28.0, 70.0),
            &WallTime::at(6, 0, 1),
        );
        let lines = texts(&view);
        assert_eq!(lines[0], "06:00:01 28.0C 70%");
        assert_eq!(lines[1], "ALARM 1");
        assert_eq!(lines[3], "DOWN: Snooze (2min)");
    }

    #[test]
    fn confirm_delete_shows_selected_time() {
        let mut reg = registry();
        let a = reg.alarm_mut(1).unwrap();
        a.hour = 7;
        a.minute = 5;
        let mut nav = NavigationState::new(0);
        nav.view_cursor = 1;
        let view = render(Screen::ConfirmDelete, &nav, &reg, &env(28.0, 70.0), &WallTime::default());
        assert_eq!(texts(&view), ["Delete Alarm 2?", "07:05", "UP: Yes, DOWN: No"]);
    }
}
