//! Integration tests for the input → AppService → actuators/display pipeline.
//!
//! These run on the host (x86_64) against the mock adapters in
//! `mock_hw.rs`, with a virtual monotonic clock advanced 100 ms per tick.

use crate::mock_hw::{ActuatorCall, LogSink, MockClock, MockHardware, RecordingDisplay};

use medibox::alert::BuzzerOwner;
use medibox::app::commands::AppCommand;
use medibox::app::events::AppEvent;
use medibox::app::service::AppService;
use medibox::config::SystemConfig;
use medibox::environment::EnvFault;
use medibox::error::{DisplayError, Error};
use medibox::fsm::Screen;
use medibox::input::{Button, InputLatch};
use medibox::remote::{SharedControlParameters, TOPIC_MIN_ANGLE, TOPIC_SENDING_INTERVAL};

const TICK_MS: u64 = 100;

struct Rig {
    app: AppService<'static>,
    input: &'static InputLatch,
    params: &'static SharedControlParameters,
    hw: MockHardware,
    clock: MockClock,
    display: RecordingDisplay,
    sink: LogSink,
    now_ms: u64,
}

impl Rig {
    fn new() -> Self {
        Self::with_config(SystemConfig::default())
    }

    fn with_config(config: SystemConfig) -> Self {
        let input: &'static InputLatch = Box::leak(Box::new(InputLatch::default()));
        let params: &'static SharedControlParameters =
            Box::leak(Box::new(SharedControlParameters::default()));
        let mut rig = Self {
            app: AppService::new(config, input, params),
            input,
            params,
            hw: MockHardware::new(),
            clock: MockClock::at(12, 0, 0),
            display: RecordingDisplay::new(),
            sink: LogSink::new(),
            now_ms: 1_000,
        };
        rig.app
            .start(&mut rig.clock, &mut rig.display, &mut rig.sink)
            .unwrap();
        rig
    }

    fn tick(&mut self) {
        self.now_ms += TICK_MS;
        self.app.tick(
            self.now_ms,
            &mut self.hw,
            &mut self.clock,
            &mut self.display,
            &mut self.sink,
        );
    }

    fn run_ms(&mut self, ms: u64) {
        for _ in 0..ms / TICK_MS {
            self.tick();
        }
    }

    /// A debounced logical press, then one tick.
    fn press(&mut self, button: Button) {
        self.app.handle_command(AppCommand::Press(button), &mut self.sink);
        self.tick();
    }

    fn press_n(&mut self, button: Button, n: usize) {
        for _ in 0..n {
            self.press(button);
        }
    }

    /// A raw ISR edge 250 ms after the previous one, then one tick.
    fn edge(&mut self, button: Button) -> bool {
        self.now_ms += 250;
        let accepted = self.input.on_edge(button, self.now_ms as u32);
        self.tick();
        accepted
    }

    /// From ShowTime: program alarm `index` to hh:mm and return to ShowTime.
    fn set_alarm(&mut self, index: usize, hour: u8, minute: u8) {
        assert_eq!(self.app.screen(), Screen::ShowTime);
        self.press(Button::Right);
        self.press_n(Button::Down, index);
        self.press(Button::Right);
        assert_eq!(self.app.screen(), Screen::SetAlarmHour);
        let current = self.app.alarms().alarm(index).unwrap();
        let (h0, m0) = (current.hour, current.minute);
        self.press_n(Button::Up, usize::from((hour + 24 - h0) % 24));
        self.press(Button::Right);
        self.press_n(Button::Up, usize::from((minute + 60 - m0) % 60));
        self.press(Button::Right);
        assert_eq!(self.app.screen(), Screen::MainMenu);
        self.press(Button::Left);
        assert_eq!(self.app.screen(), Screen::ShowTime);
    }

    fn ring_alarm_one_at_0730(&mut self) {
        self.press(Button::Right);
        self.set_alarm(0, 7, 30);
        self.clock.set(7, 30, 0);
        self.tick();
        assert_eq!(self.app.screen(), Screen::AlarmTriggered);
    }
}

// ── Lifecycle ─────────────────────────────────────────────────

#[test]
fn start_shows_welcome_and_emits_started() {
    let rig = Rig::new();
    assert_eq!(rig.app.screen(), Screen::Welcome);
    assert_eq!(rig.sink.events[0], AppEvent::Started(Screen::Welcome));
    assert!(rig.display.last_text().contains("MEDIBOX"));
    assert_eq!(rig.clock.offsets, vec![19_800]);
}

#[test]
fn display_failure_is_fatal_at_start() {
    let input = Box::leak(Box::new(InputLatch::default()));
    let params = Box::leak(Box::new(SharedControlParameters::default()));
    let mut app = AppService::new(SystemConfig::default(), input, params);
    let mut display = RecordingDisplay::new();
    display.fail_init = true;
    let res = app.start(&mut MockClock::at(0, 0, 0), &mut display, &mut LogSink::new());
    assert_eq!(res, Err(Error::Display(DisplayError::NotResponding(0x3C))));
    assert!(display.views.is_empty());
}

#[test]
fn every_tick_renders_exactly_once() {
    let mut rig = Rig::new();
    let before = rig.display.views.len();
    rig.run_ms(1_000);
    assert_eq!(rig.display.views.len() - before, 10);
}

// ── Navigation through the ISR path ───────────────────────────

#[test]
fn isr_edges_drive_navigation() {
    let mut rig = Rig::new();
    assert!(rig.edge(Button::Right));
    assert_eq!(rig.app.screen(), Screen::ShowTime);
    assert!(rig.edge(Button::Right));
    assert_eq!(rig.app.screen(), Screen::MainMenu);
    assert!(rig.edge(Button::Left));
    assert_eq!(rig.app.screen(), Screen::ShowTime);
}

#[test]
fn edges_inside_debounce_window_yield_one_press() {
    let mut rig = Rig::new();
    rig.now_ms += 1_000;
    let t = rig.now_ms as u32;
    assert!(rig.input.on_edge(Button::Right, t));
    assert!(!rig.input.on_edge(Button::Left, t + 150));
    rig.tick();
    assert_eq!(rig.app.screen(), Screen::ShowTime);
}

#[test]
fn menu_cursor_three_opens_view_alarms_at_first_entry() {
    let mut rig = Rig::new();
    rig.press(Button::Right);
    rig.press(Button::Right);
    rig.press(Button::Up);
    assert_eq!(rig.app.navigation().menu_cursor, 3);
    rig.press(Button::Right);
    assert_eq!(rig.app.screen(), Screen::ViewAlarms);
    assert_eq!(rig.app.navigation().view_cursor, 0);
}

#[test]
fn minute_editor_wraps_from_59_to_0() {
    let mut rig = Rig::new();
    rig.press(Button::Right);
    rig.press(Button::Right);
    rig.press(Button::Right);
    rig.press(Button::Right);
    assert_eq!(rig.app.screen(), Screen::SetAlarmMinute);
    rig.press(Button::Down);
    assert_eq!(rig.app.alarms().alarm(0).unwrap().minute, 59);
    rig.press(Button::Up);
    assert_eq!(rig.app.alarms().alarm(0).unwrap().minute, 0);
}

#[test]
fn timezone_edit_reaches_the_clock() {
    let mut rig = Rig::new();
    rig.press(Button::Right);
    rig.press(Button::Right);
    rig.press_n(Button::Down, 2);
    rig.press(Button::Right);
    assert_eq!(rig.app.screen(), Screen::SetTimezone);
    rig.press(Button::Up);
    assert_eq!(rig.app.navigation().utc_offset_secs, 21_600);
    assert_eq!(rig.clock.offsets.last(), Some(&21_600));
    assert!(rig.display.last_text().contains("UTC+06:00"));
}

#[test]
fn confirm_delete_clears_second_alarm() {
    let mut rig = Rig::new();
    rig.press(Button::Right);
    rig.set_alarm(1, 7, 30);
    assert!(rig.app.alarms().alarm(1).unwrap().is_active());

    rig.press(Button::Right);
    rig.press(Button::Up);
    rig.press(Button::Right);
    assert_eq!(rig.app.screen(), Screen::ViewAlarms);
    rig.press(Button::Down);
    rig.press(Button::Right);
    assert_eq!(rig.app.screen(), Screen::ConfirmDelete);
    rig.press(Button::Up);

    assert_eq!(rig.app.screen(), Screen::ViewAlarms);
    let a = rig.app.alarms().alarm(1).unwrap();
    assert!(!a.is_active());
    assert!(!a.is_ringing());
    assert!(!a.is_snoozed());
}

// ── Alarms ────────────────────────────────────────────────────

#[test]
fn alarm_rings_at_exact_minute_once() {
    let mut rig = Rig::new();
    rig.press(Button::Right);
    rig.set_alarm(0, 7, 30);

    rig.clock.set(7, 29, 59);
    rig.tick();
    assert_eq!(rig.app.screen(), Screen::ShowTime);

    rig.clock.set(7, 30, 0);
    rig.tick();
    assert_eq!(rig.app.screen(), Screen::AlarmTriggered);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::AlarmTriggered(0))), 1);
    assert!(rig.hw.buzzer_on());
    assert!(rig.display.last_text().contains("ALARM 1"));

    rig.press(Button::Right);
    assert_eq!(rig.app.screen(), Screen::ShowTime);
    assert_eq!(rig.sink.count(|e| *e == AppEvent::AlarmStopped), 1);

    rig.clock.set(7, 30, 40);
    rig.run_ms(2_000);
    assert_eq!(rig.app.screen(), Screen::ShowTime);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::AlarmTriggered(_))), 1);
}

#[test]
fn alarm_preempts_any_screen() {
    let mut rig = Rig::new();
    rig.press(Button::Right);
    rig.set_alarm(0, 7, 30);
    rig.press(Button::Right);
    rig.press_n(Button::Down, 2);
    rig.press(Button::Right);
    assert_eq!(rig.app.screen(), Screen::SetTimezone);

    rig.clock.set(7, 30, 0);
    rig.tick();
    assert_eq!(rig.app.screen(), Screen::AlarmTriggered);
    assert!(rig.sink.events.contains(&AppEvent::ScreenChanged {
        from: Screen::SetTimezone,
        to: Screen::AlarmTriggered,
    }));
}

#[test]
fn snooze_round_trip_rearms_to_current_time() {
    let mut rig = Rig::new();
    rig.ring_alarm_one_at_0730();

    // The press is handled before the tick advances the clock.
    let snoozed_at = rig.now_ms;
    rig.press(Button::Down);
    assert_eq!(rig.app.screen(), Screen::ShowTime);
    assert!(rig.sink.events.contains(&AppEvent::AlarmSnoozed {
        alarm: 0,
        until_ms: snoozed_at + 120_000,
    }));
    assert!(!rig.hw.buzzer_on());

    rig.clock.set(7, 32, 0);
    while rig.now_ms + TICK_MS < snoozed_at + 120_000 {
        rig.tick();
        assert_eq!(rig.app.screen(), Screen::ShowTime);
    }
    rig.tick();
    assert_eq!(rig.app.screen(), Screen::AlarmTriggered);
    let a = rig.app.alarms().alarm(0).unwrap();
    assert_eq!((a.hour, a.minute), (7, 32));
    assert!(a.is_ringing());
    assert!(!a.is_snoozed());
}

#[test]
fn snooze_walks_through_both_ringing_alarms() {
    let mut rig = Rig::new();
    rig.press(Button::Right);
    rig.set_alarm(0, 7, 30);
    rig.set_alarm(1, 7, 30);
    rig.clock.set(7, 30, 0);
    rig.tick();
    assert_eq!(rig.app.screen(), Screen::AlarmTriggered);
    assert!(rig.display.last_text().contains("ALARM 1"));

    rig.press(Button::Down);
    assert_eq!(rig.app.screen(), Screen::AlarmTriggered);
    assert!(rig.display.last_text().contains("ALARM 2"));
    assert_eq!(rig.app.alert_output().owner, BuzzerOwner::Alarm);

    rig.press(Button::Down);
    assert_eq!(rig.app.screen(), Screen::ShowTime);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::AlarmSnoozed { .. })), 2);
    assert!(rig.app.alarms().alarms().iter().all(|a| a.is_snoozed()));
}

#[test]
fn stop_intent_is_honoured_on_fast_path() {
    let mut rig = Rig::new();
    rig.ring_alarm_one_at_0730();

    rig.now_ms += 250;
    assert!(rig.input.on_edge(Button::Right, rig.now_ms as u32));
    rig.app.alarm_fast_path(
        rig.now_ms + 50,
        &mut rig.hw,
        &rig.clock,
        &mut rig.display,
        &mut rig.sink,
    );
    assert_eq!(rig.app.screen(), Screen::ShowTime);
    assert!(!rig.hw.buzzer_on());
    assert_eq!(rig.sink.count(|e| *e == AppEvent::AlarmStopped), 1);

    // The edge was spent on Stop; it must not also open the menu.
    rig.tick();
    assert_eq!(rig.app.screen(), Screen::ShowTime);
}

#[test]
fn snooze_intent_is_not_replayed_as_menu_press() {
    let mut rig = Rig::new();
    rig.ring_alarm_one_at_0730();

    assert!(rig.edge(Button::Down));
    assert_eq!(rig.app.screen(), Screen::ShowTime);
    assert!(rig.app.alarms().alarm(0).unwrap().is_snoozed());
    rig.tick();
    assert_eq!(rig.app.screen(), Screen::ShowTime);
}

#[test]
fn fast_path_is_idle_off_alarm_screen() {
    let mut rig = Rig::new();
    let views = rig.display.views.len();
    rig.app.alarm_fast_path(
        rig.now_ms,
        &mut rig.hw,
        &rig.clock,
        &mut rig.display,
        &mut rig.sink,
    );
    assert_eq!(rig.display.views.len(), views);
}

#[test]
fn beep_pattern_overrides_environment_tone() {
    let mut rig = Rig::new();
    rig.hw.temperature_c = 35.0;
    rig.ring_alarm_one_at_0730();

    let mut levels = Vec::new();
    for _ in 0..20 {
        rig.tick();
        levels.push(rig.app.alert_output().buzzer_on);
    }
    assert!(levels.iter().any(|on| *on));
    assert!(levels.iter().any(|on| !*on));
    // 500 ms half-period at 100 ms ticks.
    let changes = levels.windows(2).filter(|w| w[0] != w[1]).count();
    assert!((3..=4).contains(&changes), "{levels:?}");
}

// ── Environment ───────────────────────────────────────────────

#[test]
fn high_temperature_raises_warning() {
    let mut rig = Rig::new();
    rig.hw.temperature_c = 35.0;
    rig.hw.humidity_pct = 70.0;
    rig.press(Button::Right);

    assert!(rig.app.environment().warning);
    assert!(rig.app.environment().has_fault(EnvFault::HighTemperature));
    assert!(rig.sink.events.contains(&AppEvent::EnvironmentWarning(EnvFault::HighTemperature.mask())));
    assert!(rig.hw.buzzer_on());
    assert!(rig.display.last_text().contains("HIGH TEMP!"));

    // LED blinks while the warning holds.
    rig.hw.clear();
    rig.run_ms(1_500);
    let led: Vec<bool> = rig
        .hw
        .calls
        .iter()
        .filter_map(|c| match c {
            ActuatorCall::Led(on) => Some(*on),
            _ => None,
        })
        .collect();
    assert!(led.contains(&true) && led.contains(&false));
}

#[test]
fn warning_clears_on_next_sample() {
    let mut rig = Rig::new();
    rig.hw.temperature_c = 35.0;
    rig.tick();
    assert!(rig.app.environment().warning);

    rig.hw.temperature_c = 28.0;
    rig.run_ms(2_000);
    assert!(!rig.app.environment().warning);
    assert_eq!(rig.sink.count(|e| *e == AppEvent::EnvironmentCleared), 1);
    assert!(!rig.hw.buzzer_on());
    assert!(rig.hw.led_on());
}

#[test]
fn sensor_fault_degrades_to_warning() {
    let mut rig = Rig::new();
    rig.hw.temperature_c = f32::NAN;
    rig.press(Button::Right);
    assert!(rig.app.environment().has_fault(EnvFault::SensorFault));
    assert!(rig.hw.buzzer_on());
    assert!(rig.display.last_text().contains("SENSOR ERR!"));
}

// ── Shade control and remote parameters ───────────────────────

#[test]
fn servo_rests_at_min_angle_and_follows_remote_update() {
    let mut rig = Rig::new();
    rig.tick();
    assert_eq!(rig.hw.servo_angle(), Some(30.0));

    rig.params.apply_message(TOPIC_MIN_ANGLE, b"45").unwrap();
    rig.tick();
    assert_eq!(rig.hw.servo_angle(), Some(45.0));
}

#[test]
fn light_average_published_per_sending_window() {
    let mut rig = Rig::new();
    rig.params.apply_message(TOPIC_SENDING_INTERVAL, b"1").unwrap();
    rig.run_ms(60_000);
    let averages: Vec<f32> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::LightAverage(v) => Some(*v),
            _ => None,
        })
        .collect();
    assert_eq!(averages.len(), 1);
    assert!((averages[0] - (1.0 - 2048.0 / 4095.0)).abs() < 1e-4);
}

#[test]
fn light_control_can_be_disabled() {
    let config = SystemConfig {
        light_control_enabled: false,
        ..SystemConfig::default()
    };
    let mut rig = Rig::with_config(config);
    rig.run_ms(1_000);
    assert_eq!(rig.hw.servo_angle(), None);
}

// ── Telemetry ─────────────────────────────────────────────────

#[test]
fn telemetry_emitted_on_interval_and_serialises() {
    let mut rig = Rig::new();
    rig.press(Button::Right);
    rig.run_ms(60_000);
    let telemetry: Vec<_> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Telemetry(t) => Some(t.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(telemetry.len(), 1);

    let json = serde_json::to_value(&telemetry[0]).unwrap();
    assert_eq!(json["screen"], "ShowTime");
    assert_eq!(json["utc_offset_secs"], 19_800);
    assert_eq!(json["alarms"].as_array().map(Vec::len), Some(2));
}
