//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the navigator, the alarm registry, the environment
//! monitor, the alert arbiter and the shade controller.  It exposes a
//! clean, hardware-agnostic API.  All I/O flows through port traits
//! injected at call sites, making the entire service testable with mock
//! adapters and a virtual clock.
//!
//! ```text
//!   InputLatch ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!   SensorPort ──▶ │          AppService          │ ──▶ DisplayPort
//!    ClockPort ◀─▶ │ Navigator · Alarms · Env     │
//! ActuatorPort ◀── │ Alert · Shade                │
//!                  └──────────────────────────────┘
//! ```
//!
//! ## Tick order
//!
//! 1. Drain input: alarm intents first, then presses (R, L, U, D).
//! 2. Push a changed UTC offset to the clock.
//! 3. Environment sample (own cadence).
//! 4. Alarm evaluation; a new ring forces the alarm screen.
//! 5. Alert arbiter → buzzer and LED.
//! 6. Shade control → servo, light average publication.
//! 7. Render once, after every mutation has settled.
//! 8. Telemetry (own cadence).

use log::{debug, info, warn};

use crate::alarms::{ALARM_COUNT, AlarmRegistry};
use crate::alert::{AlertArbiter, AlertOutput};
use crate::clock::WallTime;
use crate::config::SystemConfig;
use crate::control::ActuatorController;
use crate::environment::{EnvironmentMonitor, EnvironmentReading};
use crate::error;
use crate::fsm::context::{NavContext, NavigationState};
use crate::fsm::{Navigator, Screen};
use crate::input::{AlarmIntents, Button, InputLatch};
use crate::remote::SharedControlParameters;
use crate::render::{View, render};
use crate::scheduler::Interval;

use super::commands::AppCommand;
use super::events::{AppEvent, TelemetryData};
use super::ports::{ActuatorPort, ClockPort, DisplayPort, EventSink, SensorPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService<'a> {
    config: SystemConfig,
    input: &'a InputLatch,
    params: &'a SharedControlParameters,
    navigator: Navigator,
    ctx: NavContext,
    environment: EnvironmentMonitor,
    alert: AlertArbiter,
    shade: ActuatorController,
    telemetry: Interval,
    /// Offset last handed to the clock.
    pushed_offset: Option<i32>,
    tick_count: u64,
}

impl<'a> AppService<'a> {
    /// Construct the service from configuration and the two blocks shared
    /// with asynchronous producers (button ISR, network callback).
    ///
    /// Does **not** touch hardware; call [`start`](Self::start) next.
    /// The latch takes its debounce window from `config` here.
    pub fn new(
        config: SystemConfig,
        input: &'a InputLatch,
        params: &'a SharedControlParameters,
    ) -> Self {
        input.set_debounce_ms(config.debounce_window_ms);
        let ctx = NavContext::new(
            AlarmRegistry::new(config.snooze_duration_ms),
            config.default_utc_offset_secs,
        );
        let environment = EnvironmentMonitor::new(config.bounds, config.env_check_interval_ms);
        let alert = AlertArbiter::new(config.led_blink_interval_ms, config.buzzer_beep_interval_ms);
        let shade = ActuatorController::new(&params.snapshot());

        Self {
            config,
            input,
            params,
            navigator: Navigator::default(),
            ctx,
            environment,
            alert,
            shade,
            telemetry: Interval::starting_at(0),
            pushed_offset: None,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Bring up the display, push the initial offset, show the welcome
    /// screen.  A display failure is returned and is fatal to the caller.
    pub fn start(
        &mut self,
        clock: &mut impl ClockPort,
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) -> error::Result<()> {
        display.init()?;
        self.sync_utc_offset(clock);
        self.navigator.start(&mut self.ctx);
        self.sync_alarm_screen();
        display.render(&self.view(&clock.now()));
        sink.emit(&AppEvent::Started(self.navigator.screen()));
        info!("AppService started on {:?}", self.navigator.screen());
        Ok(())
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle (see the module docs for the order).
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`]; this avoids a double mutable borrow while keeping
    /// the port boundary explicit.
    pub fn tick(
        &mut self,
        now_ms: u64,
        hw: &mut (impl SensorPort + ActuatorPort),
        clock: &mut impl ClockPort,
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;
        self.ctx.now_ms = now_ms;

        // 1. Input
        let batch = self.input.drain();
        self.apply_intents(batch.intents, sink);
        for button in batch.presses() {
            self.dispatch(button, sink);
        }

        // 2. Timezone
        self.sync_utc_offset(clock);

        // 3. Environment
        let before = self.environment.reading().faults;
        if let Some(reading) = self.environment.poll(now_ms, hw) {
            if reading.faults != 0 && reading.faults != before {
                sink.emit(&AppEvent::EnvironmentWarning(reading.faults));
            } else if reading.faults == 0 && before != 0 {
                sink.emit(&AppEvent::EnvironmentCleared);
            }
        }

        // 4. Alarms
        let now = clock.now();
        if let Some(index) = self.ctx.alarms.evaluate(now.hour, now.minute, now_ms) {
            sink.emit(&AppEvent::AlarmTriggered(index));
            self.force_screen(Screen::AlarmTriggered, sink);
        }

        // 5. Alerts
        self.drive_alerts(now_ms, hw);

        // 6. Shade
        if self.config.light_control_enabled {
            let params = self.params.snapshot();
            let light_raw = hw.read_light_raw();
            let temperature_c = self.environment.reading().temperature_c;
            let outcome = self.shade.poll(now_ms, &params, light_raw, temperature_c);
            hw.set_servo_angle(outcome.angle_deg);
            if let Some(sample) = outcome.sampled {
                debug!("Light sample {sample:.4} (raw {light_raw})");
            }
            if let Some(avg) = outcome.average {
                sink.emit(&AppEvent::LightAverage(avg));
            }
        }

        // 7. Render
        display.render(&self.view(&now));

        // 8. Telemetry
        let period_ms = u64::from(self.config.telemetry_interval_secs) * 1000;
        if self.telemetry.poll(now_ms, period_ms) {
            sink.emit(&AppEvent::Telemetry(self.build_telemetry(now_ms, &now)));
        }
    }

    /// Between ticks while an alarm rings: honour Stop/Snooze intents at
    /// once and refresh the beep and the alarm screen.  No-op on any other
    /// screen.
    pub fn alarm_fast_path(
        &mut self,
        now_ms: u64,
        hw: &mut impl ActuatorPort,
        clock: &impl ClockPort,
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) {
        if self.navigator.screen() != Screen::AlarmTriggered {
            return;
        }
        self.ctx.now_ms = now_ms;
        let intents = self.input.take_intents();
        self.apply_intents(intents, sink);
        self.drive_alerts(now_ms, hw);
        display.render(&self.view(&clock.now()));
    }

    // ── Command handling ──────────────────────────────────────

    /// Process one external command.
    pub fn handle_command(&mut self, cmd: AppCommand, sink: &mut impl EventSink) {
        match cmd {
            AppCommand::StopAlarm | AppCommand::SnoozeAlarm
                if self.navigator.screen() != Screen::AlarmTriggered =>
            {
                debug!("{cmd:?} ignored: alarm screen not showing");
            }
            AppCommand::StopAlarm => self.dispatch(Button::Right, sink),
            AppCommand::SnoozeAlarm => self.dispatch(Button::Down, sink),
            AppCommand::Press(button) => self.dispatch(button, sink),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot from the current state.
    pub fn build_telemetry(&self, now_ms: u64, now: &WallTime) -> TelemetryData {
        let env = self.environment.reading();
        let alert = self.alert.output();
        TelemetryData {
            uptime_ms: now_ms,
            screen: self.navigator.screen(),
            time: *now,
            utc_offset_secs: self.ctx.nav.utc_offset_secs,
            temperature_c: env.temperature_c,
            humidity_pct: env.humidity_pct,
            env_faults: env.faults,
            alarms: *self.ctx.alarms.alarms(),
            buzzer_on: alert.buzzer_on,
            led_on: alert.led_on,
            servo_angle_deg: self.shade.angle_deg(),
        }
    }

    /// The view the display would show at `now`.
    pub fn view(&self, now: &WallTime) -> View {
        render(
            self.navigator.screen(),
            &self.ctx.nav,
            &self.ctx.alarms,
            self.environment.reading(),
            now,
        )
    }

    pub fn screen(&self) -> Screen {
        self.navigator.screen()
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.ctx.nav
    }

    pub fn alarms(&self) -> &AlarmRegistry {
        &self.ctx.alarms
    }

    pub fn environment(&self) -> &EnvironmentReading {
        self.environment.reading()
    }

    pub fn alert_output(&self) -> AlertOutput {
        self.alert.output()
    }

    pub fn servo_angle(&self) -> f32 {
        self.shade.angle_deg()
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn apply_intents(&mut self, intents: AlarmIntents, sink: &mut impl EventSink) {
        if intents.stop {
            self.handle_command(AppCommand::StopAlarm, sink);
        }
        if intents.snooze {
            self.handle_command(AppCommand::SnoozeAlarm, sink);
        }
    }

    /// Route one press through the navigator and report what it did.
    fn dispatch(&mut self, button: Button, sink: &mut impl EventSink) {
        let from = self.navigator.screen();
        let ringing = self.ctx.alarms.ringing_index();

        if let Some(to) = self.navigator.handle_press(button, &mut self.ctx) {
            sink.emit(&AppEvent::ScreenChanged { from, to });
        }

        if from == Screen::AlarmTriggered {
            match (button, ringing) {
                (Button::Right, Some(_)) => sink.emit(&AppEvent::AlarmStopped),
                (Button::Down, Some(alarm)) => {
                    if let Some(a) = self.ctx.alarms.alarm(alarm).filter(|a| a.is_snoozed()) {
                        sink.emit(&AppEvent::AlarmSnoozed {
                            alarm,
                            until_ms: a.snooze_deadline_ms(),
                        });
                    }
                }
                _ => {}
            }
        }
        self.sync_alarm_screen();
    }

    fn force_screen(&mut self, to: Screen, sink: &mut impl EventSink) {
        let from = self.navigator.screen();
        if self.navigator.force(to, &mut self.ctx) {
            sink.emit(&AppEvent::ScreenChanged { from, to });
        }
        self.sync_alarm_screen();
    }

    fn drive_alerts(&mut self, now_ms: u64, hw: &mut impl ActuatorPort) {
        let out = self.alert.update(
            now_ms,
            self.environment.warning(),
            self.ctx.alarms.any_ringing(),
        );
        hw.set_buzzer(out.buzzer_on);
        hw.set_led(out.led_on);
    }

    fn sync_alarm_screen(&self) {
        self.input
            .set_alarm_screen(self.navigator.screen() == Screen::AlarmTriggered);
    }

    fn sync_utc_offset(&mut self, clock: &mut impl ClockPort) {
        let offset = self.ctx.nav.utc_offset_secs;
        if self.pushed_offset != Some(offset) {
            clock.set_utc_offset(offset);
            self.pushed_offset = Some(offset);
            info!("UTC offset set to {offset} s");
        }
    }
}

/// Alarms are exactly two; compile-time check for the telemetry array.
const _: () = assert!(ALARM_COUNT == 2);
