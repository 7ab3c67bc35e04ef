//! Medibox Firmware: Main Entry Point
//!
//! Hexagonal architecture around a single cooperative control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   SystemClock   OledDisplay    │
//! │  (Sensor+Actuator) (EventSink)    (ClockPort)   (DisplayPort)  │
//! │  RemoteLink        button ISRs ──▶ InputLatch (static)         │
//! │  (EventSink)       broker ──────▶ SharedControlParameters      │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Navigator · Alarms · Environment · Alert · Shade      │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! On the host the board is simulated: stdin lines press buttons, inject
//! sensor values and deliver remote parameter messages (type `help`).
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info};

use medibox::adapters::log_sink::LogEventSink;
use medibox::adapters::remote_link::{self, RemoteLink};
use medibox::adapters::time::SystemClock;
use medibox::app::service::AppService;
use medibox::config::{ControlParameters, SystemConfig};
use medibox::drivers::button::BUTTONS;
use medibox::fsm::Screen;
use medibox::remote::SharedControlParameters;

/// Shade-control parameters, written by the broker callback.
static PARAMS: SharedControlParameters = SharedControlParameters::new(ControlParameters::DEFAULT);

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Bootstrap logging ──────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }
    #[cfg(not(target_os = "espidf"))]
    host::init_logger();

    info!("╔══════════════════════════════════════╗");
    info!("║  Medibox v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = SystemConfig::default();

    // ── 2. Board bring-up ─────────────────────────────────────
    #[cfg(target_os = "espidf")]
    let (mut hw, mut display) = board::bring_up()?;
    #[cfg(not(target_os = "espidf"))]
    let (mut hw, mut display) = host::bring_up();
    #[cfg(not(target_os = "espidf"))]
    host::spawn_console(&PARAMS);

    // ── 3. Adapters + app service ─────────────────────────────
    let mut clock = SystemClock::new(config.default_utc_offset_secs);
    let mut sink = (LogEventSink::new(), RemoteLink::new());
    let mut app = AppService::new(config.clone(), &BUTTONS, &PARAMS);

    app.start(&mut clock, &mut display, &mut sink)
        .context("display bring-up failed, halting")?;

    if !clock.is_synced() {
        info!("Wall clock not synchronised yet; alarms follow the local RTC");
    }
    for topic in remote_link::subscriptions() {
        info!("Remote parameter topic: {topic}");
    }
    info!("System ready. Entering control loop.");

    // ── 4. Control loop ───────────────────────────────────────
    let tick = u64::from(config.tick_interval_ms);
    let refresh = u64::from(config.alarm_refresh_interval_ms).clamp(1, tick.max(1));

    loop {
        let now_ms = clock.uptime_ms();
        app.tick(now_ms, &mut hw, &mut clock, &mut display, &mut sink);

        // The broker transport is an external collaborator; until it
        // takes the outbox, publishes are logged and discarded.
        while let Some(msg) = sink.1.pop_outbound() {
            debug!("PUBLISH | {} {}", msg.topic, msg.payload);
        }

        // While an alarm rings, sleep in short slices so Stop/Snooze and
        // the beep pattern are not held back by the tick.
        if app.screen() == Screen::AlarmTriggered {
            let mut slept = 0;
            while slept < tick {
                std::thread::sleep(Duration::from_millis(refresh));
                slept += refresh;
                app.alarm_fast_path(clock.uptime_ms(), &mut hw, &clock, &mut display, &mut sink);
            }
        } else {
            std::thread::sleep(Duration::from_millis(tick));
        }
    }
}

// ── ESP32 board ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod board {
    use anyhow::{Result, anyhow};
    use esp_idf_svc::hal::gpio::{Gpio2, Gpio18, Output, PinDriver};
    use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_svc::hal::ledc::config::TimerConfig;
    use esp_idf_svc::hal::ledc::{LedcDriver, LedcTimerDriver, Resolution};
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::prelude::*;

    use medibox::adapters::display::OledDisplay;
    use medibox::adapters::hardware::HardwareAdapter;
    use medibox::drivers::button;
    use medibox::drivers::buzzer::Buzzer;
    use medibox::drivers::servo::{SERVO_PWM_FREQ_HZ, Servo};
    use medibox::drivers::status_led::StatusLed;
    use medibox::pins;
    use medibox::sensors::SensorHub;
    use medibox::sensors::dht::DhtSensor;
    use medibox::sensors::ldr::LdrSensor;

    pub type BoardHardware = HardwareAdapter<
        PinDriver<'static, Gpio2, Output>,
        PinDriver<'static, Gpio18, Output>,
        LedcDriver<'static>,
    >;

    /// Take the peripherals and build every driver.  Pin numbers here must
    /// agree with [`pins`].
    pub fn bring_up() -> Result<(BoardHardware, OledDisplay<I2cDriver<'static>>)> {
        let p = Peripherals::take()?;

        let buzzer = Buzzer::new(PinDriver::output(p.pins.gpio2)?);
        let led = StatusLed::new(PinDriver::output(p.pins.gpio18)?);

        let timer = LedcTimerDriver::new(
            p.ledc.timer0,
            &TimerConfig::new()
                .frequency(SERVO_PWM_FREQ_HZ.Hz().into())
                .resolution(Resolution::Bits14),
        )?;
        let servo = Servo::new(LedcDriver::new(p.ledc.channel0, timer, p.pins.gpio13)?);

        let ldr = LdrSensor::new(pins::LDR_ADC1_CHANNEL)
            .map_err(|rc| anyhow!("LDR ADC init failed (rc={rc})"))?;
        let sensors = SensorHub::new(DhtSensor::new(pins::DHT_GPIO), ldr);

        button::init_button_isrs().map_err(|rc| anyhow!("button ISR install failed (rc={rc})"))?;

        let i2c = I2cDriver::new(
            p.i2c0,
            p.pins.gpio22,
            p.pins.gpio21,
            &I2cConfig::new().baudrate(400.kHz().into()),
        )?;

        Ok((
            HardwareAdapter::new(sensors, buzzer, led, servo),
            OledDisplay::new(i2c),
        ))
    }
}

// ── Host simulation ───────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod host {
    use std::io::{BufRead, Write};
    use std::str::FromStr;
    use std::time::Instant;

    use log::{LevelFilter, Log, Metadata, Record, info, warn};

    use medibox::adapters::display::LogDisplay;
    use medibox::adapters::hardware::HardwareAdapter;
    use medibox::adapters::remote_link;
    use medibox::drivers::button::button_isr_handler;
    use medibox::drivers::buzzer::Buzzer;
    use medibox::drivers::servo::Servo;
    use medibox::drivers::sim_pin::{SimPin, SimPwm};
    use medibox::drivers::status_led::StatusLed;
    use medibox::pins;
    use medibox::remote::SharedControlParameters;
    use medibox::sensors::SensorHub;
    use medibox::sensors::dht::{self, DhtSensor};
    use medibox::sensors::ldr::{self, LdrSensor};

    pub type SimHardware = HardwareAdapter<SimPin, SimPin, SimPwm>;

    // ── Console logger ────────────────────────────────────────

    struct ConsoleLogger {
        start: Instant,
    }

    impl Log for ConsoleLogger {
        fn enabled(&self, metadata: &Metadata<'_>) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &Record<'_>) {
            if self.enabled(record.metadata()) {
                let ms = self.start.elapsed().as_millis();
                let _ = writeln!(
                    std::io::stderr(),
                    "{ms:>8} {:<5} {}",
                    record.level(),
                    record.args()
                );
            }
        }

        fn flush(&self) {}
    }

    /// Level from `MEDIBOX_LOG` (`error` … `trace`), default `info`.
    pub fn init_logger() {
        let level = std::env::var("MEDIBOX_LOG")
            .ok()
            .and_then(|v| LevelFilter::from_str(&v).ok())
            .unwrap_or(LevelFilter::Info);
        let logger = Box::new(ConsoleLogger { start: Instant::now() });
        if log::set_boxed_logger(logger).is_ok() {
            log::set_max_level(level);
        }
    }

    // ── Simulated board ───────────────────────────────────────

    pub fn bring_up() -> (SimHardware, LogDisplay) {
        let sensors = SensorHub::new(
            DhtSensor::new(pins::DHT_GPIO),
            LdrSensor::new(pins::LDR_ADC1_CHANNEL),
        );
        let hw = HardwareAdapter::new(
            sensors,
            Buzzer::new(SimPin::new()),
            StatusLed::new(SimPin::new()),
            Servo::new(SimPwm::default()),
        );
        (hw, LogDisplay::new())
    }

    const HELP: &str = "\
commands:
  u | l | d | r              press UP / LEFT / DOWN / RIGHT
  env <temp C> <hum %>       set the DHT11 reading
  fault on|off               make DHT11 reads fail
  ldr <0..4095>              set the raw light level (higher = darker)
  pub <topic> <payload>      deliver a remote parameter message";

    /// Stdin reader on its own thread: the asynchronous edge and network
    /// sources of the real board.
    pub fn spawn_console(params: &'static SharedControlParameters) {
        let start = Instant::now();
        let spawned = std::thread::Builder::new()
            .name("console".into())
            .spawn(move || {
                for line in std::io::stdin().lock().lines() {
                    let Ok(line) = line else { break };
                    handle_line(line.trim(), start, params);
                }
            });
        if let Err(e) = spawned {
            warn!("console thread not started: {e}");
        }
    }

    fn handle_line(line: &str, start: Instant, params: &SharedControlParameters) {
        let mut words = line.split_whitespace();
        let now_ms = start.elapsed().as_millis() as u32;
        match (words.next(), words.next(), words.next()) {
            (Some(key @ ("u" | "l" | "d" | "r")), None, None) => {
                let gpio = match key {
                    "u" => pins::BUTTON_UP_GPIO,
                    "l" => pins::BUTTON_LEFT_GPIO,
                    "d" => pins::BUTTON_DOWN_GPIO,
                    _ => pins::BUTTON_RIGHT_GPIO,
                };
                if !button_isr_handler(gpio, now_ms) {
                    info!("console: edge on GPIO {gpio} debounced");
                }
            }
            (Some("env"), Some(t), Some(h)) => match (t.parse::<f32>(), h.parse::<f32>()) {
                (Ok(t), Ok(h)) => dht::sim_set_dht(t, h),
                _ => warn!("console: env expects two numbers"),
            },
            (Some("fault"), Some(state @ ("on" | "off")), None) => {
                dht::sim_set_dht_fault(state == "on");
            }
            (Some("ldr"), Some(raw), None) => match raw.parse::<u16>() {
                Ok(raw) => ldr::sim_set_ldr_raw(raw),
                Err(_) => warn!("console: ldr expects 0..4095"),
            },
            (Some("pub"), Some(topic), Some(payload)) => {
                let _ = remote_link::intake(params, topic, payload.as_bytes());
            }
            (None, ..) => {}
            _ => info!("{HELP}"),
        }
    }
}
