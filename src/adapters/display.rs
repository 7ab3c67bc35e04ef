//! Display adapters.
//!
//! | Adapter       | Target                                   |
//! |---------------|------------------------------------------|
//! | `OledDisplay` | SSD1306 128×64 over any embedded-hal I²C |
//! | `LogDisplay`  | serial log (host simulation)             |
//!
//! Both compare the laid-out [`Frame`] with the last one drawn and skip
//! identical frames, so the 50 ms alarm refresh costs nothing when the
//! seconds have not moved.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_10X20};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use log::{info, warn};
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};

use crate::app::ports::DisplayPort;
use crate::error::DisplayError;
use crate::pins::OLED_I2C_ADDR;
use crate::render::{Frame, View};

// ───────────────────────────────────────────────────────────────
// SSD1306 OLED
// ───────────────────────────────────────────────────────────────

type Panel<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

const SMALL_LINE_PX: i32 = 10;
const LARGE_LINE_PX: i32 = 20;

pub struct OledDisplay<I2C> {
    panel: Panel<I2C>,
    last: Option<Frame>,
    flush_errors: u32,
}

impl<I2C: embedded_hal::i2c::I2c> OledDisplay<I2C> {
    /// Wrap the bus.  Nothing is sent until [`DisplayPort::init`].
    pub fn new(i2c: I2C) -> Self {
        let interface = I2CDisplayInterface::new(i2c);
        let panel = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        Self {
            panel,
            last: None,
            flush_errors: 0,
        }
    }

    /// Frames the panel refused since boot.
    pub fn flush_errors(&self) -> u32 {
        self.flush_errors
    }

    fn draw(&mut self, frame: &Frame) -> Result<(), <Panel<I2C> as DrawTarget>::Error> {
        self.panel.clear_buffer();
        let small = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        let large = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);

        let mut y = 0;
        for line in frame {
            let (style, height) = if line.large {
                (large, LARGE_LINE_PX)
            } else {
                (small, SMALL_LINE_PX)
            };
            Text::with_baseline(&line.text, Point::new(0, y), style, Baseline::Top)
                .draw(&mut self.panel)?;
            y += height + 2;
        }
        self.panel.flush()
    }
}

impl<I2C: embedded_hal::i2c::I2c> DisplayPort for OledDisplay<I2C> {
    fn init(&mut self) -> Result<(), DisplayError> {
        self.panel
            .init()
            .map_err(|_| DisplayError::NotResponding(OLED_I2C_ADDR))?;
        self.panel.clear_buffer();
        self.panel
            .flush()
            .map_err(|_| DisplayError::NotResponding(OLED_I2C_ADDR))?;
        info!("OledDisplay: SSD1306 up at 0x{OLED_I2C_ADDR:02X}");
        Ok(())
    }

    fn render(&mut self, view: &View) {
        let frame = view.frame();
        if self.last.as_ref() == Some(&frame) {
            return;
        }
        match self.draw(&frame) {
            Ok(()) => self.last = Some(frame),
            Err(e) => {
                self.flush_errors += 1;
                warn!("OledDisplay: frame dropped: {e:?}");
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Serial log stand-in
// ───────────────────────────────────────────────────────────────

/// Logs every changed frame as one `DISPLAY |` record.
#[derive(Default)]
pub struct LogDisplay {
    last: Option<Frame>,
    frames: u32,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distinct frames logged so far.
    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.last.as_ref()
    }
}

impl DisplayPort for LogDisplay {
    fn init(&mut self) -> Result<(), DisplayError> {
        info!("LogDisplay: ready");
        Ok(())
    }

    fn render(&mut self, view: &View) {
        let frame = view.frame();
        if self.last.as_ref() == Some(&frame) {
            return;
        }
        let mut text = String::new();
        for (i, line) in frame.iter().enumerate() {
            if i > 0 {
                text.push_str(" | ");
            }
            text.push_str(&line.text);
        }
        info!("DISPLAY | {:?} | {}", view.screen(), text);
        self.frames += 1;
        self.last = Some(frame);
    }
}
