//! DHT11 temperature / humidity sensor (single-wire).
//!
//! One transaction yields both values.  The protocol: host pulls the line
//! low for ≥18 ms, the sensor answers 80 µs low + 80 µs high, then sends
//! 40 bits where a ~26 µs high pulse is `0` and a ~70 µs high pulse is `1`.
//! Byte 4 is the sum of bytes 0..=3.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: bit-banged on the data pin with `esp_rom_delay_us` timing.
//! On host/test: reads from static atomics for injection.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::error::SensorError;

static SIM_TEMP_BITS: AtomicU32 = AtomicU32::new(f32::to_bits(27.0));
static SIM_HUM_BITS: AtomicU32 = AtomicU32::new(f32::to_bits(70.0));
static SIM_FAULT: AtomicBool = AtomicBool::new(false);

/// Inject the next reading (host simulation).
pub fn sim_set_dht(temperature_c: f32, humidity_pct: f32) {
    SIM_TEMP_BITS.store(temperature_c.to_bits(), Ordering::Relaxed);
    SIM_HUM_BITS.store(humidity_pct.to_bits(), Ordering::Relaxed);
}

/// Make every read fail until cleared (host simulation).
pub fn sim_set_dht_fault(fault: bool) {
    SIM_FAULT.store(fault, Ordering::Relaxed);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DhtReading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

/// Decode a 5-byte DHT11 frame.
pub fn decode_frame(frame: [u8; 5]) -> Result<DhtReading, SensorError> {
    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(SensorError::ReadFailed);
    }
    let humidity_pct = f32::from(frame[0]) + f32::from(frame[1]) / 10.0;
    let mut temperature_c = f32::from(frame[2]) + f32::from(frame[3] & 0x7F) / 10.0;
    if frame[3] & 0x80 != 0 {
        temperature_c = -temperature_c;
    }
    if humidity_pct > 100.0 {
        return Err(SensorError::OutOfRange);
    }
    Ok(DhtReading { temperature_c, humidity_pct })
}

pub struct DhtSensor {
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    gpio: i32,
}

impl DhtSensor {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }

    pub fn read(&mut self) -> Result<DhtReading, SensorError> {
        self.read_hw()
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_hw(&mut self) -> Result<DhtReading, SensorError> {
        if SIM_FAULT.load(Ordering::Relaxed) {
            return Err(SensorError::ReadFailed);
        }
        Ok(DhtReading {
            temperature_c: f32::from_bits(SIM_TEMP_BITS.load(Ordering::Relaxed)),
            humidity_pct: f32::from_bits(SIM_HUM_BITS.load(Ordering::Relaxed)),
        })
    }

    #[cfg(target_os = "espidf")]
    fn read_hw(&mut self) -> Result<DhtReading, SensorError> {
        use esp_idf_svc::sys::*;

        let pin = self.gpio;
        // SAFETY: the data pin is owned by this driver; direction and
        // level writes are plain register accesses from the main task.
        unsafe {
            gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_OUTPUT);
            gpio_set_level(pin, 0);
            esp_rom_delay_us(20_000);
            gpio_set_level(pin, 1);
            esp_rom_delay_us(30);
            gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_INPUT);
        }

        // Sensor response: low, high, then the first bit's low.
        wait_for(pin, false, 100)?;
        wait_for(pin, true, 100)?;
        wait_for(pin, false, 100)?;

        let mut frame = [0u8; 5];
        for bit in 0..40 {
            wait_for(pin, true, 80)?;
            let high_us = wait_for(pin, false, 100)?;
            if high_us > 40 {
                frame[bit / 8] |= 1 << (7 - bit % 8);
            }
        }
        decode_frame(frame)
    }
}

/// Busy-wait until the pin reads `level`; returns the microseconds spent.
#[cfg(target_os = "espidf")]
fn wait_for(pin: i32, level: bool, timeout_us: u32) -> Result<u32, SensorError> {
    use esp_idf_svc::sys::{esp_rom_delay_us, gpio_get_level};

    let want = i32::from(level);
    for elapsed in 0..=timeout_us {
        // SAFETY: read-only register access on a configured input.
        if unsafe { gpio_get_level(pin) } == want {
            return Ok(elapsed);
        }
        unsafe { esp_rom_delay_us(1) };
    }
    Err(SensorError::ReadFailed)
}
