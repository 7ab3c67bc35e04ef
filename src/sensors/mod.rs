//! Sensor subsystem: individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns every sensor driver and is what the hardware adapter
//! exposes through [`SensorPort`](crate::app::ports::SensorPort).

pub mod dht;
pub mod ldr;

use log::warn;

use dht::DhtSensor;
use ldr::LdrSensor;

/// Aggregates all sensor drivers.
pub struct SensorHub {
    pub dht: DhtSensor,
    pub ldr: LdrSensor,
    /// Humidity from the transaction started by the last temperature read.
    humidity_pct: f32,
    failures: u32,
}

impl SensorHub {
    /// Pass in pre-built drivers (built in main where peripheral
    /// ownership is established).
    pub fn new(dht: DhtSensor, ldr: LdrSensor) -> Self {
        Self {
            dht,
            ldr,
            humidity_pct: f32::NAN,
            failures: 0,
        }
    }

    /// Run one DHT transaction.  Temperature is returned; humidity is kept
    /// for the [`humidity_pct`](Self::humidity_pct) call that follows.
    ///
    /// A failed read yields NaN for both, which the environment monitor
    /// turns into a warning; it never stops the control loop.
    pub fn temperature_c(&mut self) -> f32 {
        match self.dht.read() {
            Ok(r) => {
                self.humidity_pct = r.humidity_pct;
                r.temperature_c
            }
            Err(e) => {
                self.failures += 1;
                warn!("SensorHub: DHT read failed: {e} ({} total)", self.failures);
                self.humidity_pct = f32::NAN;
                f32::NAN
            }
        }
    }

    pub fn humidity_pct(&self) -> f32 {
        self.humidity_pct
    }

    pub fn light_raw(&mut self) -> u16 {
        self.ldr.read_raw()
    }

    /// DHT failures since boot.
    pub fn failures(&self) -> u32 {
        self.failures
    }
}
