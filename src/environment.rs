//! Environment monitor.
//!
//! Samples the DHT11 every `env_check_interval_ms` and classifies the
//! reading against the storage envelope in [`EnvironmentBounds`].  The
//! result is a fault bitmask; `warning` is simply "any bit set".
//!
//! ## Sensor faults
//!
//! A DHT read failure surfaces as NaN.  NaN compares false against every
//! bound, so a plain `temp < min || temp > max` test would silently report
//! "all fine".  Non-finite readings are therefore classified explicitly as
//! [`EnvFault::SensorFault`], which raises the warning.  There is no retry;
//! the next interval reads again.

use log::{info, warn};

use crate::app::ports::SensorPort;
use crate::config::EnvironmentBounds;
use crate::scheduler::Interval;

/// Individual out-of-envelope conditions, accumulated in a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EnvFault {
    LowTemperature = 0b0000_0001,
    HighTemperature = 0b0000_0010,
    LowHumidity = 0b0000_0100,
    HighHumidity = 0b0000_1000,
    /// Temperature or humidity read back as NaN / infinite.
    SensorFault = 0b0001_0000,
}

impl EnvFault {
    pub const ALL: [EnvFault; 5] = [
        EnvFault::LowTemperature,
        EnvFault::HighTemperature,
        EnvFault::LowHumidity,
        EnvFault::HighHumidity,
        EnvFault::SensorFault,
    ];

    pub const fn mask(self) -> u8 {
        self as u8
    }

    /// Short label used on the time screen.
    pub fn label(self) -> &'static str {
        match self {
            Self::LowTemperature => "LOW TEMP!",
            Self::HighTemperature => "HIGH TEMP!",
            Self::LowHumidity => "LOW HUM!",
            Self::HighHumidity => "HIGH HUM!",
            Self::SensorFault => "SENSOR ERR!",
        }
    }
}

impl core::fmt::Display for EnvFault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::LowTemperature => write!(f, "temperature below range"),
            Self::HighTemperature => write!(f, "temperature above range"),
            Self::LowHumidity => write!(f, "humidity below range"),
            Self::HighHumidity => write!(f, "humidity above range"),
            Self::SensorFault => write!(f, "sensor fault"),
        }
    }
}

/// Classify one reading.  Returns the fault bitmask (0 = within bounds).
pub fn classify(temperature_c: f32, humidity_pct: f32, bounds: &EnvironmentBounds) -> u8 {
    let mut faults = 0;
    if !temperature_c.is_finite() || !humidity_pct.is_finite() {
        faults |= EnvFault::SensorFault.mask();
    }
    if temperature_c < bounds.min_temp_c {
        faults |= EnvFault::LowTemperature.mask();
    }
    if temperature_c > bounds.max_temp_c {
        faults |= EnvFault::HighTemperature.mask();
    }
    if humidity_pct < bounds.min_humidity_pct {
        faults |= EnvFault::LowHumidity.mask();
    }
    if humidity_pct > bounds.max_humidity_pct {
        faults |= EnvFault::HighHumidity.mask();
    }
    faults
}

/// The single current reading.  Overwritten on every sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnvironmentReading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
    /// Monotonic time of the sample (milliseconds).
    pub sampled_at_ms: u64,
    /// Fault bitmask from [`classify`].
    pub faults: u8,
    pub warning: bool,
}

impl EnvironmentReading {
    pub fn has_fault(&self, fault: EnvFault) -> bool {
        self.faults & fault.mask() != 0
    }

    /// Active faults in display order.
    pub fn active_faults(&self) -> impl Iterator<Item = EnvFault> + '_ {
        EnvFault::ALL.into_iter().filter(|f| self.has_fault(*f))
    }
}

/// Periodic sampler + classifier.
pub struct EnvironmentMonitor {
    bounds: EnvironmentBounds,
    interval_ms: u64,
    cadence: Interval,
    reading: EnvironmentReading,
}

impl EnvironmentMonitor {
    pub fn new(bounds: EnvironmentBounds, interval_ms: u32) -> Self {
        Self {
            bounds,
            interval_ms: u64::from(interval_ms),
            cadence: Interval::new(),
            reading: EnvironmentReading::default(),
        }
    }

    /// Sample if the interval has elapsed.  Returns the new reading when a
    /// sample was taken.
    pub fn poll(&mut self, now_ms: u64, sensors: &mut impl SensorPort) -> Option<EnvironmentReading> {
        if !self.cadence.poll(now_ms, self.interval_ms) {
            return None;
        }

        let temperature_c = sensors.read_temperature_c();
        let humidity_pct = sensors.read_humidity_pct();
        let faults = classify(temperature_c, humidity_pct, &self.bounds);
        self.log_transitions(faults);

        self.reading = EnvironmentReading {
            temperature_c,
            humidity_pct,
            sampled_at_ms: now_ms,
            faults,
            warning: faults != 0,
        };
        Some(self.reading)
    }

    pub fn reading(&self) -> &EnvironmentReading {
        &self.reading
    }

    pub fn warning(&self) -> bool {
        self.reading.warning
    }

    pub fn bounds(&self) -> &EnvironmentBounds {
        &self.bounds
    }

    fn log_transitions(&self, faults: u8) {
        for fault in EnvFault::ALL {
            let was = self.reading.faults & fault.mask() != 0;
            let is = faults & fault.mask() != 0;
            if is && !was {
                warn!("ENV WARNING SET: {fault}");
            } else if was && !is {
                info!("ENV WARNING CLEARED: {fault}");
            }
        }
    }
}
