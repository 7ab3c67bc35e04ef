//! System time adapter.
//!
//! Provides the wall clock ([`ClockPort`]) and monotonic uptime for the
//! control loop.
//!
//! - **`target_os = "espidf"`**: `gettimeofday()` for the wall clock (set
//!   by SNTP once Wi-Fi is up), `esp_timer_get_time()` for uptime.
//! - **`not(target_os = "espidf")`**: `SystemTime` and `Instant` for
//!   host-side simulation.
//!
//! The UTC offset lives here, not in the C library's `TZ`: the user edits
//! it in half-hour steps and it is applied on every `now()`.

use crate::app::ports::ClockPort;
use crate::clock::{MAX_UTC_OFFSET_SECS, WallTime};

/// 2020-01-01T00:00:00Z.  Anything earlier means SNTP has not run yet.
const EPOCH_2020: i64 = 1_577_836_800;

pub struct SystemClock {
    offset_secs: i32,
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl SystemClock {
    pub fn new(offset_secs: i32) -> Self {
        Self {
            offset_secs: offset_secs.clamp(-MAX_UTC_OFFSET_SECS, MAX_UTC_OFFSET_SECS),
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Milliseconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn uptime_ms(&self) -> u64 {
        // SAFETY: esp_timer_get_time is a read of the high-resolution timer.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1_000
    }

    /// Milliseconds since boot (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Seconds since the Unix epoch, UTC.
    #[cfg(target_os = "espidf")]
    pub fn utc_epoch_secs(&self) -> i64 {
        let mut tv = esp_idf_svc::sys::timeval { tv_sec: 0, tv_usec: 0 };
        // SAFETY: gettimeofday writes only into `tv`.
        if unsafe { esp_idf_svc::sys::gettimeofday(&mut tv, core::ptr::null_mut()) } != 0 {
            return 0;
        }
        tv.tv_sec as i64
    }

    /// Seconds since the Unix epoch, UTC.
    #[cfg(not(target_os = "espidf"))]
    pub fn utc_epoch_secs(&self) -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_secs() as i64)
    }

    /// Wall clock looks plausible (after 2020).
    pub fn is_synced(&self) -> bool {
        self.utc_epoch_secs() >= EPOCH_2020
    }

    pub fn offset_secs(&self) -> i32 {
        self.offset_secs
    }

    /// Local calendar time for a given UTC instant under the current offset.
    pub fn local_time_at(&self, utc_epoch_secs: i64) -> WallTime {
        WallTime::from_epoch_secs(utc_epoch_secs + i64::from(self.offset_secs))
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> WallTime {
        self.local_time_at(self.utc_epoch_secs())
    }

    fn set_utc_offset(&mut self, offset_secs: i32) {
        self.offset_secs = offset_secs.clamp(-MAX_UTC_OFFSET_SECS, MAX_UTC_OFFSET_SECS);
    }
}
