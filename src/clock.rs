//! Wall-clock snapshot and calendar decomposition.
//!
//! The time source hands the core a local epoch (UTC epoch plus the
//! configured offset).  Everything the alarms and screens need, hour and
//! minute for matching plus date and weekday for display, is derived here
//! so the rest of the firmware never touches calendar arithmetic.

use core::fmt;

use chrono::{DateTime, Datelike, Timelike};
use serde::Serialize;

/// Short weekday names, Sunday first.
const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Offset range accepted by the clock, in seconds.
pub const MAX_UTC_OFFSET_SECS: i32 = 86_400;

/// Local time as seen by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WallTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub day: u8,
    pub month: u8,
    pub year: i32,
    /// 0 = Sunday.
    pub weekday: u8,
}

impl WallTime {
    /// Decompose a local epoch (seconds).  Out-of-range epochs fall back
    /// to 1970-01-01 00:00:00.
    pub fn from_epoch_secs(local_epoch_secs: i64) -> Self {
        let dt = DateTime::from_timestamp(local_epoch_secs, 0).unwrap_or_default();
        Self {
            hour: dt.hour() as u8,
            minute: dt.minute() as u8,
            second: dt.second() as u8,
            day: dt.day() as u8,
            month: dt.month() as u8,
            year: dt.year(),
            weekday: dt.weekday().num_days_from_sunday() as u8,
        }
    }

    /// Convenience constructor for a time of day on the epoch date.
    pub fn at(hour: u8, minute: u8, second: u8) -> Self {
        Self::from_epoch_secs(i64::from(hour) * 3600 + i64::from(minute) * 60 + i64::from(second))
    }

    pub fn weekday_name(&self) -> &'static str {
        WEEKDAYS.get(usize::from(self.weekday)).copied().unwrap_or("")
    }

    /// `HH:MM:SS` formatter.
    pub fn hms(&self) -> Hms {
        Hms(*self)
    }

    /// `DD/MM/YYYY Ddd` formatter.
    pub fn date(&self) -> DateLine {
        DateLine(*self)
    }
}

pub struct Hms(WallTime);

impl fmt::Display for Hms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.0.hour, self.0.minute, self.0.second)
    }
}

pub struct DateLine(WallTime);

impl fmt::Display for DateLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = &self.0;
        write!(f, "{:02}/{:02}/{} {}", t.day, t.month, t.year, t.weekday_name())
    }
}

/// `UTC+05:30` style label for an offset in seconds.
pub struct UtcOffset(pub i32);

impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { '-' } else { '+' };
        let abs = self.0.unsigned_abs();
        write!(f, "UTC{sign}{:02}:{:02}", abs / 3600, (abs % 3600) / 60)
    }
}

/// Wrap an offset back into ±86 400 s.  Values past one end re-enter from
/// the other, one full 48 h span away.
pub fn wrap_utc_offset(offset_secs: i32) -> i32 {
    if offset_secs > MAX_UTC_OFFSET_SECS {
        offset_secs - 2 * MAX_UTC_OFFSET_SECS
    } else if offset_secs < -MAX_UTC_OFFSET_SECS {
        offset_secs + 2 * MAX_UTC_OFFSET_SECS
    } else {
        offset_secs
    }
}
