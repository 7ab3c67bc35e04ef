//! Unified error types for the Medibox firmware.
//!
//! The control loop itself never propagates errors: sensor faults degrade
//! to a warning, actuator pin failures are logged, malformed remote
//! messages are dropped.  These types exist for the edges where a caller
//! does need to know: bring-up (display init is fatal) and the remote
//! configuration intake (which reports why a message was ignored).

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be read.
    Sensor(SensorError),
    /// The display could not be brought up or refused a frame.
    Display(DisplayError),
    /// A remote configuration message was rejected.
    RemoteConfig(RemoteConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Display(e) => write!(f, "display: {e}"),
            Self::RemoteConfig(e) => write!(f, "remote config: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The DHT single-wire transaction timed out or failed its checksum.
    ReadFailed,
    /// Reading is outside the physically plausible range.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed => write!(f, "read failed"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Display errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// The panel did not acknowledge on its bus address.
    NotResponding(u8),
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotResponding(addr) => write!(f, "no ACK at 0x{addr:02X}"),
        }
    }
}

impl From<DisplayError> for Error {
    fn from(e: DisplayError) -> Self {
        Self::Display(e)
    }
}

// ---------------------------------------------------------------------------
// Remote configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteConfigError {
    /// Topic does not name a known parameter.
    UnknownTopic,
    /// Payload is not valid UTF-8.
    NotUtf8,
    /// Payload does not parse as a number.
    NotNumeric,
    /// Payload parsed but is negative, infinite or NaN.
    OutOfRange,
}

impl fmt::Display for RemoteConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTopic => write!(f, "unknown topic"),
            Self::NotUtf8 => write!(f, "payload is not UTF-8"),
            Self::NotNumeric => write!(f, "payload is not numeric"),
            Self::OutOfRange => write!(f, "value out of range"),
        }
    }
}

impl From<RemoteConfigError> for Error {
    fn from(e: RemoteConfigError) -> Self {
        Self::RemoteConfig(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
