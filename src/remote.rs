//! Remote parameter intake.
//!
//! The network collaborator delivers `topic → payload` messages for the
//! five shade-control parameters and publishes the averaged light
//! intensity.  This module owns the topic names, the payload parsing and
//! unit conversion, and the lock-free parameter block shared between the
//! network callback and the control loop.
//!
//! | Topic suffix        | Payload unit | Stored as                |
//! |---------------------|--------------|--------------------------|
//! | `sampling_interval` | seconds      | `sampling_interval_ms`   |
//! | `sending_interval`  | minutes      | `sending_interval_ms`    |
//! | `AmpTemp`           | °C           | `target_temp_c`          |
//! | `ControlFactor`     | gain         | `control_factor`         |
//! | `minAngle`          | degrees      | `min_angle_deg`          |
//!
//! A malformed payload leaves the parameter unchanged.

use core::fmt::Write;
use core::sync::atomic::{AtomicU32, Ordering};

use heapless::String;

use crate::config::ControlParameters;
use crate::error::RemoteConfigError;

pub const TOPIC_SAMPLING_INTERVAL: &str = "medicine_storage/config/sampling_interval";
pub const TOPIC_SENDING_INTERVAL: &str = "medicine_storage/config/sending_interval";
pub const TOPIC_TARGET_TEMP: &str = "medicine_storage/config/AmpTemp";
pub const TOPIC_CONTROL_FACTOR: &str = "medicine_storage/config/ControlFactor";
pub const TOPIC_MIN_ANGLE: &str = "medicine_storage/config/minAngle";
pub const TOPIC_LIGHT_INTENSITY: &str = "medicine_storage/light_intensity";

/// Outbound publish payload.
pub type PublishPayload = String<16>;

/// A remotely tunable parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKey {
    SamplingInterval,
    SendingInterval,
    TargetTemp,
    ControlFactor,
    MinAngle,
}

impl ParamKey {
    pub const ALL: [ParamKey; 5] = [
        ParamKey::SamplingInterval,
        ParamKey::SendingInterval,
        ParamKey::TargetTemp,
        ParamKey::ControlFactor,
        ParamKey::MinAngle,
    ];

    pub fn topic(self) -> &'static str {
        match self {
            Self::SamplingInterval => TOPIC_SAMPLING_INTERVAL,
            Self::SendingInterval => TOPIC_SENDING_INTERVAL,
            Self::TargetTemp => TOPIC_TARGET_TEMP,
            Self::ControlFactor => TOPIC_CONTROL_FACTOR,
            Self::MinAngle => TOPIC_MIN_ANGLE,
        }
    }

    pub fn from_topic(topic: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.topic() == topic)
    }
}

/// A parsed, unit-converted update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamUpdate {
    SamplingIntervalMs(u32),
    SendingIntervalMs(u32),
    TargetTempC(f32),
    ControlFactor(f32),
    MinAngleDeg(f32),
}

impl ParamUpdate {
    pub fn key(&self) -> ParamKey {
        match self {
            Self::SamplingIntervalMs(_) => ParamKey::SamplingInterval,
            Self::SendingIntervalMs(_) => ParamKey::SendingInterval,
            Self::TargetTempC(_) => ParamKey::TargetTemp,
            Self::ControlFactor(_) => ParamKey::ControlFactor,
            Self::MinAngleDeg(_) => ParamKey::MinAngle,
        }
    }
}

/// Parse one inbound message.
pub fn parse_update(topic: &str, payload: &[u8]) -> Result<ParamUpdate, RemoteConfigError> {
    let key = ParamKey::from_topic(topic).ok_or(RemoteConfigError::UnknownTopic)?;
    let text = core::str::from_utf8(payload)
        .map_err(|_| RemoteConfigError::NotUtf8)?
        .trim();

    Ok(match key {
        ParamKey::SamplingInterval => ParamUpdate::SamplingIntervalMs(scaled_interval(text, 1_000)?),
        ParamKey::SendingInterval => ParamUpdate::SendingIntervalMs(scaled_interval(text, 60_000)?),
        ParamKey::TargetTemp => ParamUpdate::TargetTempC(finite(text)?),
        ParamKey::ControlFactor => ParamUpdate::ControlFactor(finite(text)?),
        ParamKey::MinAngle => ParamUpdate::MinAngleDeg(finite(text)?),
    })
}

fn scaled_interval(text: &str, unit_ms: u32) -> Result<u32, RemoteConfigError> {
    let value: i64 = text.parse().map_err(|_| RemoteConfigError::NotNumeric)?;
    let value = u32::try_from(value).map_err(|_| RemoteConfigError::OutOfRange)?;
    value.checked_mul(unit_ms).ok_or(RemoteConfigError::OutOfRange)
}

fn finite(text: &str) -> Result<f32, RemoteConfigError> {
    let value: f32 = text.parse().map_err(|_| RemoteConfigError::NotNumeric)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(RemoteConfigError::OutOfRange)
    }
}

/// Light-intensity payload: four decimals, as the dashboard expects.
pub fn format_intensity(value: f32) -> PublishPayload {
    let mut out = PublishPayload::new();
    // 16 bytes fit any value in [0, 1]; anything wider is truncated.
    let _ = write!(out, "{value:.4}");
    out
}

// ── Shared parameter block ────────────────────────────────────

/// Control parameters readable by the loop and writable from the network
/// callback.  Each field is one atomic word; there is no cross-field
/// consistency, last write wins per field.
pub struct SharedControlParameters {
    min_angle_bits: AtomicU32,
    target_temp_bits: AtomicU32,
    sampling_interval_ms: AtomicU32,
    sending_interval_ms: AtomicU32,
    control_factor_bits: AtomicU32,
}

impl Default for SharedControlParameters {
    fn default() -> Self {
        Self::new(ControlParameters::DEFAULT)
    }
}

impl SharedControlParameters {
    pub const fn new(initial: ControlParameters) -> Self {
        Self {
            min_angle_bits: AtomicU32::new(initial.min_angle_deg.to_bits()),
            target_temp_bits: AtomicU32::new(initial.target_temp_c.to_bits()),
            sampling_interval_ms: AtomicU32::new(initial.sampling_interval_ms),
            sending_interval_ms: AtomicU32::new(initial.sending_interval_ms),
            control_factor_bits: AtomicU32::new(initial.control_factor.to_bits()),
        }
    }

    pub fn apply(&self, update: ParamUpdate) {
        match update {
            ParamUpdate::SamplingIntervalMs(ms) => self.sampling_interval_ms.store(ms, Ordering::Release),
            ParamUpdate::SendingIntervalMs(ms) => self.sending_interval_ms.store(ms, Ordering::Release),
            ParamUpdate::TargetTempC(v) => self.target_temp_bits.store(v.to_bits(), Ordering::Release),
            ParamUpdate::ControlFactor(v) => self.control_factor_bits.store(v.to_bits(), Ordering::Release),
            ParamUpdate::MinAngleDeg(v) => self.min_angle_bits.store(v.to_bits(), Ordering::Release),
        }
    }

    /// Parse and apply in one step.
    pub fn apply_message(&self, topic: &str, payload: &[u8]) -> Result<ParamUpdate, RemoteConfigError> {
        let update = parse_update(topic, payload)?;
        self.apply(update);
        Ok(update)
    }

    pub fn snapshot(&self) -> ControlParameters {
        ControlParameters {
            min_angle_deg: f32::from_bits(self.min_angle_bits.load(Ordering::Acquire)),
            target_temp_c: f32::from_bits(self.target_temp_bits.load(Ordering::Acquire)),
            sampling_interval_ms: self.sampling_interval_ms.load(Ordering::Acquire),
            sending_interval_ms: self.sending_interval_ms.load(Ordering::Acquire),
            control_factor: f32::from_bits(self.control_factor_bits.load(Ordering::Acquire)),
        }
    }
}
