//! System configuration parameters
//!
//! All tunable parameters for the Medibox.  Every timing constant of the
//! control loop lives here rather than in the subsystems so tests can run
//! the whole pipeline against a virtual clock.  Nothing is persisted; the
//! defaults apply after every power cycle.

use serde::{Deserialize, Serialize};

/// Safe operating envelope for stored medicine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentBounds {
    pub min_temp_c: f32,
    pub max_temp_c: f32,
    pub min_humidity_pct: f32,
    pub max_humidity_pct: f32,
}

impl Default for EnvironmentBounds {
    fn default() -> Self {
        Self {
            min_temp_c: 24.0,
            max_temp_c: 32.0,
            min_humidity_pct: 65.0,
            max_humidity_pct: 80.0,
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Loop ---
    /// Sleep between control ticks (milliseconds)
    pub tick_interval_ms: u32,
    /// Refresh period of the alarm screen while an alarm rings (milliseconds)
    pub alarm_refresh_interval_ms: u32,
    /// Telemetry report interval (seconds)
    pub telemetry_interval_secs: u32,

    // --- Input ---
    /// Minimum spacing between accepted button edges, across all buttons
    pub debounce_window_ms: u32,

    // --- Environment ---
    /// Temperature / humidity sampling period (milliseconds)
    pub env_check_interval_ms: u32,
    /// Warning thresholds
    pub bounds: EnvironmentBounds,

    // --- Alerts ---
    /// LED half-period while a warning is active (milliseconds)
    pub led_blink_interval_ms: u32,
    /// Buzzer half-period while an alarm rings (milliseconds)
    pub buzzer_beep_interval_ms: u32,

    // --- Alarms ---
    /// Snooze length (milliseconds)
    pub snooze_duration_ms: u32,
    /// Initial UTC offset of the wall clock (seconds)
    pub default_utc_offset_secs: i32,

    // --- Shade control ---
    /// Run the light sampler and servo control law
    pub light_control_enabled: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Loop
            tick_interval_ms: 100,
            alarm_refresh_interval_ms: 50,
            telemetry_interval_secs: 60,

            // Input
            debounce_window_ms: 200,

            // Environment
            env_check_interval_ms: 2000,
            bounds: EnvironmentBounds::default(),

            // Alerts
            led_blink_interval_ms: 500,
            buzzer_beep_interval_ms: 500,

            // Alarms
            snooze_duration_ms: 120_000,
            default_utc_offset_secs: 19_800, // UTC+05:30

            // Shade control
            light_control_enabled: true,
        }
    }
}

/// Parameters of the shade control law.  Each field is independently
/// overwritten by the remote configuration channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlParameters {
    /// Lower servo limit and offset of the control law (degrees)
    pub min_angle_deg: f32,
    /// Ideal storage temperature (°C)
    pub target_temp_c: f32,
    /// Light sampling period (milliseconds)
    pub sampling_interval_ms: u32,
    /// Averaged-intensity publish period (milliseconds)
    pub sending_interval_ms: u32,
    /// Gain of the control law
    pub control_factor: f32,
}

impl ControlParameters {
    /// Board calibration.  `const` so the shared parameter block can be a
    /// `static`.
    pub const DEFAULT: Self = Self {
        min_angle_deg: 30.0,
        target_temp_c: 30.0,
        sampling_interval_ms: 5_000,
        sending_interval_ms: 120_000,
        control_factor: 0.75,
    };
}

impl Default for ControlParameters {
    fn default() -> Self {
        Self::DEFAULT
    }
}
