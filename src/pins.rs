//! GPIO / peripheral pin assignments for the Medibox board (ESP32 DevKit).
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

/// DHT11 temperature / humidity, single-wire.
pub const DHT_GPIO: i32 = 23;

/// LDR voltage divider.  Higher reading = darker.
pub const LDR_ADC_GPIO: i32 = 33;
/// ADC1 channel of GPIO 33 on the ESP32.
pub const LDR_ADC1_CHANNEL: u32 = 5;

// ---------------------------------------------------------------------------
// Actuators
// ---------------------------------------------------------------------------

/// Shade servo signal (LEDC, 50 Hz).
pub const SERVO_GPIO: i32 = 13;
/// LEDC duty resolution for the servo channel (bits).
pub const SERVO_PWM_RESOLUTION_BITS: u32 = 14;

/// Piezo buzzer, active high.
pub const BUZZER_GPIO: i32 = 2;

/// Warning LED, active high.
pub const LED_GPIO: i32 = 18;

// ---------------------------------------------------------------------------
// Buttons (active-low, external pull-ups, falling-edge interrupt)
// ---------------------------------------------------------------------------

pub const BUTTON_UP_GPIO: i32 = 34;
pub const BUTTON_LEFT_GPIO: i32 = 26;
pub const BUTTON_DOWN_GPIO: i32 = 32;
pub const BUTTON_RIGHT_GPIO: i32 = 35;

pub const BUTTON_GPIOS: [i32; 4] = [
    BUTTON_UP_GPIO,
    BUTTON_LEFT_GPIO,
    BUTTON_DOWN_GPIO,
    BUTTON_RIGHT_GPIO,
];

// ---------------------------------------------------------------------------
// I²C bus (SSD1306 OLED, 128×64)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 22;
pub const I2C_SCL_GPIO: i32 = 21;
pub const OLED_I2C_ADDR: u8 = 0x3C;
