//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to                   |
//! |----------------|--------------------|-------------------------------|
//! | `hardware`     | SensorPort         | DHT11, LDR (ADC1)             |
//! |                | ActuatorPort       | buzzer, LED (GPIO), servo (LEDC) |
//! | `time`         | ClockPort          | system clock + user UTC offset |
//! | `display`      | DisplayPort        | SSD1306 OLED / serial log     |
//! | `log_sink`     | EventSink          | serial log output             |
//! | `remote_link`  | EventSink          | MQTT-style broker outbox      |

pub mod display;
pub mod hardware;
pub mod log_sink;
pub mod remote_link;
pub mod time;
