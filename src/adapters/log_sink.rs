//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART on the board, stderr in the simulation).  Telemetry
//! snapshots go out as one JSON object per line so they can be scraped.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::environment::EnvFault;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl crate::app::ports::EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => match serde_json::to_string(t) {
                Ok(json) => info!("TELEM | {json}"),
                Err(e) => warn!("TELEM | serialisation failed: {e}"),
            },
            AppEvent::ScreenChanged { from, to } => {
                info!("SCREEN | {from:?} -> {to:?}");
            }
            AppEvent::AlarmTriggered(index) => {
                info!("ALARM | alarm {} ringing", index + 1);
            }
            AppEvent::AlarmStopped => {
                info!("ALARM | stopped");
            }
            AppEvent::AlarmSnoozed { alarm, until_ms } => {
                info!("ALARM | alarm {} snoozed until t={until_ms} ms", alarm + 1);
            }
            AppEvent::EnvironmentWarning(faults) => {
                let labels: Vec<&str> = EnvFault::ALL
                    .iter()
                    .filter(|f| faults & f.mask() != 0)
                    .map(|f| f.label())
                    .collect();
                info!("ENV | warning 0b{faults:05b} {}", labels.join(" "));
            }
            AppEvent::EnvironmentCleared => {
                info!("ENV | all clear");
            }
            AppEvent::LightAverage(avg) => {
                info!("LIGHT | average {avg:.4}");
            }
            AppEvent::Started(screen) => {
                info!("START | initial_screen={screen:?}");
            }
        }
    }
}
