//! Remote channel adapter (MQTT-style broker).
//!
//! Two directions, two owners:
//!
//! ```text
//!   broker ──▶ intake() ──▶ SharedControlParameters   (network callback)
//!   AppEvent::LightAverage ──▶ RemoteLink outbox ──▶ broker   (main loop)
//! ```
//!
//! The transport itself (the ESP-IDF MQTT client on the board, stdin on
//! the host) only moves bytes; it calls [`intake`] for every inbound
//! message and drains [`RemoteLink::pop_outbound`] when connected.  A
//! disconnected broker never blocks the loop: the outbox is bounded and
//! drops its oldest entry when full.

use heapless::Deque;
use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::remote::{
    PublishPayload, ParamKey, ParamUpdate, SharedControlParameters, TOPIC_LIGHT_INTENSITY,
    format_intensity,
};

/// Outbound messages kept while the broker is unreachable.
pub const OUTBOX_CAPACITY: usize = 8;

/// Topics to subscribe to on connect.
pub fn subscriptions() -> impl Iterator<Item = &'static str> {
    ParamKey::ALL.into_iter().map(ParamKey::topic)
}

/// Apply one inbound message.  Rejected messages are logged and leave
/// every parameter unchanged.
pub fn intake(params: &SharedControlParameters, topic: &str, payload: &[u8]) -> Option<ParamUpdate> {
    match params.apply_message(topic, payload) {
        Ok(update) => {
            info!("REMOTE | {topic} -> {update:?}");
            Some(update)
        }
        Err(e) => {
            warn!("REMOTE | {topic}: rejected ({e})");
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub topic: &'static str,
    pub payload: PublishPayload,
}

/// Event sink that turns publishable events into broker messages.
#[derive(Default)]
pub struct RemoteLink {
    outbox: Deque<OutboundMessage, OUTBOX_CAPACITY>,
    dropped: u32,
}

impl RemoteLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pop_outbound(&mut self) -> Option<OutboundMessage> {
        self.outbox.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.outbox.len()
    }

    /// Messages discarded because the outbox was full.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    fn enqueue(&mut self, msg: OutboundMessage) {
        if self.outbox.is_full() {
            self.outbox.pop_front();
            self.dropped += 1;
            debug!("RemoteLink: outbox full, oldest message dropped");
        }
        let _ = self.outbox.push_back(msg);
    }
}

impl EventSink for RemoteLink {
    fn emit(&mut self, event: &AppEvent) {
        if let AppEvent::LightAverage(avg) = event {
            self.enqueue(OutboundMessage {
                topic: TOPIC_LIGHT_INTENSITY,
                payload: format_intensity(*avg),
            });
        }
    }
}
