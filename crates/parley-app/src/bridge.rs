//! Channel bridge.
//!
//! Translates [`ChannelEvent`]s from the transport into [`AppEvent`]s for the
//! [`crate::App`]. This is where inbound payloads are decoded: the App only
//! ever sees well-formed [`Message`]s.

use parley_client::ChannelEvent;
use parley_proto::payloads::InboundMessage;

use crate::{AppEvent, Message};

/// Translates channel events into app events.
#[derive(Debug, Clone)]
pub struct Bridge {
    /// Event name carrying chat messages.
    inbound_event: String,
}

impl Bridge {
    /// Create a bridge that delivers `inbound_event` as chat messages.
    pub fn new(inbound_event: impl Into<String>) -> Self {
        Self { inbound_event: inbound_event.into() }
    }

    /// Translate one channel event.
    ///
    /// Malformed or unexpected inbound events are logged and dropped.
    pub fn handle_channel_event(&self, event: ChannelEvent) -> Vec<AppEvent> {
        match event {
            ChannelEvent::Connected { sid } => vec![AppEvent::Connected { sid }],
            ChannelEvent::Disconnected { reason } => vec![AppEvent::Disconnected { reason }],
            ChannelEvent::Event { name, args } => {
                if name != self.inbound_event {
                    tracing::debug!(event = %name, "ignoring unhandled event");
                    return vec![];
                }

                let Some(data) = args.into_iter().next() else {
                    tracing::warn!(event = %name, "event without payload");
                    return vec![];
                };

                match serde_json::from_value::<InboundMessage>(data) {
                    Ok(inbound) => vec![AppEvent::MessageReceived(Message::from(inbound))],
                    Err(e) => {
                        tracing::warn!(event = %name, error = %e, "malformed message payload");
                        vec![]
                    },
                }
            },
            ChannelEvent::Acknowledged { event, id } => {
                tracing::debug!(%event, id, "event acknowledged");
                vec![]
            },
            ChannelEvent::AckTimedOut { event, id } => {
                tracing::warn!(
                    %event,
                    id,
                    "the server did not acknowledge the event in the given delay"
                );
                vec![]
            },
        }
    }
}
