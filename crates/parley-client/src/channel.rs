//! Real-time channel abstraction.
//!
//! A [`Channel`] is anything that can emit named events with an
//! acknowledgement deadline and report what the server did in return. The
//! application runtime is generic over it; the WebSocket transport is one
//! implementation, test fakes are another.

use std::{future::Future, time::Duration};

use serde_json::Value;

/// How long an emitted event waits for the server's acknowledgement.
pub const DEFAULT_ACK_TIMEOUT: Duration = Duration::from_millis(5000);

/// An outbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emit {
    /// Event name.
    pub event: String,
    /// Single JSON argument sent with the event.
    pub payload: Value,
    /// Deadline for the server's acknowledgement.
    pub ack_timeout: Duration,
}

impl Emit {
    /// Event with the default acknowledgement deadline.
    pub fn new(event: impl Into<String>, payload: Value) -> Self {
        Self { event: event.into(), payload, ack_timeout: DEFAULT_ACK_TIMEOUT }
    }

    /// Override the acknowledgement deadline.
    #[must_use]
    pub fn with_ack_timeout(mut self, ack_timeout: Duration) -> Self {
        self.ack_timeout = ack_timeout;
        self
    }
}

/// Something that happened on the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// Namespace joined; events can flow.
    Connected {
        /// Socket.IO session id assigned by the server.
        sid: String,
    },

    /// Server emitted an event.
    Event {
        /// Event name.
        name: String,
        /// Event arguments.
        args: Vec<Value>,
    },

    /// Server acknowledged one of our events in time.
    Acknowledged {
        /// Name of the acknowledged event.
        event: String,
        /// Acknowledgement id.
        id: u64,
    },

    /// Server did not acknowledge one of our events before its deadline.
    AckTimedOut {
        /// Name of the event.
        event: String,
        /// Acknowledgement id.
        id: u64,
    },

    /// Channel closed. Nothing more will be delivered.
    Disconnected {
        /// Why the channel closed.
        reason: String,
    },
}

/// Emit/receive interface to the server.
///
/// # Delivery
///
/// Emits are best-effort. A missing acknowledgement is reported once as
/// [`ChannelEvent::AckTimedOut`]; the event is never retried.
pub trait Channel: Send {
    /// Implementation-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Emit an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel is closed.
    fn emit(&mut self, emit: Emit) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Next channel event, or `None` if nothing is ready.
    ///
    /// Never waits for the server; callers poll this once per cycle.
    fn recv(&mut self) -> impl Future<Output = Option<ChannelEvent>> + Send;

    /// Close the channel. Idempotent.
    fn close(&mut self);
}
