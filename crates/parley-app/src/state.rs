//! Observable application state types.
//!
//! These structures are the "View Model" the UI renders from. They carry the
//! part of the session the user can see, without any wire details.

use parley_proto::payloads::InboundMessage;

use crate::Style;

/// Connection state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected to server.
    Disconnected,
    /// Connection in progress.
    Connecting,
    /// Connected with an established Socket.IO session.
    Connected {
        /// Session id assigned by the server.
        sid: String,
    },
}

/// A unit of displayed content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Text to display, never interpreted as markup.
    pub content: String,
    /// Visual treatment.
    pub style: Style,
}

impl Message {
    /// Create a message.
    pub fn new(content: impl Into<String>, style: Style) -> Self {
        Self { content: content.into(), style }
    }

    /// A message typed by the local user.
    pub fn human(content: impl Into<String>) -> Self {
        Self::new(content, Style::Human)
    }
}

impl From<InboundMessage> for Message {
    fn from(inbound: InboundMessage) -> Self {
        Self { style: Style::parse(&inbound.style), content: inbound.content }
    }
}
