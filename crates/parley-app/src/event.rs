//! Application input events.
//!
//! This module defines [`AppEvent`], the complete set of inputs that drive the
//! [`crate::App`] state machine.
//!
//! Events originate from two distinct sources:
//! - User interactions (Keyboard, Resize) and system ticks.
//! - Channel notifications translated by the [`crate::Bridge`].

use crate::{KeyInput, Message};

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyInput),

    /// Periodic tick.
    Tick,

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// Connection in progress.
    Connecting,

    /// Connected to server.
    Connected {
        /// Socket.IO session id.
        sid: String,
    },

    /// Connection lost or closed.
    Disconnected {
        /// Why the connection ended.
        reason: String,
    },

    /// Chat message received.
    MessageReceived(Message),

    /// Error occurred.
    Error {
        /// Error description.
        message: String,
    },
}
