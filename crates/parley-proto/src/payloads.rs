//! JSON event payloads.
//!
//! Event arguments are free-form JSON on the wire. These are the shapes the
//! agent backend and the client agree on.

use serde::{Deserialize, Serialize};

/// Inbound chat message (`message` event).
///
/// Both fields are lenient: a backend that omits `style` gets the default
/// visual treatment, one that omits `content` renders an empty bubble.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Text to display.
    #[serde(default)]
    pub content: String,
    /// Style tag selecting the visual treatment.
    #[serde(default)]
    pub style: String,
}

/// User input (`receive` event).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInput {
    /// Text typed by the user.
    pub user_input: String,
}

/// User input with the access token (`receive` event, gated backends).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenedInput {
    /// Text typed by the user.
    pub user_input: String,
    /// Access token entered in the token dialog.
    pub token: String,
}

/// Free-form feedback (`message` event, echo backends).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    /// Text typed by the user.
    pub feedback: String,
}
