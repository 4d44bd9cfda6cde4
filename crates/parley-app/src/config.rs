//! Client configuration.
//!
//! The three client variants (agent, gated agent, feedback echo) differ only
//! in the values held here. [`ClientConfig::preset`] builds each one; callers
//! override individual fields (server, ack timeout) afterwards.

use std::{fmt, time::Duration};

use parley_client::DEFAULT_ACK_TIMEOUT;
use parley_proto::payloads::{Feedback, TokenedInput, UserInput};
use serde_json::Value;

use crate::{Style, StyleSet, Tone};

/// Server origin of the gated and feedback presets.
pub const DEFAULT_SERVER: &str = "http://localhost:12345";

/// Server origin of the agent preset.
pub const AGENT_SERVER: &str = "http://0.0.0.0:12345";

/// Client variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Agent chat: `receive` with `{user_input}`, core styles.
    Agent,
    /// Agent chat behind an access token: `receive` with
    /// `{user_input, token}`, every style.
    Gated,
    /// Feedback echo: `message` with `{feedback}`, no local echo.
    Feedback,
}

impl Variant {
    /// Server origin the preset dials.
    pub fn server(self) -> &'static str {
        match self {
            Self::Agent => AGENT_SERVER,
            Self::Gated | Self::Feedback => DEFAULT_SERVER,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Agent => "agent",
            Self::Gated => "gated",
            Self::Feedback => "feedback",
        })
    }
}

/// Shape of the outbound payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// `{user_input}`
    UserInput,
    /// `{user_input, token}`
    TokenedInput,
    /// `{feedback}`
    Feedback,
}

impl PayloadShape {
    /// Build the payload for `text`.
    ///
    /// `token` is only read by [`PayloadShape::TokenedInput`]; a missing
    /// token is sent as the empty string.
    pub fn build(self, text: &str, token: Option<&str>) -> Value {
        let payload = match self {
            Self::UserInput => serde_json::to_value(UserInput { user_input: text.to_string() }),
            Self::TokenedInput => serde_json::to_value(TokenedInput {
                user_input: text.to_string(),
                token: token.unwrap_or_default().to_string(),
            }),
            Self::Feedback => serde_json::to_value(Feedback { feedback: text.to_string() }),
        };

        // Plain string structs always serialize
        payload.unwrap_or(Value::Null)
    }
}

/// Everything that distinguishes one client variant from another.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Variant this config was built from.
    pub variant: Variant,
    /// Server origin (`http://host:port`).
    pub server: String,
    /// Outbound event name.
    pub outbound_event: String,
    /// Outbound payload shape.
    pub payload: PayloadShape,
    /// Inbound event carrying chat messages.
    pub inbound_event: String,
    /// Styles with their own treatment.
    pub recognized: StyleSet,
    /// Tone for styles outside `recognized`.
    pub fallback_tone: Tone,
    /// Sending requires an access token.
    pub require_token: bool,
    /// Render submitted text locally as a `human` message.
    pub local_echo: bool,
    /// Acknowledgement deadline for outbound events.
    pub ack_timeout: Duration,
}

impl ClientConfig {
    /// Configuration for `variant`.
    pub fn preset(variant: Variant) -> Self {
        let base = Self {
            variant,
            server: variant.server().to_string(),
            outbound_event: "receive".to_string(),
            payload: PayloadShape::UserInput,
            inbound_event: "message".to_string(),
            recognized: StyleSet::of(&[Style::Human, Style::Speak, Style::System, Style::Task]),
            fallback_tone: Tone::Secondary,
            require_token: false,
            local_echo: true,
            ack_timeout: DEFAULT_ACK_TIMEOUT,
        };

        match variant {
            Variant::Agent => base,
            Variant::Gated => Self {
                payload: PayloadShape::TokenedInput,
                recognized: StyleSet::all(),
                require_token: true,
                ..base
            },
            Variant::Feedback => Self {
                outbound_event: "message".to_string(),
                payload: PayloadShape::Feedback,
                recognized: StyleSet::none(),
                fallback_tone: Tone::Primary,
                local_echo: false,
                ..base
            },
        }
    }

    /// Override the server origin.
    #[must_use]
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    /// Override the acknowledgement deadline.
    #[must_use]
    pub fn with_ack_timeout(mut self, ack_timeout: Duration) -> Self {
        self.ack_timeout = ack_timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn payload_shapes() {
        assert_eq!(PayloadShape::UserInput.build("hi", None), json!({"user_input": "hi"}));
        assert_eq!(
            PayloadShape::TokenedInput.build("hi", Some("t")),
            json!({"user_input": "hi", "token": "t"})
        );
        assert_eq!(PayloadShape::Feedback.build("hi", Some("t")), json!({"feedback": "hi"}));
    }

    #[test]
    fn presets_differ_only_where_variants_do() {
        let agent = ClientConfig::preset(Variant::Agent);
        let gated = ClientConfig::preset(Variant::Gated);
        let feedback = ClientConfig::preset(Variant::Feedback);

        assert_eq!(agent.outbound_event, "receive");
        assert!(!agent.require_token);
        assert!(gated.require_token);
        assert!(gated.recognized.contains(&Style::Criticism));
        assert!(!agent.recognized.contains(&Style::Criticism));

        assert_eq!(feedback.outbound_event, "message");
        assert!(!feedback.local_echo);
        assert_eq!(feedback.fallback_tone, Tone::Primary);

        assert_eq!(agent.server, "http://0.0.0.0:12345");
        assert_eq!(gated.server, "http://localhost:12345");
        assert_eq!(feedback.server, gated.server);

        for config in [agent, gated, feedback] {
            assert_eq!(config.inbound_event, "message");
            assert_eq!(config.ack_timeout, Duration::from_millis(5000));
        }
    }
}
