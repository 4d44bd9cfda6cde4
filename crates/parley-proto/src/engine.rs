//! Engine.IO transport packets.
//!
//! Over a WebSocket every text frame carries exactly one Engine.IO packet: a
//! single type digit followed by the packet data. Only `message` packets carry
//! Socket.IO traffic; the rest drive the transport lifecycle (open, close,
//! heartbeats).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::{ProtocolError, Result};

/// Handshake sent by the server in the `open` packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    /// Engine.IO session id.
    pub sid: String,
    /// Transports the server offers to upgrade to.
    #[serde(default)]
    pub upgrades: Vec<String>,
    /// Interval between server pings, in milliseconds.
    pub ping_interval: u64,
    /// Grace period after a missed ping, in milliseconds.
    pub ping_timeout: u64,
    /// Largest payload the server accepts, in bytes.
    #[serde(default)]
    pub max_payload: u64,
}

impl Handshake {
    /// Window after which a silent server is considered gone.
    ///
    /// A v4 server pings every `ping_interval`; the client waits one extra
    /// `ping_timeout` before giving up.
    pub fn heartbeat_window(&self) -> Duration {
        Duration::from_millis(self.ping_interval.saturating_add(self.ping_timeout))
    }
}

/// A single Engine.IO packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnginePacket {
    /// `0`: transport opened, carries the handshake.
    Open(Handshake),
    /// `1`: transport closing.
    Close,
    /// `2`: heartbeat probe (sent by the server in v4).
    Ping(String),
    /// `3`: heartbeat reply.
    Pong(String),
    /// `4`: Socket.IO payload.
    Message(String),
    /// `5`: transport upgrade.
    Upgrade,
    /// `6`: no-op.
    Noop,
}

impl EnginePacket {
    /// Encode into the text of one WebSocket frame.
    pub fn encode(&self) -> String {
        match self {
            Self::Open(handshake) => {
                let body = json!({
                    "sid": handshake.sid,
                    "upgrades": handshake.upgrades,
                    "pingInterval": handshake.ping_interval,
                    "pingTimeout": handshake.ping_timeout,
                    "maxPayload": handshake.max_payload,
                });
                format!("0{body}")
            },
            Self::Close => "1".to_string(),
            Self::Ping(data) => format!("2{data}"),
            Self::Pong(data) => format!("3{data}"),
            Self::Message(data) => format!("4{data}"),
            Self::Upgrade => "5".to_string(),
            Self::Noop => "6".to_string(),
        }
    }

    /// Decode the text of one WebSocket frame.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::Empty` for an empty frame
    /// - `ProtocolError::UnknownEngineType` for an unknown type digit
    /// - `ProtocolError::Json` if the `open` handshake is not valid JSON
    pub fn decode(text: &str) -> Result<Self> {
        let mut chars = text.chars();
        let kind = chars.next().ok_or(ProtocolError::Empty)?;
        let data = chars.as_str();

        match kind {
            '0' => Ok(Self::Open(serde_json::from_str(data)?)),
            '1' => Ok(Self::Close),
            '2' => Ok(Self::Ping(data.to_string())),
            '3' => Ok(Self::Pong(data.to_string())),
            '4' => Ok(Self::Message(data.to_string())),
            '5' => Ok(Self::Upgrade),
            '6' => Ok(Self::Noop),
            other => Err(ProtocolError::UnknownEngineType(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_open_handshake() {
        let text = r#"0{"sid":"lv_VI97HAXpY6yYWAAAC","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#;
        let packet = EnginePacket::decode(text).unwrap();

        let EnginePacket::Open(handshake) = packet else {
            panic!("expected open packet, got {packet:?}");
        };
        assert_eq!(handshake.sid, "lv_VI97HAXpY6yYWAAAC");
        assert_eq!(handshake.heartbeat_window(), Duration::from_millis(45_000));
    }

    #[test]
    fn decode_open_without_optional_fields() {
        let packet = EnginePacket::decode(r#"0{"sid":"a","pingInterval":1,"pingTimeout":2}"#);
        assert!(matches!(packet, Ok(EnginePacket::Open(Handshake { max_payload: 0, .. }))));
    }

    #[test]
    fn decode_heartbeats_keep_probe_data() {
        assert_eq!(EnginePacket::decode("2"), Ok(EnginePacket::Ping(String::new())));
        assert_eq!(EnginePacket::decode("3probe"), Ok(EnginePacket::Pong("probe".into())));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert_eq!(EnginePacket::decode(""), Err(ProtocolError::Empty));
        assert_eq!(EnginePacket::decode("x42"), Err(ProtocolError::UnknownEngineType('x')));
        assert!(matches!(EnginePacket::decode("0{not json"), Err(ProtocolError::Json(_))));
    }

    #[test]
    fn message_wraps_socket_payload_verbatim() {
        let packet = EnginePacket::Message(r#"2["message",{}]"#.into());
        assert_eq!(packet.encode(), r#"42["message",{}]"#);
    }

    #[test]
    fn open_encodes_camel_case_fields() {
        let packet = EnginePacket::Open(Handshake {
            sid: "s".into(),
            upgrades: vec![],
            ping_interval: 25_000,
            ping_timeout: 20_000,
            max_payload: 1_000_000,
        });

        let decoded = EnginePacket::decode(&packet.encode()).unwrap();
        assert_eq!(decoded, packet);
        assert!(packet.encode().contains("\"pingInterval\":25000"));
    }
}
