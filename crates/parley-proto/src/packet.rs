//! Socket.IO packets.
//!
//! A Socket.IO packet travels as the data of an Engine.IO `message`:
//!
//! ```text
//! <type>[<namespace>,][<ack id>][<json>]
//!
//! 0{"sid":"x"}                  CONNECT reply on "/"
//! 2["message",{"content":"hi"}] EVENT
//! 212["receive",{..}]           EVENT requesting ack 12
//! 312[]                         ACK for 12
//! 2/admin,["ping"]              EVENT on "/admin"
//! ```
//!
//! # Invariants
//!
//! - A decoded `Event` always carries a non-empty JSON array whose first
//!   element is the event name.
//! - A decoded `Ack` always carries an id.

use serde_json::Value;

use crate::errors::{ProtocolError, Result};

/// The namespace every client joins unless told otherwise.
pub const DEFAULT_NAMESPACE: &str = "/";

/// Socket.IO packet type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketKind {
    /// Namespace connection request (client) or confirmation (server).
    Connect,
    /// Namespace disconnection.
    Disconnect,
    /// Named event with JSON arguments.
    Event,
    /// Acknowledgement of an event.
    Ack,
    /// Namespace connection refused.
    ConnectError,
    /// Event with binary attachments.
    BinaryEvent,
    /// Acknowledgement with binary attachments.
    BinaryAck,
}

impl PacketKind {
    /// Wire digit for this type.
    pub fn as_char(self) -> char {
        match self {
            Self::Connect => '0',
            Self::Disconnect => '1',
            Self::Event => '2',
            Self::Ack => '3',
            Self::ConnectError => '4',
            Self::BinaryEvent => '5',
            Self::BinaryAck => '6',
        }
    }

    /// Parse a wire digit.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::UnknownPacketType` for anything outside `0..=6`
    pub fn from_char(c: char) -> Result<Self> {
        match c {
            '0' => Ok(Self::Connect),
            '1' => Ok(Self::Disconnect),
            '2' => Ok(Self::Event),
            '3' => Ok(Self::Ack),
            '4' => Ok(Self::ConnectError),
            '5' => Ok(Self::BinaryEvent),
            '6' => Ok(Self::BinaryAck),
            other => Err(ProtocolError::UnknownPacketType(other)),
        }
    }

    /// Protocol name of this type, as used in logs and errors.
    pub fn name(self) -> &'static str {
        match self {
            Self::Connect => "CONNECT",
            Self::Disconnect => "DISCONNECT",
            Self::Event => "EVENT",
            Self::Ack => "ACK",
            Self::ConnectError => "CONNECT_ERROR",
            Self::BinaryEvent => "BINARY_EVENT",
            Self::BinaryAck => "BINARY_ACK",
        }
    }
}

/// A Socket.IO packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Packet type.
    pub kind: PacketKind,
    /// Target namespace, `/` by default.
    pub namespace: String,
    /// Acknowledgement id. Present on events that expect an ack and on acks.
    pub id: Option<u64>,
    /// JSON body.
    pub data: Option<Value>,
}

impl Packet {
    /// Request to join `namespace`, optionally with auth data.
    pub fn connect(namespace: &str, auth: Option<Value>) -> Self {
        Self { kind: PacketKind::Connect, namespace: namespace.to_string(), id: None, data: auth }
    }

    /// Leave `namespace`.
    pub fn disconnect(namespace: &str) -> Self {
        Self {
            kind: PacketKind::Disconnect,
            namespace: namespace.to_string(),
            id: None,
            data: None,
        }
    }

    /// Named event. `id` asks the peer for an acknowledgement.
    pub fn event(namespace: &str, name: &str, args: Vec<Value>, id: Option<u64>) -> Self {
        let mut body = Vec::with_capacity(args.len().saturating_add(1));
        body.push(Value::String(name.to_string()));
        body.extend(args);

        Self {
            kind: PacketKind::Event,
            namespace: namespace.to_string(),
            id,
            data: Some(Value::Array(body)),
        }
    }

    /// Acknowledge event `id` with `args`.
    pub fn ack(namespace: &str, id: u64, args: Vec<Value>) -> Self {
        Self {
            kind: PacketKind::Ack,
            namespace: namespace.to_string(),
            id: Some(id),
            data: Some(Value::Array(args)),
        }
    }

    /// Encode into the data of an Engine.IO `message` packet.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        out.push(self.kind.as_char());

        if !is_default_namespace(&self.namespace) {
            out.push_str(&self.namespace);
            out.push(',');
        }
        if let Some(id) = self.id {
            out.push_str(&id.to_string());
        }
        if let Some(data) = &self.data {
            out.push_str(&data.to_string());
        }

        out
    }

    /// Decode the data of an Engine.IO `message` packet.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::Empty` / `UnknownPacketType` for a bad type digit
    /// - `ProtocolError::BinaryUnsupported` for binary events and acks
    /// - `ProtocolError::InvalidAckId` if the id overflows
    /// - `ProtocolError::Json` if the body is not JSON
    /// - `ProtocolError::Malformed` if the body has the wrong shape
    pub fn decode(text: &str) -> Result<Self> {
        let mut chars = text.chars();
        let kind = PacketKind::from_char(chars.next().ok_or(ProtocolError::Empty)?)?;
        if matches!(kind, PacketKind::BinaryEvent | PacketKind::BinaryAck) {
            return Err(ProtocolError::BinaryUnsupported);
        }

        let mut rest = chars.as_str();

        let namespace = if rest.starts_with('/') {
            let end = rest.find(',').unwrap_or(rest.len());
            let namespace = rest[..end].to_string();
            rest = rest.get(end.saturating_add(1)..).unwrap_or("");
            namespace
        } else {
            DEFAULT_NAMESPACE.to_string()
        };

        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        let id = if digits > 0 {
            Some(rest[..digits].parse::<u64>().map_err(|_| ProtocolError::InvalidAckId)?)
        } else {
            None
        };
        rest = &rest[digits..];

        let data = if rest.is_empty() { None } else { Some(serde_json::from_str(rest)?) };

        let packet = Self { kind, namespace, id, data };
        packet.validate()?;
        Ok(packet)
    }

    /// Event name, if this is a well-formed event.
    pub fn event_name(&self) -> Option<&str> {
        if self.kind != PacketKind::Event {
            return None;
        }
        match &self.data {
            Some(Value::Array(items)) => items.first().and_then(Value::as_str),
            _ => None,
        }
    }

    /// Split an event into its name and arguments.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::Malformed` if this is not a well-formed event
    pub fn into_event(self) -> Result<(String, Vec<Value>)> {
        let malformed = ProtocolError::Malformed {
            kind: PacketKind::Event.name(),
            reason: "expected [name, ...args]",
        };
        if self.kind != PacketKind::Event {
            return Err(malformed);
        }

        let Some(Value::Array(mut items)) = self.data else {
            return Err(malformed);
        };
        if items.is_empty() {
            return Err(malformed);
        }
        match items.remove(0) {
            Value::String(name) => Ok((name, items)),
            _ => Err(malformed),
        }
    }

    /// Session id from a server `CONNECT` reply.
    pub fn sid(&self) -> Option<&str> {
        match (&self.kind, &self.data) {
            (PacketKind::Connect, Some(data)) => data.get("sid").and_then(Value::as_str),
            _ => None,
        }
    }

    /// Human-readable reason from a `CONNECT_ERROR`.
    pub fn error_message(&self) -> String {
        match &self.data {
            Some(Value::String(message)) => message.clone(),
            Some(data) => data
                .get("message")
                .and_then(Value::as_str)
                .map_or_else(|| data.to_string(), ToString::to_string),
            None => "connection refused".to_string(),
        }
    }

    fn validate(&self) -> Result<()> {
        let kind = self.kind.name();
        match self.kind {
            PacketKind::Event => {
                if self.event_name().is_none() {
                    return Err(ProtocolError::Malformed { kind, reason: "expected [name, ...args]" });
                }
            },
            PacketKind::Ack => {
                if self.id.is_none() {
                    return Err(ProtocolError::Malformed { kind, reason: "missing ack id" });
                }
                if !matches!(self.data, None | Some(Value::Array(_))) {
                    return Err(ProtocolError::Malformed { kind, reason: "expected array body" });
                }
            },
            PacketKind::Connect => {
                if !matches!(self.data, None | Some(Value::Object(_))) {
                    return Err(ProtocolError::Malformed { kind, reason: "expected object body" });
                }
            },
            PacketKind::Disconnect
            | PacketKind::ConnectError
            | PacketKind::BinaryEvent
            | PacketKind::BinaryAck => {},
        }
        Ok(())
    }
}

fn is_default_namespace(namespace: &str) -> bool {
    namespace.is_empty() || namespace == DEFAULT_NAMESPACE
}
