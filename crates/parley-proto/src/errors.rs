//! Protocol error types.

use thiserror::Error;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced while decoding Engine.IO or Socket.IO packets.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Packet text was empty.
    #[error("empty packet")]
    Empty,

    /// First character is not a known Engine.IO packet type.
    #[error("unknown engine packet type {0:?}")]
    UnknownEngineType(char),

    /// First character is not a known Socket.IO packet type.
    #[error("unknown socket packet type {0:?}")]
    UnknownPacketType(char),

    /// Binary packets carry out-of-band attachments we do not handle.
    #[error("binary packets are not supported")]
    BinaryUnsupported,

    /// Acknowledgement id did not fit in a u64.
    #[error("acknowledgement id out of range")]
    InvalidAckId,

    /// Packet body was not valid JSON.
    #[error("invalid JSON body: {0}")]
    Json(String),

    /// Packet body had the wrong shape for its type.
    #[error("malformed {kind} packet: {reason}")]
    Malformed {
        /// Packet type being decoded.
        kind: &'static str,
        /// What was wrong with it.
        reason: &'static str,
    },
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}
