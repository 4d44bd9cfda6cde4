//! Error types for the client.

use parley_proto::ProtocolError;
use thiserror::Error;

use crate::session::SessionState;

/// Errors from the session state machine.
///
/// None of these are fatal on their own. The driver logs them and keeps
/// feeding the session; fatal conditions surface as
/// [`SessionAction::Close`](crate::SessionAction::Close) instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Received text was not a valid packet.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Received a packet that makes no sense in the current state.
    #[error("unexpected {packet} packet in state {state:?}")]
    UnexpectedPacket {
        /// State when the packet arrived
        state: SessionState,
        /// Packet type
        packet: &'static str,
    },

    /// Operation not allowed in the current state.
    #[error("invalid state: cannot {operation} in state {state:?}")]
    InvalidState {
        /// Current state
        state: SessionState,
        /// Operation that was attempted
        operation: &'static str,
    },
}

/// Errors from parsing a server origin.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EndpointError {
    /// Not a URL at all.
    #[error("invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Scheme other than `http` or `ws`.
    #[error("unsupported scheme {0:?}, expected http or ws")]
    UnsupportedScheme(String),

    /// `https`/`wss` origins need TLS, which this client does not speak.
    #[error("TLS endpoints are not supported")]
    TlsUnsupported,

    /// URL has no host component.
    #[error("server URL has no host")]
    MissingHost,
}
