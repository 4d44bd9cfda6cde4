//! Client
//!
//! Socket.IO session state machine and transport for Parley.
//!
//! # Architecture
//!
//! The protocol logic lives in [`Session`], a Sans-IO state machine: it takes
//! time and received text frames as input and returns [`SessionAction`]s for
//! the caller to execute. It never touches a socket, so it can be driven by a
//! real WebSocket or by in-memory pipes in tests and simulation.
//!
//! Applications only see the [`Channel`] trait: emit an event, receive
//! [`ChannelEvent`]s. This is the seam the application runtime is generic
//! over.
//!
//! # Components
//!
//! - [`Endpoint`]: Server origin and the WebSocket URL derived from it
//! - [`Session`]: Engine.IO / Socket.IO client state machine
//! - [`Channel`]: Emit/receive interface implemented by transports
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides:
//! - [`transport::ConnectedClient`]: Session running on a tokio task
//! - [`transport::connect`]: Dial a server over WebSocket

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod channel;
mod endpoint;
mod error;
mod session;

#[cfg(feature = "transport")]
pub mod transport;

pub use channel::{Channel, ChannelEvent, DEFAULT_ACK_TIMEOUT, Emit};
pub use endpoint::Endpoint;
pub use error::{EndpointError, SessionError};
pub use session::{
    DEFAULT_HANDSHAKE_TIMEOUT, Session, SessionAction, SessionConfig, SessionEvent, SessionState,
};
