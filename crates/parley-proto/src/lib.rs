//! Wire protocol for Parley
//!
//! Parley talks to its agent backend over Socket.IO v5, which is layered on
//! Engine.IO v4. Both layers are plain text on a WebSocket:
//!
//! ```text
//! WebSocket text frame
//! └── EnginePacket      "4" + data            (engine.rs)
//!     └── Packet        "2" + ["event", {..}] (packet.rs)
//!         └── payloads  {"content": .., "style": ..} (payloads.rs)
//! ```
//!
//! This crate is pure encoding and decoding. It holds no connection state;
//! the session state machine lives in `parley-client`.
//!
//! # Invariants
//!
//! - Decoding never panics. Arbitrary input either yields a packet or a
//!   [`ProtocolError`].
//! - Encoding is total. Every packet value constructed through this API has
//!   a wire representation.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod engine;
pub mod errors;
mod packet;
pub mod payloads;

pub use engine::{EnginePacket, Handshake};
pub use errors::{ProtocolError, Result};
pub use packet::{DEFAULT_NAMESPACE, Packet, PacketKind};

/// Engine.IO protocol revision spoken by this crate.
pub const ENGINE_IO_VERSION: u8 = 4;
