//! Fuzz target for EnginePacket::decode
//!
//! Feeds arbitrary text frames to the Engine.IO decoder to find:
//! - Panics on multi-byte first characters
//! - Handshakes that decode but cannot be re-encoded
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use parley_proto::EnginePacket;

fuzz_target!(|text: &str| {
    if let Ok(packet) = EnginePacket::decode(text) {
        // Anything that decodes must encode and decode to the same packet
        let encoded = packet.encode();
        assert_eq!(EnginePacket::decode(&encoded).ok(), Some(packet));
    }
});
