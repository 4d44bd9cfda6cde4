//! Fuzz target for Packet::decode
//!
//! Feeds arbitrary Engine.IO message data to the Socket.IO decoder to find:
//! - Panics while splitting namespace, ack id and body
//! - Ack ids that overflow
//! - Events that pass validation without a name
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use parley_proto::{Packet, PacketKind};

fuzz_target!(|text: &str| {
    let Ok(packet) = Packet::decode(text) else {
        return;
    };

    if packet.kind == PacketKind::Event {
        assert!(packet.event_name().is_some());
        let _ = packet.into_event();
    }
});
