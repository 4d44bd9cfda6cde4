//! Fuzz target for the client Session state machine
//!
//! Drives a session with an arbitrary mix of server frames, emits, clock
//! advances and closes.
//!
//! # Invariants
//!
//! - Never panics, whatever the server sends
//! - Pending acknowledgements never exceed the number of emits
//! - Nothing but an explicit close or a server close leaves `Closed`

#![no_main]

use std::time::{Duration, Instant};

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use parley_client::{Emit, Session, SessionConfig, SessionEvent, SessionState};

#[derive(Debug, Clone, Arbitrary)]
enum Step {
    /// Arbitrary text from the server.
    Raw(String),
    /// Well-formed frames a server would plausibly send.
    Open,
    ConnectOk,
    Event { ack: Option<u8> },
    Ack { id: u8 },
    Ping,
    /// Client actions.
    Emit { timeout_ms: u16 },
    Advance { ms: u16 },
    Close,
}

fuzz_target!(|steps: Vec<Step>| {
    let start = Instant::now();
    let mut now = start;
    let mut session = Session::new(now, SessionConfig::default());
    let mut emits = 0usize;
    let mut was_closed = false;

    for step in steps {
        let event = match step {
            Step::Raw(text) => SessionEvent::TextReceived(text),
            Step::Open => SessionEvent::TextReceived(
                r#"0{"sid":"s","upgrades":[],"pingInterval":25000,"pingTimeout":20000}"#.into(),
            ),
            Step::ConnectOk => SessionEvent::TextReceived(r#"40{"sid":"x"}"#.into()),
            Step::Event { ack } => {
                let id = ack.map(|id| id.to_string()).unwrap_or_default();
                SessionEvent::TextReceived(format!(r#"42{id}["message",{{"content":"c"}}]"#))
            },
            Step::Ack { id } => SessionEvent::TextReceived(format!("43{id}[]")),
            Step::Ping => SessionEvent::TextReceived("2".into()),
            Step::Emit { timeout_ms } => {
                emits += 1;
                let emit = Emit::new("receive", serde_json::json!({"user_input": "x"}))
                    .with_ack_timeout(Duration::from_millis(u64::from(timeout_ms)));
                SessionEvent::Emit(emit)
            },
            Step::Advance { ms } => {
                now += Duration::from_millis(u64::from(ms));
                SessionEvent::Tick
            },
            Step::Close => SessionEvent::Close,
        };

        let _ = session.handle(now, event);

        assert!(session.pending_acks() <= emits);
        if was_closed {
            assert_eq!(session.state(), SessionState::Closed);
        }
        was_closed = session.state() == SessionState::Closed;
    }
});
