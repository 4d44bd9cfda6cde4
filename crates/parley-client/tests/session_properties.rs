//! Property-based tests for the session state machine.
//!
//! Drives a connected session with arbitrary interleavings of emits, server
//! acks and clock ticks, and checks the acknowledgement bookkeeping.

use std::{
    collections::BTreeMap,
    time::{Duration, Instant},
};

use parley_client::{ChannelEvent, Emit, Session, SessionAction, SessionConfig, SessionEvent};
use proptest::prelude::*;
use serde_json::json;

const OPEN: &str = r#"0{"sid":"e1","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#;

#[derive(Debug, Clone)]
enum Op {
    Emit { timeout_ms: u64 },
    Ack { id: u64 },
    Advance { ms: u64 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1u64..3000).prop_map(|timeout_ms| Op::Emit { timeout_ms }),
        (0u64..20).prop_map(|id| Op::Ack { id }),
        (0u64..2000).prop_map(|ms| Op::Advance { ms }),
    ]
}

fn connected(t0: Instant) -> Session {
    let mut session = Session::new(t0, SessionConfig::default());
    session.handle(t0, SessionEvent::TextReceived(OPEN.into())).unwrap();
    session.handle(t0, SessionEvent::TextReceived(r#"40{"sid":"s"}"#.into())).unwrap();
    session
}

proptest! {
    #[test]
    fn prop_every_emit_resolves_at_most_once(ops in prop::collection::vec(op(), 0..60)) {
        let t0 = Instant::now();
        let mut now = t0;
        let mut session = connected(t0);

        let mut emitted = 0u64;
        let mut resolved: BTreeMap<u64, usize> = BTreeMap::new();

        let mut record = |actions: Vec<SessionAction>| {
            for action in actions {
                if let SessionAction::Notify(
                    ChannelEvent::Acknowledged { id, .. } | ChannelEvent::AckTimedOut { id, .. },
                ) = action
                {
                    *resolved.entry(id).or_default() += 1;
                }
            }
        };

        for op in ops {
            match op {
                Op::Emit { timeout_ms } => {
                    let emit = Emit::new("receive", json!({}))
                        .with_ack_timeout(Duration::from_millis(timeout_ms));
                    record(session.handle(now, SessionEvent::Emit(emit)).unwrap());
                    emitted += 1;
                },
                Op::Ack { id } => {
                    let text = format!("43{id}[]");
                    record(session.handle(now, SessionEvent::TextReceived(text)).unwrap());
                },
                Op::Advance { ms } => {
                    // Server pings keep the heartbeat window open
                    now += Duration::from_millis(ms);
                    record(session.handle(now, SessionEvent::TextReceived("2".into())).unwrap());
                    record(session.handle(now, SessionEvent::Tick).unwrap());
                },
            }
        }

        prop_assert!(resolved.values().all(|count| *count == 1));
        prop_assert!(resolved.keys().all(|id| *id < emitted));
        prop_assert_eq!(resolved.len() + session.pending_acks(), emitted as usize);
    }

    #[test]
    fn prop_all_pending_expire_after_longest_deadline(
        timeouts in prop::collection::vec(1u64..5000, 1..20),
    ) {
        let t0 = Instant::now();
        let mut session = connected(t0);

        for timeout_ms in &timeouts {
            let emit = Emit::new("receive", json!({}))
                .with_ack_timeout(Duration::from_millis(*timeout_ms));
            session.handle(t0, SessionEvent::Emit(emit)).unwrap();
        }

        let longest = timeouts.iter().copied().max().unwrap_or(0);
        let actions = session.handle(t0 + Duration::from_millis(longest), SessionEvent::Tick).unwrap();

        let timed_out: Vec<u64> = actions
            .into_iter()
            .filter_map(|action| match action {
                SessionAction::Notify(ChannelEvent::AckTimedOut { id, .. }) => Some(id),
                _ => None,
            })
            .collect();

        let expected: Vec<u64> = (0..timeouts.len() as u64).collect();
        prop_assert_eq!(timed_out, expected);
        prop_assert_eq!(session.pending_acks(), 0);
    }
}
