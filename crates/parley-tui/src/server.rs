//! In-process demo server.
//!
//! Speaks real Engine.IO / Socket.IO text frames over mpsc pipes, so the
//! client's session and transport task run unchanged against it. No network:
//! useful for trying the UI without an agent backend.
//!
//! The protocol side is a Sans-IO [`DemoBackend`]; [`spawn`] only moves its
//! frames and adds the reply delay and heartbeats.

use std::time::Duration;

use parley_proto::{
    EnginePacket, Handshake, Packet, PacketKind,
    payloads::{Feedback, UserInput},
};
use serde_json::{Value, json};
use tokio::{sync::mpsc, task::AbortHandle};

/// Capacity of each pipe.
const PIPE_DEPTH: usize = 32;

/// Engine.IO session id handed to the client.
const ENGINE_SID: &str = "demo-engine";

/// Socket.IO session id handed to the client.
const SOCKET_SID: &str = "demo";

/// Interval between server pings.
const PING_INTERVAL: Duration = Duration::from_secs(25);

/// Grace period the client allows after a missed ping.
const PING_TIMEOUT: Duration = Duration::from_secs(20);

/// Placeholder shown while the demo "agent" thinks.
pub const THINKING: &str = "Thinking...";

/// A frame produced by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Send right away.
    Now(String),
    /// Send after the reply delay.
    Later(String),
}

/// Demo backend protocol logic.
///
/// Acknowledges every event. `receive` gets a `system` placeholder and then a
/// `speak` reply; `message` is echoed back with the `primary` style.
#[derive(Debug, Default)]
pub struct DemoBackend {
    /// Whether the client has joined the namespace.
    connected: bool,
}

impl DemoBackend {
    /// Create a backend waiting for the client to join.
    pub fn new() -> Self {
        Self::default()
    }

    /// The Engine.IO `open` frame that starts every connection.
    pub fn open() -> String {
        EnginePacket::Open(Handshake {
            sid: ENGINE_SID.to_string(),
            upgrades: Vec::new(),
            ping_interval: duration_ms(PING_INTERVAL),
            ping_timeout: duration_ms(PING_TIMEOUT),
            max_payload: 1_000_000,
        })
        .encode()
    }

    /// Handle one frame from the client.
    ///
    /// Returns `None` once the client has left.
    pub fn handle(&mut self, text: &str) -> Option<Vec<Outbound>> {
        let packet = match EnginePacket::decode(text) {
            Ok(EnginePacket::Message(data)) => match Packet::decode(&data) {
                Ok(packet) => packet,
                Err(e) => {
                    tracing::warn!(error = %e, "demo server: bad packet");
                    return Some(vec![]);
                },
            },
            Ok(EnginePacket::Close) => return None,
            Ok(_) => return Some(vec![]),
            Err(e) => {
                tracing::warn!(error = %e, "demo server: bad frame");
                return Some(vec![]);
            },
        };

        match packet.kind {
            PacketKind::Connect => {
                self.connected = true;
                let reply = Packet::connect(&packet.namespace, Some(json!({ "sid": SOCKET_SID })));
                Some(vec![Outbound::Now(wrap(&reply))])
            },
            PacketKind::Disconnect => None,
            PacketKind::Event if self.connected => Some(self.handle_event(packet)),
            _ => {
                tracing::debug!(kind = packet.kind.name(), "demo server: ignoring packet");
                Some(vec![])
            },
        }
    }

    fn handle_event(&self, packet: Packet) -> Vec<Outbound> {
        let namespace = packet.namespace.clone();
        let id = packet.id;
        let Ok((name, args)) = packet.into_event() else {
            return vec![];
        };

        let mut out = Vec::new();
        if let Some(id) = id {
            out.push(Outbound::Now(wrap(&Packet::ack(&namespace, id, vec![]))));
        }

        let payload = args.into_iter().next().unwrap_or(Value::Null);
        match name.as_str() {
            "receive" => match serde_json::from_value::<UserInput>(payload) {
                Ok(input) => {
                    out.push(Outbound::Now(message(&namespace, THINKING, "system")));
                    let reply = format!("You said: {}", input.user_input);
                    out.push(Outbound::Later(message(&namespace, &reply, "speak")));
                },
                Err(e) => tracing::warn!(error = %e, "demo server: bad receive payload"),
            },
            "message" => match serde_json::from_value::<Feedback>(payload) {
                Ok(feedback) => {
                    out.push(Outbound::Now(message(&namespace, &feedback.feedback, "primary")));
                },
                Err(e) => tracing::warn!(error = %e, "demo server: bad feedback payload"),
            },
            other => tracing::debug!(event = %other, "demo server: unhandled event"),
        }

        out
    }
}

/// Handle to a running demo server.
///
/// Dropping the handle stops the server.
pub struct DemoServer {
    abort_handle: AbortHandle,
}

impl DemoServer {
    /// Stop the server.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

impl Drop for DemoServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Pipes connecting a client to the demo server.
pub struct ClientPipes {
    /// Frames from the server.
    pub from_server: mpsc::Receiver<String>,
    /// Frames to the server.
    pub to_server: mpsc::Sender<String>,
}

/// Spawn the demo server. Must be called from within a tokio runtime.
///
/// `reply_delay` is how long the `system` placeholder stays up before the
/// `speak` reply replaces it.
pub fn spawn(reply_delay: Duration) -> (DemoServer, ClientPipes) {
    let (client_tx, server_rx) = mpsc::channel::<String>(PIPE_DEPTH);
    let (server_tx, client_rx) = mpsc::channel::<String>(PIPE_DEPTH);

    let handle = tokio::spawn(serve(server_rx, server_tx, reply_delay));

    (
        DemoServer { abort_handle: handle.abort_handle() },
        ClientPipes { from_server: client_rx, to_server: client_tx },
    )
}

async fn serve(
    mut from_client: mpsc::Receiver<String>,
    to_client: mpsc::Sender<String>,
    reply_delay: Duration,
) {
    let mut backend = DemoBackend::new();
    if to_client.send(DemoBackend::open()).await.is_err() {
        return;
    }

    let mut heartbeat = tokio::time::interval(PING_INTERVAL);
    heartbeat.reset();

    loop {
        tokio::select! {
            text = from_client.recv() => {
                let Some(text) = text else { break };
                let Some(outbound) = backend.handle(&text) else {
                    tracing::debug!("demo server: client left");
                    break;
                };

                for frame in outbound {
                    let text = match frame {
                        Outbound::Now(text) => text,
                        Outbound::Later(text) => {
                            tokio::time::sleep(reply_delay).await;
                            text
                        },
                    };
                    if to_client.send(text).await.is_err() {
                        return;
                    }
                }
            }
            _ = heartbeat.tick() => {
                if to_client.send(EnginePacket::Ping(String::new()).encode()).await.is_err() {
                    break;
                }
            }
        }
    }
}

/// Wrap a Socket.IO packet in an Engine.IO `message` frame.
fn wrap(packet: &Packet) -> String {
    EnginePacket::Message(packet.encode()).encode()
}

fn message(namespace: &str, content: &str, style: &str) -> String {
    let body = json!({ "content": content, "style": style });
    wrap(&Packet::event(namespace, "message", vec![body], None))
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
