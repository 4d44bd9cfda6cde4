//! Socket.IO session state machine.
//!
//! Drives one Engine.IO transport and the single Socket.IO namespace on top
//! of it. Uses the action pattern: [`Session::handle`] takes the current time
//! and an event, and returns actions for the driver to execute. No I/O
//! happens here.
//!
//! # State Machine
//!
//! ```text
//! ┌─────────┐  open   ┌────────────┐  CONNECT   ┌───────────┐
//! │ Opening │────────>│ Connecting │───────────>│ Connected │
//! └─────────┘         └────────────┘            └───────────┘
//!      │                    │                         │
//!      │ handshake timeout  │ CONNECT_ERROR / timeout │ close / ping timeout
//!      ↓                    ↓                         ↓
//!                        ┌────────┐
//!                        │ Closed │
//!                        └────────┘
//! ```
//!
//! # Acknowledgements
//!
//! Every emit gets the next ack id and a deadline measured from the moment
//! it was handed to the session, even if it is still buffered waiting for
//! the namespace to connect. Each pending ack resolves exactly once: either
//! [`ChannelEvent::Acknowledged`] or [`ChannelEvent::AckTimedOut`].

use std::{
    collections::BTreeMap,
    ops::Sub,
    time::{Duration, Instant},
};

use parley_proto::{DEFAULT_NAMESPACE, EnginePacket, Packet, PacketKind};
use serde_json::Value;

use crate::{
    channel::{ChannelEvent, Emit},
    error::SessionError,
};

/// Time allowed from transport start to a connected namespace.
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(20);

/// Session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the Engine.IO `open` handshake
    Opening,
    /// Transport open, namespace `CONNECT` sent
    Connecting,
    /// Namespace joined, events flow
    Connected,
    /// Session over (graceful or error)
    Closed,
}

/// Session configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Namespace to join.
    pub namespace: String,
    /// Auth payload sent with the namespace `CONNECT`.
    pub auth: Option<Value>,
    /// Timeout for reaching [`SessionState::Connected`].
    pub handshake_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            auth: None,
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
        }
    }
}

/// Input to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Text frame received from the transport.
    TextReceived(String),
    /// Application wants to emit an event.
    Emit(Emit),
    /// Time passed; check deadlines.
    Tick,
    /// Application wants to leave.
    Close,
}

/// Actions returned by the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// Send this text frame to the server.
    SendText(String),
    /// Deliver this event to the application.
    Notify(ChannelEvent),
    /// Shut the transport down.
    Close {
        /// Reason for closing
        reason: String,
    },
}

#[derive(Debug, Clone)]
struct PendingAck<I> {
    event: String,
    sent_at: I,
    timeout: Duration,
}

/// Socket.IO client session.
///
/// Generic over `Instant` to support both real time and virtual time for
/// deterministic testing.
#[derive(Debug, Clone)]
pub struct Session<I = Instant>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    state: SessionState,
    config: SessionConfig,
    /// When the transport was started
    started_at: I,
    /// Last ping from the server, or the handshake if none yet
    last_ping: I,
    /// `pingInterval + pingTimeout` from the handshake
    heartbeat_window: Option<Duration>,
    sid: Option<String>,
    next_ack_id: u64,
    pending: BTreeMap<u64, PendingAck<I>>,
    /// Encoded emits waiting for the namespace to connect
    outbox: Vec<String>,
}

impl<I> Session<I>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    /// Create a session whose transport was started at `now`.
    pub fn new(now: I, config: SessionConfig) -> Self {
        Self {
            state: SessionState::Opening,
            config,
            started_at: now,
            last_ping: now,
            heartbeat_window: None,
            sid: None,
            next_ack_id: 0,
            pending: BTreeMap::new(),
            outbox: Vec::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Socket.IO session id. `None` until connected.
    pub fn sid(&self) -> Option<&str> {
        self.sid.as_deref()
    }

    /// Number of emits still waiting for an acknowledgement.
    pub fn pending_acks(&self) -> usize {
        self.pending.len()
    }

    /// Process one event.
    ///
    /// # Errors
    ///
    /// - `SessionError::Protocol` if received text does not decode
    /// - `SessionError::UnexpectedPacket` for a packet invalid in this state
    /// - `SessionError::InvalidState` for an emit after close
    pub fn handle(
        &mut self,
        now: I,
        event: SessionEvent,
    ) -> Result<Vec<SessionAction>, SessionError> {
        match event {
            SessionEvent::TextReceived(text) => self.handle_text(now, &text),
            SessionEvent::Emit(emit) => self.handle_emit(now, emit),
            SessionEvent::Tick => Ok(self.tick(now)),
            SessionEvent::Close => Ok(self.handle_close()),
        }
    }

    fn handle_text(&mut self, now: I, text: &str) -> Result<Vec<SessionAction>, SessionError> {
        if self.state == SessionState::Closed {
            tracing::debug!("dropping frame received after close");
            return Ok(vec![]);
        }

        match EnginePacket::decode(text)? {
            EnginePacket::Open(handshake) => {
                if self.state != SessionState::Opening {
                    return Err(SessionError::UnexpectedPacket { state: self.state, packet: "open" });
                }

                tracing::debug!(sid = %handshake.sid, "engine transport open");
                self.heartbeat_window = Some(handshake.heartbeat_window());
                self.last_ping = now;
                self.state = SessionState::Connecting;

                let connect = Packet::connect(&self.config.namespace, self.config.auth.clone());
                Ok(vec![send(&connect)])
            },
            EnginePacket::Ping(data) => {
                self.last_ping = now;
                Ok(vec![SessionAction::SendText(EnginePacket::Pong(data).encode())])
            },
            EnginePacket::Close => Ok(self.close("server closed the transport".to_string())),
            EnginePacket::Message(data) => self.handle_packet(Packet::decode(&data)?),
            EnginePacket::Pong(_) | EnginePacket::Upgrade | EnginePacket::Noop => Ok(vec![]),
        }
    }

    fn handle_packet(&mut self, packet: Packet) -> Result<Vec<SessionAction>, SessionError> {
        if packet.namespace != self.config.namespace {
            tracing::debug!(namespace = %packet.namespace, "ignoring packet for foreign namespace");
            return Ok(vec![]);
        }

        match (self.state, packet.kind) {
            (SessionState::Connecting, PacketKind::Connect) => {
                let sid = packet.sid().unwrap_or_default().to_string();
                tracing::info!(%sid, namespace = %self.config.namespace, "connected");

                self.sid = Some(sid.clone());
                self.state = SessionState::Connected;

                let mut actions = vec![SessionAction::Notify(ChannelEvent::Connected { sid })];
                actions.extend(self.outbox.drain(..).map(SessionAction::SendText));
                Ok(actions)
            },
            (SessionState::Connecting | SessionState::Connected, PacketKind::ConnectError) => {
                Ok(self.close(format!("connection refused: {}", packet.error_message())))
            },
            (SessionState::Connecting | SessionState::Connected, PacketKind::Disconnect) => {
                Ok(self.close("server disconnected the namespace".to_string()))
            },
            (SessionState::Connected, PacketKind::Event) => {
                let id = packet.id;
                let namespace = packet.namespace.clone();
                let (name, args) = packet.into_event()?;

                let mut actions = Vec::with_capacity(2);
                if let Some(id) = id {
                    actions.push(send(&Packet::ack(&namespace, id, vec![])));
                }
                actions.push(SessionAction::Notify(ChannelEvent::Event { name, args }));
                Ok(actions)
            },
            (SessionState::Connected, PacketKind::Ack) => {
                let Some(id) = packet.id else {
                    return Err(SessionError::UnexpectedPacket { state: self.state, packet: "ACK" });
                };

                match self.pending.remove(&id) {
                    Some(pending) => Ok(vec![SessionAction::Notify(ChannelEvent::Acknowledged {
                        event: pending.event,
                        id,
                    })]),
                    None => {
                        tracing::debug!(id, "ack for unknown or expired event");
                        Ok(vec![])
                    },
                }
            },
            (state, kind) => {
                Err(SessionError::UnexpectedPacket { state, packet: kind.name() })
            },
        }
    }

    fn handle_emit(&mut self, now: I, emit: Emit) -> Result<Vec<SessionAction>, SessionError> {
        if self.state == SessionState::Closed {
            return Err(SessionError::InvalidState { state: self.state, operation: "emit" });
        }

        let id = self.next_ack_id;
        self.next_ack_id = self.next_ack_id.wrapping_add(1);

        let packet = Packet::event(&self.config.namespace, &emit.event, vec![emit.payload], Some(id));
        let text = EnginePacket::Message(packet.encode()).encode();

        self.pending.insert(id, PendingAck {
            event: emit.event,
            sent_at: now,
            timeout: emit.ack_timeout,
        });

        if self.state == SessionState::Connected {
            Ok(vec![SessionAction::SendText(text)])
        } else {
            tracing::debug!(id, "buffering emit until connected");
            self.outbox.push(text);
            Ok(vec![])
        }
    }

    /// Expire acknowledgements and check transport deadlines.
    fn tick(&mut self, now: I) -> Vec<SessionAction> {
        if self.state == SessionState::Closed {
            return vec![];
        }

        let expired: Vec<u64> = self
            .pending
            .iter()
            .filter(|(_, pending)| now - pending.sent_at >= pending.timeout)
            .map(|(id, _)| *id)
            .collect();

        let mut actions = Vec::new();
        for id in expired {
            if let Some(pending) = self.pending.remove(&id) {
                actions.push(SessionAction::Notify(ChannelEvent::AckTimedOut {
                    event: pending.event,
                    id,
                }));
            }
        }

        let elapsed = now - self.started_at;
        if self.state != SessionState::Connected && elapsed >= self.config.handshake_timeout {
            actions.extend(self.close(format!("handshake timeout after {elapsed:?}")));
            return actions;
        }

        if let Some(window) = self.heartbeat_window {
            let silent = now - self.last_ping;
            if silent >= window {
                actions.extend(self.close(format!("ping timeout after {silent:?}")));
            }
        }

        actions
    }

    fn handle_close(&mut self) -> Vec<SessionAction> {
        match self.state {
            SessionState::Closed => vec![],
            SessionState::Opening => self.close("client closed".to_string()),
            SessionState::Connecting | SessionState::Connected => {
                let mut actions = vec![send(&Packet::disconnect(&self.config.namespace))];
                actions.extend(self.close("client closed".to_string()));
                actions
            },
        }
    }

    /// Transition to Closed, dropping anything still in flight.
    fn close(&mut self, reason: String) -> Vec<SessionAction> {
        if !self.pending.is_empty() {
            tracing::debug!(pending = self.pending.len(), "dropping unacknowledged events");
        }

        self.state = SessionState::Closed;
        self.pending.clear();
        self.outbox.clear();

        vec![
            SessionAction::Notify(ChannelEvent::Disconnected { reason: reason.clone() }),
            SessionAction::Close { reason },
        ]
    }
}

fn send(packet: &Packet) -> SessionAction {
    SessionAction::SendText(EnginePacket::Message(packet.encode()).encode())
}
