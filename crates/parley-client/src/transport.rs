//! WebSocket transport for the client.
//!
//! Provides [`ConnectedClient`], which runs a [`Session`] on a tokio task and
//! exposes it through the [`Channel`] trait. Protocol logic stays in the
//! Sans-IO session; this layer only moves text frames and drives time.
//!
//! ```text
//! ConnectedClient ──Command──> session task ──text──> socket pump ──> WebSocket
//!                 <─ChannelEvent─            <─text──              <──
//! ```
//!
//! The session task does not care where its text frames come from, so
//! [`ConnectedClient::over_pipes`] can run it against any pair of channels
//! (an in-process server, a test harness).

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::{net::TcpStream, sync::mpsc, task::AbortHandle, time::Instant};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use crate::{
    channel::{Channel, ChannelEvent, Emit},
    endpoint::Endpoint,
    session::{Session, SessionAction, SessionConfig, SessionEvent},
};

/// Capacity of each internal queue.
const QUEUE_DEPTH: usize = 32;

/// How often the session checks its deadlines.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The session task has stopped.
    #[error("channel closed")]
    Closed,
}

/// Request from the client handle to its session task.
#[derive(Debug)]
enum Command {
    Emit(Emit),
    Close,
}

/// Handle to a session running on its own task.
///
/// Dropping the handle stops the session and the socket.
pub struct ConnectedClient {
    commands: mpsc::Sender<Command>,
    events: mpsc::Receiver<ChannelEvent>,
    abort_handles: Vec<AbortHandle>,
}

impl ConnectedClient {
    /// Run a session over a pair of text pipes.
    ///
    /// `from_wire` yields frames received from the server; `to_wire` takes
    /// frames to send. Must be called from within a tokio runtime.
    pub fn over_pipes(
        from_wire: mpsc::Receiver<String>,
        to_wire: mpsc::Sender<String>,
        config: SessionConfig,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::channel(QUEUE_DEPTH);
        let (event_tx, event_rx) = mpsc::channel(QUEUE_DEPTH);

        let session = Session::new(Instant::now(), config);
        let handle = tokio::spawn(run_session(session, from_wire, to_wire, command_rx, event_tx));

        Self { commands: command_tx, events: event_rx, abort_handles: vec![handle.abort_handle()] }
    }

    /// Stop the session and the socket immediately.
    pub fn stop(&self) {
        for handle in &self.abort_handles {
            handle.abort();
        }
    }
}

impl Drop for ConnectedClient {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Channel for ConnectedClient {
    type Error = TransportError;

    async fn emit(&mut self, emit: Emit) -> Result<(), Self::Error> {
        self.commands.send(Command::Emit(emit)).await.map_err(|_| TransportError::Closed)
    }

    async fn recv(&mut self) -> Option<ChannelEvent> {
        self.events.try_recv().ok()
    }

    fn close(&mut self) {
        if self.commands.try_send(Command::Close).is_err() {
            self.stop();
        }
    }
}

/// Connect to a Socket.IO server over WebSocket.
///
/// Returns once the WebSocket is open. The Socket.IO handshake continues in
/// the background and is reported as [`ChannelEvent::Connected`].
///
/// # Errors
///
/// Returns `TransportError::Connection` if the WebSocket cannot be opened.
pub async fn connect(
    endpoint: &Endpoint,
    config: SessionConfig,
) -> Result<ConnectedClient, TransportError> {
    let url = endpoint.websocket_url();
    tracing::info!(%url, "connecting");

    let (stream, _response) = connect_async(url.as_str())
        .await
        .map_err(|e| TransportError::Connection(format!("{url}: {e}")))?;

    let (to_wire_tx, to_wire_rx) = mpsc::channel(QUEUE_DEPTH);
    let (from_wire_tx, from_wire_rx) = mpsc::channel(QUEUE_DEPTH);

    let pump = tokio::spawn(pump_socket(stream, to_wire_rx, from_wire_tx));

    let mut client = ConnectedClient::over_pipes(from_wire_rx, to_wire_tx, config);
    client.abort_handles.push(pump.abort_handle());
    Ok(client)
}

/// Feed the session from the wire, the client handle and the clock.
async fn run_session(
    mut session: Session<Instant>,
    mut from_wire: mpsc::Receiver<String>,
    to_wire: mpsc::Sender<String>,
    mut commands: mpsc::Receiver<Command>,
    events: mpsc::Sender<ChannelEvent>,
) {
    let mut ticker = tokio::time::interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        let event = tokio::select! {
            text = from_wire.recv() => match text {
                Some(text) => SessionEvent::TextReceived(text),
                None => {
                    notify_closed(&events, "transport closed").await;
                    break;
                },
            },
            command = commands.recv() => match command {
                Some(Command::Emit(emit)) => SessionEvent::Emit(emit),
                Some(Command::Close) | None => SessionEvent::Close,
            },
            _ = ticker.tick() => SessionEvent::Tick,
        };

        let actions = match session.handle(Instant::now(), event) {
            Ok(actions) => actions,
            Err(e) => {
                tracing::warn!(error = %e, "session error");
                continue;
            },
        };

        if execute(actions, &to_wire, &events).await {
            break;
        }
    }
}

/// Execute session actions. Returns `true` once the session has closed.
async fn execute(
    actions: Vec<SessionAction>,
    to_wire: &mpsc::Sender<String>,
    events: &mpsc::Sender<ChannelEvent>,
) -> bool {
    let mut closed = false;

    for action in actions {
        match action {
            SessionAction::SendText(text) => {
                if to_wire.send(text).await.is_err() {
                    tracing::debug!("wire closed while sending");
                }
            },
            SessionAction::Notify(event) => {
                if events.send(event).await.is_err() {
                    tracing::debug!("client handle dropped");
                }
            },
            SessionAction::Close { reason } => {
                tracing::info!(%reason, "session closed");
                closed = true;
            },
        }
    }

    closed
}

async fn notify_closed(events: &mpsc::Sender<ChannelEvent>, reason: &str) {
    tracing::info!(%reason, "session closed");
    if events.send(ChannelEvent::Disconnected { reason: reason.to_string() }).await.is_err() {
        tracing::debug!("client handle dropped before close");
    }
}

/// Bridge a WebSocket and the session's text pipes.
async fn pump_socket(
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    mut outbound: mpsc::Receiver<String>,
    inbound: mpsc::Sender<String>,
) {
    let (mut sink, mut source) = stream.split();

    loop {
        tokio::select! {
            frame = source.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if inbound.send(text.as_str().to_owned()).await.is_err() {
                        break;
                    }
                },
                Some(Ok(Message::Close(frame))) => {
                    tracing::debug!(?frame, "websocket closed by server");
                    break;
                },
                Some(Ok(Message::Binary(_))) => {
                    tracing::warn!("ignoring binary websocket frame");
                },
                Some(Ok(_)) => {},
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "websocket read failed");
                    break;
                },
                None => break,
            },
            text = outbound.recv() => match text {
                Some(text) => {
                    if let Err(e) = sink.send(Message::text(text)).await {
                        tracing::warn!(error = %e, "websocket write failed");
                        break;
                    }
                },
                None => {
                    if let Err(e) = sink.send(Message::Close(None)).await {
                        tracing::debug!(error = %e, "websocket close failed");
                    }
                    break;
                },
            },
        }
    }
}
