//! The client session against the in-process demo server.
//!
//! Both sides exchange real Engine.IO / Socket.IO frames over mpsc pipes,
//! so this covers the whole client stack minus the WebSocket.

use std::time::Duration;

use parley_client::{Channel, ChannelEvent, Emit, SessionConfig, transport::ConnectedClient};
use parley_tui::server::{self, THINKING};
use serde_json::json;

/// Collect channel events until `count` have arrived or time runs out.
async fn collect(client: &mut ConnectedClient, count: usize) -> Vec<ChannelEvent> {
    let mut events = Vec::new();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);

    while events.len() < count && tokio::time::Instant::now() < deadline {
        match client.recv().await {
            Some(event) => events.push(event),
            None => tokio::time::sleep(Duration::from_millis(10)).await,
        }
    }

    events
}

fn message(content: &str, style: &str) -> ChannelEvent {
    ChannelEvent::Event {
        name: "message".into(),
        args: vec![json!({"content": content, "style": style})],
    }
}

#[tokio::test]
async fn agent_round_trip() {
    let (_server, pipes) = server::spawn(Duration::from_millis(20));
    let mut client =
        ConnectedClient::over_pipes(pipes.from_server, pipes.to_server, SessionConfig::default());

    client.emit(Emit::new("receive", json!({"user_input": "hello"}))).await.unwrap();

    let events = collect(&mut client, 4).await;
    assert_eq!(events, vec![
        ChannelEvent::Connected { sid: "demo".into() },
        ChannelEvent::Acknowledged { event: "receive".into(), id: 0 },
        message(THINKING, "system"),
        message("You said: hello", "speak"),
    ]);
}

#[tokio::test]
async fn feedback_echo() {
    let (_server, pipes) = server::spawn(Duration::ZERO);
    let mut client =
        ConnectedClient::over_pipes(pipes.from_server, pipes.to_server, SessionConfig::default());

    client.emit(Emit::new("message", json!({"feedback": "nice"}))).await.unwrap();

    let events = collect(&mut client, 3).await;
    assert_eq!(events[1..], [
        ChannelEvent::Acknowledged { event: "message".into(), id: 0 },
        message("nice", "primary"),
    ]);
}

#[tokio::test]
async fn stopped_server_disconnects_client() {
    let (server, pipes) = server::spawn(Duration::ZERO);
    let mut client =
        ConnectedClient::over_pipes(pipes.from_server, pipes.to_server, SessionConfig::default());

    assert_eq!(collect(&mut client, 1).await, vec![ChannelEvent::Connected { sid: "demo".into() }]);

    drop(server);

    let events = collect(&mut client, 1).await;
    assert!(matches!(events.as_slice(), [ChannelEvent::Disconnected { .. }]));
}
