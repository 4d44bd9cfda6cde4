//! Application state machine.
//!
//! This module defines the [`App`] state machine, which manages the interactive
//! state of the client completely decoupled from I/O and protocol mechanics.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Owns the render log ([`Renderer`]) and the input line, token and token
//!   dialog ([`InputController`]).
//! - Turns a submit into an outbound emit plus the local `human` echo.
//! - Tracks high-level connection state and a one-line status for UI
//!   feedback.

use parley_client::Emit;

use crate::{
    AppAction, AppEvent, ClientConfig, ConnectionState, InputController, KeyInput, Message,
    Renderer, TokenPrompt,
};

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// Variant configuration.
    config: ClientConfig,
    /// Connection state.
    state: ConnectionState,
    /// Render log and placeholder.
    renderer: Renderer,
    /// Input line, token and token dialog.
    input: InputController,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
}

impl App {
    /// Create a new App for the given configuration.
    pub fn new(config: ClientConfig) -> Self {
        let renderer = Renderer::new(config.recognized.clone(), config.fallback_tone);
        let input = InputController::new(config.require_token);

        Self {
            config,
            state: ConnectionState::Disconnected,
            renderer,
            input,
            terminal_size: (80, 24),
            status_message: None,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick => vec![],
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::Connecting => {
                self.state = ConnectionState::Connecting;
                vec![AppAction::Render]
            },
            AppEvent::Connected { sid } => {
                self.state = ConnectionState::Connected { sid };
                self.renderer.reset_placeholder();
                self.status_message = None;
                vec![AppAction::Render]
            },
            AppEvent::Disconnected { reason } => {
                self.state = ConnectionState::Disconnected;
                self.status_message = Some(format!("Disconnected: {reason}"));
                vec![AppAction::Render]
            },
            AppEvent::MessageReceived(message) => {
                self.renderer.render(message);
                vec![AppAction::Render]
            },
            AppEvent::Error { message } => {
                self.status_message = Some(format!("Error: {message}"));
                vec![AppAction::Render]
            },
        }
    }

    fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        if self.input.is_token_dialog_open() {
            return match self.input.handle_dialog_key(key) {
                TokenPrompt::Saved => {
                    self.status_message = Some("Access token saved".to_string());
                    vec![AppAction::Render]
                },
                TokenPrompt::Edited | TokenPrompt::Cancelled => vec![AppAction::Render],
                TokenPrompt::Ignored => vec![],
            };
        }

        match key {
            KeyInput::Enter => self.submit(),
            KeyInput::Esc => self.quit(),
            KeyInput::Up => {
                self.scroll_up(1);
                vec![AppAction::Render]
            },
            KeyInput::Down => {
                self.renderer.scroll_down(1);
                vec![AppAction::Render]
            },
            KeyInput::PageUp => {
                self.scroll_up(self.page_size());
                vec![AppAction::Render]
            },
            KeyInput::PageDown => {
                self.renderer.scroll_down(self.page_size());
                vec![AppAction::Render]
            },
            other => {
                if self.input.line_mut().edit(other) { vec![AppAction::Render] } else { vec![] }
            },
        }
    }

    /// Submit the input line.
    ///
    /// If a token is required and missing, opens the token dialog and sends
    /// nothing. Otherwise emits the outbound event, echoes the text as a
    /// `human` message if the variant does, and clears the line. Empty text
    /// is sent like any other.
    pub fn submit(&mut self) -> Vec<AppAction> {
        if !self.input.can_send() {
            self.input.open_token_dialog();
            self.status_message = Some("Access token required".to_string());
            return vec![AppAction::Render];
        }

        let text = self.input.line_mut().take();
        let payload = self.config.payload.build(&text, self.input.token());
        let emit = Emit::new(self.config.outbound_event.clone(), payload)
            .with_ack_timeout(self.config.ack_timeout);

        if self.config.local_echo {
            self.renderer.render(Message::human(text));
        }

        vec![AppAction::Emit(emit), AppAction::Render]
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    /// Scroll towards older entries, stopping at the first one.
    fn scroll_up(&mut self, entries: usize) {
        self.renderer.scroll_up(entries);
        let oldest = self.renderer.len().saturating_sub(1);
        self.renderer.clamp_scroll(oldest);
    }

    /// Entries moved by PageUp/PageDown: half the terminal height.
    fn page_size(&self) -> usize {
        usize::from(self.terminal_size.1 / 2).max(1)
    }

    /// Variant configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Current connection state.
    pub fn connection_state(&self) -> &ConnectionState {
        &self.state
    }

    /// Render log.
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Input line, token and token dialog.
    pub fn input(&self) -> &InputController {
        &self.input
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{Alignment, Style, Tone, Variant};

    fn app(variant: Variant) -> App {
        App::new(ClientConfig::preset(variant))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle(AppEvent::Key(KeyInput::Char(c)));
        }
    }

    #[test]
    fn submit_emits_and_echoes() {
        let mut app = app(Variant::Agent);
        type_text(&mut app, "hello");

        let actions = app.handle(AppEvent::Key(KeyInput::Enter));

        let [AppAction::Emit(emit), AppAction::Render] = actions.as_slice() else {
            panic!("unexpected actions: {actions:?}");
        };
        assert_eq!(emit.event, "receive");
        assert_eq!(emit.payload, json!({"user_input": "hello"}));

        let entries = app.renderer().entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content, "hello");
        assert_eq!(entries[0].style, Style::Human);
        assert_eq!(entries[0].alignment, Alignment::Right);
        assert_eq!(entries[0].tone, Tone::Primary);
        assert_eq!(app.input().line().text(), "");
    }

    #[test]
    fn empty_submit_is_sent() {
        let mut app = app(Variant::Agent);
        let actions = app.submit();

        assert!(matches!(&actions[0], AppAction::Emit(emit) if emit.payload == json!({"user_input": ""})));
        assert_eq!(app.renderer().len(), 1);
    }

    #[test]
    fn feedback_does_not_echo() {
        let mut app = app(Variant::Feedback);
        type_text(&mut app, "nice");

        let actions = app.submit();

        assert!(matches!(&actions[0], AppAction::Emit(emit)
            if emit.event == "message" && emit.payload == json!({"feedback": "nice"})));
        assert!(app.renderer().is_empty());
    }

    #[test]
    fn gated_submit_without_token_opens_dialog() {
        let mut app = app(Variant::Gated);
        type_text(&mut app, "hello");

        let actions = app.handle(AppEvent::Key(KeyInput::Enter));

        assert_eq!(actions, vec![AppAction::Render]);
        assert!(app.input().is_token_dialog_open());
        assert!(app.renderer().is_empty());
        assert_eq!(app.input().line().text(), "hello");
        assert_eq!(app.status_message(), Some("Access token required"));
    }

    #[test]
    fn keys_go_to_dialog_while_open() {
        let mut app = app(Variant::Gated);
        app.submit();

        type_text(&mut app, "tok");
        app.handle(AppEvent::Key(KeyInput::Enter));

        assert_eq!(app.input().token(), Some("tok"));
        assert_eq!(app.input().line().text(), "");
        assert!(!app.input().is_token_dialog_open());
    }

    #[test]
    fn empty_token_keeps_submit_gated() {
        let mut app = app(Variant::Gated);
        app.submit();
        app.handle(AppEvent::Key(KeyInput::Enter));

        assert_eq!(app.input().token(), None);
        let actions = app.handle(AppEvent::Key(KeyInput::Enter));
        assert_eq!(actions, vec![AppAction::Render]);
        assert!(app.input().is_token_dialog_open());
    }

    #[test]
    fn escape_closes_dialog_before_quitting() {
        let mut app = app(Variant::Gated);
        app.submit();

        assert_eq!(app.handle(AppEvent::Key(KeyInput::Esc)), vec![AppAction::Render]);
        assert_eq!(app.handle(AppEvent::Key(KeyInput::Esc)), vec![AppAction::Quit]);
    }

    #[test]
    fn connected_resets_placeholder() {
        let mut app = app(Variant::Agent);
        app.handle(AppEvent::MessageReceived(Message::new("Thinking...", Style::System)));
        assert!(app.renderer().placeholder().is_some());

        app.handle(AppEvent::Connected { sid: "s".into() });

        assert_eq!(app.renderer().placeholder(), None);
        assert_eq!(app.renderer().len(), 1);
        assert_eq!(app.connection_state(), &ConnectionState::Connected { sid: "s".into() });
    }

    #[test]
    fn disconnect_sets_status() {
        let mut app = app(Variant::Agent);
        app.handle(AppEvent::Disconnected { reason: "ping timeout".into() });

        assert_eq!(app.connection_state(), &ConnectionState::Disconnected);
        assert_eq!(app.status_message(), Some("Disconnected: ping timeout"));
    }

    #[test]
    fn scrolling_keys_move_offset() {
        let mut app = app(Variant::Agent);
        app.handle(AppEvent::Resize(80, 20));
        for i in 0..30 {
            app.handle(AppEvent::MessageReceived(Message::new(i.to_string(), Style::Speak)));
        }

        app.handle(AppEvent::Key(KeyInput::PageUp));
        assert_eq!(app.renderer().scroll_offset(), 10);

        app.handle(AppEvent::Key(KeyInput::Down));
        assert_eq!(app.renderer().scroll_offset(), 9);

        app.handle(AppEvent::Key(KeyInput::PageDown));
        assert_eq!(app.renderer().scroll_offset(), 0);
    }

    #[test]
    fn scrolling_stops_at_oldest_entry() {
        let mut app = app(Variant::Agent);
        for i in 0..3 {
            app.handle(AppEvent::MessageReceived(Message::new(i.to_string(), Style::Speak)));
        }

        app.handle(AppEvent::Key(KeyInput::PageUp));
        assert_eq!(app.renderer().scroll_offset(), 2);

        app.handle(AppEvent::Key(KeyInput::Up));
        assert_eq!(app.renderer().scroll_offset(), 2);
    }
}
