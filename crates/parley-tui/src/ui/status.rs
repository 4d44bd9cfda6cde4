//! Status bar
//!
//! Displays connection status and the latest notice.

use parley_app::{App, ConnectionState};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let connection_status = match app.connection_state() {
        ConnectionState::Disconnected => {
            Span::styled("Disconnected", Style::default().fg(Color::Red))
        },
        ConnectionState::Connecting => {
            Span::styled("Connecting...", Style::default().fg(Color::Yellow))
        },
        ConnectionState::Connected { sid } => Span::styled(
            format!("Connected ({sid})"),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    };

    let token_info = match (app.input().requires_token(), app.input().token()) {
        (false, _) => "",
        (true, Some(_)) => " | Token: set",
        (true, None) => " | Token: missing",
    };

    let notice = app.status_message().map_or_else(String::new, |message| format!(" | {message}"));

    let status_line = Line::from(vec![
        Span::raw(" "),
        connection_status,
        Span::styled(token_info, Style::default().fg(Color::Gray)),
        Span::styled(notice, Style::default().fg(Color::White)),
    ]);

    let paragraph =
        Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
