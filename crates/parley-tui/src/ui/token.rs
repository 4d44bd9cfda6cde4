//! Token dialog
//!
//! Centred popup asking for the access token. Input is masked.

use parley_app::LineEditor;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

const DIALOG_WIDTH: u16 = 44;
const DIALOG_HEIGHT: u16 = 5;
const PROMPT_WIDTH: u16 = 3; // border + "> "
const MASK: char = '*';

/// Render the token dialog centred in `area`.
pub fn render(frame: &mut Frame, dialog: &LineEditor, area: Rect) {
    let popup = centered(area, DIALOG_WIDTH, DIALOG_HEIGHT);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Access token ")
        .style(Style::default().fg(Color::Yellow));

    let masked: String = dialog.text().chars().map(|_| MASK).collect();
    let lines = vec![
        Line::from(format!("> {masked}")),
        Line::from(""),
        Line::from("Enter to save, Esc to cancel"),
    ];

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);

    let inner_width = popup.width.saturating_sub(PROMPT_WIDTH + 1);
    let cursor_offset = u16::try_from(dialog.cursor()).unwrap_or(u16::MAX).min(inner_width);
    frame.set_cursor_position((
        popup.x.saturating_add(PROMPT_WIDTH).saturating_add(cursor_offset),
        popup.y.saturating_add(1),
    ));
}

/// A `width` x `height` rectangle centred in `area`, shrunk to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x.saturating_add((area.width - width) / 2),
        y: area.y.saturating_add((area.height - height) / 2),
        width,
        height,
    }
}
