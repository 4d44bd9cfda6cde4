//! Chat area
//!
//! Displays the render log. Human messages sit on the right, everything else
//! on the left, each coloured by its tone. Content is drawn as literal text.

use parley_app::{Alignment, App, Entry};
use ratatui::{
    Frame,
    layout::{self, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use unicode_width::UnicodeWidthChar;

use super::tone_color;

const BORDER_SIZE: u16 = 2;

/// Render the chat area.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(" {} @ {} ", app.config().variant, app.config().server);
    let block = Block::default().borders(Borders::ALL).title(title);

    let renderer = app.renderer();
    if renderer.is_empty() {
        let hint = Line::from(Span::styled(
            "Type a message and press Enter",
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(Paragraph::new(hint).block(block), area);
        return;
    }

    let width = usize::from(area.width.saturating_sub(BORDER_SIZE));
    let height = usize::from(area.height.saturating_sub(BORDER_SIZE));

    // Entries newer than the scroll position are hidden
    let end = renderer.len().saturating_sub(renderer.scroll_offset());
    let visible = &renderer.entries()[..end];

    let mut lines: Vec<Line> = Vec::new();
    for entry in visible.iter().rev() {
        if lines.len() >= height {
            break;
        }
        let mut entry_lines = entry_lines(entry, width);
        entry_lines.extend(lines);
        lines = entry_lines;
    }

    let skip = lines.len().saturating_sub(height);
    let lines: Vec<Line> = lines.into_iter().skip(skip).collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Lines for one entry, wrapped to `width` columns.
fn entry_lines(entry: &Entry, width: usize) -> Vec<Line<'static>> {
    let mut style = Style::default().fg(tone_color(entry.tone));
    if entry.alignment == Alignment::Right {
        style = style.add_modifier(Modifier::BOLD);
    }
    let alignment = match entry.alignment {
        Alignment::Left => layout::Alignment::Left,
        Alignment::Right => layout::Alignment::Right,
    };

    wrap(&entry.content, width)
        .into_iter()
        .map(|chunk| Line::from(Span::styled(chunk, style)).alignment(alignment))
        .collect()
}

/// Split `text` into rows at most `width` terminal columns wide.
///
/// Explicit newlines start a new row; an empty text still takes one row. A
/// character wider than `width` gets a row to itself.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();

    for line in text.split('\n') {
        let mut row = String::new();
        let mut used = 0;
        for c in line.chars() {
            let cw = c.width().unwrap_or(0);
            if used + cw > width && !row.is_empty() {
                rows.push(std::mem::take(&mut row));
                used = 0;
            }
            row.push(c);
            used += cw;
        }
        rows.push(row);
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_splits_on_width_and_newlines() {
        assert_eq!(wrap("abcdef", 4), vec!["abcd", "ef"]);
        assert_eq!(wrap("ab\ncd", 10), vec!["ab", "cd"]);
        assert_eq!(wrap("", 10), vec![""]);
        assert_eq!(wrap("héllo", 2), vec!["hé", "ll", "o"]);
    }

    #[test]
    fn wrap_counts_display_columns() {
        assert_eq!(wrap("你好世界", 4), vec!["你好", "世界"]);
        assert_eq!(wrap("a你b", 2), vec!["a", "你", "b"]);
        assert_eq!(wrap("你", 1), vec!["你"]);
    }

    #[test]
    fn zero_width_still_wraps() {
        assert_eq!(wrap("ab", 0), vec!["a", "b"]);
    }
}
