//! Message renderer.
//!
//! Owns the render log: the ordered list of entries the chat view draws.
//! The log is append-only with one exception. The most recent recognized
//! `system` entry is remembered as the *placeholder*, and is removed when a
//! recognized `speak` or `task` entry arrives.
//!
//! # Invariants
//!
//! - At most one placeholder reference is held.
//! - Only the referenced placeholder entry is ever removed.
//! - A new `system` entry overwrites the reference without removing the
//!   previous placeholder entry, which then stays in the log for good.
//! - Every render appends exactly one entry at the end.

use crate::{Alignment, Message, Style, StyleSet, Tone};

/// Identity of an entry, unique within one log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

/// A rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Log-local identity.
    pub id: EntryId,
    /// Literal text.
    pub content: String,
    /// Style the message arrived with.
    pub style: Style,
    /// Horizontal placement.
    pub alignment: Alignment,
    /// Visual class.
    pub tone: Tone,
}

/// What a render did to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOutcome {
    /// The appended entry.
    pub appended: EntryId,
    /// Placeholder removed to make room for it, if any.
    pub removed: Option<EntryId>,
}

/// The render log and its placeholder.
#[derive(Debug, Clone)]
pub struct Renderer {
    recognized: StyleSet,
    fallback: Tone,
    entries: Vec<Entry>,
    placeholder: Option<EntryId>,
    next_id: u64,
    /// Entries scrolled up from the bottom of the log.
    scroll: usize,
}

impl Renderer {
    /// Create an empty log.
    ///
    /// Styles outside `recognized` are drawn with the `fallback` tone and
    /// never touch the placeholder.
    pub fn new(recognized: StyleSet, fallback: Tone) -> Self {
        Self { recognized, fallback, entries: Vec::new(), placeholder: None, next_id: 0, scroll: 0 }
    }

    /// Append `message`, applying the style rules.
    pub fn render(&mut self, message: Message) -> RenderOutcome {
        let Message { content, style } = message;
        let recognized = self.recognized.contains(&style);

        let removed = match style {
            Style::Speak | Style::Task if recognized => self.take_placeholder(&style),
            _ => None,
        };

        let id = EntryId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        if recognized && style == Style::System {
            if let Some(previous) = self.placeholder {
                tracing::debug!(?previous, "placeholder superseded and left in the log");
            }
            self.placeholder = Some(id);
        }

        self.entries.push(Entry {
            id,
            alignment: style.alignment(),
            tone: self.recognized.tone_of(&style, self.fallback),
            content,
            style,
        });

        // Scroll the new entry into view
        self.scroll = 0;

        RenderOutcome { appended: id, removed }
    }

    /// Remove the placeholder entry and clear the reference.
    ///
    /// Without a placeholder this is a no-op.
    fn take_placeholder(&mut self, style: &Style) -> Option<EntryId> {
        let Some(id) = self.placeholder.take() else {
            tracing::debug!(%style, "no placeholder to replace");
            return None;
        };

        let position = self.entries.iter().position(|entry| entry.id == id)?;
        self.entries.remove(position);
        Some(id)
    }

    /// Forget the placeholder without touching the log.
    ///
    /// Called when a new session starts: a placeholder from the previous
    /// session will never be answered.
    pub fn reset_placeholder(&mut self) {
        self.placeholder = None;
    }

    /// Entries in display order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current placeholder. `None` if none is held.
    pub fn placeholder(&self) -> Option<EntryId> {
        self.placeholder
    }

    /// Entries scrolled up from the bottom.
    pub fn scroll_offset(&self) -> usize {
        self.scroll
    }

    /// Scroll towards older entries.
    pub fn scroll_up(&mut self, entries: usize) {
        self.scroll = self.scroll.saturating_add(entries);
    }

    /// Scroll towards newer entries.
    pub fn scroll_down(&mut self, entries: usize) {
        self.scroll = self.scroll.saturating_sub(entries);
    }

    /// Cap the scroll offset at `max` entries.
    pub fn clamp_scroll(&mut self, max: usize) {
        self.scroll = self.scroll.min(max);
    }
}
