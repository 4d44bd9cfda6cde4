//! Keyboard input and the input controller.
//!
//! [`KeyInput`] is the terminal-agnostic key type. [`LineEditor`] is a
//! single-line UTF-8 text buffer with a cursor. [`InputController`] owns the
//! chat input line, the access token and the token dialog, and decides what
//! a submit is allowed to do.

/// Keyboard input abstraction.
///
/// Decouples application logic from terminal libraries (crossterm, termion,
/// etc.) enabling deterministic simulation testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Enter/Return key (submit).
    Enter,
    /// Backspace key (delete character before cursor).
    Backspace,
    /// Delete key (delete character at cursor).
    Delete,
    /// Escape key (close dialog, or quit).
    Esc,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Up arrow key (scroll log).
    Up,
    /// Down arrow key (scroll log).
    Down,
    /// Page Up key (scroll log by a page).
    PageUp,
    /// Page Down key (scroll log by a page).
    PageDown,
    /// Home key (cursor to start).
    Home,
    /// End key (cursor to end).
    End,
}

/// Single-line text buffer.
///
/// The cursor counts characters, not bytes, so multi-byte input edits
/// cleanly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEditor {
    buffer: String,
    cursor: usize,
}

impl LineEditor {
    /// Create an empty editor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Apply an editing key. Returns `false` for keys that do not edit.
    pub fn edit(&mut self, key: KeyInput) -> bool {
        match key {
            KeyInput::Char(c) => {
                let at = self.byte_index(self.cursor);
                self.buffer.insert(at, c);
                self.cursor = self.cursor.saturating_add(1);
            },
            KeyInput::Backspace => {
                if self.cursor > 0 {
                    self.cursor = self.cursor.saturating_sub(1);
                    let at = self.byte_index(self.cursor);
                    self.buffer.remove(at);
                }
            },
            KeyInput::Delete => {
                if self.cursor < self.char_count() {
                    let at = self.byte_index(self.cursor);
                    self.buffer.remove(at);
                }
            },
            KeyInput::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyInput::Right => {
                if self.cursor < self.char_count() {
                    self.cursor = self.cursor.saturating_add(1);
                }
            },
            KeyInput::Home => self.cursor = 0,
            KeyInput::End => self.cursor = self.char_count(),
            KeyInput::Enter
            | KeyInput::Esc
            | KeyInput::Up
            | KeyInput::Down
            | KeyInput::PageUp
            | KeyInput::PageDown => return false,
        }
        true
    }

    /// Take the text out, leaving the editor empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }

    fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.buffer.char_indices().nth(char_index).map_or(self.buffer.len(), |(i, _)| i)
    }
}

/// Result of a key routed through the token dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPrompt {
    /// Key edited the dialog's buffer.
    Edited,
    /// Token saved and dialog closed.
    Saved,
    /// Dialog closed without saving.
    Cancelled,
    /// Key has no meaning in the dialog.
    Ignored,
}

/// Input line, access token and token dialog.
///
/// The token lives here, in memory only, for the lifetime of the controller.
/// It is never validated; its presence alone unlocks sending.
#[derive(Debug, Clone)]
pub struct InputController {
    line: LineEditor,
    require_token: bool,
    token: Option<String>,
    /// Token dialog buffer while the dialog is open.
    dialog: Option<LineEditor>,
}

impl InputController {
    /// Create a controller. `require_token` gates sending behind the token.
    pub fn new(require_token: bool) -> Self {
        Self { line: LineEditor::new(), require_token, token: None, dialog: None }
    }

    /// The chat input line.
    pub fn line(&self) -> &LineEditor {
        &self.line
    }

    /// Mutable access to the chat input line.
    pub fn line_mut(&mut self) -> &mut LineEditor {
        &mut self.line
    }

    /// Whether sends need a token.
    pub fn requires_token(&self) -> bool {
        self.require_token
    }

    /// The saved token. `None` until the user saves one.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Whether a submit may send now.
    pub fn can_send(&self) -> bool {
        !self.require_token || self.token.is_some()
    }

    /// Show the token dialog with an empty buffer.
    pub fn open_token_dialog(&mut self) {
        self.dialog = Some(LineEditor::new());
    }

    /// The token dialog buffer. `None` if the dialog is closed.
    pub fn token_dialog(&self) -> Option<&LineEditor> {
        self.dialog.as_ref()
    }

    /// Whether the token dialog is visible.
    pub fn is_token_dialog_open(&self) -> bool {
        self.dialog.is_some()
    }

    /// Store `token` and close the dialog.
    pub fn save_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
        self.dialog = None;
    }

    /// Route a key to the token dialog.
    ///
    /// Returns [`TokenPrompt::Ignored`] if the dialog is not open.
    pub fn handle_dialog_key(&mut self, key: KeyInput) -> TokenPrompt {
        let Some(dialog) = self.dialog.as_mut() else {
            return TokenPrompt::Ignored;
        };

        match key {
            // An empty token is not a token
            KeyInput::Enter if dialog.text().is_empty() => {
                self.dialog = None;
                TokenPrompt::Cancelled
            },
            KeyInput::Enter => {
                let token = dialog.take();
                self.save_token(token);
                TokenPrompt::Saved
            },
            KeyInput::Esc => {
                self.dialog = None;
                TokenPrompt::Cancelled
            },
            other => {
                if dialog.edit(other) {
                    TokenPrompt::Edited
                } else {
                    TokenPrompt::Ignored
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(editor: &mut LineEditor, text: &str) {
        for c in text.chars() {
            editor.edit(KeyInput::Char(c));
        }
    }

    #[test]
    fn editing_in_the_middle() {
        let mut editor = LineEditor::new();
        type_text(&mut editor, "helo");
        editor.edit(KeyInput::Left);
        editor.edit(KeyInput::Char('l'));

        assert_eq!(editor.text(), "hello");
        assert_eq!(editor.cursor(), 4);
    }

    #[test]
    fn multibyte_characters_edit_by_char() {
        let mut editor = LineEditor::new();
        type_text(&mut editor, "héllo wörld");
        editor.edit(KeyInput::Home);
        editor.edit(KeyInput::Right);
        editor.edit(KeyInput::Delete);

        assert_eq!(editor.text(), "hllo wörld");

        editor.edit(KeyInput::End);
        editor.edit(KeyInput::Left);
        editor.edit(KeyInput::Left);
        editor.edit(KeyInput::Backspace);
        assert_eq!(editor.text(), "hllo wöld");
    }

    #[test]
    fn boundaries_are_safe() {
        let mut editor = LineEditor::new();
        editor.edit(KeyInput::Backspace);
        editor.edit(KeyInput::Delete);
        editor.edit(KeyInput::Left);
        editor.edit(KeyInput::Right);

        assert_eq!(editor.text(), "");
        assert_eq!(editor.cursor(), 0);
    }

    #[test]
    fn take_clears_buffer_and_cursor() {
        let mut editor = LineEditor::new();
        type_text(&mut editor, "abc");

        assert_eq!(editor.take(), "abc");
        assert_eq!(editor.text(), "");
        assert_eq!(editor.cursor(), 0);
    }

    #[test]
    fn dialog_saves_typed_token() {
        let mut input = InputController::new(true);
        assert!(!input.can_send());

        input.open_token_dialog();
        for c in "s3cret".chars() {
            assert_eq!(input.handle_dialog_key(KeyInput::Char(c)), TokenPrompt::Edited);
        }
        assert_eq!(input.handle_dialog_key(KeyInput::Enter), TokenPrompt::Saved);

        assert_eq!(input.token(), Some("s3cret"));
        assert!(!input.is_token_dialog_open());
        assert!(input.can_send());
    }

    #[test]
    fn dialog_escape_discards() {
        let mut input = InputController::new(true);
        input.open_token_dialog();
        input.handle_dialog_key(KeyInput::Char('x'));

        assert_eq!(input.handle_dialog_key(KeyInput::Esc), TokenPrompt::Cancelled);
        assert_eq!(input.token(), None);
        assert_eq!(input.handle_dialog_key(KeyInput::Char('y')), TokenPrompt::Ignored);
    }

    #[test]
    fn dialog_enter_on_empty_buffer_saves_nothing() {
        let mut input = InputController::new(true);
        input.open_token_dialog();

        assert_eq!(input.handle_dialog_key(KeyInput::Enter), TokenPrompt::Cancelled);
        assert_eq!(input.token(), None);
        assert!(!input.is_token_dialog_open());
        assert!(!input.can_send());
    }

    #[test]
    fn ungated_controller_can_always_send() {
        let input = InputController::new(false);
        assert!(input.can_send());
    }
}
