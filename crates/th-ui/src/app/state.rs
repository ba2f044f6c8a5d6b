//! Mode, cursor and editor state

use th_core::types::CommentId;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Browsing the thread
    #[default]
    Normal,
    /// Typing a reply or top-level comment
    Reply,
    /// Help popup
    Help,
}

/// Application state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Current mode
    pub mode: AppMode,
    /// Status message
    pub message: Option<String>,
    /// Should quit
    pub should_quit: bool,
    /// Index of the selected row
    pub cursor: usize,
    /// Editor content
    pub editor_content: String,
    /// Editor cursor position in characters
    pub editor_cursor: usize,
    /// Comment being replied to; None for a top-level comment
    pub reply_target: Option<CommentId>,
}

impl AppState {
    /// Create a new app state
    pub fn new() -> Self {
        Self::default()
    }

    /// Set status message
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    /// Clear status message
    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Open the editor for a reply (or a top-level comment when `target` is None)
    pub fn open_editor(&mut self, target: Option<CommentId>) {
        self.mode = AppMode::Reply;
        self.reply_target = target;
        self.editor_content.clear();
        self.editor_cursor = 0;
    }

    /// Close the editor and drop its content
    pub fn close_editor(&mut self) {
        self.mode = AppMode::Normal;
        self.reply_target = None;
        self.editor_content.clear();
        self.editor_cursor = 0;
    }

    /// Insert a character at the editor cursor
    pub fn insert_char(&mut self, c: char) {
        let byte_pos = self.char_to_byte_pos(self.editor_cursor);
        self.editor_content.insert(byte_pos, c);
        self.editor_cursor += 1;
    }

    /// Delete the character before the editor cursor
    pub fn backspace(&mut self) {
        if self.editor_cursor == 0 {
            return;
        }
        self.editor_cursor -= 1;
        let byte_pos = self.char_to_byte_pos(self.editor_cursor);
        if let Some(c) = self.editor_content[byte_pos..].chars().next() {
            self.editor_content.drain(byte_pos..byte_pos + c.len_utf8());
        }
    }

    /// Move the editor cursor one character left
    pub fn cursor_left(&mut self) {
        self.editor_cursor = self.editor_cursor.saturating_sub(1);
    }

    /// Move the editor cursor one character right
    pub fn cursor_right(&mut self) {
        if self.editor_cursor < self.editor_content.chars().count() {
            self.editor_cursor += 1;
        }
    }

    /// Convert character position to byte position
    fn char_to_byte_pos(&self, char_pos: usize) -> usize {
        self.editor_content
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.editor_content.len())
    }
}
