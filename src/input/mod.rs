//! Line editing and shortcut decoding shared by every view.
//!
//! - [`TextInput`]: a single-line editor with a char-indexed cursor
//! - [`quick_select_index`]: decodes the 1-9 quick-select shortcuts
//! - [`clicked_row`]: maps a mouse position to a list row

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Position, Rect};

use crate::config::QuickSelectModifier;

/// Result of feeding a key to a [`TextInput`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKeyResult {
    /// Key was not an editing key
    Ignored,
    /// Cursor moved, text unchanged
    Moved,
    /// Text changed
    Changed,
}

/// Single-line text editor.
///
/// The cursor counts chars, not bytes, so multi-byte input never splits a
/// code point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Editor pre-filled with `value`, cursor at the end
    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Cursor position in chars
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        *self = Self::with_value(value);
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map_or(self.value.len(), |(i, _)| i)
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Handle an editing key.
    ///
    /// Plain and shifted chars are inserted; Ctrl/Alt chords other than the
    /// readline ones below are left to the caller.
    pub fn handle_key(&mut self, key: KeyEvent) -> InputKeyResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Char('u') if ctrl => {
                if self.cursor == 0 {
                    return InputKeyResult::Ignored;
                }
                let at = self.byte_offset(self.cursor);
                self.value.replace_range(..at, "");
                self.cursor = 0;
                InputKeyResult::Changed
            }
            KeyCode::Char('w') if ctrl => self.delete_word_back(),
            KeyCode::Char('a') if ctrl => {
                self.cursor = 0;
                InputKeyResult::Moved
            }
            KeyCode::Char('e') if ctrl => {
                self.cursor = self.char_len();
                InputKeyResult::Moved
            }
            KeyCode::Char(_) if ctrl || alt => InputKeyResult::Ignored,
            KeyCode::Char(c) => {
                self.insert(c);
                InputKeyResult::Changed
            }
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return InputKeyResult::Ignored;
                }
                self.cursor -= 1;
                let at = self.byte_offset(self.cursor);
                self.value.remove(at);
                InputKeyResult::Changed
            }
            KeyCode::Delete => {
                if self.cursor >= self.char_len() {
                    return InputKeyResult::Ignored;
                }
                let at = self.byte_offset(self.cursor);
                self.value.remove(at);
                InputKeyResult::Changed
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                InputKeyResult::Moved
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.char_len());
                InputKeyResult::Moved
            }
            KeyCode::Home => {
                self.cursor = 0;
                InputKeyResult::Moved
            }
            KeyCode::End => {
                self.cursor = self.char_len();
                InputKeyResult::Moved
            }
            _ => InputKeyResult::Ignored,
        }
    }

    fn delete_word_back(&mut self) -> InputKeyResult {
        if self.cursor == 0 {
            return InputKeyResult::Ignored;
        }
        let chars: Vec<char> = self.value.chars().collect();
        let mut start = self.cursor;
        while start > 0 && chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !chars[start - 1].is_whitespace() {
            start -= 1;
        }
        let from = self.byte_offset(start);
        let to = self.byte_offset(self.cursor);
        self.value.replace_range(from..to, "");
        self.cursor = start;
        InputKeyResult::Changed
    }
}

/// Decode a quick-select shortcut into a zero-based list index.
///
/// Digits 1-9 select entries 0-8. With [`QuickSelectModifier::Alt`] only
/// Alt+digit counts; with [`QuickSelectModifier::None`] only a bare digit.
pub fn quick_select_index(key: KeyEvent, modifier: QuickSelectModifier) -> Option<usize> {
    let KeyCode::Char(c @ '1'..='9') = key.code else {
        return None;
    };
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let wanted = match modifier {
        QuickSelectModifier::Alt => alt && !ctrl,
        QuickSelectModifier::None => !alt && !ctrl,
    };
    if !wanted {
        return None;
    }
    c.to_digit(10).map(|d| d as usize - 1)
}

/// Row of a one-line-per-item list under (`column`, `row`), given the area
/// the list was last drawn into and its scroll offset.
pub fn clicked_row(area: Rect, offset: usize, column: u16, row: u16) -> Option<usize> {
    area.contains(Position::new(column, row))
        .then(|| offset + usize::from(row - area.y))
}
