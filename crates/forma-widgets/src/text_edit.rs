//! Single-line text editing state for form fields.
//!
//! `TextEditState` holds a character buffer, a cursor, and an optional
//! select-all. While the whole text is selected the next insertion replaces
//! it and the next deletion clears it, the way a field behaves after it is
//! clicked into.

/// Single-line text buffer with cursor and select-all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextEditState {
    chars: Vec<char>,
    cursor: usize,
    all_selected: bool,
}

impl TextEditState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current text.
    pub fn value(&self) -> String {
        self.chars.iter().collect()
    }

    /// Replace the text, move the cursor to the end, and drop the selection.
    pub fn set_value(&mut self, s: &str) {
        self.chars = s.chars().collect();
        self.cursor = self.chars.len();
        self.all_selected = false;
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Cursor position as a char index.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Select the whole text. Has no visible effect on an empty buffer.
    pub fn select_all(&mut self) {
        self.all_selected = !self.chars.is_empty();
        self.cursor = self.chars.len();
    }

    pub fn is_all_selected(&self) -> bool {
        self.all_selected
    }

    /// Insert a character at the cursor, replacing the selection if any.
    pub fn insert_char(&mut self, c: char) {
        self.take_selection();
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
    }

    /// Insert a string at the cursor, replacing the selection if any.
    /// Line breaks are dropped. Returns the number of chars inserted.
    pub fn insert_str(&mut self, s: &str) -> usize {
        self.take_selection();
        let pasted: Vec<char> = s.chars().filter(|c| !matches!(c, '\n' | '\r')).collect();
        let inserted = pasted.len();
        self.chars.splice(self.cursor..self.cursor, pasted);
        self.cursor += inserted;
        inserted
    }

    /// Backspace. Returns `true` if the text changed.
    pub fn delete_back(&mut self) -> bool {
        if self.take_selection() {
            return true;
        }
        if self.cursor > 0 {
            self.cursor -= 1;
            self.chars.remove(self.cursor);
            true
        } else {
            false
        }
    }

    /// Delete. Returns `true` if the text changed.
    pub fn delete_forward(&mut self) -> bool {
        if self.take_selection() {
            return true;
        }
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
            true
        } else {
            false
        }
    }

    /// Delete the word before the cursor (Ctrl+W). Returns `true` if the text changed.
    pub fn delete_word_back(&mut self) -> bool {
        if self.take_selection() {
            return true;
        }
        let end = self.cursor;
        let mut start = end;
        while start > 0 && self.chars[start - 1] == ' ' {
            start -= 1;
        }
        while start > 0 && self.chars[start - 1] != ' ' {
            start -= 1;
        }
        self.chars.drain(start..end);
        self.cursor = start;
        start != end
    }

    pub fn move_left(&mut self) {
        if self.all_selected {
            self.all_selected = false;
            self.cursor = 0;
        } else if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_right(&mut self) {
        self.all_selected = false;
        if self.cursor < self.chars.len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.all_selected = false;
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.all_selected = false;
        self.cursor = self.chars.len();
    }

    fn take_selection(&mut self) -> bool {
        if !self.all_selected {
            return false;
        }
        self.all_selected = false;
        self.chars.clear();
        self.cursor = 0;
        true
    }
}
