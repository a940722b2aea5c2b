use crate::key::{Binding, KeyCombination, KeyMap};
use crossterm::event::KeyCode;

/// Configurable key bindings for the combobox.
///
/// Keys not bound here edit the text field.
pub struct ComboboxKeyBindings {
    /// Open the menu, or highlight the next row. Default: Down, Ctrl+N
    pub next: Binding,
    /// Open the menu, or highlight the previous row. Default: Up, Ctrl+P
    pub prev: Binding,
    /// Highlight the first row while open, else move the caret. Default: Home
    pub first: Binding,
    /// Highlight the last row while open, else move the caret. Default: End
    pub last: Binding,
    /// Commit the highlighted row. Default: Enter
    pub commit: Binding,
    /// Revert the text and close. Default: Esc
    pub cancel: Binding,
    /// Close without committing; focus moves on. Default: Tab, Shift+Tab
    pub close: Binding,
    /// Delete the word before the caret. Default: Ctrl+W
    pub delete_word: Binding,
}

impl Default for ComboboxKeyBindings {
    fn default() -> Self {
        Self {
            next: Binding::with_keys(
                vec![
                    KeyCombination::new(KeyCode::Down),
                    KeyCombination::ctrl(KeyCode::Char('n')),
                ],
                "next",
            ),
            prev: Binding::with_keys(
                vec![
                    KeyCombination::new(KeyCode::Up),
                    KeyCombination::ctrl(KeyCode::Char('p')),
                ],
                "prev",
            ),
            first: Binding::new(KeyCombination::new(KeyCode::Home), "first"),
            last: Binding::new(KeyCombination::new(KeyCode::End), "last"),
            commit: Binding::new(KeyCombination::new(KeyCode::Enter), "select"),
            cancel: Binding::new(KeyCombination::new(KeyCode::Esc), "cancel"),
            close: Binding::with_keys(
                vec![
                    KeyCombination::new(KeyCode::Tab),
                    KeyCombination::new(KeyCode::BackTab),
                ],
                "leave",
            ),
            delete_word: Binding::new(KeyCombination::ctrl(KeyCode::Char('w')), "delete word"),
        }
    }
}

impl KeyMap for ComboboxKeyBindings {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.next, &self.prev, &self.commit, &self.cancel]
    }
}
