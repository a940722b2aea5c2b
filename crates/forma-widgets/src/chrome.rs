//! Borders shared by form fields and their floating menus.

use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Borders};

/// Interaction state that decides how a field's border looks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldState {
    pub focused: bool,
    pub disabled: bool,
    /// The field currently shows an error message.
    pub invalid: bool,
}

/// Border style for a field. Disabled wins over invalid, invalid over focused.
pub fn field_border_style(state: FieldState) -> Style {
    let color = if state.disabled {
        Color::DarkGray
    } else if state.invalid {
        Color::Red
    } else if state.focused {
        Color::Cyan
    } else {
        Color::Gray
    };
    Style::default().fg(color)
}

/// A bordered block around a single-line field.
pub fn field_block(state: FieldState) -> Block<'static> {
    Block::new()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(field_border_style(state))
}

/// The block drawn around a floating menu.
pub fn menu_block() -> Block<'static> {
    Block::new()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
}
