//! Inline validation message shown under a field.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// How urgently assistive technology should announce a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Politeness {
    Polite,
    /// Interrupt whatever is being announced.
    #[default]
    Assertive,
}

/// A one-row error message. Renders nothing when the text is empty.
pub struct ErrorText<'a> {
    text: &'a str,
    politeness: Politeness,
    style: Style,
}

impl<'a> ErrorText<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            politeness: Politeness::default(),
            style: Style::default().fg(Color::Red),
        }
    }

    pub fn politeness(mut self, politeness: Politeness) -> Self {
        self.politeness = politeness;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The message and how to announce it, or `None` when there is nothing to say.
    pub fn announcement(&self) -> Option<(&'a str, Politeness)> {
        (!self.is_empty()).then_some((self.text, self.politeness))
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if self.is_empty() || area.is_empty() {
            return;
        }
        let line = Line::from(vec![
            Span::styled("! ", self.style),
            Span::styled(self.text, self.style),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_announces_nothing() {
        assert_eq!(ErrorText::new("").announcement(), None);
        assert_eq!(
            ErrorText::new("Required").announcement(),
            Some(("Required", Politeness::Assertive))
        );
        assert_eq!(
            ErrorText::new("Required")
                .politeness(Politeness::Polite)
                .announcement()
                .map(|(_, p)| p),
            Some(Politeness::Polite)
        );
    }
}
