//! Field caption with an optional required marker.
//!
//! Stateless: build it in `view` from the owning widget's props and render it.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

const REQUIRED_MARKER: &str = " *";

/// A one-row field label.
///
/// ```ignore
/// use forma_widgets::label::Label;
///
/// Label::new("Fruit").required(true).render(frame, area);
/// ```
pub struct Label<'a> {
    text: &'a str,
    required: bool,
    style: Style,
    marker_style: Style,
}

impl<'a> Label<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            required: false,
            style: Style::default(),
            marker_style: Style::default().fg(Color::Red),
        }
    }

    /// Show the required marker after the text.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// An empty label takes no space.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Display width in cells, including the marker.
    pub fn width(&self) -> u16 {
        if self.is_empty() {
            return 0;
        }
        let marker = if self.required { REQUIRED_MARKER.width() } else { 0 };
        u16::try_from(self.text.width() + marker).unwrap_or(u16::MAX)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if self.is_empty() || area.is_empty() {
            return;
        }
        let mut spans = vec![Span::styled(self.text, self.style)];
        if self.required {
            spans.push(Span::styled(REQUIRED_MARKER, self.marker_style));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
