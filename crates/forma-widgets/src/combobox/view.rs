use super::position::Measurements;
use super::{matcher, Combobox, MenuGeometry, MIN_CONTROL_WIDTH};
use crate::chrome::{self, FieldState};
use crate::error::ErrorText;
use crate::label::Label;
use crate::overlay::render_overlay;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

const TOGGLE_ICON: &str = "▾";
const CHECK: &str = "✓ ";
const NO_CHECK: &str = "  ";

impl Combobox {
    /// Draw label, toggle, error line, and (when open) the menu.
    ///
    /// Records the rectangles it drew so pointer events and repositioning can
    /// use them after the frame.
    pub(super) fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible || area.is_empty() {
            self.measured.set(None);
            return;
        }

        let label = Label::new(&self.label).required(self.required_icon);
        let width = label.width().max(MIN_CONTROL_WIDTH).min(area.width);

        let mut y = area.y;
        if !label.is_empty() {
            label.render(frame, Rect::new(area.x, y, area.width, 1));
            y += 1;
        }

        let control = Rect::new(area.x, y, width, 3).intersection(area);
        let block = chrome::field_block(FieldState {
            focused: self.focused,
            disabled: self.disabled,
            invalid: !self.error.is_empty(),
        });
        let inner = block.inner(control);
        frame.render_widget(block, control);

        let input = Rect::new(inner.x, inner.y, inner.width.saturating_sub(2), inner.height.min(1));
        let button = Rect::new(
            inner.right().saturating_sub(2),
            inner.y,
            inner.width.min(2),
            inner.height.min(1),
        );
        self.render_text(frame, input);
        if !button.is_empty() {
            let icon = Rect::new(button.right() - 1, button.y, 1, 1);
            let style = if self.disabled {
                self.style.disabled_text
            } else {
                self.style.button
            };
            frame.render_widget(Paragraph::new(Span::styled(TOGGLE_ICON, style)), icon);
        }

        let error_row = Rect::new(area.x, control.bottom(), area.width, 1).intersection(area);
        ErrorText::new(&self.error).render(frame, error_row);

        let menu = self.render_menu(frame, control);
        self.measured.set(Some(Measurements {
            viewport: frame.area(),
            control,
            input,
            button,
            menu,
        }));
    }

    fn render_text(&self, frame: &mut Frame, area: Rect) {
        if area.is_empty() {
            return;
        }
        let chars = self.text.chars();
        let cursor = self.text.cursor();
        let available = usize::from(area.width);
        let show_cursor = self.focused && !self.disabled && !self.text.is_all_selected();

        // Keep the caret inside the window, with a cell to spare at the end.
        let start = (cursor + 1).saturating_sub(available);
        let end = (start + available).min(chars.len());
        let visible: String = chars[start..end].iter().collect();

        let text_style = if self.disabled {
            self.style.disabled_text
        } else if self.focused && self.text.is_all_selected() {
            self.style.selected_text
        } else {
            self.style.text
        };

        let line = if show_cursor {
            let at = cursor - start;
            let before: String = chars[start..cursor].iter().collect();
            let under = chars.get(cursor).map_or_else(|| " ".to_owned(), char::to_string);
            let after: String = chars.get(cursor + 1..end).map(|c| c.iter().collect()).unwrap_or_default();
            let mut spans = Vec::with_capacity(3);
            if at > 0 {
                spans.push(Span::styled(before, text_style));
            }
            spans.push(Span::styled(under, self.style.cursor));
            if !after.is_empty() {
                spans.push(Span::styled(after, text_style));
            }
            Line::from(spans)
        } else {
            Line::from(Span::styled(visible, text_style))
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_menu(&self, frame: &mut Frame, control: Rect) -> Option<Rect> {
        if !self.menu.is_open() || self.matching.is_empty() {
            return None;
        }
        let viewport = frame.area();
        let size = self.natural_menu_size(viewport.width);
        let geometry = self
            .geometry
            .unwrap_or_else(|| MenuGeometry::natural(size.height));
        let rect = geometry.rect(control, size.width, viewport);
        if rect.is_empty() {
            return None;
        }

        let block = chrome::menu_block();
        let inner = render_overlay(frame, rect, Some(&block));
        let highlighted = self.menu.highlighted();
        let offset = self.scroll.offset();

        for (row, pos) in (offset..self.matching.len())
            .take(usize::from(inner.height))
            .enumerate()
        {
            let Some(item) = self.matching.get(pos).and_then(|i| self.items.get(i)) else {
                continue;
            };
            let is_highlighted = highlighted == Some(pos);
            let base = if is_highlighted {
                self.style.highlighted_item
            } else {
                self.style.item
            };
            let check = if item.value == self.value {
                let style = if is_highlighted { base } else { base.patch(self.style.check) };
                Span::styled(CHECK, style)
            } else {
                Span::styled(NO_CHECK, base)
            };

            let mut spans = vec![check];
            spans.extend(emphasize(
                item.display_text(),
                &self.query,
                base,
                base.patch(self.style.match_emphasis),
            ));

            let y = inner.y + u16::try_from(row).unwrap_or(u16::MAX);
            let row_area = Rect::new(inner.x, y, inner.width, 1);
            frame.render_widget(Paragraph::new(Line::from(spans)).style(base), row_area);
        }
        Some(rect)
    }
}

/// Split `text` so the part matching `query` gets `emphasis`.
fn emphasize<'a>(text: &'a str, query: &str, base: Style, emphasis: Style) -> Vec<Span<'a>> {
    let Some(range) = matcher::find(text, query).filter(|r| !r.is_empty()) else {
        return vec![Span::styled(text, base)];
    };
    let (Some(before), Some(hit), Some(after)) = (
        text.get(..range.start),
        text.get(range.clone()),
        text.get(range.end..),
    ) else {
        return vec![Span::styled(text, base)];
    };
    [
        Span::styled(before, base),
        Span::styled(hit, emphasis),
        Span::styled(after, base),
    ]
    .into_iter()
    .filter(|span| !span.content.is_empty())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Modifier;

    #[test]
    fn emphasis_covers_only_the_match() {
        let base = Style::default();
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let spans = emphasize("Pineapple", "APP", base, bold);
        let parts: Vec<(&str, Style)> = spans.iter().map(|s| (s.content.as_ref(), s.style)).collect();
        assert_eq!(parts, vec![("Pine", base), ("app", bold), ("le", base)]);
    }

    #[test]
    fn empty_query_is_not_emphasised() {
        let spans = emphasize("Apple", "", Style::default(), Style::default().add_modifier(Modifier::ITALIC));
        assert_eq!(spans.len(), 1);
    }
}
