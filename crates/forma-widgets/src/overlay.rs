//! Drawing helpers for floating layers (menus, popovers).

use ratatui::layout::Rect;
use ratatui::widgets::{Block, Clear};
use ratatui::Frame;

/// Clear whatever was drawn under `area` and optionally draw a border.
///
/// Returns the area inside the border. Floating layers must be rendered after
/// the content they cover.
pub fn render_overlay(frame: &mut Frame, area: Rect, block: Option<&Block>) -> Rect {
    frame.render_widget(Clear, area);
    if let Some(block) = block {
        let inner = block.inner(area);
        frame.render_widget(block.clone(), area);
        inner
    } else {
        area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::widgets::{Borders, Paragraph};
    use ratatui::Terminal;

    #[test]
    fn overlay_replaces_covered_content() {
        let mut terminal = Terminal::new(TestBackend::new(6, 3)).unwrap();
        let mut inner = Rect::default();
        terminal
            .draw(|f| {
                f.render_widget(Paragraph::new("xxxxxx\nxxxxxx\nxxxxxx"), f.area());
                let block = Block::new().borders(Borders::ALL);
                inner = render_overlay(f, Rect::new(1, 0, 4, 3), Some(&block));
            })
            .unwrap();
        assert_eq!(inner, Rect::new(2, 1, 2, 1));
        let buf = terminal.backend().buffer();
        assert_eq!(buf[(0, 1)].symbol(), "x");
        assert_eq!(buf[(2, 1)].symbol(), " ");
        assert_eq!(buf[(5, 1)].symbol(), "x");
    }
}
