//! Menu visibility and the roving highlight.
//!
//! [`MenuState`] is a pure value: every transition takes the current length
//! of the matching set and returns the next state. The committed selection
//! lives elsewhere and is never changed here.

/// Whether the menu is open and which row, if any, is highlighted.
///
/// The highlighted index is a position in the matching set, not in the
/// candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    Closed,
    OpenNoHighlight,
    OpenHighlighted(usize),
}

impl MenuState {
    pub fn is_open(self) -> bool {
        !matches!(self, MenuState::Closed)
    }

    pub fn highlighted(self) -> Option<usize> {
        match self {
            MenuState::OpenHighlighted(pos) => Some(pos),
            _ => None,
        }
    }

    /// Open the menu, highlighting `selected` (the selected item's row) if it
    /// is shown. Opening an open menu changes nothing.
    pub fn open(self, selected: Option<usize>) -> Self {
        if self.is_open() {
            return self;
        }
        Self::reset(selected)
    }

    /// The open state for a freshly rebuilt matching set.
    pub fn reset(row: Option<usize>) -> Self {
        match row {
            Some(pos) => MenuState::OpenHighlighted(pos),
            None => MenuState::OpenNoHighlight,
        }
    }

    pub fn close(self) -> Self {
        MenuState::Closed
    }

    /// Advance the highlight, wrapping from the last row to the first.
    pub fn next(self, len: usize) -> Self {
        match self {
            MenuState::Closed => self,
            _ if len == 0 => MenuState::OpenNoHighlight,
            MenuState::OpenNoHighlight => MenuState::OpenHighlighted(0),
            MenuState::OpenHighlighted(pos) => MenuState::OpenHighlighted((pos + 1) % len),
        }
    }

    /// Retreat the highlight, wrapping from the first row to the last.
    pub fn prev(self, len: usize) -> Self {
        match self {
            MenuState::Closed => self,
            _ if len == 0 => MenuState::OpenNoHighlight,
            MenuState::OpenHighlighted(pos) if pos > 0 && pos <= len => {
                MenuState::OpenHighlighted(pos - 1)
            }
            _ => MenuState::OpenHighlighted(len - 1),
        }
    }

    pub fn first(self, len: usize) -> Self {
        self.jump(0, len)
    }

    pub fn last(self, len: usize) -> Self {
        self.jump(len.saturating_sub(1), len)
    }

    /// Highlight the row under the pointer.
    pub fn hover(self, pos: usize, len: usize) -> Self {
        self.jump(pos, len)
    }

    /// Drop the highlight but stay open.
    pub fn clear(self) -> Self {
        match self {
            MenuState::Closed => self,
            _ => MenuState::OpenNoHighlight,
        }
    }

    fn jump(self, pos: usize, len: usize) -> Self {
        match self {
            MenuState::Closed => self,
            _ if pos < len => MenuState::OpenHighlighted(pos),
            _ => MenuState::OpenNoHighlight,
        }
    }
}

/// Scroll offset of the menu's row window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuScroll {
    offset: usize,
}

impl MenuScroll {
    pub fn offset(self) -> usize {
        self.offset
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Move the window the minimum distance needed to show row `pos`.
    pub fn ensure_visible(&mut self, pos: usize, visible: usize) {
        if visible == 0 {
            return;
        }
        if pos < self.offset {
            self.offset = pos;
        } else if pos >= self.offset + visible {
            self.offset = pos + 1 - visible;
        }
    }

    /// Scroll by `delta` rows, staying within `len` rows shown `visible` at a time.
    pub fn scroll_by(&mut self, delta: isize, len: usize, visible: usize) {
        let max = len.saturating_sub(visible);
        self.offset = self.offset.saturating_add_signed(delta).min(max);
    }

    /// Pull the offset back in range after the matching set or height shrank.
    pub fn clamp(&mut self, len: usize, visible: usize) {
        self.offset = self.offset.min(len.saturating_sub(visible));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_highlights_selected_row() {
        assert_eq!(MenuState::Closed.open(Some(2)), MenuState::OpenHighlighted(2));
        assert_eq!(MenuState::Closed.open(None), MenuState::OpenNoHighlight);
    }

    #[test]
    fn opening_an_open_menu_is_idempotent() {
        let open = MenuState::OpenHighlighted(1);
        assert_eq!(open.open(Some(3)), open);
        assert_eq!(MenuState::OpenNoHighlight.open(Some(0)), MenuState::OpenNoHighlight);
    }

    #[test]
    fn next_cycles_back_to_start() {
        for len in 1..6 {
            for start in 0..len {
                let mut state = MenuState::OpenHighlighted(start);
                for _ in 0..len {
                    state = state.next(len);
                }
                assert_eq!(state, MenuState::OpenHighlighted(start), "len {len}");
            }
        }
    }

    #[test]
    fn prev_cycles_back_to_start() {
        for len in 1..6 {
            let mut state = MenuState::OpenHighlighted(0);
            for _ in 0..len {
                state = state.prev(len);
            }
            assert_eq!(state, MenuState::OpenHighlighted(0));
        }
    }

    #[test]
    fn single_row_wraps_to_itself() {
        let state = MenuState::OpenHighlighted(0);
        assert_eq!(state.next(1), state);
        assert_eq!(state.prev(1), state);
        assert_eq!(MenuState::OpenNoHighlight.next(1), state);
        assert_eq!(MenuState::OpenNoHighlight.prev(1), state);
    }

    #[test]
    fn without_highlight_next_takes_first_and_prev_takes_last() {
        assert_eq!(MenuState::OpenNoHighlight.next(4), MenuState::OpenHighlighted(0));
        assert_eq!(MenuState::OpenNoHighlight.prev(4), MenuState::OpenHighlighted(3));
    }

    #[test]
    fn empty_set_stays_without_highlight() {
        assert_eq!(MenuState::OpenNoHighlight.next(0), MenuState::OpenNoHighlight);
        assert_eq!(MenuState::OpenHighlighted(2).prev(0), MenuState::OpenNoHighlight);
        assert_eq!(MenuState::OpenNoHighlight.last(0), MenuState::OpenNoHighlight);
    }

    #[test]
    fn navigation_never_opens_a_closed_menu() {
        let closed = MenuState::Closed;
        assert_eq!(closed.next(3), closed);
        assert_eq!(closed.prev(3), closed);
        assert_eq!(closed.first(3), closed);
        assert_eq!(closed.hover(1, 3), closed);
        assert_eq!(closed.clear(), closed);
    }

    #[test]
    fn first_last_and_clear() {
        let state = MenuState::OpenHighlighted(1);
        assert_eq!(state.first(5), MenuState::OpenHighlighted(0));
        assert_eq!(state.last(5), MenuState::OpenHighlighted(4));
        assert_eq!(state.clear(), MenuState::OpenNoHighlight);
        assert_eq!(state.close().highlighted(), None);
    }

    #[test]
    fn scroll_follows_highlight() {
        let mut scroll = MenuScroll::default();
        scroll.ensure_visible(2, 3);
        assert_eq!(scroll.offset(), 0);
        scroll.ensure_visible(5, 3);
        assert_eq!(scroll.offset(), 3);
        scroll.ensure_visible(1, 3);
        assert_eq!(scroll.offset(), 1);
    }

    #[test]
    fn scroll_by_is_bounded() {
        let mut scroll = MenuScroll::default();
        scroll.scroll_by(-1, 10, 4);
        assert_eq!(scroll.offset(), 0);
        scroll.scroll_by(100, 10, 4);
        assert_eq!(scroll.offset(), 6);
        scroll.clamp(5, 4);
        assert_eq!(scroll.offset(), 1);
    }
}
