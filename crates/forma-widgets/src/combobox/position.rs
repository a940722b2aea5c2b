//! Floating menu placement against the viewport edges.
//!
//! Geometry is computed from what the last render measured. Without
//! measurements there is nothing to position against and the caller keeps
//! the natural placement.

use ratatui::layout::{Rect, Size};

/// Columns and rows the host reserves along the viewport's right and bottom
/// edges (its own scrollbars, a status line, ...). Menus never cover them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scrollbars {
    /// Width of a vertical scrollbar on the right edge.
    pub width: u16,
    /// Height of a horizontal scrollbar on the bottom edge.
    pub height: u16,
}

/// Rectangles recorded during the last render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurements {
    /// The whole drawable area.
    pub viewport: Rect,
    /// The bordered toggle (input plus button). The menu anchors to it.
    pub control: Rect,
    /// The text field inside the toggle.
    pub input: Rect,
    /// The toggle button inside the toggle.
    pub button: Rect,
    /// Where the menu was drawn, if it was.
    pub menu: Option<Rect>,
}

/// Vertical side of the control the menu opens on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Placement {
    #[default]
    Below,
    Above,
}

/// Horizontal anchoring of the menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    /// Left edge on the control's left edge.
    #[default]
    Left,
    /// Right edge on the given column (exclusive).
    Right { right: u16 },
}

/// Space around the control, in cells. Negative when the control itself
/// extends past the usable viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Distances {
    pub to_top: i32,
    pub to_bottom: i32,
    pub to_left: i32,
    pub to_right: i32,
}

impl Distances {
    pub fn measure(control: Rect, viewport: Rect, scrollbars: Scrollbars) -> Self {
        Self {
            to_top: i32::from(control.y) - i32::from(viewport.y),
            to_bottom: i32::from(viewport.bottom())
                - i32::from(control.bottom())
                - i32::from(scrollbars.height),
            to_left: i32::from(control.x) - i32::from(viewport.x),
            to_right: i32::from(viewport.right())
                - i32::from(control.x)
                - i32::from(scrollbars.width),
        }
    }
}

/// Where and how tall the menu is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuGeometry {
    pub placement: Placement,
    pub height: u16,
    /// The menu is shorter than its content and scrolls internally.
    pub scrollable: bool,
    pub alignment: Alignment,
}

impl MenuGeometry {
    /// Below the control, left-aligned, at full height.
    pub fn natural(height: u16) -> Self {
        Self {
            placement: Placement::Below,
            height,
            scrollable: false,
            alignment: Alignment::Left,
        }
    }

    /// Place a menu of `natural` size against `control`.
    pub fn compute(
        control: Rect,
        viewport: Rect,
        scrollbars: Scrollbars,
        natural: Size,
    ) -> Self {
        let d = Distances::measure(control, viewport, scrollbars);
        let h = i32::from(natural.height);
        let w = i32::from(natural.width);

        let (placement, height, scrollable) = if d.to_bottom >= h {
            (Placement::Below, h, false)
        } else if d.to_bottom < d.to_top {
            if d.to_top >= h {
                (Placement::Above, h, false)
            } else {
                (Placement::Above, d.to_top, true)
            }
        } else {
            (Placement::Below, d.to_bottom.max(0), true)
        };

        let alignment = if d.to_right >= w || d.to_left < w || d.to_right < 0 {
            Alignment::Left
        } else {
            let usable_right = viewport.right().saturating_sub(scrollbars.width);
            Alignment::Right {
                right: control.right().min(usable_right),
            }
        };

        Self {
            placement,
            height: u16::try_from(height).unwrap_or(u16::MAX),
            scrollable,
            alignment,
        }
    }

    /// The menu rectangle for a menu `width` cells wide, kept inside `viewport`.
    pub fn rect(&self, control: Rect, width: u16, viewport: Rect) -> Rect {
        let x = match self.alignment {
            Alignment::Left => control.x,
            Alignment::Right { right } => right.saturating_sub(width),
        };
        let y = match self.placement {
            Placement::Below => control.bottom(),
            Placement::Above => control.y.saturating_sub(self.height),
        };
        Rect::new(x, y, width, self.height).intersection(viewport)
    }
}
