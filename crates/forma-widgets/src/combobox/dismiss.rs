//! Outside-interaction listener lifecycle.
//!
//! While the menu is open the combobox listens for pointer presses anywhere
//! in the document. Attaching and detaching are deferred by a minimal delay
//! so the press that opened the menu is never the one that closes it.

use std::time::Duration;

/// Delay before a requested attach or detach takes effect.
pub const SETTLE_DELAY: Duration = Duration::from_millis(1);

/// State of the dismissal listener of one widget instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DismissalListener {
    #[default]
    Detached,
    /// Requested; not yet reacting to presses.
    Attaching,
    Attached,
    /// Closing; still reacting to presses until settled.
    Detaching,
}

impl DismissalListener {
    /// Follow the menu's visibility.
    pub fn sync(self, menu_open: bool) -> Self {
        use DismissalListener::*;
        match (self, menu_open) {
            (Detached, true) => Attaching,
            (Detaching, true) => Attached,
            (Attaching, false) => Detached,
            (Attached, false) => Detaching,
            (state, _) => state,
        }
    }

    /// The settle delay elapsed.
    pub fn settle(self) -> Self {
        match self {
            DismissalListener::Attaching => DismissalListener::Attached,
            DismissalListener::Detaching => DismissalListener::Detached,
            state => state,
        }
    }

    /// Whether document presses should close the menu.
    pub fn is_listening(self) -> bool {
        matches!(self, DismissalListener::Attached | DismissalListener::Detaching)
    }

    /// Whether a settle timer is outstanding.
    pub fn is_settling(self) -> bool {
        matches!(self, DismissalListener::Attaching | DismissalListener::Detaching)
    }
}
