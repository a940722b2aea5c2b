//! Coalescing of viewport resize and scroll into one reposition.
//!
//! A widget owns a single slot. The first event while the menu is open starts
//! the delay; further events before it elapses are absorbed. The slot is pure
//! data: the owning widget turns a pending slot into a timer subscription.

use std::time::{Duration, Instant};

/// Default delay between the first resize/scroll event and the reposition.
pub const REPOSITION_DELAY: Duration = Duration::from_millis(50);

/// The single reposition timer slot of one widget instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RepositionTimer {
    #[default]
    Idle,
    Pending { deadline: Instant },
}

impl RepositionTimer {
    /// Start the delay unless one is already pending or the menu is closed.
    ///
    /// Returns `true` if a new delay was started.
    pub fn schedule(&mut self, now: Instant, delay: Duration, menu_open: bool) -> bool {
        if !menu_open || self.is_pending() {
            return false;
        }
        *self = RepositionTimer::Pending {
            deadline: now + delay,
        };
        true
    }

    /// The delay elapsed. Returns `true` if it was pending.
    pub fn fire(&mut self) -> bool {
        std::mem::take(self).is_pending()
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, RepositionTimer::Pending { .. })
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self {
            RepositionTimer::Pending { deadline } => Some(*deadline),
            RepositionTimer::Idle => None,
        }
    }
}
