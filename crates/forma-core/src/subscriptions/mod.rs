//! Built-in subscription sources.
//!
//! - **Terminal events** ([`terminal_events`], [`TerminalEvents`]) -- the
//!   application-level stream of keyboard, mouse, resize, focus, and paste
//!   events. Every event it reads is republished on the document bus.
//! - **Document events** ([`document_events`], [`DocumentEvents`]) --
//!   per-widget listeners on the document bus, keyed so each widget instance
//!   holds at most one registration of a kind.
//! - **Timers** ([`After`]) -- keyed one-shot delays.

mod document;
mod terminal;
mod timer;

pub use document::*;
pub use terminal::*;
pub use timer::*;
