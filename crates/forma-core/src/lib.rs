//! Core runtime for the **forma** form-widget toolkit.
//!
//! `forma-core` provides the traits, types, and runtime that every forma
//! widget is built on. The design follows the [Elm Architecture]: a widget is
//! a pure **update -> view** cycle, with side effects pushed to the edges
//! through [`Command`]s and [`Subscription`]s.
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Model`] | Top-level application trait (init / update / view) |
//! | [`Component`] | Reusable widget that renders into a [`ratatui::layout::Rect`] |
//! | [`Command`] | A side effect executed by the runtime, including after-render delivery |
//! | [`Subscription`] | A registration handle for a listener or timer |
//! | [`Program`] | Wires a [`Model`] to a real terminal and drives the event loop |
//! | [`TestProgram`](testing::TestProgram) | Headless harness for unit tests |
//!
//! # Listeners
//!
//! Applications read the terminal through [`terminal_events`]. Pointer and
//! resize events are also republished on a process-wide document bus, which
//! widgets listen to with [`document_events`] while they need to (an open menu
//! waiting for an outside click, for example). Timers ([`After`]) are keyed so
//! a widget can restart or cancel one by changing what it declares.
//!
//! # Logging
//!
//! The runtime emits [`tracing`] events under the `forma_core` target. A
//! full-screen program should send them to a file; see [`log_to_file`].
//!
//! [Elm Architecture]: https://guide.elm-lang.org/architecture/

pub mod command;
pub mod component;
pub mod event;
pub mod model;
pub mod runtime;
pub mod subscription;
pub mod subscriptions;
pub mod testing;

pub use command::{Command, MouseMode, TerminalCommand};
pub use component::Component;
pub use event::TerminalEvent;
pub use model::Model;
pub use runtime::{
    log_to_file, OutputTarget, Program, ProgramError, ProgramHandle, ProgramOptions,
};
pub use subscription::{subscribe, Subscription, SubscriptionId, SubscriptionSource};
pub use subscriptions::{document_events, terminal_events, After};

/// Run a forma application with default options.
pub async fn run<M: Model>(flags: M::Flags) -> Result<M, ProgramError> {
    Program::<M>::new(flags)?.run().await
}

/// Run with custom options.
pub async fn run_with<M: Model>(
    flags: M::Flags,
    options: ProgramOptions,
) -> Result<M, ProgramError> {
    Program::<M>::with_options(flags, options)?.run().await
}
