//! **forma** -- Form-input widgets for [`ratatui`] on an Elm-architecture runtime.
//!
//! This is the umbrella crate that re-exports everything needed to build a
//! forma application from a single dependency:
//!
//! ```toml
//! [dependencies]
//! forma = "0.1"
//! ```
//!
//! # Re-exports
//!
//! * All public items from [`forma_core`] are available at the crate root
//!   ([`Model`], [`Component`], [`Command`], [`Subscription`], [`Program`],
//!   [`run`], [`run_with`], etc.).
//! * The [`widgets`] module re-exports everything from [`forma_widgets`]
//!   (the combobox, labels, error lines).
//! * [`ratatui`], [`crossterm`], and [`tokio`] are re-exported so downstream
//!   crates do not need to depend on them directly.
//!
//! # Quick start
//!
//! ```ignore
//! use forma::widgets::combobox::{Combobox, ComboboxProps, Item, Message};
//! use forma::{Command, Component, Model};
//! use ratatui::Frame;
//!
//! struct Form {
//!     fruit: Combobox,
//! }
//!
//! impl Model for Form {
//!     type Message = Message;
//!     type Flags = ();
//!
//!     fn init(_: ()) -> (Self, Command<Message>) {
//!         let (fruit, cmd) = Combobox::new(ComboboxProps {
//!             label: "Fruit".into(),
//!             items: vec![Item::labeled("1", "Apple"), Item::labeled("2", "Banana")],
//!             ..ComboboxProps::default()
//!         });
//!         (Form { fruit }, cmd)
//!     }
//!     fn update(&mut self, msg: Message) -> Command<Message> {
//!         self.fruit.update(msg)
//!     }
//!     fn view(&self, frame: &mut Frame) {
//!         self.fruit.view(frame, frame.area());
//!     }
//!     fn subscriptions(&self) -> Vec<forma::Subscription<Message>> {
//!         self.fruit.subscriptions()
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     forma::run::<Form>(()).await.unwrap();
//! }
//! ```

pub use forma_core::*;
pub mod widgets {
    pub use forma_widgets::*;
}

// Re-export dependencies for use in demos and downstream crates
pub use crossterm;
pub use ratatui;
pub use tokio;
