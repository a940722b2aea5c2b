//! Form-input widgets for the **forma** TUI framework.
//!
//! Interactive widgets implement [`forma_core::Component`], so they embed in
//! any [`forma_core::Model`] and compose within [`ratatui`] layouts. The
//! stateless pieces (label, error line) are plain builders rendered from a
//! parent's `view`.
//!
//! # Widgets
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`combobox`] | Text field that filters a floating menu of items |
//! | [`label`] | Field caption with a required marker |
//! | [`error`] | Inline validation message |
//!
//! # Utilities
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`chrome`] | Shared borders for fields and menus |
//! | [`key`] | Key-binding helpers |
//! | [`overlay`] | Drawing floating layers over other content |
//! | [`text_edit`] | Single-line editing buffer with select-all |

pub mod chrome;
pub mod combobox;
pub mod error;
pub mod key;
pub mod label;
pub mod overlay;
pub mod text_edit;
