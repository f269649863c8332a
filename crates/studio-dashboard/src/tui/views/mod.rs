//! View components for the TUI.

pub mod grid;
pub mod picker;
