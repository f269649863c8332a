//! Terminal UI for the studio dashboard.
//!
//! Draws the widget grid with ratatui and feeds keyboard and mouse input to
//! the layout engine's interaction controller.

pub mod app;
pub mod event;
pub mod ui;
pub mod views;

#[cfg(test)]
pub(crate) mod test_utils;
