//! Command implementations for the studio-dash CLI.
//!
//! Each handler works on a [`widget_grid::LayoutStore`] and returns the text
//! to print, so `main` only deals with argument parsing and exit codes.
//! - `catalog` - widget and template listings
//! - `layout` - scripted layout edits

pub mod catalog;
pub mod layout;

pub use catalog::*;
pub use layout::*;

use thiserror::Error;

/// Errors reported by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The widget id is not in the catalog.
    #[error("Unknown widget: {0}")]
    UnknownWidget(String),

    /// The widget is not on the dashboard.
    #[error("Widget is not on the dashboard: {0}")]
    NotActive(String),

    /// A list position outside `1..=len`.
    #[error("Position {position} is out of range (1-{len})")]
    InvalidPosition {
        /// Requested 1-based position.
        position: usize,
        /// Number of widgets on the dashboard.
        len: usize,
    },

    /// Unknown module tag.
    #[error(transparent)]
    Module(#[from] widget_grid::ParseModuleError),

    /// Layout engine error.
    #[error(transparent)]
    Layout(#[from] widget_grid::Error),

    /// JSON output failed.
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}
