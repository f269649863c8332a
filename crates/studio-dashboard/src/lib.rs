//! Studio Dashboard
//!
//! A terminal host for the [`widget_grid`] layout engine: TOML
//! configuration, logging, file-backed layout persistence, a ratatui UI
//! and the command handlers behind the `studio-dash` CLI.

/// CLI command handlers.
pub mod commands;

/// Configuration loading, defaults and XDG path resolution.
pub mod config;

/// Tracing subscriber setup.
pub mod logging;

/// File-backed persistence adapter.
pub mod storage;

/// Terminal user interface.
pub mod tui;

use widget_grid::LayoutStore;

use crate::config::schema::Config;
use crate::storage::FilePersistence;

/// Log file the TUI falls back to when `[log] file` is empty.
pub const TUI_LOG_FILE: &str = "studio-dash.log";

/// Opens the layout store described by `config`.
pub fn open_store(config: &Config) -> LayoutStore<FilePersistence> {
    let persistence = FilePersistence::new(config.storage.resolved_dir());
    LayoutStore::open_with(
        persistence,
        &config.dashboard.scope,
        config.dashboard.store_options(),
    )
}
