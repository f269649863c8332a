//! TOML configuration schema types for the studio dashboard.
//!
//! All structs derive `Deserialize` and `Serialize` with defaults via
//! `#[serde(default)]`, so a partial (or empty) file is always valid.
//!
//! Duration fields use human-readable strings (e.g. `"250ms"`) parsed by the
//! `humantime` crate through the accessor methods.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use widget_grid::{RowAdvance, StoreOptions, ViewportOptions};

use crate::config::error::ConfigError;
use crate::config::xdg;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration encompassing all sections.
///
/// ```toml
/// [dashboard]
/// [tui]
/// [storage]
/// [log]
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Which dashboard to open and how it lays out.
    pub dashboard: DashboardConfig,
    /// Terminal UI settings.
    pub tui: TuiConfig,
    /// Where layouts are persisted.
    pub storage: StorageConfig,
    /// Logging settings.
    pub log: LogConfig,
}

impl Config {
    /// Checks values serde cannot (durations, zero sizes).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dashboard.scope.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "dashboard.scope",
                message: "must not be empty".to_string(),
            });
        }
        self.tui.tick_rate()?;
        if self.tui.row_height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tui.row_height",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// `[dashboard]` section.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Scope key the layout is stored under.
    pub scope: String,
    /// Wrap step of the default placement: `"fixed"` or `"tallest-in-row"`.
    pub row_advance: RowAdvance,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            scope: "default".to_string(),
            row_advance: RowAdvance::Fixed,
        }
    }
}

impl DashboardConfig {
    /// Store options for the built-in catalogs with this section's policy.
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            row_advance: self.row_advance,
            ..StoreOptions::default()
        }
    }
}

// ---------------------------------------------------------------------------
// TUI
// ---------------------------------------------------------------------------

/// `[tui]` section. Sizes are in terminal cells.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TuiConfig {
    /// Redraw tick as a human-readable duration (e.g. `"250ms"`).
    pub tick_rate: String,
    /// Terminal width (columns) below which the grid stacks when not editing.
    pub mobile_breakpoint: u16,
    /// Terminal rows per grid row.
    pub row_height: u16,
    /// Cells between grid columns and rows.
    pub gap: u16,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate: "250ms".to_string(),
            mobile_breakpoint: 80,
            row_height: 3,
            gap: 1,
        }
    }
}

impl TuiConfig {
    /// Parsed tick rate.
    pub fn tick_rate(&self) -> Result<Duration, ConfigError> {
        humantime::parse_duration(&self.tick_rate).map_err(|e| ConfigError::InvalidValue {
            field: "tui.tick_rate",
            message: e.to_string(),
        })
    }

    /// Controller viewport options for a terminal `width` columns wide.
    pub fn viewport_options(&self, width: u16) -> ViewportOptions {
        ViewportOptions {
            mobile_breakpoint: f64::from(self.mobile_breakpoint),
            row_height: f64::from(self.row_height.max(1)),
            gap: f64::from(self.gap),
            initial_width: f64::from(width),
        }
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// `[storage]` section.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding layout files. Empty means the XDG data directory.
    pub data_dir: String,
}

impl StorageConfig {
    /// Resolved data directory, with `~` expanded.
    pub fn resolved_dir(&self) -> PathBuf {
        if self.data_dir.is_empty() {
            xdg::data_dir()
        } else {
            xdg::expand_tilde(&self.data_dir)
        }
    }
}

// ---------------------------------------------------------------------------
// Log
// ---------------------------------------------------------------------------

/// `[log]` section.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Logging verbosity.
    pub level: LogLevel,
    /// Path to log file. Empty string means stderr.
    pub file: String,
}

/// Log verbosity levels (kebab-case in TOML).
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    Warn,
    /// Informational messages (default).
    #[default]
    Info,
    /// Debug-level detail.
    Debug,
    /// Full trace output.
    Trace,
}

impl LogLevel {
    /// Filter directive for this level.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
