//! Default configuration template and file creation utilities.
//!
//! Provides a commented TOML template that matches `Config::default()` and
//! a function to write it to the XDG config path.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::error::ConfigError;
use crate::config::xdg;

// ---------------------------------------------------------------------------
// Default TOML template
// ---------------------------------------------------------------------------

/// A commented TOML template with all default values.
///
/// Every value here must match `Config::default()` from `schema.rs`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Studio Dashboard Configuration
#
# This file was generated with default values.
# All values shown below are the built-in defaults.
#
# Location: $XDG_CONFIG_HOME/studio-dashboard/config.toml

# ==============================================================================
# Dashboard
# ==============================================================================

[dashboard]

# Scope key the layout is stored under. Use different scopes to keep
# separate dashboards (per user, per workspace, ...).
scope = "default"

# How the default placement wraps to a new row.
# Options: "fixed", "tallest-in-row"
#   fixed          - always move down 2 rows (tall widgets may overlap)
#   tallest-in-row - move down by the tallest widget of the row
# Applies to reset, templates and reordering.
row_advance = "fixed"

# ==============================================================================
# Terminal UI
# ==============================================================================

[tui]

# Redraw tick rate as a human-readable duration.
# Examples: "250ms", "500ms", "1s"
tick_rate = "250ms"

# Terminal width (columns) below which widgets stack at full width
# while edit mode is off.
mobile_breakpoint = 80

# Terminal rows drawn per grid row.
row_height = 3

# Cells between grid columns and rows.
gap = 1

# ==============================================================================
# Storage
# ==============================================================================

[storage]

# Directory holding saved layouts. Empty string means
# $XDG_DATA_HOME/studio-dashboard. Tilde (~) is expanded.
data_dir = ""

# ==============================================================================
# Logging
# ==============================================================================

[log]

# Logging verbosity. STUDIO_DASH_LOG overrides it when set.
# Options: "error", "warn", "info", "debug", "trace"
level = "info"

# Path to log file. Empty string means stderr.
# The terminal UI always logs to a file (this one, or one in the data
# directory) so log lines never draw over the dashboard.
file = ""
"#;

// ---------------------------------------------------------------------------
// File creation
// ---------------------------------------------------------------------------

/// Creates (or force-overwrites) the default config file at the XDG path.
///
/// - If the file exists and `force` is `false`, returns `ConfigError::AlreadyExists`.
/// - If the file exists and `force` is `true`, first renames it to
///   `config.toml.<timestamp>.backup`.
/// - Returns the path where the config was written.
pub fn create_default_config(force: bool) -> Result<PathBuf, ConfigError> {
    let path = xdg::config_path();
    create_default_config_at(&path, force)?;
    Ok(path)
}

/// Same as [`create_default_config`] for an explicit path.
pub fn create_default_config_at(path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() {
        if !force {
            return Err(ConfigError::AlreadyExists {
                path: path.to_path_buf(),
            });
        }
        let backup_path = backup_path(path);
        fs::rename(path, &backup_path).map_err(|e| ConfigError::WriteError {
            path: backup_path.clone(),
            source: e,
        })?;
        tracing::info!("Backed up existing config to {}", backup_path.display());
    }

    write_default_config(path)
}

/// `config.toml` → `config.toml.20260101T120000.backup`.
fn backup_path(path: &Path) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%dT%H%M%S");
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{stamp}.backup"));
    path.with_file_name(name)
}

/// Writes the default template to `path`, creating parent dirs and setting 0600 permissions.
fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let write_err = |e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        xdg::ensure_dir(parent).map_err(write_err)?;
    }
    fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(write_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(write_err)?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
