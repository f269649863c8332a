//! Where studio-dashboard keeps its files.
//!
//! `XDG_CONFIG_HOME` and `XDG_DATA_HOME` win on every platform. Without
//! them Linux uses `~/.config` and `~/.local/share`, macOS uses
//! `~/Library/Application Support` for both.

use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "studio-dashboard";
const CONFIG_FILE: &str = "config.toml";

/// Directory holding `config.toml`.
pub fn config_dir() -> PathBuf {
    base_dir("XDG_CONFIG_HOME", default_config_base).join(APP_DIR)
}

/// Directory holding persisted layouts (one JSON file per key).
pub fn data_dir() -> PathBuf {
    base_dir("XDG_DATA_HOME", default_data_base).join(APP_DIR)
}

/// Full path of the configuration file.
pub fn config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

fn base_dir(var: &str, default: fn() -> PathBuf) -> PathBuf {
    match std::env::var_os(var) {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => default(),
    }
}

#[cfg(target_os = "macos")]
fn default_config_base() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| home().join("Library/Application Support"))
}

#[cfg(not(target_os = "macos"))]
fn default_config_base() -> PathBuf {
    home().join(".config")
}

fn default_data_base() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| home().join(".local/share"))
}

fn home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Expands `~` and `~/...`; any other path is returned unchanged.
pub fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix('~') {
        Some("") => home(),
        Some(rest) if rest.starts_with('/') => home().join(&rest[1..]),
        _ => PathBuf::from(path),
    }
}

/// `mkdir -p`, restricting the leaf to the owner on unix.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}
