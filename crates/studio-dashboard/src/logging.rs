//! Logging initialization for studio-dash.
//!
//! Configures the `tracing` subscriber with level filtering via the
//! `STUDIO_DASH_LOG` environment variable, falling back to `[log] level`
//! from the config file. Records emitted by the layout engine through the
//! `log` facade are picked up by the same subscriber.
//!
//! # Usage
//!
//! ```bash
//! # Configured level (info by default)
//! studio-dash layout show
//!
//! # Debug level
//! STUDIO_DASH_LOG=debug studio-dash layout show
//!
//! # Engine-only debugging
//! STUDIO_DASH_LOG=widget_grid=debug,warn studio-dash tui
//! ```

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::schema::LogConfig;
use crate::config::xdg;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "STUDIO_DASH_LOG";

/// Builds the filter: `STUDIO_DASH_LOG` when set and valid, the configured
/// level otherwise.
pub fn build_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(config.level.as_str()))
}

/// Resolves the log file: the configured one, else `fallback`, else none
/// (stderr).
pub fn log_file(config: &LogConfig, fallback: Option<&Path>) -> Option<PathBuf> {
    if config.file.is_empty() {
        fallback.map(Path::to_path_buf)
    } else {
        Some(xdg::expand_tilde(&config.file))
    }
}

/// Initialize the tracing subscriber.
///
/// Writes to the resolved log file (appending) or to stderr. A second call
/// is a no-op.
///
/// # Errors
///
/// Returns the I/O error if the log file cannot be opened.
pub fn init(config: &LogConfig, fallback_file: Option<&Path>) -> std::io::Result<()> {
    let filter = build_filter(config);
    let file = log_file(config, fallback_file);
    let ansi = file.is_none();

    let writer = match file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                xdg::ensure_dir(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(writer)
        .try_init();
    Ok(())
}
