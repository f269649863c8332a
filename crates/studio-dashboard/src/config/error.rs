//! Errors raised while reading, writing or checking `config.toml`.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration failure. Each variant names the file or key involved.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("cannot read {path}")]
    ReadError {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Not valid TOML, or a key has the wrong type.
    #[error("{path}:{line}:{column}: {message}")]
    ParseError {
        /// File being parsed.
        path: PathBuf,
        /// One-based line, 0 when toml gives no span.
        line: usize,
        /// One-based column, 0 when toml gives no span.
        column: usize,
        /// Parser message.
        message: String,
    },

    /// `--config` pointed at a missing file.
    #[error("{message}: {path}")]
    NotFound {
        /// Requested path.
        path: PathBuf,
        /// Short description shown before the path.
        message: String,
    },

    /// `config init` without `--force` over an existing file.
    #[error("{path} already exists (use --force to replace it)")]
    AlreadyExists {
        /// Existing file.
        path: PathBuf,
    },

    /// Writing the template or its backup failed.
    #[error("cannot write {path}")]
    WriteError {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Rendering the config back to TOML failed.
    #[error("cannot render configuration: {message}")]
    SerializeError {
        /// Serializer message.
        message: String,
    },

    /// A key parsed but its value is unusable.
    #[error("invalid {field}: {message}")]
    InvalidValue {
        /// Dotted key, e.g. `tui.tick_rate`.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },
}
