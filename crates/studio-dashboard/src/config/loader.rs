//! Reads `config.toml`.
//!
//! An explicit `--config` path must exist. The default location may be
//! absent, in which case every section takes its defaults.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::config::error::ConfigError;
use crate::config::schema::Config;
use crate::config::xdg;

/// Stateless configuration loader.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Reads and parses `path`.
    ///
    /// A missing file is `ConfigError::NotFound`; any other I/O failure is
    /// `ConfigError::ReadError`.
    pub fn load_from_path(path: &Path) -> Result<Config, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse_toml(&content, path),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ConfigError::NotFound {
                path: path.to_path_buf(),
                message: "Configuration file not found".to_string(),
            }),
            Err(source) => Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Reads the file at [`xdg::config_path`], or returns defaults when
    /// there is none.
    pub fn load_default() -> Result<Config, ConfigError> {
        let path = xdg::config_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        Self::load_from_path(&path)
    }

    /// `load_from_path` when a path is given, `load_default` otherwise.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        path.map_or_else(Self::load_default, Self::load_from_path)
    }

    fn parse_toml(content: &str, path: &Path) -> Result<Config, ConfigError> {
        toml::from_str(content).map_err(|e| {
            let (line, column) = e
                .span()
                .map_or((0, 0), |span| line_column(content, span.start));
            ConfigError::ParseError {
                path: path.to_path_buf(),
                line,
                column,
                message: e.message().to_string(),
            }
        })
    }
}

/// One-based line and column of byte `offset` in `content`.
fn line_column(content: &str, offset: usize) -> (usize, usize) {
    let before = &content[..offset.min(content.len())];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |p| p + 1);
    (line, before[line_start..].chars().count() + 1)
}
