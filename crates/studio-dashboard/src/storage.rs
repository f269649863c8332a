//! File-backed layout persistence.
//!
//! Each key is stored as its own JSON file under the data directory:
//!
//! ```text
//! <data_dir>/dashboard-layout_default.json
//! <data_dir>/dashboard-template_default.json
//! ```
//!
//! Writes go through a timestamped temp file, fsync and rename, so a crash
//! leaves either the old or the new value on disk.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use widget_grid::{Persistence, PersistenceError};

use crate::config::xdg;

/// Envelope written to disk for one key.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredValue {
    key: String,
    saved_at: String,
    value: String,
}

/// [`Persistence`] backed by one JSON file per key.
#[derive(Debug, Clone)]
pub struct FilePersistence {
    dir: PathBuf,
}

impl FilePersistence {
    /// Stores files under `dir`, created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path for `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }
}

/// Maps a key to a file stem: characters outside `[A-Za-z0-9_-]` become `_`.
pub fn file_stem(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl Persistence for FilePersistence {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PersistenceError::Io(e)),
        };
        let stored: StoredValue = serde_json::from_str(&content)
            .map_err(|e| PersistenceError::Parse(format!("{}: {}", path.display(), e)))?;
        if stored.key != key {
            tracing::warn!(
                "{} holds key '{}', expected '{}'",
                path.display(),
                stored.key,
                key
            );
            return Ok(None);
        }
        Ok(Some(stored.value))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        xdg::ensure_dir(&self.dir).map_err(PersistenceError::Io)?;

        let now = Local::now();
        let stored = StoredValue {
            key: key.to_string(),
            saved_at: now.to_rfc3339(),
            value: value.to_string(),
        };
        let json = serde_json::to_string_pretty(&stored)
            .map_err(|e| PersistenceError::Serialize(e.to_string()))?;

        let path = self.path_for(key);
        let temp_path = self.dir.join(format!(
            "{}.json.tmp.{}",
            file_stem(key),
            now.format("%Y%m%d-%H%M%S%.f")
        ));

        fs::write(&temp_path, json).map_err(PersistenceError::Io)?;
        let file = fs::File::open(&temp_path).map_err(PersistenceError::Io)?;
        file.sync_all().map_err(PersistenceError::Io)?;
        fs::rename(&temp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            PersistenceError::Io(e)
        })?;

        tracing::trace!("Wrote {}", path.display());
        Ok(())
    }
}
