//! Persistence port and the layout blob codec.
//!
//! The store talks to storage through [`Persistence`], a plain string
//! key-value contract that maps onto browser local storage, a remote
//! document, a database row or a file per key. Encoding and decoding stay
//! on this side of the port so a corrupt blob is detected in one place.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::types::LayoutEntry;

/// Version tag written into every layout blob.
pub const SCHEMA_VERSION: u32 = 1;

/// Key-value storage backing a [`LayoutStore`](crate::LayoutStore).
pub trait Persistence {
    /// Reads the value stored under `key`, `None` when nothing is stored.
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

/// The two storage keys used for one dashboard scope.
///
/// The template marker lives under its own key so it survives manual
/// layout edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeKeys {
    /// Key of the layout blob (widget list and entries).
    pub layout: String,
    /// Key of the last applied template id.
    pub template: String,
}

impl ScopeKeys {
    /// Derives both keys from a scope identifier.
    ///
    /// ```
    /// use widget_grid::ScopeKeys;
    ///
    /// let keys = ScopeKeys::for_scope("studio");
    /// assert_eq!(keys.layout, "dashboard-layout:studio");
    /// assert_eq!(keys.template, "dashboard-template:studio");
    /// ```
    pub fn for_scope(scope: &str) -> Self {
        Self {
            layout: format!("dashboard-layout:{scope}"),
            template: format!("dashboard-template:{scope}"),
        }
    }
}

/// On-disk shape of the layout blob.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredLayout {
    schema_version: u32,
    active_widget_ids: Vec<String>,
    layout: Vec<LayoutEntry>,
}

/// Serializes the widget list and entries into a layout blob.
pub fn encode_layout(
    active_widget_ids: &[String],
    layout: &[LayoutEntry],
) -> Result<String, PersistenceError> {
    let stored = StoredLayout {
        schema_version: SCHEMA_VERSION,
        active_widget_ids: active_widget_ids.to_vec(),
        layout: layout.to_vec(),
    };
    serde_json::to_string(&stored).map_err(|e| PersistenceError::Serialize(e.to_string()))
}

/// Parses and validates a layout blob.
///
/// Returns the widget ids and the entries reordered to match them.
///
/// # Errors
///
/// - `PersistenceError::Parse` if the blob is not valid JSON of the right shape
/// - `PersistenceError::SchemaMismatch` if the version is unknown, ids and
///   entries are not in 1:1 correspondence, or an entry violates the grid
pub fn decode_layout(raw: &str) -> Result<(Vec<String>, Vec<LayoutEntry>), PersistenceError> {
    let stored: StoredLayout =
        serde_json::from_str(raw).map_err(|e| PersistenceError::Parse(e.to_string()))?;

    if stored.schema_version != SCHEMA_VERSION {
        return Err(PersistenceError::SchemaMismatch(format!(
            "unsupported schema version {}",
            stored.schema_version
        )));
    }

    let mut seen = HashSet::new();
    for id in &stored.active_widget_ids {
        if !seen.insert(id.as_str()) {
            return Err(PersistenceError::SchemaMismatch(format!(
                "duplicate widget id: {id}"
            )));
        }
    }

    if stored.layout.len() != stored.active_widget_ids.len() {
        return Err(PersistenceError::SchemaMismatch(format!(
            "{} widget ids but {} layout entries",
            stored.active_widget_ids.len(),
            stored.layout.len()
        )));
    }

    let mut by_id: HashMap<&str, &LayoutEntry> = HashMap::new();
    for entry in &stored.layout {
        if !entry.is_valid() {
            return Err(PersistenceError::SchemaMismatch(format!(
                "entry for {} violates the grid: x={} w={} h={}",
                entry.widget_id, entry.x, entry.w, entry.h
            )));
        }
        by_id.insert(entry.widget_id.as_str(), entry);
    }

    let layout = stored
        .active_widget_ids
        .iter()
        .map(|id| {
            by_id.get(id.as_str()).map(|e| (*e).clone()).ok_or_else(|| {
                PersistenceError::SchemaMismatch(format!("no layout entry for {id}"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((stored.active_widget_ids, layout))
}

/// In-memory [`Persistence`], for tests and ephemeral dashboards.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    values: HashMap<String, String>,
    fail_writes: bool,
    write_count: usize,
}

impl MemoryPersistence {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail with `PersistenceError::Unavailable`.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Seeds a raw value, bypassing the failure switch.
    pub fn insert(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    /// Returns the raw value under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.write_count
    }
}

impl Persistence for MemoryPersistence {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        if self.fail_writes {
            return Err(PersistenceError::Unavailable("writes disabled".to_string()));
        }
        self.values.insert(key.to_string(), value.to_string());
        self.write_count += 1;
        Ok(())
    }
}
