//! Layout store: the stateful owner of a dashboard's widget list and layout.
//!
//! Every mutation persists synchronously through the [`Persistence`] port.
//! Write failures are logged and swallowed; the in-memory state stays the
//! source of truth for the session. Reads never fail either: a missing or
//! corrupt blob falls back to the starter dashboard.

use std::collections::HashSet;

use crate::catalog::{WidgetCatalog, STARTER_WIDGETS};
use crate::error::{Result, TemplateError};
use crate::persistence::{decode_layout, encode_layout, Persistence, ScopeKeys};
use crate::placement::{
    bottom_y, clamp_height, default_size, fit_width, place_default_with, reflow,
    RowAdvance,
};
use crate::templates::TemplateCatalog;
use crate::types::{DashboardState, LayoutEntry, COLS, CUSTOM_TEMPLATE_ID, MAX_HEIGHT};

/// Catalogs and placement policy a store works with.
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    /// Widget definitions used for sizing and validation.
    pub catalog: WidgetCatalog,
    /// Templates available to [`LayoutStore::apply_template`].
    pub templates: TemplateCatalog,
    /// Row advance used by reset, template application and reorder.
    pub row_advance: RowAdvance,
}

/// Stateful controller over one scope's [`DashboardState`].
#[derive(Debug)]
pub struct LayoutStore<P: Persistence> {
    persistence: P,
    keys: ScopeKeys,
    options: StoreOptions,
    state: DashboardState,
}

impl<P: Persistence> LayoutStore<P> {
    /// Opens the dashboard stored under `scope` with the built-in catalogs.
    pub fn open(persistence: P, scope: &str) -> Self {
        Self::open_with(persistence, scope, StoreOptions::default())
    }

    /// Opens the dashboard stored under `scope`.
    pub fn open_with(persistence: P, scope: &str, options: StoreOptions) -> Self {
        let state = starter_state(&options);
        let mut store = Self {
            persistence,
            keys: ScopeKeys::for_scope(scope),
            options,
            state,
        };
        store.load();
        store
    }

    /// Re-reads the persisted state, falling back to the starter dashboard
    /// when nothing usable is stored.
    pub fn load(&mut self) {
        let layout = match self.persistence.read(&self.keys.layout) {
            Ok(Some(raw)) => match decode_layout(&raw) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    log::warn!("Discarding stored layout {}: {}", self.keys.layout, e);
                    None
                }
            },
            Ok(None) => {
                log::debug!("No stored layout under {}, using starter", self.keys.layout);
                None
            }
            Err(e) => {
                log::warn!("Failed to read layout {}: {}", self.keys.layout, e);
                None
            }
        };

        self.state = match layout {
            Some((active_widget_ids, layout)) => DashboardState {
                active_widget_ids,
                layout,
                template_id: self.read_template_marker(),
            },
            None => starter_state(&self.options),
        };
    }

    fn read_template_marker(&self) -> String {
        match self.persistence.read(&self.keys.template) {
            Ok(Some(id)) if self.is_known_template(id.trim()) => id.trim().to_string(),
            Ok(Some(id)) => {
                log::warn!("Ignoring unknown stored template marker '{}'", id);
                CUSTOM_TEMPLATE_ID.to_string()
            }
            Ok(None) => CUSTOM_TEMPLATE_ID.to_string(),
            Err(e) => {
                log::warn!("Failed to read template marker {}: {}", self.keys.template, e);
                CUSTOM_TEMPLATE_ID.to_string()
            }
        }
    }

    fn is_known_template(&self, id: &str) -> bool {
        id == CUSTOM_TEMPLATE_ID || self.options.templates.lookup(id).is_some()
    }

    /// Adds a widget at the bottom-left of the layout, sized from its
    /// catalog default.
    ///
    /// Returns `false` (and changes nothing) when the widget is already
    /// active or unknown to the catalog.
    pub fn add_widget(&mut self, widget_id: &str) -> bool {
        if self.state.is_active(widget_id) {
            log::debug!("Widget {} already on dashboard", widget_id);
            return false;
        }
        if !self.options.catalog.contains(widget_id) {
            log::warn!("Refusing to add unknown widget {}", widget_id);
            return false;
        }

        let (w, h) = default_size(&self.options.catalog, widget_id);
        let y = bottom_y(&self.state.layout);
        self.state
            .layout
            .push(LayoutEntry::new(widget_id, 0, y, w, h));
        self.state.active_widget_ids.push(widget_id.to_string());
        log::debug!("Added widget {} at (0, {}) {}x{}", widget_id, y, w, h);
        self.persist();
        true
    }

    /// Removes a widget and its entry. Returns `false` if it was not active.
    pub fn remove_widget(&mut self, widget_id: &str) -> bool {
        if !self.state.is_active(widget_id) {
            return false;
        }
        self.state.active_widget_ids.retain(|id| id != widget_id);
        self.state.layout.retain(|e| e.widget_id != widget_id);
        log::debug!("Removed widget {}", widget_id);
        self.persist();
        true
    }

    /// Replaces the widget order and reflows positions, keeping sizes.
    ///
    /// Ids that are not active are ignored, repeated ids keep their first
    /// position, and active ids missing from `new_order` are appended in
    /// their previous order. Returns `false` when nothing moved.
    pub fn reorder_widgets<S: AsRef<str>>(&mut self, new_order: &[S]) -> bool {
        let mut seen = HashSet::new();
        let mut order: Vec<String> = new_order
            .iter()
            .map(AsRef::as_ref)
            .filter(|id| self.state.is_active(id) && seen.insert(id.to_string()))
            .map(str::to_string)
            .collect();
        for id in &self.state.active_widget_ids {
            if !seen.contains(id) {
                order.push(id.clone());
            }
        }

        let ordered: Vec<LayoutEntry> = order
            .iter()
            .filter_map(|id| self.state.entry(id).cloned())
            .collect();
        let layout = reflow(&ordered, self.options.row_advance);

        if order == self.state.active_widget_ids && layout == self.state.layout {
            return false;
        }
        self.state.active_widget_ids = order;
        self.state.layout = layout;
        log::debug!("Reordered widgets: {:?}", self.state.active_widget_ids);
        self.persist();
        true
    }

    /// Resizes one widget.
    ///
    /// The width is clamped to the definition's bounds and to the columns
    /// right of the entry's origin, then snapped; the height is clamped. An
    /// entry too close to the right edge for its minimum width is moved
    /// left (see [`fit_width`]).
    /// Other entries are never touched, even if the new size overlaps them.
    /// Returns `false` when the widget is not active or the size is unchanged.
    pub fn resize_widget(&mut self, widget_id: &str, w: i32, h: i32) -> bool {
        let ((min_w, max_w), (min_h, max_h)) = self.size_bounds(widget_id);
        let Some(entry) = self.state.entry_mut(widget_id) else {
            return false;
        };

        let (new_x, new_w) = fit_width(entry.x, f64::from(w), min_w, max_w);
        let new_h = clamp_height(h, min_h, max_h);
        if (entry.x, entry.w, entry.h) == (new_x, new_w, new_h) {
            return false;
        }
        entry.x = new_x;
        entry.w = new_w;
        entry.h = new_h;
        log::debug!("Resized widget {} to {}x{}", widget_id, new_w, new_h);
        self.persist();
        true
    }

    /// Width and height bounds for a widget, grid limits when unknown.
    pub fn size_bounds(&self, widget_id: &str) -> ((u16, u16), (u16, u16)) {
        match self.options.catalog.lookup(widget_id) {
            Some(def) => (def.width_bounds(), def.height_bounds()),
            None => ((1, COLS), (1, MAX_HEIGHT)),
        }
    }

    /// Applies a template.
    ///
    /// `custom` only updates the template marker. Any other id replaces the
    /// widget list with the template's and lays it out from scratch. Nothing
    /// is written when the result equals the current state.
    ///
    /// # Errors
    ///
    /// `TemplateError::Unknown` if the id is neither `custom` nor a known
    /// template; state is left untouched.
    pub fn apply_template(&mut self, template_id: &str) -> Result<()> {
        if template_id == CUSTOM_TEMPLATE_ID {
            if self.state.template_id != CUSTOM_TEMPLATE_ID {
                self.state.template_id = CUSTOM_TEMPLATE_ID.to_string();
                self.persist_template_marker();
            }
            return Ok(());
        }

        let template = self
            .options
            .templates
            .lookup(template_id)
            .ok_or_else(|| TemplateError::Unknown(template_id.to_string()))?;
        let widget_ids = template.widget_ids.clone();
        let layout =
            place_default_with(&self.options.catalog, &widget_ids, self.options.row_advance);

        let same_layout = self.state.active_widget_ids == widget_ids && self.state.layout == layout;
        if same_layout && self.state.template_id == template_id {
            log::debug!("Template {} already applied", template_id);
            return Ok(());
        }
        self.state.template_id = template_id.to_string();
        if same_layout {
            self.persist_template_marker();
            return Ok(());
        }
        self.state.layout = layout;
        self.state.active_widget_ids = widget_ids;
        log::debug!("Applied template {}", template_id);
        self.persist();
        Ok(())
    }

    /// Restores the starter widgets and layout and clears the template marker.
    pub fn reset_layout(&mut self) {
        self.state = starter_state(&self.options);
        log::debug!("Reset dashboard {}", self.keys.layout);
        self.persist();
    }

    fn persist(&mut self) {
        match encode_layout(&self.state.active_widget_ids, &self.state.layout) {
            Ok(raw) => {
                if let Err(e) = self.persistence.write(&self.keys.layout, &raw) {
                    log::warn!("Failed to persist layout {}: {}", self.keys.layout, e);
                }
            }
            Err(e) => log::warn!("Failed to encode layout {}: {}", self.keys.layout, e),
        }
        self.persist_template_marker();
    }

    fn persist_template_marker(&mut self) {
        if let Err(e) = self
            .persistence
            .write(&self.keys.template, &self.state.template_id)
        {
            log::warn!("Failed to persist template marker {}: {}", self.keys.template, e);
        }
    }

    /// Current dashboard state.
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Active widget ids in order.
    pub fn widget_ids(&self) -> &[String] {
        &self.state.active_widget_ids
    }

    /// Layout entries, in widget order.
    pub fn layout(&self) -> &[LayoutEntry] {
        &self.state.layout
    }

    /// Entry for one widget.
    pub fn entry(&self, widget_id: &str) -> Option<&LayoutEntry> {
        self.state.entry(widget_id)
    }

    /// Whether a widget is on the dashboard.
    pub fn is_active(&self, widget_id: &str) -> bool {
        self.state.is_active(widget_id)
    }

    /// Last applied template id, or `custom`.
    pub fn template_id(&self) -> &str {
        &self.state.template_id
    }

    /// Storage keys of this store's scope.
    pub fn keys(&self) -> &ScopeKeys {
        &self.keys
    }

    /// Widget catalog in use.
    pub fn catalog(&self) -> &WidgetCatalog {
        &self.options.catalog
    }

    /// Template catalog in use.
    pub fn templates(&self) -> &TemplateCatalog {
        &self.options.templates
    }

    /// Row advance policy in use.
    pub fn row_advance(&self) -> RowAdvance {
        self.options.row_advance
    }

    /// The persistence backend.
    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Mutable access to the persistence backend.
    pub fn persistence_mut(&mut self) -> &mut P {
        &mut self.persistence
    }
}

/// The dashboard every new or reset scope starts from.
fn starter_state(options: &StoreOptions) -> DashboardState {
    let active_widget_ids: Vec<String> = STARTER_WIDGETS.iter().map(|s| s.to_string()).collect();
    DashboardState {
        layout: place_default_with(&options.catalog, &active_widget_ids, options.row_advance),
        active_widget_ids,
        template_id: CUSTOM_TEMPLATE_ID.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryPersistence;

    fn open() -> LayoutStore<MemoryPersistence> {
        LayoutStore::open(MemoryPersistence::new(), "test")
    }

    #[test]
    fn test_open_empty_storage_yields_starter() {
        let store = open();
        let expected: Vec<String> = STARTER_WIDGETS.iter().map(|s| s.to_string()).collect();
        assert_eq!(store.widget_ids(), expected.as_slice());
        assert_eq!(store.template_id(), CUSTOM_TEMPLATE_ID);
        assert!(store.state().is_consistent());
    }

    #[test]
    fn test_open_does_not_write() {
        let store = open();
        assert_eq!(store.persistence().write_count(), 0);
    }

    #[test]
    fn test_mutation_persists_both_keys() {
        let mut store = open();
        assert!(store.add_widget("calendar"));
        let keys = store.keys().clone();
        let persistence = store.persistence();
        assert!(persistence.get(&keys.layout).is_some());
        assert_eq!(persistence.get(&keys.template), Some(CUSTOM_TEMPLATE_ID));
    }

    #[test]
    fn test_noop_mutation_does_not_persist() {
        let mut store = open();
        assert!(!store.add_widget("welcome"));
        assert!(!store.remove_widget("calendar"));
        assert!(!store.resize_widget("calendar", 2, 2));
        assert_eq!(store.persistence().write_count(), 0);
    }

    #[test]
    fn test_add_unknown_widget_is_rejected() {
        let mut store = open();
        assert!(!store.add_widget("legacy-kpi"));
        assert!(!store.is_active("legacy-kpi"));
    }

    #[test]
    fn test_resize_caps_width_at_grid_edge() {
        let mut store = open();
        // projects-deadlines sits at x = 3 in the starter layout.
        assert!(!store.resize_widget("projects-deadlines", 4, 2));
        assert_eq!(store.entry("projects-deadlines").map(|e| e.w), Some(1));
    }

    #[test]
    fn test_resize_clamps_height_to_definition() {
        let mut store = open();
        assert!(store.resize_widget("projects-tasks", 2, 40));
        assert_eq!(store.entry("projects-tasks").map(|e| e.h), Some(6));
        assert!(store.resize_widget("projects-tasks", 2, -5));
        assert_eq!(store.entry("projects-tasks").map(|e| e.h), Some(2));
    }

    #[test]
    fn test_apply_custom_only_touches_marker() {
        let mut store = open();
        store.apply_template("finance").expect("finance exists");
        let before = store.widget_ids().to_vec();
        store.apply_template(CUSTOM_TEMPLATE_ID).expect("custom always valid");
        assert_eq!(store.widget_ids(), before.as_slice());
        assert_eq!(store.template_id(), CUSTOM_TEMPLATE_ID);
    }

    #[test]
    fn test_reapplying_template_does_not_persist() {
        let mut store = open();
        store.apply_template("finance").expect("finance exists");
        assert_eq!(store.persistence().write_count(), 2);

        store.apply_template("finance").expect("finance again");
        assert_eq!(store.persistence().write_count(), 2);
        assert_eq!(store.template_id(), "finance");
    }

    #[test]
    fn test_marker_only_change_writes_marker_only() {
        let mut store = open();
        store.apply_template("team").expect("team exists");
        store.apply_template(CUSTOM_TEMPLATE_ID).expect("custom");
        assert_eq!(store.persistence().write_count(), 3);
        store.apply_template(CUSTOM_TEMPLATE_ID).expect("custom again");
        assert_eq!(store.persistence().write_count(), 3);

        // same widgets and positions as team: only the marker is rewritten
        store.apply_template("team").expect("team again");
        assert_eq!(store.persistence().write_count(), 4);
        let keys = store.keys().clone();
        assert_eq!(store.persistence().get(&keys.template), Some("team"));
    }

    #[test]
    fn test_apply_unknown_template_leaves_state() {
        let mut store = open();
        let before = store.state().clone();
        let err = store.apply_template("marketing").expect_err("unknown");
        assert!(matches!(
            err,
            crate::Error::Template(TemplateError::Unknown(ref id)) if id == "marketing"
        ));
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn test_reorder_with_identical_order_is_noop() {
        let mut store = open();
        let order = store.widget_ids().to_vec();
        assert!(!store.reorder_widgets(&order));
    }

    #[test]
    fn test_reorder_normalizes_foreign_and_missing_ids() {
        let mut store = open();
        assert!(store.reorder_widgets(&["activity-feed", "ghost", "activity-feed", "welcome"]));
        let ids = store.widget_ids();
        assert_eq!(ids[0], "activity-feed");
        assert_eq!(ids[1], "welcome");
        assert_eq!(ids.len(), STARTER_WIDGETS.len());
        assert!(store.state().is_consistent());
    }

    #[test]
    fn test_unknown_stored_template_marker_loads_as_custom() {
        let mut persistence = MemoryPersistence::new();
        let keys = ScopeKeys::for_scope("test");
        persistence.insert(
            &keys.layout,
            r#"{"schemaVersion":1,"activeWidgetIds":["calendar"],
                "layout":[{"widgetId":"calendar","x":0,"y":0,"w":2,"h":2}]}"#,
        );
        persistence.insert(&keys.template, "retired-template");
        let store = LayoutStore::open(persistence, "test");
        assert_eq!(store.widget_ids(), ["calendar".to_string()].as_slice());
        assert_eq!(store.template_id(), CUSTOM_TEMPLATE_ID);
    }
}
