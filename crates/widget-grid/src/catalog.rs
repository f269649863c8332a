//! Widget catalog: the static registry of every widget a dashboard can show.
//!
//! The catalog maps a widget identifier to its display metadata and size
//! contract. It is pre-populated with the built-in widgets; hosts may
//! register extra definitions, which overwrite built-ins with the same id.

use std::collections::HashMap;

use crate::types::{SizeClass, WidgetDefinition, WidgetModule};

/// Widget ids placed on a fresh (or reset) dashboard, in order.
pub const STARTER_WIDGETS: [&str; 6] = [
    "welcome",
    "quick-actions",
    "projects-tasks",
    "projects-deadlines",
    "invoicing-revenue",
    "activity-feed",
];

#[allow(clippy::too_many_arguments)]
const fn def(
    id: &'static str,
    title: &'static str,
    description: &'static str,
    icon: &'static str,
    module: WidgetModule,
    size: SizeClass,
    min: (u16, u16),
    max: (Option<u16>, Option<u16>),
) -> WidgetDefinition {
    WidgetDefinition {
        id,
        title,
        description,
        icon,
        module,
        size,
        min_width: min.0,
        min_height: min.1,
        max_width: max.0,
        max_height: max.1,
    }
}

use SizeClass::{Large, Medium, Small, Tall, Wide};
use WidgetModule::*;

#[rustfmt::skip]
const BUILTIN_WIDGETS: &[WidgetDefinition] = &[
    def("welcome", "Welcome", "Greeting with today's agenda summary", "sparkles", General, Wide, (2, 1), (None, Some(4))),
    def("quick-actions", "Quick actions", "Shortcuts to create projects, leads and invoices", "zap", General, Small, (1, 2), (Some(2), Some(4))),
    def("notifications", "Notifications", "Unread mentions and assignments", "bell", General, Medium, (1, 2), (None, Some(6))),
    def("calendar", "Calendar", "Upcoming meetings and site visits", "calendar", General, Medium, (2, 2), (None, None)),
    def("activity-feed", "Activity", "Recent changes across the workspace", "activity", General, Tall, (1, 3), (Some(2), None)),
    def("projects-overview", "Projects overview", "Project counts by phase", "folder-kanban", Projects, Wide, (2, 2), (None, Some(4))),
    def("projects-tasks", "My tasks", "Open tasks assigned to you", "list-checks", Projects, Medium, (1, 2), (None, Some(6))),
    def("projects-timeline", "Timeline", "Phase timeline of active projects", "gantt-chart", Projects, Large, (2, 3), (None, None)),
    def("projects-deadlines", "Deadlines", "Phase deadlines in the next two weeks", "alarm-clock", Projects, Small, (1, 2), (Some(2), Some(6))),
    def("crm-leads-pipeline", "Leads pipeline", "Leads by stage with expected value", "funnel", Crm, Large, (2, 2), (None, None)),
    def("crm-recent-contacts", "Recent contacts", "Contacts you interacted with lately", "contact", Crm, Medium, (1, 2), (None, Some(6))),
    def("crm-companies", "Companies", "Company count by status", "building", Crm, Small, (1, 2), (Some(2), Some(4))),
    def("commercial-quotes", "Quotes", "Quotes awaiting client response", "file-signature", Commercial, Medium, (1, 2), (None, Some(6))),
    def("commercial-conversion", "Conversion", "Quote acceptance rate", "percent", Commercial, Small, (1, 2), (Some(2), Some(3))),
    def("campaigns-active", "Campaigns", "Running campaigns and open rates", "megaphone", Campaigns, Medium, (1, 2), (None, Some(6))),
    def("tenders-open", "Open tenders", "Tenders with upcoming submission dates", "gavel", Tenders, Medium, (1, 2), (None, Some(6))),
    def("invoicing-revenue", "Revenue", "Invoiced revenue per month", "bar-chart", Invoicing, Large, (2, 2), (None, None)),
    def("invoicing-outstanding", "Outstanding", "Unpaid and overdue invoices", "receipt", Invoicing, Small, (1, 2), (Some(2), Some(4))),
    def("invoicing-cashflow", "Cash flow", "Expected incoming payments", "line-chart", Invoicing, Wide, (2, 2), (None, Some(6))),
    def("documents-recent", "Recent documents", "Documents edited in the last days", "file-text", Documents, Medium, (1, 2), (None, Some(6))),
    def("team-workload", "Workload", "Planned hours per team member", "users", Team, Large, (2, 3), (None, None)),
    def("team-absences", "Absences", "Who is out this week", "calendar-off", Team, Small, (1, 2), (Some(2), Some(4))),
    def("references-showcase", "References", "Featured reference projects", "award", References, Medium, (2, 2), (None, Some(6))),
    def("materials-library", "Materials", "Recently added materials", "layers", Materials, Medium, (1, 2), (None, Some(6))),
    def("objects-catalog", "Objects", "Object catalog highlights", "armchair", Objects, Small, (1, 2), (Some(2), Some(4))),
];

/// Registry mapping widget identifiers to their definitions.
///
/// # Example
///
/// ```
/// use widget_grid::WidgetCatalog;
///
/// let catalog = WidgetCatalog::new();
/// assert!(catalog.lookup("calendar").is_some());
/// assert!(catalog.lookup("nonexistent").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct WidgetCatalog {
    definitions: Vec<WidgetDefinition>,
    index: HashMap<&'static str, usize>,
}

impl WidgetCatalog {
    /// Creates a catalog holding the built-in widgets.
    pub fn new() -> Self {
        let mut catalog = Self {
            definitions: Vec::with_capacity(BUILTIN_WIDGETS.len()),
            index: HashMap::new(),
        };
        for definition in BUILTIN_WIDGETS {
            catalog.register(definition.clone());
        }
        catalog
    }

    /// Register a definition.
    ///
    /// Overwrites any existing definition with the same id, keeping its
    /// position in catalog order.
    pub fn register(&mut self, definition: WidgetDefinition) {
        match self.index.get(definition.id) {
            Some(&i) => self.definitions[i] = definition,
            None => {
                self.index.insert(definition.id, self.definitions.len());
                self.definitions.push(definition);
            }
        }
    }

    /// Looks up a definition by widget id.
    pub fn lookup(&self, widget_id: &str) -> Option<&WidgetDefinition> {
        self.index.get(widget_id).map(|&i| &self.definitions[i])
    }

    /// Whether the catalog knows `widget_id`.
    pub fn contains(&self, widget_id: &str) -> bool {
        self.index.contains_key(widget_id)
    }

    /// Groups definitions by module.
    ///
    /// Modules appear in [`WidgetModule::ALL`] order and only when they have
    /// at least one widget; definitions keep catalog order within a module.
    pub fn list_by_module(&self) -> Vec<(WidgetModule, Vec<&WidgetDefinition>)> {
        WidgetModule::ALL
            .into_iter()
            .filter_map(|module| {
                let defs: Vec<_> = self.iter().filter(|d| d.module == module).collect();
                (!defs.is_empty()).then_some((module, defs))
            })
            .collect()
    }

    /// Iterates over all definitions in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &WidgetDefinition> {
        self.definitions.iter()
    }

    /// Number of registered definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for WidgetCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ALLOWED_SPANS, COLS, MAX_HEIGHT};
    use std::collections::HashSet;

    fn custom_definition(id: &'static str) -> WidgetDefinition {
        WidgetDefinition {
            id,
            title: "Custom",
            description: "",
            icon: "box",
            module: WidgetModule::Objects,
            size: SizeClass::Small,
            min_width: 1,
            min_height: 1,
            max_width: None,
            max_height: None,
        }
    }

    #[test]
    fn test_builtin_ids_are_unique() {
        let mut seen = HashSet::new();
        for def in BUILTIN_WIDGETS {
            assert!(seen.insert(def.id), "duplicate widget id '{}'", def.id);
        }
        assert_eq!(WidgetCatalog::new().len(), BUILTIN_WIDGETS.len());
    }

    #[test]
    fn test_builtin_definitions_respect_size_bounds() {
        for def in WidgetCatalog::new().iter() {
            let (w, h) = def.default_dimensions();
            let (min_w, max_w) = def.width_bounds();
            let (min_h, max_h) = def.height_bounds();
            assert!(ALLOWED_SPANS.contains(&min_w), "'{}' min width not a span", def.id);
            assert!(min_w <= w && w <= max_w, "'{}' width out of bounds", def.id);
            assert!(min_h <= h && h <= max_h, "'{}' height out of bounds", def.id);
            assert!(max_w <= COLS, "'{}' max width exceeds grid", def.id);
            assert!(max_h <= MAX_HEIGHT, "'{}' max height exceeds limit", def.id);
        }
    }

    #[test]
    fn test_starter_widgets_exist() {
        let catalog = WidgetCatalog::new();
        for id in STARTER_WIDGETS {
            assert!(catalog.contains(id), "starter widget '{id}' missing");
        }
    }

    #[test]
    fn test_every_module_has_widgets() {
        let catalog = WidgetCatalog::new();
        let grouped = catalog.list_by_module();
        let modules: Vec<_> = grouped.iter().map(|(m, _)| *m).collect();
        assert_eq!(modules, WidgetModule::ALL.to_vec());
    }

    #[test]
    fn test_list_by_module_keeps_catalog_order() {
        let catalog = WidgetCatalog::new();
        let grouped = catalog.list_by_module();
        let (_, projects) = grouped
            .iter()
            .find(|(m, _)| *m == WidgetModule::Projects)
            .expect("projects module present");
        let ids: Vec<_> = projects.iter().map(|d| d.id).collect();
        assert_eq!(
            ids,
            vec![
                "projects-overview",
                "projects-tasks",
                "projects-timeline",
                "projects-deadlines"
            ]
        );
    }

    #[test]
    fn test_lookup_unknown_returns_none() {
        let catalog = WidgetCatalog::new();
        assert!(catalog.lookup("").is_none());
        assert!(catalog.lookup("legacy-kpi").is_none());
    }

    #[test]
    fn test_register_custom_widget() {
        let mut catalog = WidgetCatalog::new();
        let before = catalog.len();
        catalog.register(custom_definition("custom-kpi"));
        assert_eq!(catalog.len(), before + 1);
        assert_eq!(catalog.lookup("custom-kpi").map(|d| d.title), Some("Custom"));
    }

    #[test]
    fn test_register_overwrites_in_place() {
        let mut catalog = WidgetCatalog::new();
        let before = catalog.len();
        catalog.register(custom_definition("welcome"));
        assert_eq!(catalog.len(), before);
        assert_eq!(catalog.iter().next().map(|d| d.title), Some("Custom"));
    }
}
