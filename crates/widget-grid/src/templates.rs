//! Built-in dashboard templates.
//!
//! A template is a named, curated list of widget ids used to bulk-populate
//! a dashboard. Applying one replaces the active widgets; the ids are then
//! laid out by the default placement algorithm.
//!
//! `custom` is not a template: it is the marker stored when the dashboard
//! follows no template (see [`CUSTOM_TEMPLATE_ID`](crate::CUSTOM_TEMPLATE_ID)).

/// A template preset defining which widgets to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Stable identifier stored as the template marker.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Short description shown next to the name.
    pub description: String,
    /// Ordered list of widget identifiers to place.
    pub widget_ids: Vec<String>,
}

impl Template {
    /// Creates a new template.
    pub fn new(id: &str, name: &str, description: &str, widget_ids: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            widget_ids: widget_ids.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The set of available templates.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
}

impl TemplateCatalog {
    /// Creates a catalog with the built-in templates.
    pub fn new() -> Self {
        let templates = vec![
            Template::new(
                "overview",
                "Overview",
                "A bit of everything",
                &[
                    "welcome",
                    "notifications",
                    "projects-tasks",
                    "crm-leads-pipeline",
                    "invoicing-outstanding",
                    "calendar",
                ],
            ),
            Template::new(
                "projects",
                "Projects",
                "Delivery focus: tasks, phases and deadlines",
                &[
                    "projects-overview",
                    "projects-tasks",
                    "projects-deadlines",
                    "projects-timeline",
                    "team-workload",
                    "documents-recent",
                ],
            ),
            Template::new(
                "finance",
                "Finance",
                "Revenue, receivables and cash",
                &[
                    "invoicing-revenue",
                    "invoicing-outstanding",
                    "invoicing-cashflow",
                    "commercial-quotes",
                    "commercial-conversion",
                ],
            ),
            Template::new(
                "commercial",
                "Commercial",
                "Pipeline, quotes, campaigns and tenders",
                &[
                    "crm-leads-pipeline",
                    "crm-recent-contacts",
                    "commercial-quotes",
                    "campaigns-active",
                    "tenders-open",
                ],
            ),
            Template::new(
                "team",
                "Team",
                "Workload and availability",
                &["team-workload", "team-absences", "calendar", "activity-feed"],
            ),
        ];
        Self { templates }
    }

    /// Returns the template with the given id.
    pub fn lookup(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Iterates over templates in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    /// Returns an iterator over all template ids.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(|t| t.id.as_str())
    }

    /// Returns the count of available templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether there are no templates.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::new()
    }
}
