//! Widget picker: search and module filter over the catalog.

use crate::catalog::WidgetCatalog;
use crate::types::{WidgetDefinition, WidgetModule};

/// One row of picker results.
#[derive(Debug, Clone, PartialEq)]
pub struct PickerItem<'a> {
    /// The widget.
    pub definition: &'a WidgetDefinition,
    /// Already on the dashboard (shown, but not addable).
    pub active: bool,
}

/// Filter state of the "add widget" dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetPicker {
    query: String,
    module: Option<WidgetModule>,
}

impl WidgetPicker {
    /// Empty filter: every widget matches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current search text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Current module filter.
    pub fn module(&self) -> Option<WidgetModule> {
        self.module
    }

    /// Replaces the search text.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Restricts results to one module, or lifts the restriction.
    pub fn set_module(&mut self, module: Option<WidgetModule>) {
        self.module = module;
    }

    /// Advances the module filter: all → first module → ... → last → all.
    pub fn cycle_module(&mut self) {
        self.module = match self.module {
            None => WidgetModule::ALL.first().copied(),
            Some(current) => WidgetModule::ALL
                .iter()
                .position(|m| *m == current)
                .and_then(|i| WidgetModule::ALL.get(i + 1))
                .copied(),
        };
    }

    /// Resets both filters.
    pub fn clear(&mut self) {
        self.query.clear();
        self.module = None;
    }

    /// Whether `definition` passes both filters.
    pub fn matches(&self, definition: &WidgetDefinition) -> bool {
        if self.module.is_some_and(|m| m != definition.module) {
            return false;
        }
        let needle = self.query.trim().to_lowercase();
        needle.is_empty()
            || [definition.id, definition.title, definition.description]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Matching widgets in catalog order.
    pub fn results<'a, S: AsRef<str>>(
        &self,
        catalog: &'a WidgetCatalog,
        active_ids: &[S],
    ) -> Vec<PickerItem<'a>> {
        catalog
            .iter()
            .filter(|d| self.matches(d))
            .map(|definition| PickerItem {
                definition,
                active: active_ids.iter().any(|id| id.as_ref() == definition.id),
            })
            .collect()
    }

    /// Matching widgets grouped by module, empty groups omitted.
    pub fn grouped<'a, S: AsRef<str>>(
        &self,
        catalog: &'a WidgetCatalog,
        active_ids: &[S],
    ) -> Vec<(WidgetModule, Vec<PickerItem<'a>>)> {
        let items = self.results(catalog, active_ids);
        WidgetModule::ALL
            .into_iter()
            .filter_map(|module| {
                let group: Vec<_> = items
                    .iter()
                    .filter(|item| item.definition.module == module)
                    .cloned()
                    .collect();
                (!group.is_empty()).then_some((module, group))
            })
            .collect()
    }
}
