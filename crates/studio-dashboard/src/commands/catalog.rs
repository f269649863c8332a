//! `widgets` and `templates` listings.

use std::fmt::Write as _;

use widget_grid::{LayoutStore, Persistence, WidgetModule, WidgetPicker, CUSTOM_TEMPLATE_ID};

use super::CommandError;

/// Lists catalog widgets grouped by module, `*` marking active ones.
///
/// `module` is a module tag (`projects`, `crm`, ...); `search` filters on
/// id, title and description.
pub fn list_widgets<P: Persistence>(
    store: &LayoutStore<P>,
    module: Option<&str>,
    search: Option<&str>,
) -> Result<String, CommandError> {
    let mut picker = WidgetPicker::new();
    if let Some(tag) = module {
        picker.set_module(Some(tag.parse::<WidgetModule>()?));
    }
    if let Some(query) = search {
        picker.set_query(query);
    }

    let groups = picker.grouped(store.catalog(), store.widget_ids());
    if groups.is_empty() {
        return Ok("No matching widgets\n".to_string());
    }

    let mut out = String::new();
    for (module, items) in groups {
        let _ = writeln!(out, "{module}");
        for item in items {
            let def = item.definition;
            let (w, h) = def.default_dimensions();
            let _ = writeln!(
                out,
                "  {} {:<24} {:<20} {}x{}  {}",
                if item.active { "*" } else { " " },
                def.id,
                def.title,
                w,
                h,
                def.description
            );
        }
    }
    Ok(out)
}

/// Lists templates, `*` marking the one currently applied.
pub fn list_templates<P: Persistence>(store: &LayoutStore<P>) -> String {
    let mut out = String::new();
    for template in store.templates().iter() {
        let marker = if template.id == store.template_id() { "*" } else { " " };
        let _ = writeln!(
            out,
            "{} {:<12} {:<12} {} ({} widgets)",
            marker,
            template.id,
            template.name,
            template.description,
            template.widget_ids.len()
        );
    }
    if store.template_id() == CUSTOM_TEMPLATE_ID {
        out.push_str("* custom       (current layout was edited by hand)\n");
    }
    out
}
