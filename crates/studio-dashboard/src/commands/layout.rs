//! `layout` subcommands: scripted edits applied straight to the store.
//!
//! Unlike the TUI these are not gated on edit mode; every successful change
//! is persisted by the store before the command returns.

use std::fmt::Write as _;

use serde::Serialize;
use widget_grid::{LayoutStore, Persistence};

use super::CommandError;

/// JSON shape of `layout show --json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LayoutReport<'a> {
    scope_key: &'a str,
    template_id: &'a str,
    widgets: Vec<WidgetReport<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WidgetReport<'a> {
    widget_id: &'a str,
    title: Option<&'a str>,
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

/// Renders the current layout as a table, or as JSON with `json`.
pub fn show_layout<P: Persistence>(
    store: &LayoutStore<P>,
    json: bool,
) -> Result<String, CommandError> {
    let catalog = store.catalog();
    if json {
        let report = LayoutReport {
            scope_key: &store.keys().layout,
            template_id: store.template_id(),
            widgets: store
                .layout()
                .iter()
                .map(|e| WidgetReport {
                    widget_id: &e.widget_id,
                    title: catalog.lookup(&e.widget_id).map(|d| d.title),
                    x: e.x,
                    y: e.y,
                    w: e.w,
                    h: e.h,
                })
                .collect(),
        };
        let mut out = serde_json::to_string_pretty(&report)?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = String::new();
    let _ = writeln!(out, "Template: {}", store.template_id());
    if store.layout().is_empty() {
        out.push_str("(no widgets)\n");
        return Ok(out);
    }
    let _ = writeln!(
        out,
        "{:>3}  {:<24} {:>2} {:>2} {:>2} {:>2}  title",
        "#", "widget", "x", "y", "w", "h"
    );
    for (i, e) in store.layout().iter().enumerate() {
        let title = catalog
            .lookup(&e.widget_id)
            .map_or("(widget not found)", |d| d.title);
        let _ = writeln!(
            out,
            "{:>3}  {:<24} {:>2} {:>2} {:>2} {:>2}  {}",
            i + 1,
            e.widget_id,
            e.x,
            e.y,
            e.w,
            e.h,
            title
        );
    }
    Ok(out)
}

/// Adds a widget at the bottom-left.
pub fn add_widget<P: Persistence>(
    store: &mut LayoutStore<P>,
    widget_id: &str,
) -> Result<String, CommandError> {
    if !store.catalog().contains(widget_id) {
        return Err(CommandError::UnknownWidget(widget_id.to_string()));
    }
    if !store.add_widget(widget_id) {
        return Ok(format!("{widget_id} is already on the dashboard\n"));
    }
    Ok(match store.entry(widget_id) {
        Some(e) => format!("Added {} at ({}, {}) size {}x{}\n", widget_id, e.x, e.y, e.w, e.h),
        None => format!("Added {widget_id}\n"),
    })
}

/// Removes a widget.
pub fn remove_widget<P: Persistence>(
    store: &mut LayoutStore<P>,
    widget_id: &str,
) -> Result<String, CommandError> {
    if store.remove_widget(widget_id) {
        Ok(format!("Removed {widget_id}\n"))
    } else {
        Err(CommandError::NotActive(widget_id.to_string()))
    }
}

/// Resizes a widget; the store clamps and snaps the requested size.
pub fn resize_widget<P: Persistence>(
    store: &mut LayoutStore<P>,
    widget_id: &str,
    w: i32,
    h: i32,
) -> Result<String, CommandError> {
    if !store.is_active(widget_id) {
        return Err(CommandError::NotActive(widget_id.to_string()));
    }
    let changed = store.resize_widget(widget_id, w, h);
    let (w, h) = store.entry(widget_id).map_or((0, 0), |e| (e.w, e.h));
    Ok(if changed {
        format!("Resized {widget_id} to {w}x{h}\n")
    } else {
        format!("{widget_id} stays {w}x{h}\n")
    })
}

/// Moves the widget at 1-based position `from` to position `to` and
/// reflows the layout.
pub fn move_widget<P: Persistence>(
    store: &mut LayoutStore<P>,
    from: usize,
    to: usize,
) -> Result<String, CommandError> {
    let len = store.widget_ids().len();
    for position in [from, to] {
        if position == 0 || position > len {
            return Err(CommandError::InvalidPosition { position, len });
        }
    }
    let mut order = store.widget_ids().to_vec();
    let moved = order.remove(from - 1);
    order.insert(to - 1, moved.clone());
    if store.reorder_widgets(&order) {
        Ok(format!("Moved {moved} to position {to}\n"))
    } else {
        Ok(format!("{moved} stays at position {from}\n"))
    }
}

/// Replaces the dashboard with a template (`custom` only sets the marker).
pub fn apply_template<P: Persistence>(
    store: &mut LayoutStore<P>,
    template_id: &str,
) -> Result<String, CommandError> {
    store.apply_template(template_id)?;
    Ok(format!(
        "Applied template {} ({} widgets)\n",
        template_id,
        store.widget_ids().len()
    ))
}

/// Restores the starter dashboard.
pub fn reset_layout<P: Persistence>(store: &mut LayoutStore<P>) -> String {
    store.reset_layout();
    format!("Reset to {} starter widgets\n", store.widget_ids().len())
}
