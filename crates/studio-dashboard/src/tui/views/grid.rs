//! Widget grid view.
//!
//! Maps grid slots onto terminal cells: a grid column is
//! `GridMetrics::col_width` cells wide, a grid row `row_height` cells tall,
//! with `gap` cells between neighbours on both axes.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use widget_grid::{Gesture, GridMetrics, WidgetSlot, COLS};

use crate::tui::app::App;

/// Symbol drawn on the bottom-right corner of each widget in edit mode.
pub const RESIZE_HANDLE: &str = "◢";

/// Placeholder body for ids missing from the catalog.
pub const NOT_FOUND_TEXT: &str = "widget not found";

/// Position of a slot relative to the top of the grid, in terminal cells,
/// before scrolling: `(x, y, width, height)`.
pub fn slot_cells(metrics: &GridMetrics, slot: &WidgetSlot<'_>) -> (u16, u16, u16, u16) {
    let col_pitch = metrics.col_width + metrics.gap;
    let row_pitch = metrics.row_height + metrics.gap;

    let left = f64::from(slot.x) * col_pitch;
    let right = left + f64::from(slot.w) * col_pitch - metrics.gap;
    let top = f64::from(slot.y) * row_pitch;
    let bottom = top + f64::from(slot.h) * row_pitch - metrics.gap;

    let x = to_cells(left);
    let y = to_cells(top);
    (
        x,
        y,
        to_cells(right).saturating_sub(x).max(1),
        to_cells(bottom).saturating_sub(y).max(1),
    )
}

fn to_cells(value: f64) -> u16 {
    value.round().clamp(0.0, f64::from(u16::MAX)) as u16
}

/// Scroll offset that keeps rows `top..bottom` inside a viewport `height`
/// rows tall, moving as little as possible from `scroll`.
pub fn scroll_to_show(scroll: u16, top: u16, bottom: u16, height: u16) -> u16 {
    if top < scroll {
        top
    } else if bottom > scroll.saturating_add(height) {
        bottom.saturating_sub(height).min(top)
    } else {
        scroll
    }
}

/// Visible part of a cell rectangle after scrolling, in screen coordinates.
fn visible_rect(area: Rect, cells: (u16, u16, u16, u16), scroll: u16) -> Option<Rect> {
    let (x, y, width, height) = cells;
    let bottom = y.saturating_add(height);
    let view_bottom = scroll.saturating_add(area.height);
    if bottom <= scroll || y >= view_bottom || x >= area.width {
        return None;
    }
    let top = y.max(scroll);
    Some(Rect::new(
        area.x + x,
        area.y + (top - scroll),
        width.min(area.width - x),
        bottom.min(view_bottom) - top,
    ))
}

/// Draws every widget slot into `area` and records the screen areas on
/// `app.slot_areas` for mouse hit-testing.
///
/// Scrolls so the selected widget stays in view.
pub fn render_grid(frame: &mut Frame, area: Rect, app: &mut App) {
    app.on_resize(area.width);
    let metrics = app.controller.metrics();
    let editing = app.controller.is_editing();
    let slots = app.controller.slots();
    let selected_id = app
        .controller
        .store()
        .widget_ids()
        .get(app.selected_index)
        .cloned();

    let cells: Vec<(u16, u16, u16, u16)> = slots.iter().map(|s| slot_cells(&metrics, s)).collect();
    if let Some((_, y, _, h)) = slots
        .iter()
        .zip(&cells)
        .find(|(s, _)| Some(s.widget_id) == selected_id.as_deref())
        .map(|(_, c)| *c)
    {
        app.scroll = scroll_to_show(app.scroll, y, y.saturating_add(h), area.height);
    }

    let (resizing_id, dragging_id) = match app.controller.gesture() {
        Gesture::Resizing(r) => (Some(r.widget_id.clone()), None),
        Gesture::Dragging { from } => (
            None,
            app.controller.store().widget_ids().get(*from).cloned(),
        ),
        Gesture::Idle => (None, None),
    };

    let mut slot_areas = Vec::with_capacity(slots.len());
    for (slot, slot_cells) in slots.iter().zip(cells) {
        let Some(rect) = visible_rect(area, slot_cells, app.scroll) else {
            continue;
        };
        let highlight = if resizing_id.as_deref() == Some(slot.widget_id) {
            Highlight::Resizing
        } else if dragging_id.as_deref() == Some(slot.widget_id) {
            Highlight::Dragging
        } else if selected_id.as_deref() == Some(slot.widget_id) {
            Highlight::Selected
        } else {
            Highlight::None
        };
        render_slot(frame, rect, slot, highlight, editing);
        slot_areas.push((slot.widget_id.to_string(), rect));
    }
    app.slot_areas = slot_areas;

    if slots.is_empty() {
        let hint = if editing {
            "No widgets. Press [a] to add one."
        } else {
            "No widgets. Press [e] to edit the layout."
        };
        frame.render_widget(
            Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
            area,
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Highlight {
    None,
    Selected,
    Dragging,
    Resizing,
}

fn render_slot(
    frame: &mut Frame,
    rect: Rect,
    slot: &WidgetSlot<'_>,
    highlight: Highlight,
    editing: bool,
) {
    let border_style = match (highlight, slot.definition.is_some()) {
        (Highlight::Resizing, _) => Style::default().fg(Color::Yellow),
        (Highlight::Dragging, _) => Style::default().fg(Color::Magenta),
        (Highlight::Selected, _) => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        (Highlight::None, true) => Style::default().fg(Color::DarkGray),
        (Highlight::None, false) => Style::default().fg(Color::Red),
    };

    let body = match slot.definition {
        Some(def) => {
            let footer = Line::from(Span::styled(
                format!(" {} · {}/{} ", def.module, slot.width_cols, COLS),
                Style::default().fg(Color::DarkGray),
            ))
            .right_aligned();
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(format!(" {} ", def.title))
                .title_bottom(footer);
            Paragraph::new(vec![
                Line::from(def.description),
                Line::from(Span::styled(
                    format!("{}×{}", slot.w, slot.h),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .wrap(Wrap { trim: true })
            .block(block)
        }
        None => {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(format!(" {} ", slot.widget_id));
            Paragraph::new(Line::from(Span::styled(
                NOT_FOUND_TEXT,
                Style::default().fg(Color::Red),
            )))
            .block(block)
        }
    };

    frame.render_widget(body, rect);

    if editing && rect.width > 1 && rect.height > 1 {
        let corner_x = rect.x + rect.width - 1;
        let corner_y = rect.y + rect.height - 1;
        frame
            .buffer_mut()
            .set_string(corner_x, corner_y, RESIZE_HANDLE, border_style);
    }
}
