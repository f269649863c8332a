//! "Add widget" overlay.
//!
//! A centered modal listing the picker results with the search text and
//! module filter on top. Widgets already on the dashboard are dimmed.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use widget_grid::PickerItem;

use crate::tui::app::PickerOverlay;

/// Hint line at the bottom of the overlay.
const PICKER_HINT: &str = "[Enter] Add  [Tab] Module  [Esc] Close";

/// Renders the overlay centered in `area`.
pub fn render_picker(frame: &mut Frame, area: Rect, overlay: &PickerOverlay, items: &[PickerItem<'_>]) {
    let width = 64u16.min(area.width.saturating_sub(4));
    let height = 20u16.min(area.height.saturating_sub(2));
    if width < 24 || height < 8 {
        return;
    }
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    let modal = Rect::new(x, y, width, height);

    frame.render_widget(Clear, modal);
    let block = Block::default()
        .title(" Add widget ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(modal);
    frame.render_widget(block, modal);

    let module = overlay
        .picker
        .module()
        .map_or_else(|| "all".to_string(), |m| m.to_string());
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Search: ", Style::default().fg(Color::DarkGray)),
            Span::raw(overlay.picker.query().to_string()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
        Line::from(vec![
            Span::styled("Module: ", Style::default().fg(Color::DarkGray)),
            Span::raw(module),
        ]),
        Line::raw(""),
    ];

    // header lines plus the hint
    let list_height = usize::from(inner.height).saturating_sub(lines.len() + 1);
    if items.is_empty() {
        lines.push(Line::styled(
            "No matching widgets",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        let offset = (overlay.selected + 1).saturating_sub(list_height);
        for (index, item) in items.iter().enumerate().skip(offset).take(list_height) {
            lines.push(item_line(item, index == overlay.selected));
        }
    }

    while lines.len() + 1 < usize::from(inner.height) {
        lines.push(Line::raw(""));
    }
    lines.push(Line::styled(PICKER_HINT, Style::default().fg(Color::DarkGray)));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn item_line(item: &PickerItem<'_>, highlighted: bool) -> Line<'static> {
    let def = item.definition;
    let marker = if item.active { "✓" } else { " " };
    let mut style = if item.active {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    if highlighted {
        style = style.add_modifier(Modifier::REVERSED);
    }
    Line::from(vec![
        Span::styled(format!("{marker} {}", def.title), style),
        Span::styled(
            format!("  {} · {}", def.id, def.module),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}
