//! Top-level rendering for the dashboard.
//!
//! Composes the header, the widget grid, the footer and, when open, the
//! "add widget" overlay.

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use widget_grid::CUSTOM_TEMPLATE_ID;

use crate::tui::app::App;
use crate::tui::views::grid::render_grid;
use crate::tui::views::picker::render_picker;

/// Header text displayed at the top of the dashboard.
const HEADER_TEXT: &str = "Studio Dashboard";

/// Keybindings shown while viewing.
const VIEW_FOOTER: &str = "[hjkl] Select  [e] Edit  [t] Template  [q] Quit";

/// Keybindings shown while editing.
const EDIT_FOOTER: &str =
    "[a] Add  [x] Remove  [</>] Move  [+/-] Width  [[/]] Height  [R] Reset  [e] Done";

/// Renders the whole screen.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(1),    // grid
            Constraint::Length(1), // footer
        ])
        .split(area);

    frame.render_widget(Paragraph::new(header_line(app, area.width)), chunks[0]);
    render_grid(frame, chunks[1], app);
    frame.render_widget(Paragraph::new(footer_line(app)), chunks[2]);

    if let Some(overlay) = &app.picker {
        let items = app.picker_results();
        render_picker(frame, chunks[1], overlay, &items);
    }
}

fn header_line(app: &App, width: u16) -> Line<'static> {
    let store = app.controller.store();
    let template = match store.template_id() {
        CUSTOM_TEMPLATE_ID => "Custom".to_string(),
        id => store
            .templates()
            .lookup(id)
            .map_or_else(|| id.to_string(), |t| t.name.clone()),
    };
    let left = format!("{HEADER_TEXT} · {template}");

    let (mode, mode_style) = if app.controller.is_editing() {
        (
            "EDIT".to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            store.keys().layout.clone(),
            Style::default().fg(Color::DarkGray),
        )
    };

    let padding = usize::from(width).saturating_sub(left.chars().count() + mode.chars().count());
    Line::from(vec![
        Span::styled(left, Style::default().fg(Color::Cyan)),
        Span::raw(" ".repeat(padding)),
        Span::styled(mode, mode_style),
    ])
}

fn footer_line(app: &App) -> Line<'static> {
    if let Some((message, _)) = &app.status_message {
        return Line::styled(message.clone(), Style::default().fg(Color::Yellow));
    }
    let hints = if app.controller.is_editing() {
        EDIT_FOOTER
    } else {
        VIEW_FOOTER
    };
    Line::styled(hints, Style::default().fg(Color::DarkGray))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FilePersistence;
    use crate::tui::test_utils::{
        buffer_contains, find_row_with_text, render_app, test_app, test_app_with,
    };
    use crate::tui::views::grid::{NOT_FOUND_TEXT, RESIZE_HANDLE};
    use widget_grid::{encode_layout, LayoutEntry, Persistence, ScopeKeys};

    #[test]
    fn test_renders_header_and_starter_widgets() {
        let (_tmp, mut app) = test_app(120);
        let buffer = render_app(&mut app, 120, 40);
        assert_eq!(find_row_with_text(&buffer, "Studio Dashboard · Custom"), Some(0));
        for title in ["Welcome", "Quick actions", "My tasks", "Deadlines", "Revenue", "Activity"] {
            assert!(buffer_contains(&buffer, title), "missing widget {title}");
        }
        assert!(find_row_with_text(&buffer, VIEW_FOOTER).is_some());
    }

    #[test]
    fn test_widget_footer_shows_module_and_span() {
        let (_tmp, mut app) = test_app(120);
        let buffer = render_app(&mut app, 120, 40);
        assert!(buffer_contains(&buffer, "general · 4/4"), "welcome spans 4 columns");
        assert!(buffer_contains(&buffer, "projects · 2/4"), "projects-tasks spans 2");
    }

    #[test]
    fn test_edit_mode_header_footer_and_handles() {
        let (_tmp, mut app) = test_app(120);
        app.controller.set_edit_mode(true);
        let buffer = render_app(&mut app, 120, 40);
        let header = find_row_with_text(&buffer, "EDIT");
        assert_eq!(header, Some(0));
        assert!(find_row_with_text(&buffer, EDIT_FOOTER).is_some());
        assert!(buffer_contains(&buffer, RESIZE_HANDLE));
    }

    #[test]
    fn test_status_message_replaces_footer() {
        let (_tmp, mut app) = test_app(120);
        app.set_status("Template: Finance");
        let buffer = render_app(&mut app, 120, 40);
        assert_eq!(find_row_with_text(&buffer, "Template: Finance"), Some(39));
        assert!(find_row_with_text(&buffer, VIEW_FOOTER).is_none());
    }

    #[test]
    fn test_template_name_in_header() {
        let (_tmp, mut app) = test_app(120);
        app.controller.apply_template("finance").expect("finance");
        let buffer = render_app(&mut app, 120, 40);
        assert_eq!(find_row_with_text(&buffer, "Studio Dashboard · Finance"), Some(0));
    }

    #[test]
    fn test_unknown_widget_renders_placeholder() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let mut persistence = FilePersistence::new(tmp.path());
        let ids = vec!["welcome".to_string(), "retired-widget".to_string()];
        let layout = vec![
            LayoutEntry::new("welcome", 0, 0, 4, 2),
            LayoutEntry::new("retired-widget", 0, 2, 2, 2),
        ];
        let blob = encode_layout(&ids, &layout).expect("encode");
        persistence
            .write(&ScopeKeys::for_scope("test").layout, &blob)
            .expect("write");

        let mut app = test_app_with(tmp.path(), 120);
        let buffer = render_app(&mut app, 120, 40);
        assert!(buffer_contains(&buffer, "retired-widget"));
        assert!(buffer_contains(&buffer, NOT_FOUND_TEXT));
    }

    #[test]
    fn test_narrow_terminal_stacks_widgets_full_width() {
        let (_tmp, mut app) = test_app(60);
        let buffer = render_app(&mut app, 60, 80);
        // full width: every widget reports the whole grid
        assert!(buffer_contains(&buffer, "projects · 4/4"));
        assert!(!buffer_contains(&buffer, "projects · 2/4"));
    }

    #[test]
    fn test_empty_dashboard_hint() {
        let (_tmp, mut app) = test_app(120);
        app.controller.set_edit_mode(true);
        let ids: Vec<String> = app.controller.store().widget_ids().to_vec();
        for id in ids {
            app.controller.remove_widget(&id);
        }
        let buffer = render_app(&mut app, 120, 40);
        assert!(buffer_contains(&buffer, "No widgets. Press [a] to add one."));
    }

    #[test]
    fn test_picker_overlay_drawn_over_grid() {
        let (_tmp, mut app) = test_app(120);
        app.controller.set_edit_mode(true);
        app.open_picker();
        let buffer = render_app(&mut app, 120, 40);
        assert!(buffer_contains(&buffer, "Add widget"));
        assert!(buffer_contains(&buffer, "Search: "));
    }

    #[test]
    fn test_selection_scrolls_grid() {
        let (_tmp, mut app) = test_app(120);
        // the starter layout is 31 terminal rows tall
        app.selected_index = 5;
        render_app(&mut app, 120, 20);
        assert!(app.scroll > 0, "activity-feed should scroll into view");
        assert!(app.slot_areas.iter().any(|(id, _)| id == "activity-feed"));
    }
}
