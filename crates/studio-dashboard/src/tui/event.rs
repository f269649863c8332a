//! Event handling for the TUI.
//!
//! Merges crossterm input with a redraw tick and maps key presses onto the
//! interaction controller.

use std::time::Duration;

use crossterm::event::{
    Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseEvent,
};
use futures::StreamExt;
use tokio::time::interval;

use crate::tui::app::App;

/// Application-level event variants.
#[derive(Debug, Clone, Copy)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse event occurred.
    Mouse(MouseEvent),
    /// Terminal was resized.
    Resize(u16, u16),
    /// Periodic tick.
    Tick,
}

/// Races terminal input against a periodic tick.
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    /// Creates a handler ticking every `tick_rate`.
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Waits for the next terminal event or tick.
    pub async fn next(&self, reader: &mut EventStream) -> std::io::Result<Event> {
        let mut tick = interval(self.tick_rate);
        tick.tick().await;

        loop {
            tokio::select! {
                maybe_event = reader.next() => {
                    match maybe_event {
                        Some(Ok(CrosstermEvent::Key(key))) => return Ok(Event::Key(key)),
                        Some(Ok(CrosstermEvent::Mouse(mouse))) => return Ok(Event::Mouse(mouse)),
                        Some(Ok(CrosstermEvent::Resize(w, h))) => return Ok(Event::Resize(w, h)),
                        Some(Err(e)) => return Err(e),
                        // focus, paste
                        Some(Ok(_)) => continue,
                        None => return Err(std::io::Error::new(
                            std::io::ErrorKind::UnexpectedEof,
                            "event stream ended",
                        )),
                    }
                }
                _ = tick.tick() => {
                    return Ok(Event::Tick);
                }
            }
        }
    }
}

/// Outcome of a key press the event loop must act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Nothing beyond the state change already applied.
    None,
    /// Quit the application.
    Quit,
}

/// Dispatches a key press.
///
/// The picker overlay captures typing while open, so only Ctrl-C quits from
/// inside it. Layout-changing keys are ignored outside edit mode, except
/// template cycling.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Action {
    if key.kind == KeyEventKind::Release {
        return Action::None;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    if app.picker.is_some() {
        handle_picker_key(app, key);
        return Action::None;
    }

    match key.code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('e') => app.toggle_edit_mode(),
        KeyCode::Char('l') | KeyCode::Right => app.select_next(),
        KeyCode::Char('h') | KeyCode::Left => app.select_previous(),
        KeyCode::Char('j') | KeyCode::Down => app.select_below(),
        KeyCode::Char('k') | KeyCode::Up => app.select_above(),
        KeyCode::Char('t') => app.cycle_template(),
        KeyCode::Esc => app.cancel_gesture(),
        _ if app.controller.is_editing() => handle_edit_key(app, key),
        _ => {}
    }
    Action::None
}

fn handle_edit_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('a') => app.open_picker(),
        KeyCode::Char('x') | KeyCode::Delete => app.remove_selected(),
        KeyCode::Char('R') => app.reset_layout(),
        KeyCode::Char('<') => app.move_selected(-1),
        KeyCode::Char('>') => app.move_selected(1),
        KeyCode::Char('+') => app.resize_selected_width(true),
        KeyCode::Char('-') => app.resize_selected_width(false),
        KeyCode::Char(']') => app.resize_selected_height(1),
        KeyCode::Char('[') => app.resize_selected_height(-1),
        _ => {}
    }
}

fn handle_picker_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_picker(),
        KeyCode::Enter => app.add_from_picker(),
        KeyCode::Down => app.picker_move(1),
        KeyCode::Up => app.picker_move(-1),
        KeyCode::Tab => {
            if let Some(overlay) = app.picker.as_mut() {
                overlay.picker.cycle_module();
                overlay.selected = 0;
            }
        }
        KeyCode::Backspace => {
            if let Some(overlay) = app.picker.as_mut() {
                let mut query = overlay.picker.query().to_string();
                query.pop();
                overlay.picker.set_query(query);
                overlay.selected = 0;
            }
        }
        KeyCode::Char(c) => {
            if let Some(overlay) = app.picker.as_mut() {
                let query = format!("{}{}", overlay.picker.query(), c);
                overlay.picker.set_query(query);
                overlay.selected = 0;
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_utils::test_app;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_q_and_ctrl_c_quit() {
        let (_tmp, mut app) = test_app(120);
        assert_eq!(handle_key_event(&mut app, key(KeyCode::Char('q'))), Action::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(&mut app, ctrl_c), Action::Quit);
    }

    #[test]
    fn test_edit_keys_ignored_outside_edit_mode() {
        let (_tmp, mut app) = test_app(120);
        let before = app.controller.store().widget_ids().to_vec();
        handle_key_event(&mut app, key(KeyCode::Char('x')));
        handle_key_event(&mut app, key(KeyCode::Char('a')));
        assert_eq!(app.controller.store().widget_ids(), before.as_slice());
        assert!(app.picker.is_none(), "picker should stay closed");
    }

    #[test]
    fn test_e_toggles_edit_mode() {
        let (_tmp, mut app) = test_app(120);
        handle_key_event(&mut app, key(KeyCode::Char('e')));
        assert!(app.controller.is_editing());
        handle_key_event(&mut app, key(KeyCode::Char('e')));
        assert!(!app.controller.is_editing());
    }

    #[test]
    fn test_x_removes_selected_in_edit_mode() {
        let (_tmp, mut app) = test_app(120);
        handle_key_event(&mut app, key(KeyCode::Char('e')));
        handle_key_event(&mut app, key(KeyCode::Char('x')));
        assert!(!app.controller.store().is_active("welcome"));
        assert_eq!(app.controller.store().widget_ids().len(), 5);
    }

    #[test]
    fn test_q_types_into_open_picker() {
        let (_tmp, mut app) = test_app(120);
        handle_key_event(&mut app, key(KeyCode::Char('e')));
        handle_key_event(&mut app, key(KeyCode::Char('a')));
        assert_eq!(handle_key_event(&mut app, key(KeyCode::Char('q'))), Action::None);
        let query = app.picker.as_ref().map(|o| o.picker.query().to_string());
        assert_eq!(query.as_deref(), Some("q"));
    }

    #[test]
    fn test_picker_typing_and_enter_adds_widget() {
        let (_tmp, mut app) = test_app(120);
        handle_key_event(&mut app, key(KeyCode::Char('e')));
        handle_key_event(&mut app, key(KeyCode::Char('a')));
        for c in "notif".chars() {
            handle_key_event(&mut app, key(KeyCode::Char(c)));
        }
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert!(app.controller.store().is_active("notifications"));
        assert!(app.picker.is_none(), "picker should close after adding");
    }

    #[test]
    fn test_backspace_and_tab_in_picker() {
        let (_tmp, mut app) = test_app(120);
        handle_key_event(&mut app, key(KeyCode::Char('e')));
        handle_key_event(&mut app, key(KeyCode::Char('a')));
        handle_key_event(&mut app, key(KeyCode::Char('z')));
        handle_key_event(&mut app, key(KeyCode::Backspace));
        handle_key_event(&mut app, key(KeyCode::Tab));
        let overlay = app.picker.as_ref().expect("picker open");
        assert_eq!(overlay.picker.query(), "");
        assert_eq!(overlay.picker.module(), Some(widget_grid::WidgetModule::General));
    }

    #[test]
    fn test_esc_closes_picker() {
        let (_tmp, mut app) = test_app(120);
        handle_key_event(&mut app, key(KeyCode::Char('e')));
        handle_key_event(&mut app, key(KeyCode::Char('a')));
        handle_key_event(&mut app, key(KeyCode::Esc));
        assert!(app.picker.is_none());
        assert!(app.controller.is_editing(), "closing the picker keeps edit mode");
    }

    #[test]
    fn test_plus_widens_selected_widget_to_next_span() {
        let (_tmp, mut app) = test_app(120);
        // invoicing-revenue starts 2 wide at x = 0
        app.selected_index = 4;
        handle_key_event(&mut app, key(KeyCode::Char('e')));
        handle_key_event(&mut app, key(KeyCode::Char('+')));
        let entry = app.controller.store().entry("invoicing-revenue").cloned();
        assert_eq!(entry.map(|e| e.w), Some(4));
        handle_key_event(&mut app, key(KeyCode::Char('-')));
        let entry = app.controller.store().entry("invoicing-revenue").cloned();
        assert_eq!(entry.map(|e| e.w), Some(2));
    }

    #[test]
    fn test_brackets_change_height() {
        let (_tmp, mut app) = test_app(120);
        handle_key_event(&mut app, key(KeyCode::Char('e')));
        let start = app.controller.store().entry("welcome").map(|e| e.h);
        handle_key_event(&mut app, key(KeyCode::Char(']')));
        let grown = app.controller.store().entry("welcome").map(|e| e.h);
        assert_eq!(grown, start.map(|h| h + 1));
        handle_key_event(&mut app, key(KeyCode::Char('[')));
        assert_eq!(app.controller.store().entry("welcome").map(|e| e.h), start);
    }

    #[test]
    fn test_angle_brackets_reorder_and_follow_selection() {
        let (_tmp, mut app) = test_app(120);
        handle_key_event(&mut app, key(KeyCode::Char('e')));
        handle_key_event(&mut app, key(KeyCode::Char('>')));
        assert_eq!(app.controller.store().widget_ids()[1], "welcome");
        assert_eq!(app.selected_index, 1);
        handle_key_event(&mut app, key(KeyCode::Char('<')));
        assert_eq!(app.controller.store().widget_ids()[0], "welcome");
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_t_cycles_templates_outside_edit_mode() {
        let (_tmp, mut app) = test_app(120);
        assert_eq!(app.controller.store().template_id(), "custom");
        handle_key_event(&mut app, key(KeyCode::Char('t')));
        assert_eq!(app.controller.store().template_id(), "overview");
        handle_key_event(&mut app, key(KeyCode::Char('t')));
        assert_eq!(app.controller.store().template_id(), "projects");
    }

    #[test]
    fn test_arrow_keys_move_selection() {
        let (_tmp, mut app) = test_app(120);
        handle_key_event(&mut app, key(KeyCode::Right));
        assert_eq!(app.selected_index, 1);
        handle_key_event(&mut app, key(KeyCode::Char('h')));
        assert_eq!(app.selected_index, 0);
        handle_key_event(&mut app, key(KeyCode::Left));
        assert_eq!(app.selected_index, 0, "selection should not wrap");
    }

    #[test]
    fn test_key_release_is_ignored() {
        let (_tmp, mut app) = test_app(120);
        let mut event = key(KeyCode::Char('e'));
        event.kind = KeyEventKind::Release;
        handle_key_event(&mut app, event);
        assert!(!app.controller.is_editing());
    }
}
