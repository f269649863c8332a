//! Application state and event loop for the dashboard TUI.
//!
//! `App` owns the interaction controller and translates terminal input
//! (keys, mouse, resizes) into its gesture events. Rendering lives in
//! [`crate::tui::ui`].

use std::io::{self, stdout};
use std::time::{Duration, Instant};

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, EventStream, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use widget_grid::{
    Gesture, InteractionController, PickerItem, Point, WidgetPicker, ALLOWED_SPANS,
};

use crate::config::schema::TuiConfig;
use crate::storage::FilePersistence;
use crate::tui::event::{handle_key_event, Action, Event, EventHandler};
use crate::tui::ui::render;

/// Tick rate used when the configured one does not parse.
const DEFAULT_TICK_RATE: Duration = Duration::from_millis(250);

/// How long a status message stays in the footer.
const STATUS_MESSAGE_DURATION: Duration = Duration::from_secs(3);

/// The "add widget" overlay: picker filter plus the highlighted row.
#[derive(Debug, Default)]
pub struct PickerOverlay {
    /// Search text and module filter.
    pub picker: WidgetPicker,
    /// Index into the current results.
    pub selected: usize,
}

/// Main TUI application state.
pub struct App {
    /// Layout engine front end.
    pub controller: InteractionController<FilePersistence>,
    /// Selected widget, as an index into the active widget list.
    pub selected_index: usize,
    /// Open "add widget" overlay, if any.
    pub picker: Option<PickerOverlay>,
    /// Footer message and its expiry.
    pub status_message: Option<(String, Instant)>,
    /// Set when the user asked to quit.
    pub should_quit: bool,
    /// Grid rows scrolled off the top, in terminal rows.
    pub scroll: u16,
    /// Screen area of each drawn widget, refreshed on every render.
    pub slot_areas: Vec<(String, Rect)>,
    /// Cell sizes and breakpoint.
    pub tui: TuiConfig,
    /// Width last fed to the controller.
    pub viewport_width: u16,
    tick_rate: Duration,
}

impl App {
    /// Creates the application around a controller.
    pub fn new(controller: InteractionController<FilePersistence>, tui: TuiConfig) -> Self {
        let tick_rate = tui.tick_rate().unwrap_or(DEFAULT_TICK_RATE);
        Self {
            controller,
            selected_index: 0,
            picker: None,
            status_message: None,
            should_quit: false,
            scroll: 0,
            slot_areas: Vec::new(),
            tui,
            viewport_width: 0,
            tick_rate,
        }
    }

    // -- selection ----------------------------------------------------------

    /// Id of the selected widget.
    pub fn selected_id(&self) -> Option<&str> {
        self.controller
            .store()
            .widget_ids()
            .get(self.selected_index)
            .map(String::as_str)
    }

    fn index_of(&self, widget_id: &str) -> Option<usize> {
        self.controller
            .store()
            .widget_ids()
            .iter()
            .position(|id| id == widget_id)
    }

    fn clamp_selection(&mut self) {
        let len = self.controller.store().widget_ids().len();
        self.selected_index = self.selected_index.min(len.saturating_sub(1));
    }

    /// Moves selection to the next widget in list order.
    pub fn select_next(&mut self) {
        let len = self.controller.store().widget_ids().len();
        if self.selected_index + 1 < len {
            self.selected_index += 1;
        }
    }

    /// Moves selection to the previous widget in list order.
    pub fn select_previous(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    /// Selects the nearest widget starting below the selected one.
    pub fn select_below(&mut self) {
        self.select_vertical(true);
    }

    /// Selects the nearest widget starting above the selected one.
    pub fn select_above(&mut self) {
        self.select_vertical(false);
    }

    fn select_vertical(&mut self, down: bool) {
        let Some(current) = self.selected_id() else {
            return;
        };
        let slots = self.controller.slots();
        let Some(origin) = slots.iter().find(|s| s.widget_id == current) else {
            return;
        };
        let (ox, oy) = (origin.x, origin.y);
        let target = slots
            .iter()
            .filter(|s| if down { s.y > oy } else { s.y < oy })
            .min_by_key(|s| {
                let row_distance = if down { s.y - oy } else { oy - s.y };
                (row_distance, s.x.abs_diff(ox))
            })
            .map(|s| s.widget_id.to_string());
        if let Some(index) = target.and_then(|id| self.index_of(&id)) {
            self.selected_index = index;
        }
    }

    // -- edit mode ------------------------------------------------------------

    /// Toggles edit mode. Leaving it closes the picker.
    pub fn toggle_edit_mode(&mut self) {
        let editing = self.controller.toggle_edit_mode();
        if !editing {
            self.picker = None;
        }
        self.set_status(if editing { "Editing layout" } else { "Layout saved" });
    }

    /// Removes the selected widget.
    pub fn remove_selected(&mut self) {
        let Some(id) = self.selected_id().map(str::to_string) else {
            return;
        };
        if self.controller.remove_widget(&id) {
            self.clamp_selection();
            self.set_status(format!("Removed {id}"));
        }
    }

    /// Restores the starter dashboard.
    pub fn reset_layout(&mut self) {
        if self.controller.reset_layout() {
            self.selected_index = 0;
            self.set_status("Layout reset");
        }
    }

    /// Moves the selected widget `offset` places in the list.
    pub fn move_selected(&mut self, offset: isize) {
        let from = self.selected_index;
        let Some(to) = from.checked_add_signed(offset) else {
            return;
        };
        if self.controller.on_reorder(from, to) {
            self.selected_index = to;
        }
    }

    /// Widens (or narrows) the selected widget to the next allowed span.
    pub fn resize_selected_width(&mut self, grow: bool) {
        let Some(id) = self.selected_id().map(str::to_string) else {
            return;
        };
        let Some(current) = self.controller.store().entry(&id).map(|e| e.w) else {
            return;
        };
        let target = if grow {
            ALLOWED_SPANS.iter().copied().find(|&s| s > current)
        } else {
            ALLOWED_SPANS.iter().rev().copied().find(|&s| s < current)
        };
        if let Some(target) = target {
            self.resize_selected(&id, i32::from(target) - i32::from(current), 0);
        }
    }

    /// Grows or shrinks the selected widget by `rows`.
    pub fn resize_selected_height(&mut self, rows: i32) {
        if let Some(id) = self.selected_id().map(str::to_string) {
            self.resize_selected(&id, 0, rows);
        }
    }

    fn resize_selected(&mut self, id: &str, d_cols: i32, d_rows: i32) {
        self.controller.cancel_resize();
        if !self.controller.on_resize_delta(id, d_cols, d_rows) {
            return;
        }
        if !self.controller.on_resize_commit(id) {
            self.set_status(format!("{id} is at its size limit"));
        }
    }

    /// Applies the template after the current one, wrapping around.
    pub fn cycle_template(&mut self) {
        let templates = self.controller.store().templates();
        let ids: Vec<&str> = templates.ids().collect();
        if ids.is_empty() {
            return;
        }
        let current = self.controller.store().template_id();
        let next = ids
            .iter()
            .position(|id| *id == current)
            .map_or(0, |i| (i + 1) % ids.len());
        let next_id = ids[next].to_string();
        let name = templates
            .lookup(&next_id)
            .map_or_else(|| next_id.clone(), |t| t.name.clone());

        match self.controller.apply_template(&next_id) {
            Ok(()) => {
                self.selected_index = 0;
                self.set_status(format!("Template: {name}"));
            }
            Err(e) => {
                tracing::warn!("failed to apply template {}: {}", next_id, e);
                self.set_status(e.to_string());
            }
        }
    }

    /// Abandons an in-flight drag or resize.
    pub fn cancel_gesture(&mut self) {
        self.controller.cancel_resize();
        self.controller.cancel_drag();
    }

    // -- picker ---------------------------------------------------------------

    /// Opens the "add widget" overlay.
    pub fn open_picker(&mut self) {
        self.picker = Some(PickerOverlay::default());
    }

    /// Closes the overlay.
    pub fn close_picker(&mut self) {
        self.picker = None;
    }

    /// Current picker results, empty when the overlay is closed.
    pub fn picker_results(&self) -> Vec<PickerItem<'_>> {
        let store = self.controller.store();
        match &self.picker {
            Some(overlay) => overlay.picker.results(store.catalog(), store.widget_ids()),
            None => Vec::new(),
        }
    }

    /// Moves the picker highlight by `offset`, clamped to the results.
    pub fn picker_move(&mut self, offset: isize) {
        let len = self.picker_results().len();
        if let Some(overlay) = self.picker.as_mut() {
            let next = overlay.selected.saturating_add_signed(offset);
            overlay.selected = next.min(len.saturating_sub(1));
        }
    }

    /// Adds the highlighted widget and closes the overlay.
    pub fn add_from_picker(&mut self) {
        let Some(selected) = self.picker.as_ref().map(|o| o.selected) else {
            return;
        };
        let Some((id, title, active)) = self
            .picker_results()
            .get(selected)
            .map(|item| (item.definition.id, item.definition.title, item.active))
        else {
            return;
        };
        if active {
            self.set_status(format!("{title} is already on the dashboard"));
            return;
        }
        if self.controller.add_widget(id) {
            self.picker = None;
            self.selected_index = self.controller.store().widget_ids().len().saturating_sub(1);
            self.set_status(format!("Added {title}"));
        }
    }

    // -- mouse and viewport ---------------------------------------------------

    /// Feeds a new terminal width to the controller.
    pub fn on_resize(&mut self, width: u16) {
        if width != self.viewport_width {
            self.viewport_width = width;
            self.controller.on_viewport_resize(f64::from(width));
        }
    }

    fn slot_at(&self, column: u16, row: u16) -> Option<(&str, Rect)> {
        self.slot_areas
            .iter()
            .find(|(_, area)| {
                column >= area.x
                    && column < area.x + area.width
                    && row >= area.y
                    && row < area.y + area.height
            })
            .map(|(id, area)| (id.as_str(), *area))
    }

    /// Handles a mouse event.
    ///
    /// In edit mode a press on a widget's bottom-right corner starts a
    /// resize and a press on its top border starts a drag; the release
    /// commits either one. Outside edit mode clicks only select.
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        let point = Point::new(f64::from(mouse.column), f64::from(mouse.row));
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some((id, area)) = self
                    .slot_at(mouse.column, mouse.row)
                    .map(|(id, area)| (id.to_string(), area))
                else {
                    return;
                };
                if let Some(index) = self.index_of(&id) {
                    self.selected_index = index;
                }
                if !self.controller.is_editing() {
                    return;
                }
                let on_handle = mouse.column == area.x + area.width.saturating_sub(1)
                    && mouse.row == area.y + area.height.saturating_sub(1);
                if on_handle {
                    self.controller.begin_resize(&id, point);
                } else if mouse.row == area.y {
                    self.controller.begin_drag(self.selected_index);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.controller.on_pointer_move(point);
            }
            MouseEventKind::Up(MouseButton::Left) => match self.controller.gesture().clone() {
                Gesture::Resizing(resize) => {
                    self.controller.on_resize_commit(&resize.widget_id);
                }
                Gesture::Dragging { from } => {
                    let target = self
                        .slot_at(mouse.column, mouse.row)
                        .and_then(|(id, _)| self.index_of(id));
                    let moved = target.filter(|&to| self.controller.on_reorder(from, to));
                    match moved {
                        Some(to) => self.selected_index = to,
                        None => self.controller.cancel_drag(),
                    }
                }
                Gesture::Idle => {}
            },
            _ => {}
        }
    }

    // -- status ---------------------------------------------------------------

    /// Shows `message` in the footer for a few seconds.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now() + STATUS_MESSAGE_DURATION));
    }

    /// Clears an expired status message. Returns whether one was cleared.
    pub fn expire_status_message(&mut self) -> bool {
        match &self.status_message {
            Some((_, expiry)) if Instant::now() >= *expiry => {
                self.status_message = None;
                true
            }
            _ => false,
        }
    }

    // -- run loop -------------------------------------------------------------

    /// Runs the TUI until the user quits.
    ///
    /// Installs a panic hook that restores the terminal before the default
    /// hook prints.
    pub async fn run(&mut self) -> io::Result<()> {
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = restore_terminal();
            original_hook(panic_info);
        }));

        setup_terminal()?;

        let result = self.event_loop().await;

        restore_terminal()?;
        result
    }

    async fn event_loop(&mut self) -> io::Result<()> {
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        self.on_resize(terminal.size()?.width);
        let event_handler = EventHandler::new(self.tick_rate);
        let mut reader = EventStream::new();

        terminal.draw(|frame| render(frame, self))?;

        loop {
            let should_render = match event_handler.next(&mut reader).await? {
                Event::Key(key) => {
                    if handle_key_event(self, key) == Action::Quit {
                        self.should_quit = true;
                        return Ok(());
                    }
                    true
                }
                Event::Mouse(mouse) => {
                    self.handle_mouse_event(mouse);
                    true
                }
                Event::Resize(width, _) => {
                    self.on_resize(width);
                    true
                }
                Event::Tick => self.expire_status_message(),
            };

            if should_render {
                terminal.draw(|frame| render(frame, self))?;
            }
        }
    }
}

/// Enables raw mode and switches to the alternate screen.
fn setup_terminal() -> io::Result<()> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    Ok(())
}

/// Restores the terminal to its original state.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}
