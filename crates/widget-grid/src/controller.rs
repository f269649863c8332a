//! Interaction controller: turns gesture events into store mutations.
//!
//! The controller knows nothing about the UI toolkit driving it. Adapters
//! translate their own pointer, keyboard and drag-and-drop callbacks into the
//! abstract events below:
//!
//! - reorder: [`begin_drag`](InteractionController::begin_drag),
//!   [`on_reorder`](InteractionController::on_reorder),
//!   [`cancel_drag`](InteractionController::cancel_drag)
//! - resize: [`begin_resize`](InteractionController::begin_resize),
//!   [`on_pointer_move`](InteractionController::on_pointer_move) or
//!   [`on_resize_delta`](InteractionController::on_resize_delta), then
//!   [`on_resize_commit`](InteractionController::on_resize_commit) or
//!   [`cancel_resize`](InteractionController::cancel_resize)
//!
//! While a resize is in flight every change lands in a local preview copy of
//! the layout. The store (and therefore persistence) only sees the final
//! size on commit.

use crate::error::Result;
use crate::persistence::Persistence;
use crate::placement::{clamp_height, fit_width};
use crate::store::LayoutStore;
use crate::types::{LayoutEntry, WidgetDefinition, COLS};

/// A pointer position in adapter units (pixels, terminal cells, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Viewport-dependent sizing used to convert pointer travel into grid units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    /// Width of one column, excluding the gap.
    pub col_width: f64,
    /// Height of one grid row, excluding the gap.
    pub row_height: f64,
    /// Space between columns and rows.
    pub gap: f64,
}

impl GridMetrics {
    /// Derives metrics for a viewport `width` wide.
    pub fn for_width(width: f64, row_height: f64, gap: f64) -> Self {
        let cols = f64::from(COLS);
        let col_width = ((width - gap * (cols - 1.0)) / cols).max(0.0);
        Self {
            col_width,
            row_height,
            gap,
        }
    }

    /// Converts pointer travel into `(columns, rows)`, rounding to nearest.
    pub fn cells(&self, dx: f64, dy: f64) -> (i32, i32) {
        (
            steps(dx, self.col_width + self.gap),
            steps(dy, self.row_height + self.gap),
        )
    }
}

fn steps(distance: f64, pitch: f64) -> i32 {
    if pitch <= 0.0 || !distance.is_finite() {
        return 0;
    }
    (distance / pitch).round() as i32
}

/// Viewport settings of a controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportOptions {
    /// Widths strictly below this stack widgets when not editing.
    pub mobile_breakpoint: f64,
    /// Height of one grid row.
    pub row_height: f64,
    /// Space between columns and rows.
    pub gap: f64,
    /// Initial viewport width.
    pub initial_width: f64,
}

impl Default for ViewportOptions {
    fn default() -> Self {
        Self {
            mobile_breakpoint: 768.0,
            row_height: 80.0,
            gap: 16.0,
            initial_width: 1280.0,
        }
    }
}

/// State of an in-flight resize.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeGesture {
    /// Widget being resized.
    pub widget_id: String,
    /// Pointer position when the gesture began.
    pub origin: Point,
    /// Width when the gesture began.
    pub start_w: u16,
    /// Height when the gesture began.
    pub start_h: u16,
    /// Unpersisted copy of the layout carrying the candidate size.
    pub preview: Vec<LayoutEntry>,
}

/// What the user is currently doing with the pointer.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    /// Nothing in progress.
    #[default]
    Idle,
    /// Reorder drag of the widget at index `from`.
    Dragging {
        /// Index of the dragged widget in the widget list.
        from: usize,
    },
    /// Live resize.
    Resizing(ResizeGesture),
}

/// Render model for one widget.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetSlot<'a> {
    /// Widget id.
    pub widget_id: &'a str,
    /// Catalog entry, `None` when the id is unknown (render a placeholder).
    pub definition: Option<&'a WidgetDefinition>,
    /// Column origin.
    pub x: u16,
    /// Row origin.
    pub y: u16,
    /// Column span as drawn.
    pub w: u16,
    /// Row span.
    pub h: u16,
    /// Column span handed to the widget's content.
    pub width_cols: u16,
}

/// Drives a [`LayoutStore`] from gesture events and tracks edit mode and
/// viewport state.
#[derive(Debug)]
pub struct InteractionController<P: Persistence> {
    store: LayoutStore<P>,
    edit_mode: bool,
    gesture: Gesture,
    options: ViewportOptions,
    metrics: GridMetrics,
    mobile: bool,
}

impl<P: Persistence> InteractionController<P> {
    /// Wraps a store with default viewport options.
    pub fn new(store: LayoutStore<P>) -> Self {
        Self::with_options(store, ViewportOptions::default())
    }

    /// Wraps a store.
    pub fn with_options(store: LayoutStore<P>, options: ViewportOptions) -> Self {
        let mut controller = Self {
            store,
            edit_mode: false,
            gesture: Gesture::Idle,
            options,
            metrics: GridMetrics::for_width(options.initial_width, options.row_height, options.gap),
            mobile: false,
        };
        controller.on_viewport_resize(options.initial_width);
        controller
    }

    // -- edit mode ----------------------------------------------------------

    /// Whether edit mode is on.
    pub fn is_editing(&self) -> bool {
        self.edit_mode
    }

    /// Flips edit mode and returns the new value.
    pub fn toggle_edit_mode(&mut self) -> bool {
        self.set_edit_mode(!self.edit_mode);
        self.edit_mode
    }

    /// Turns edit mode on or off. Leaving edit mode abandons any gesture.
    pub fn set_edit_mode(&mut self, editing: bool) {
        if !editing && self.gesture != Gesture::Idle {
            log::debug!("Leaving edit mode, abandoning {:?}", self.gesture_name());
            self.gesture = Gesture::Idle;
        }
        self.edit_mode = editing;
    }

    fn gesture_name(&self) -> &'static str {
        match self.gesture {
            Gesture::Idle => "idle",
            Gesture::Dragging { .. } => "drag",
            Gesture::Resizing(_) => "resize",
        }
    }

    /// Current gesture.
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    // -- reorder ------------------------------------------------------------

    /// Starts dragging the widget at `index`. Requires edit mode.
    pub fn begin_drag(&mut self, index: usize) -> bool {
        if !self.edit_mode || index >= self.store.widget_ids().len() {
            return false;
        }
        self.gesture = Gesture::Dragging { from: index };
        true
    }

    /// Drops the widget at `from` onto position `to`.
    ///
    /// Ends any gesture in flight, so a resize preview never outlives the
    /// order it was taken from. Equal indices and out-of-range indices leave
    /// the store alone. Returns whether the store changed.
    pub fn on_reorder(&mut self, from: usize, to: usize) -> bool {
        self.gesture = Gesture::Idle;
        let len = self.store.widget_ids().len();
        if !self.edit_mode || from == to || from >= len || to >= len {
            return false;
        }
        let mut order = self.store.widget_ids().to_vec();
        let moved = order.remove(from);
        order.insert(to, moved);
        self.store.reorder_widgets(&order)
    }

    /// Abandons a reorder drag.
    pub fn cancel_drag(&mut self) {
        if matches!(self.gesture, Gesture::Dragging { .. }) {
            self.gesture = Gesture::Idle;
        }
    }

    // -- resize -------------------------------------------------------------

    /// Starts a resize of `widget_id` with the pointer at `origin`.
    ///
    /// Requires edit mode and an active widget; snapshots the layout into
    /// the preview.
    pub fn begin_resize(&mut self, widget_id: &str, origin: Point) -> bool {
        if !self.edit_mode {
            return false;
        }
        let Some(entry) = self.store.entry(widget_id) else {
            return false;
        };
        self.gesture = Gesture::Resizing(ResizeGesture {
            widget_id: widget_id.to_string(),
            origin,
            start_w: entry.w,
            start_h: entry.h,
            preview: self.store.layout().to_vec(),
        });
        true
    }

    /// Pointer moved during a resize: converts travel since the origin into
    /// grid steps and updates the preview.
    pub fn on_pointer_move(&mut self, point: Point) {
        let Gesture::Resizing(resize) = &self.gesture else {
            return;
        };
        let (d_cols, d_rows) = self
            .metrics
            .cells(point.x - resize.origin.x, point.y - resize.origin.y);
        let widget_id = resize.widget_id.clone();
        self.update_preview(&widget_id, d_cols, d_rows);
    }

    /// Sets the preview size to the start size plus `(d_cols, d_rows)`.
    ///
    /// Deltas are relative to the size at gesture start. Starts a gesture
    /// implicitly (keyboard resize) when none is in flight for this widget.
    pub fn on_resize_delta(&mut self, widget_id: &str, d_cols: i32, d_rows: i32) -> bool {
        let resizing_this = matches!(
            &self.gesture,
            Gesture::Resizing(r) if r.widget_id == widget_id
        );
        if !resizing_this && !self.begin_resize(widget_id, Point::default()) {
            return false;
        }
        self.update_preview(widget_id, d_cols, d_rows);
        true
    }

    fn update_preview(&mut self, widget_id: &str, d_cols: i32, d_rows: i32) {
        let ((min_w, max_w), (min_h, max_h)) = self.store.size_bounds(widget_id);
        let Gesture::Resizing(resize) = &mut self.gesture else {
            return;
        };
        let Some(entry) = resize.preview.iter_mut().find(|e| e.widget_id == widget_id) else {
            return;
        };
        let raw_w = i32::from(resize.start_w).saturating_add(d_cols);
        (entry.x, entry.w) = fit_width(entry.x, f64::from(raw_w), min_w, max_w);
        entry.h = clamp_height(
            i32::from(resize.start_h).saturating_add(d_rows),
            min_h,
            max_h,
        );
    }

    /// Preview entry of the widget being resized.
    pub fn preview_entry(&self) -> Option<&LayoutEntry> {
        match &self.gesture {
            Gesture::Resizing(r) => r.preview.iter().find(|e| e.widget_id == r.widget_id),
            _ => None,
        }
    }

    /// Commits the previewed size to the store and drops the preview.
    ///
    /// Returns whether the store changed. Ignored unless `widget_id` is the
    /// widget being resized.
    pub fn on_resize_commit(&mut self, widget_id: &str) -> bool {
        let Gesture::Resizing(resize) = &self.gesture else {
            return false;
        };
        if resize.widget_id != widget_id {
            return false;
        }
        let size = self.preview_entry().map(|e| (e.w, e.h));
        self.gesture = Gesture::Idle;
        match size {
            Some((w, h)) => self.store.resize_widget(widget_id, i32::from(w), i32::from(h)),
            None => false,
        }
    }

    /// Drops the preview without touching the store.
    pub fn cancel_resize(&mut self) {
        if matches!(self.gesture, Gesture::Resizing(_)) {
            self.gesture = Gesture::Idle;
        }
    }

    // -- viewport -----------------------------------------------------------

    /// Recomputes metrics and the mobile flag for a new viewport width.
    pub fn on_viewport_resize(&mut self, width: f64) {
        self.metrics = GridMetrics::for_width(width, self.options.row_height, self.options.gap);
        let mobile = width < self.options.mobile_breakpoint;
        if mobile != self.mobile {
            log::debug!("Viewport {} wide, mobile = {}", width, mobile);
        }
        self.mobile = mobile;
    }

    /// Current grid metrics.
    pub fn metrics(&self) -> GridMetrics {
        self.metrics
    }

    /// Whether the viewport is below the mobile breakpoint.
    pub fn is_mobile(&self) -> bool {
        self.mobile
    }

    /// Whether widgets are currently drawn stacked at full width.
    pub fn is_stacked(&self) -> bool {
        self.mobile && !self.edit_mode
    }

    /// Widgets to draw, in list order.
    ///
    /// Uses the resize preview while one is in flight. When stacked, every
    /// widget spans the full width, one below the other.
    pub fn slots(&self) -> Vec<WidgetSlot<'_>> {
        let layout: &[LayoutEntry] = match &self.gesture {
            Gesture::Resizing(r) => &r.preview,
            _ => self.store.layout(),
        };
        let catalog = self.store.catalog();
        let stacked = self.is_stacked();
        let mut next_y = 0u16;

        layout
            .iter()
            .map(|entry| {
                let definition = catalog.lookup(&entry.widget_id);
                if stacked {
                    let y = next_y;
                    next_y = next_y.saturating_add(entry.h);
                    WidgetSlot {
                        widget_id: &entry.widget_id,
                        definition,
                        x: 0,
                        y,
                        w: COLS,
                        h: entry.h,
                        width_cols: COLS,
                    }
                } else {
                    WidgetSlot {
                        widget_id: &entry.widget_id,
                        definition,
                        x: entry.x,
                        y: entry.y,
                        w: entry.w,
                        h: entry.h,
                        width_cols: entry.w,
                    }
                }
            })
            .collect()
    }

    // -- store pass-throughs ------------------------------------------------

    /// Adds a widget. Edit mode only.
    pub fn add_widget(&mut self, widget_id: &str) -> bool {
        if !self.edit_mode {
            return false;
        }
        self.gesture = Gesture::Idle;
        self.store.add_widget(widget_id)
    }

    /// Removes a widget. Edit mode only.
    pub fn remove_widget(&mut self, widget_id: &str) -> bool {
        if !self.edit_mode {
            return false;
        }
        self.gesture = Gesture::Idle;
        self.store.remove_widget(widget_id)
    }

    /// Resets to the starter dashboard. Edit mode only.
    pub fn reset_layout(&mut self) -> bool {
        if !self.edit_mode {
            return false;
        }
        self.gesture = Gesture::Idle;
        self.store.reset_layout();
        true
    }

    /// Applies a template, in or out of edit mode.
    ///
    /// # Errors
    ///
    /// Propagates [`LayoutStore::apply_template`] errors.
    pub fn apply_template(&mut self, template_id: &str) -> Result<()> {
        self.gesture = Gesture::Idle;
        self.store.apply_template(template_id)
    }

    /// The underlying store.
    pub fn store(&self) -> &LayoutStore<P> {
        &self.store
    }

    /// Consumes the controller, returning its store.
    pub fn into_store(self) -> LayoutStore<P> {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryPersistence;

    fn controller() -> InteractionController<MemoryPersistence> {
        let store = LayoutStore::open(MemoryPersistence::new(), "test");
        InteractionController::new(store)
    }

    fn editing() -> InteractionController<MemoryPersistence> {
        let mut c = controller();
        c.set_edit_mode(true);
        c
    }

    #[test]
    fn test_metrics_for_width() {
        let m = GridMetrics::for_width(1000.0, 80.0, 16.0);
        assert_eq!(m.col_width, 238.0);
        assert_eq!(m.cells(254.0, 0.0), (1, 0));
        assert_eq!(m.cells(126.0, -96.0), (0, -1));
        assert_eq!(m.cells(128.0, 0.0), (1, 0), "half a pitch rounds up");
    }

    #[test]
    fn test_metrics_never_negative() {
        let m = GridMetrics::for_width(10.0, 3.0, 5.0);
        assert_eq!(m.col_width, 0.0);
        assert_eq!(m.cells(f64::NAN, 4.0), (0, 1));
    }

    #[test]
    fn test_gestures_require_edit_mode() {
        let mut c = controller();
        assert!(!c.begin_drag(0));
        assert!(!c.begin_resize("welcome", Point::default()));
        assert!(!c.on_resize_delta("welcome", 1, 1));
        assert!(!c.add_widget("calendar"));
        assert!(!c.remove_widget("welcome"));
        assert!(!c.reset_layout());
        assert_eq!(c.gesture(), &Gesture::Idle);
    }

    #[test]
    fn test_begin_resize_unknown_widget() {
        let mut c = editing();
        assert!(!c.begin_resize("calendar", Point::default()));
    }

    #[test]
    fn test_toggle_edit_mode_abandons_resize() {
        let mut c = editing();
        assert!(c.on_resize_delta("projects-tasks", 0, 2));
        assert!(!c.toggle_edit_mode());
        assert_eq!(c.gesture(), &Gesture::Idle);
        assert_eq!(c.store().entry("projects-tasks").map(|e| e.h), Some(2));
    }

    #[test]
    fn test_pointer_move_updates_preview_only() {
        let mut c = editing();
        let origin = Point::new(500.0, 300.0);
        assert!(c.begin_resize("projects-tasks", origin));
        let m = c.metrics();
        // Two rows down.
        c.on_pointer_move(Point::new(500.0, 300.0 + 2.0 * (m.row_height + m.gap)));
        assert_eq!(c.preview_entry().map(|e| e.h), Some(4));
        assert_eq!(c.store().entry("projects-tasks").map(|e| e.h), Some(2));
        assert_eq!(c.store().persistence().write_count(), 0);
    }

    #[test]
    fn test_pointer_move_ignored_when_idle() {
        let mut c = editing();
        c.on_pointer_move(Point::new(9000.0, 9000.0));
        assert_eq!(c.gesture(), &Gesture::Idle);
    }

    #[test]
    fn test_preview_width_snaps_each_frame() {
        let mut c = editing();
        // welcome is 4 wide at x = 0; shrinking by one column gives 3 → 2.
        assert!(c.on_resize_delta("welcome", -1, 0));
        assert_eq!(c.preview_entry().map(|e| e.w), Some(2));
    }

    #[test]
    fn test_commit_writes_store_once() {
        let mut c = editing();
        assert!(c.on_resize_delta("projects-tasks", 0, 1));
        assert!(c.on_resize_delta("projects-tasks", 0, 2));
        assert!(c.on_resize_commit("projects-tasks"));
        assert_eq!(c.store().entry("projects-tasks").map(|e| e.h), Some(4));
        // Layout and template keys.
        assert_eq!(c.store().persistence().write_count(), 2);
        assert_eq!(c.gesture(), &Gesture::Idle);
    }

    #[test]
    fn test_commit_for_other_widget_is_ignored() {
        let mut c = editing();
        assert!(c.on_resize_delta("projects-tasks", 0, 2));
        assert!(!c.on_resize_commit("welcome"));
        assert!(matches!(c.gesture(), Gesture::Resizing(_)));
    }

    #[test]
    fn test_cancel_resize_discards_preview() {
        let mut c = editing();
        assert!(c.on_resize_delta("projects-tasks", 0, 3));
        c.cancel_resize();
        assert!(c.preview_entry().is_none());
        assert_eq!(c.store().entry("projects-tasks").map(|e| e.h), Some(2));
    }

    #[test]
    fn test_reorder_moves_widget() {
        let mut c = editing();
        assert!(c.begin_drag(5));
        assert!(c.on_reorder(5, 0));
        assert_eq!(c.store().widget_ids()[0], "activity-feed");
        assert_eq!(c.gesture(), &Gesture::Idle);
    }

    #[test]
    fn test_reorder_same_index_is_noop() {
        let mut c = editing();
        assert!(c.begin_drag(2));
        assert!(!c.on_reorder(2, 2));
        assert!(!c.on_reorder(0, 99));
        assert_eq!(c.store().persistence().write_count(), 0);
    }

    #[test]
    fn test_stacked_slots_on_mobile() {
        let mut c = controller();
        c.on_viewport_resize(400.0);
        assert!(c.is_mobile());
        let slots = c.slots();
        assert!(slots.iter().all(|s| s.x == 0 && s.w == COLS && s.width_cols == COLS));
        let ys: Vec<u16> = slots.iter().map(|s| s.y).collect();
        assert_eq!(ys, vec![0, 2, 4, 6, 8, 11]);
    }

    #[test]
    fn test_editing_on_mobile_shows_grid() {
        let mut c = editing();
        c.on_viewport_resize(400.0);
        assert!(!c.is_stacked());
        let tasks = c
            .slots()
            .into_iter()
            .find(|s| s.widget_id == "projects-tasks")
            .map(|s| (s.x, s.w));
        assert_eq!(tasks, Some((1, 2)));
    }

    #[test]
    fn test_slots_use_preview_during_resize() {
        let mut c = editing();
        assert!(c.on_resize_delta("projects-tasks", 0, 2));
        let h = c
            .slots()
            .into_iter()
            .find(|s| s.widget_id == "projects-tasks")
            .map(|s| s.h);
        assert_eq!(h, Some(4));
    }

    #[test]
    fn test_apply_template_allowed_outside_edit_mode() {
        let mut c = controller();
        c.apply_template("team").expect("team exists");
        assert_eq!(c.store().template_id(), "team");
    }
}
