//! Gesture scenarios
//!
//! Pointer-driven resize and drag reorder through the interaction
//! controller, checking that only commits reach storage.

use widget_grid::{
    Gesture, InteractionController, LayoutStore, MemoryPersistence, Point, ViewportOptions, COLS,
};

fn editing_controller() -> InteractionController<MemoryPersistence> {
    let _ = env_logger::builder().is_test(true).try_init();
    let store = LayoutStore::open(MemoryPersistence::new(), "gestures");
    let mut controller = InteractionController::with_options(
        store,
        ViewportOptions {
            mobile_breakpoint: 600.0,
            row_height: 80.0,
            gap: 16.0,
            initial_width: 1000.0,
        },
    );
    controller.set_edit_mode(true);
    controller
}

#[test]
fn test_pointer_resize_then_commit() {
    let mut c = editing_controller();
    let origin = Point::new(400.0, 200.0);
    assert!(c.begin_resize("invoicing-revenue", origin));

    // Column pitch is 254, row pitch 96: drag right by ~2 columns, down by 1 row.
    c.on_pointer_move(Point::new(400.0 + 300.0, 200.0 + 50.0));
    c.on_pointer_move(Point::new(400.0 + 520.0, 200.0 + 110.0));
    assert_eq!(c.preview_entry().map(|e| (e.w, e.h)), Some((4, 4)));
    assert_eq!(
        c.store().entry("invoicing-revenue").map(|e| (e.w, e.h)),
        Some((2, 3)),
        "store untouched mid-gesture"
    );
    assert_eq!(c.store().persistence().write_count(), 0);

    assert!(c.on_resize_commit("invoicing-revenue"));
    assert_eq!(
        c.store().entry("invoicing-revenue").map(|e| (e.w, e.h)),
        Some((4, 4))
    );
    assert_eq!(c.gesture(), &Gesture::Idle);
}

#[test]
fn test_pointer_resize_clamps_to_definition() {
    let mut c = editing_controller();
    assert!(c.begin_resize("quick-actions", Point::default()));
    c.on_pointer_move(Point::new(5000.0, 5000.0));
    // quick-actions: max width 2, max height 4.
    assert_eq!(c.preview_entry().map(|e| (e.w, e.h)), Some((2, 4)));
    c.on_pointer_move(Point::new(-5000.0, -5000.0));
    assert_eq!(c.preview_entry().map(|e| (e.w, e.h)), Some((1, 2)));
}

#[test]
fn test_resize_commit_leaves_siblings() {
    let mut c = editing_controller();
    let before: Vec<_> = c
        .store()
        .layout()
        .iter()
        .filter(|e| e.widget_id != "welcome")
        .cloned()
        .collect();
    assert!(c.on_resize_delta("welcome", 0, 2));
    assert!(c.on_resize_commit("welcome"));
    let after: Vec<_> = c
        .store()
        .layout()
        .iter()
        .filter(|e| e.widget_id != "welcome")
        .cloned()
        .collect();
    assert_eq!(before, after);
}

#[test]
fn test_drag_reorder_persists_once() {
    let mut c = editing_controller();
    assert!(c.begin_drag(0));
    assert_eq!(c.gesture(), &Gesture::Dragging { from: 0 });
    assert!(c.on_reorder(0, 5));
    assert_eq!(c.store().widget_ids().last().map(String::as_str), Some("welcome"));
    assert_eq!(c.store().persistence().write_count(), 2);
}

#[test]
fn test_reorder_mid_resize_drops_the_preview() {
    let mut c = editing_controller();
    assert!(c.begin_resize("projects-tasks", Point::default()));
    assert!(c.on_resize_delta("projects-tasks", 0, 3));

    assert!(c.on_reorder(5, 0));
    assert_eq!(c.gesture(), &Gesture::Idle);
    assert!(c.preview_entry().is_none());

    // slots follow the reordered store, not the snapshot taken at resize start
    let slots = c.slots();
    assert_eq!(slots[0].widget_id, "activity-feed");
    for slot in &slots {
        let entry = c.store().entry(slot.widget_id).expect("slot has an entry");
        assert_eq!((slot.x, slot.y, slot.w, slot.h), (entry.x, entry.y, entry.w, entry.h));
    }

    // a late release has nothing to commit
    let layout = c.store().layout().to_vec();
    assert!(!c.on_resize_commit("projects-tasks"));
    assert_eq!(c.store().layout(), layout.as_slice());
    assert_eq!(c.store().entry("projects-tasks").map(|e| e.h), Some(2));
}

#[test]
fn test_cancel_drag_keeps_order() {
    let mut c = editing_controller();
    let before = c.store().widget_ids().to_vec();
    assert!(c.begin_drag(1));
    c.cancel_drag();
    assert_eq!(c.gesture(), &Gesture::Idle);
    assert_eq!(c.store().widget_ids(), before.as_slice());
}

#[test]
fn test_viewport_crossing_breakpoint() {
    let mut c = editing_controller();
    c.set_edit_mode(false);
    assert!(!c.is_stacked());
    c.on_viewport_resize(599.0);
    assert!(c.is_stacked());
    assert!(c.slots().iter().all(|s| s.width_cols == COLS));
    c.on_viewport_resize(600.0);
    assert!(!c.is_stacked());
    assert!(c.slots().iter().any(|s| s.width_cols == 1));
}

#[test]
fn test_unknown_widget_slot_has_no_definition() {
    let mut c = editing_controller();
    c.apply_template("team").expect("team template");
    let store = c.into_store();
    let mut persistence = store.persistence().clone();
    let keys = store.keys().clone();
    persistence.insert(
        &keys.layout,
        r#"{"schemaVersion":1,"activeWidgetIds":["retired-kpi","calendar"],
            "layout":[{"widgetId":"retired-kpi","x":0,"y":0,"w":2,"h":2},
                      {"widgetId":"calendar","x":2,"y":0,"w":2,"h":2}]}"#,
    );
    let c = InteractionController::new(LayoutStore::open(persistence, "gestures"));
    let slots = c.slots();
    assert_eq!(slots[0].widget_id, "retired-kpi");
    assert!(slots[0].definition.is_none());
    assert!(slots[1].definition.is_some());
}
