//! Dashboard widget layout engine
//!
//! This crate composes a personal dashboard from a catalog of widgets laid
//! out on a 4-column grid. It owns the rules, not the pixels: hosts render
//! the [`WidgetSlot`]s the [`InteractionController`] hands out and feed user
//! gestures back in.
//!
//! # Pieces
//!
//! - [`WidgetCatalog`] / [`TemplateCatalog`]: static registries
//! - [`snap_width`], [`place_default`], [`reflow`]: pure placement rules
//! - [`LayoutStore`]: mutations, persisted after every change through a
//!   [`Persistence`] port
//! - [`InteractionController`]: edit mode, drag reorder and live resize
//!   with an unpersisted preview
//! - [`WidgetPicker`]: search and module filter for the "add widget" dialog
//!
//! # Examples
//!
//! ```
//! use widget_grid::{InteractionController, LayoutStore, MemoryPersistence};
//!
//! let store = LayoutStore::open(MemoryPersistence::new(), "studio");
//! assert_eq!(store.widget_ids().len(), 6);
//!
//! let mut controller = InteractionController::new(store);
//! controller.set_edit_mode(true);
//! assert!(controller.add_widget("notifications"));
//! assert!(controller.on_resize_delta("notifications", 0, 2));
//! assert!(controller.on_resize_commit("notifications"));
//! assert_eq!(controller.store().entry("notifications").map(|e| e.h), Some(4));
//! ```

#![warn(missing_docs)]

mod catalog;
mod controller;
mod error;
mod persistence;
mod picker;
mod placement;
mod store;
mod templates;
mod types;

// Re-export all public types
pub use catalog::{WidgetCatalog, STARTER_WIDGETS};
pub use controller::{
    Gesture, GridMetrics, InteractionController, Point, ResizeGesture, ViewportOptions, WidgetSlot,
};
pub use error::{Error, PersistenceError, Result, TemplateError};
pub use persistence::{
    decode_layout, encode_layout, MemoryPersistence, Persistence, ScopeKeys, SCHEMA_VERSION,
};
pub use picker::{PickerItem, WidgetPicker};
pub use placement::{
    bottom_y, clamp_height, default_size, fit_width, place_default, place_default_with, reflow,
    snap_width, snap_width_within, RowAdvance,
};
pub use store::{LayoutStore, StoreOptions};
pub use templates::{Template, TemplateCatalog};
pub use types::{
    DashboardState, LayoutEntry, ParseModuleError, SizeClass, WidgetDefinition, WidgetModule,
    ALLOWED_SPANS, COLS, CUSTOM_TEMPLATE_ID, DEFAULT_ROW_ADVANCE, MAX_HEIGHT,
};
