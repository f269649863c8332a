//! Core types for widget-grid
//!
//! Catalog entries ([`WidgetDefinition`]) are static and immutable; layout
//! records ([`LayoutEntry`], [`DashboardState`]) are the mutable, persisted
//! side of the engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of columns in the dashboard grid.
pub const COLS: u16 = 4;

/// Column spans a widget may occupy (quarter, half, full width).
pub const ALLOWED_SPANS: [u16; 3] = [1, 2, 4];

/// Height limit applied when a definition carries no `max_height`.
pub const MAX_HEIGHT: u16 = 10;

/// Rows the placement cursor advances when it wraps to a new row.
pub const DEFAULT_ROW_ADVANCE: u16 = 2;

/// Template id meaning "not following any template".
pub const CUSTOM_TEMPLATE_ID: &str = "custom";

/// Category tag grouping widgets in the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetModule {
    /// Cross-cutting widgets (welcome, notifications, calendar)
    General,
    /// Project management
    Projects,
    /// Companies, contacts and leads
    Crm,
    /// Quotes and sales
    Commercial,
    /// Marketing campaigns
    Campaigns,
    /// Public tenders
    Tenders,
    /// Invoices and cash
    Invoicing,
    /// Document management
    Documents,
    /// Team administration
    Team,
    /// Reference projects
    References,
    /// Materials library
    Materials,
    /// Object catalog
    Objects,
}

impl WidgetModule {
    /// All modules in display order.
    pub const ALL: [WidgetModule; 12] = [
        WidgetModule::General,
        WidgetModule::Projects,
        WidgetModule::Crm,
        WidgetModule::Commercial,
        WidgetModule::Campaigns,
        WidgetModule::Tenders,
        WidgetModule::Invoicing,
        WidgetModule::Documents,
        WidgetModule::Team,
        WidgetModule::References,
        WidgetModule::Materials,
        WidgetModule::Objects,
    ];

    /// Kebab-case tag used in storage and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            WidgetModule::General => "general",
            WidgetModule::Projects => "projects",
            WidgetModule::Crm => "crm",
            WidgetModule::Commercial => "commercial",
            WidgetModule::Campaigns => "campaigns",
            WidgetModule::Tenders => "tenders",
            WidgetModule::Invoicing => "invoicing",
            WidgetModule::Documents => "documents",
            WidgetModule::Team => "team",
            WidgetModule::References => "references",
            WidgetModule::Materials => "materials",
            WidgetModule::Objects => "objects",
        }
    }
}

impl fmt::Display for WidgetModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for parsing a [`WidgetModule`] from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModuleError(pub String);

impl fmt::Display for ParseModuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid module: {}", self.0)
    }
}

impl std::error::Error for ParseModuleError {}

impl FromStr for WidgetModule {
    type Err = ParseModuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        WidgetModule::ALL
            .into_iter()
            .find(|m| m.as_str() == lowered)
            .ok_or_else(|| ParseModuleError(s.to_string()))
    }
}

/// Default footprint of a widget, mapped to grid units by [`SizeClass::dimensions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizeClass {
    /// 1×2
    Small,
    /// 2×2
    Medium,
    /// 2×3
    Large,
    /// 4×2
    Wide,
    /// 1×4
    Tall,
}

impl SizeClass {
    /// Returns the default `(width, height)` in grid units.
    pub fn dimensions(self) -> (u16, u16) {
        match self {
            SizeClass::Small => (1, 2),
            SizeClass::Medium => (2, 2),
            SizeClass::Large => (2, 3),
            SizeClass::Wide => (4, 2),
            SizeClass::Tall => (1, 4),
        }
    }
}

/// Immutable catalog entry describing one kind of widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetDefinition {
    /// Unique key, referenced by layouts and templates.
    pub id: &'static str,
    /// Display title.
    pub title: &'static str,
    /// One-line description shown in the picker.
    pub description: &'static str,
    /// Symbolic icon name.
    pub icon: &'static str,
    /// Category tag.
    pub module: WidgetModule,
    /// Default size class.
    pub size: SizeClass,
    /// Minimum width in columns.
    pub min_width: u16,
    /// Minimum height in rows.
    pub min_height: u16,
    /// Maximum width in columns; `None` means [`COLS`].
    pub max_width: Option<u16>,
    /// Maximum height in rows; `None` means [`MAX_HEIGHT`].
    pub max_height: Option<u16>,
}

impl WidgetDefinition {
    /// Default `(width, height)` from the size class.
    pub fn default_dimensions(&self) -> (u16, u16) {
        self.size.dimensions()
    }

    /// Effective width bounds `(min, max)`.
    pub fn width_bounds(&self) -> (u16, u16) {
        (self.min_width, self.max_width.unwrap_or(COLS))
    }

    /// Effective height bounds `(min, max)`.
    pub fn height_bounds(&self) -> (u16, u16) {
        (self.min_height, self.max_height.unwrap_or(MAX_HEIGHT))
    }
}

/// Position and span of one active widget on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutEntry {
    /// Widget this entry places.
    pub widget_id: String,
    /// Column origin (0-based).
    pub x: u16,
    /// Row origin (0-based).
    pub y: u16,
    /// Column span, one of [`ALLOWED_SPANS`].
    pub w: u16,
    /// Row span, at least 1.
    pub h: u16,
}

impl LayoutEntry {
    /// Creates an entry at `(x, y)` spanning `w × h`.
    pub fn new(widget_id: impl Into<String>, x: u16, y: u16, w: u16, h: u16) -> Self {
        Self {
            widget_id: widget_id.into(),
            x,
            y,
            w,
            h,
        }
    }

    /// First row below this entry.
    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.h)
    }

    /// Whether the entry satisfies the grid constraints.
    pub fn is_valid(&self) -> bool {
        ALLOWED_SPANS.contains(&self.w) && self.h >= 1 && self.x.saturating_add(self.w) <= COLS
    }
}

/// The persisted unit: ordered widget ids, one layout entry per id, and
/// the template marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardState {
    /// Active widget ids in display order.
    pub active_widget_ids: Vec<String>,
    /// One entry per active id.
    pub layout: Vec<LayoutEntry>,
    /// Last applied template id, or [`CUSTOM_TEMPLATE_ID`].
    pub template_id: String,
}

impl DashboardState {
    /// Looks up the entry for a widget id.
    pub fn entry(&self, widget_id: &str) -> Option<&LayoutEntry> {
        self.layout.iter().find(|e| e.widget_id == widget_id)
    }

    /// Mutable lookup of the entry for a widget id.
    pub fn entry_mut(&mut self, widget_id: &str) -> Option<&mut LayoutEntry> {
        self.layout.iter_mut().find(|e| e.widget_id == widget_id)
    }

    /// Whether `widget_id` is currently on the dashboard.
    pub fn is_active(&self, widget_id: &str) -> bool {
        self.active_widget_ids.iter().any(|id| id == widget_id)
    }

    /// Checks the 1:1 correspondence between ids and entries.
    pub fn is_consistent(&self) -> bool {
        if self.active_widget_ids.len() != self.layout.len() {
            return false;
        }
        let mut seen = std::collections::HashSet::new();
        self.active_widget_ids
            .iter()
            .all(|id| seen.insert(id.as_str()) && self.entry(id).is_some())
    }
}
