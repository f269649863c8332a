//! Width snapping and default placement.
//!
//! Everything here is pure: functions take widget ids or entries and return
//! new entries. Placement is row-filling (left to right, top to bottom) on
//! the 4-column grid with no backtracking and no collision search.

use serde::{Deserialize, Serialize};

use crate::catalog::WidgetCatalog;
use crate::types::{LayoutEntry, SizeClass, ALLOWED_SPANS, COLS, DEFAULT_ROW_ADVANCE, MAX_HEIGHT};

/// How far the placement cursor moves down when a row is full.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowAdvance {
    /// Advance by [`DEFAULT_ROW_ADVANCE`] regardless of the row's content.
    /// Tall widgets may then overlap the next row.
    #[default]
    Fixed,
    /// Advance by the tallest entry of the row being closed.
    TallestInRow,
}

/// Snaps a raw width to an allowed column span.
///
/// Thresholds, not nearest-neighbour: `≤ 1.5 → 1`, `≤ 3 → 2`, otherwise `4`.
/// NaN snaps to 1.
///
/// ```
/// use widget_grid::snap_width;
///
/// assert_eq!(snap_width(1.5), 1);
/// assert_eq!(snap_width(3.0), 2);
/// assert_eq!(snap_width(3.01), 4);
/// ```
pub fn snap_width(raw: f64) -> u16 {
    if raw.is_nan() || raw <= 1.5 {
        1
    } else if raw <= 3.0 {
        2
    } else {
        4
    }
}

/// Clamps `raw` to `[min, max]`, snaps it, and keeps the result inside the
/// bounds when the snapped span would fall outside them.
pub fn snap_width_within(raw: f64, min: u16, max: u16) -> u16 {
    let max = max.clamp(1, COLS);
    let min = min.clamp(1, max);
    let raw = if raw.is_nan() { f64::from(min) } else { raw };
    let snapped = snap_width(raw.clamp(f64::from(min), f64::from(max)));
    if (min..=max).contains(&snapped) {
        return snapped;
    }
    let mut inside = ALLOWED_SPANS.iter().copied().filter(|s| (min..=max).contains(s));
    let fallback = if snapped < min { inside.next() } else { inside.last() };
    fallback.unwrap_or(snapped)
}

/// Origin and width for an entry at column `x` asked to be `raw` wide.
///
/// The width stays inside `[min, max]` and inside the columns right of the
/// origin. When the smallest allowed span covering `min` does not fit right
/// of `x`, the origin moves left just far enough for it.
pub fn fit_width(x: u16, raw: f64, min: u16, max: u16) -> (u16, u16) {
    let need = ALLOWED_SPANS
        .iter()
        .copied()
        .find(|&span| span >= min.max(1))
        .unwrap_or(COLS);
    let x = x.min(COLS - need);
    (x, snap_width_within(raw, need, max.min(COLS - x)))
}

/// Clamps a requested height to `[min, max]`, never below 1.
pub fn clamp_height(raw: i32, min: u16, max: u16) -> u16 {
    let min = min.max(1);
    let max = max.max(min);
    raw.clamp(i32::from(min), i32::from(max)) as u16
}

/// Default `(w, h)` of a widget: its size class, width snapped and both
/// axes kept inside the definition's bounds.
///
/// Ids missing from the catalog get the medium footprint.
pub fn default_size(catalog: &WidgetCatalog, widget_id: &str) -> (u16, u16) {
    match catalog.lookup(widget_id) {
        Some(def) => {
            let (w, h) = def.default_dimensions();
            let (min_w, max_w) = def.width_bounds();
            let (min_h, max_h) = def.height_bounds();
            (
                snap_width_within(f64::from(w), min_w, max_w),
                clamp_height(i32::from(h), min_h, max_h),
            )
        }
        None => {
            let (w, h) = SizeClass::Medium.dimensions();
            (snap_width(f64::from(w)), h.clamp(1, MAX_HEIGHT))
        }
    }
}

/// Lays out `widget_ids` from their catalog defaults with the fixed row
/// advance.
pub fn place_default<S: AsRef<str>>(catalog: &WidgetCatalog, widget_ids: &[S]) -> Vec<LayoutEntry> {
    place_default_with(catalog, widget_ids, RowAdvance::Fixed)
}

/// Lays out `widget_ids` from their catalog defaults.
///
/// Only meant for fresh lists (reset, template application); it never
/// looks at existing positions.
pub fn place_default_with<S: AsRef<str>>(
    catalog: &WidgetCatalog,
    widget_ids: &[S],
    advance: RowAdvance,
) -> Vec<LayoutEntry> {
    flow(
        widget_ids.iter().map(|id| {
            let id = id.as_ref();
            let (w, h) = default_size(catalog, id);
            (id.to_string(), w, h)
        }),
        advance,
    )
}

/// Re-runs row-filling placement over `entries` in their given order,
/// keeping each entry's current `w`/`h`.
pub fn reflow(entries: &[LayoutEntry], advance: RowAdvance) -> Vec<LayoutEntry> {
    flow(
        entries
            .iter()
            .map(|e| (e.widget_id.clone(), snap_width(f64::from(e.w)), e.h.max(1))),
        advance,
    )
}

/// First free row below every entry (`max(y + h)`), or 0 when empty.
pub fn bottom_y(entries: &[LayoutEntry]) -> u16 {
    entries.iter().map(LayoutEntry::bottom).max().unwrap_or(0)
}

fn flow(items: impl IntoIterator<Item = (String, u16, u16)>, advance: RowAdvance) -> Vec<LayoutEntry> {
    let mut placed = Vec::new();
    let (mut x, mut y) = (0u16, 0u16);
    let mut row_tallest = 0u16;

    for (widget_id, w, h) in items {
        if x + w > COLS {
            x = 0;
            y += match advance {
                RowAdvance::Fixed => DEFAULT_ROW_ADVANCE,
                RowAdvance::TallestInRow => row_tallest.max(1),
            };
            row_tallest = 0;
        }
        placed.push(LayoutEntry::new(widget_id, x, y, w, h));
        row_tallest = row_tallest.max(h);
        x += w;
    }
    placed
}
