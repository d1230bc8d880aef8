//! Grid state
//!
//! Holds the fixed item collection, the current active subset and the
//! published geometry, and keeps the layout consistent with them. All
//! mutation happens through the session task, so no locking lives here.

use crate::breakpoints::{resolve_columns, Breakpoint};
use crate::layout::{compute_layout, ItemPlacement};
use pgrid_common::ItemId;
use serde::Serialize;
use tracing::warn;

/// Renderable snapshot of the grid
///
/// This is the full observable state a front-end needs: container flags,
/// published geometry and one placement per item.
#[derive(Debug, Clone, Serialize)]
pub struct GridSnapshot {
    /// Engine has taken over the container
    pub active: bool,
    /// At least one filter control is engaged
    pub filtered: bool,
    /// Last reported viewport width
    pub width: u32,
    /// Published column count
    pub columns: u32,
    /// Published row count
    pub rows: u32,
    /// Current active subset, `None` when unfiltered
    pub subset: Option<Vec<ItemId>>,
    /// Placements in collection order
    pub items: Vec<ItemPlacement>,
}

/// Grid container state
///
/// The item collection is fixed at mount. The active subset starts as
/// `None` (all items shown in natural order) and is replaced whenever a
/// filter resolution lands. Every mutation recomputes the layout, so reads
/// always observe a consistent geometry.
#[derive(Debug)]
pub struct GridState {
    items: Vec<ItemId>,
    active: Option<Vec<ItemId>>,
    filtered: bool,
    width: u32,
    columns: u32,
    rows: u32,
    placements: Vec<ItemPlacement>,
}

impl GridState {
    /// Mount a grid over an ordered item collection
    ///
    /// The initial layout uses the given breakpoint table at width zero;
    /// the first size notification replaces it.
    pub fn new(items: Vec<ItemId>, breakpoints: &[Breakpoint]) -> Self {
        let mut state = Self {
            items,
            active: None,
            filtered: false,
            width: 0,
            columns: resolve_columns(breakpoints, 0),
            rows: 1,
            placements: Vec::new(),
        };
        state.relayout();
        state
    }

    /// Item collection in natural order
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    /// Current active subset
    pub fn active(&self) -> Option<&[ItemId]> {
        self.active.as_deref()
    }

    /// Last reported viewport width
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Published column count
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Published row count
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Whether filter controls are engaged
    pub fn is_filtered(&self) -> bool {
        self.filtered
    }

    /// Set the filtered marker
    pub fn set_filtered(&mut self, filtered: bool) {
        self.filtered = filtered;
    }

    /// Apply a new viewport width and its breakpoint table
    pub fn resize(&mut self, width: u32, breakpoints: &[Breakpoint]) {
        self.width = width;
        self.columns = resolve_columns(breakpoints, width);
        self.relayout();
    }

    /// Replace the active subset with a resolved id list
    ///
    /// Ids that are not part of the collection are dropped with a warning,
    /// as are repeats of an id already placed; the subset invariant is that
    /// it only ever names known items, each once. Returns the number of ids
    /// dropped.
    pub fn set_active(&mut self, resolved: Option<Vec<ItemId>>) -> usize {
        let mut dropped = 0;
        self.active = resolved.map(|ids| {
            let total = ids.len();
            let mut subset = Vec::with_capacity(ids.len());
            for id in ids {
                if self.items.contains(&id) && !subset.contains(&id) {
                    subset.push(id);
                }
            }
            dropped = total - subset.len();
            if dropped > 0 {
                warn!(
                    dropped = dropped,
                    kept = subset.len(),
                    "resolved subset contained unknown or repeated item ids"
                );
            }
            subset
        });
        self.relayout();
        dropped
    }

    /// Recompute placements and row count from the current state
    fn relayout(&mut self) {
        let layout = compute_layout(&self.items, self.active.as_deref(), self.columns);
        self.placements = layout.placements;
        self.rows = layout.rows;
    }

    /// Number of currently visible items
    pub fn visible(&self) -> usize {
        self.placements.iter().filter(|p| p.on).count()
    }

    /// Snapshot the full observable state
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            active: true,
            filtered: self.filtered,
            width: self.width,
            columns: self.columns,
            rows: self.rows,
            subset: self.active.clone(),
            items: self.placements.clone(),
        }
    }
}
