//! Grid coordinate assignment
//!
//! Pure layout math: given the ordered item collection, the active subset
//! and a column count, every item gets an on/off state and the visible ones
//! get `(x, y)` grid coordinates. Rank counts left to right, top to bottom.

use pgrid_common::ItemId;
use serde::Serialize;

/// Placement of one item on the grid
///
/// Hidden items carry no coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemPlacement {
    /// Item id
    pub id: ItemId,
    /// Whether the item is shown
    pub on: bool,
    /// Column index, visible items only
    pub x: Option<u32>,
    /// Row index, visible items only
    pub y: Option<u32>,
}

/// Layout computed for one collection / subset / column count combination
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridLayout {
    /// One placement per item, in collection order
    pub placements: Vec<ItemPlacement>,
    /// Row count the container publishes
    pub rows: u32,
    /// Number of visible items
    pub visible: usize,
}

/// Compute placements for every item
///
/// With no active subset every item is visible and ranked by its position
/// in the collection. With a subset, only subset members are visible and
/// each is ranked by its position in the subset; subset order wins over
/// collection order. Coordinates are `x = rank % columns` and
/// `y = rank / columns`.
///
/// The published row count is `considered / columns + 1`, where
/// `considered` is the collection size without a subset and the subset
/// length with one. The spare row is always included, so the count is at
/// least 1 even for an empty subset.
///
/// Subset ids are expected to refer to collection members; the grid state
/// drops unknown ids before layout. A zero column count is treated as 1.
///
/// # Examples
/// ```
/// use pgrid_engine::layout::compute_layout;
///
/// let layout = compute_layout(&[1, 2, 3, 4, 5], Some(&[3, 1, 5]), 2);
/// assert_eq!(layout.rows, 2);
/// assert_eq!(layout.visible, 3);
///
/// // Item 3 leads the subset, so it sits at the origin
/// let p = layout.placements.iter().find(|p| p.id == 3).unwrap();
/// assert_eq!((p.x, p.y), (Some(0), Some(0)));
/// ```
pub fn compute_layout(items: &[ItemId], active: Option<&[ItemId]>, columns: u32) -> GridLayout {
    let columns = columns.max(1);
    let considered = active.map_or(items.len(), |subset| subset.len());
    let rows = considered as u32 / columns + 1;

    let mut visible = 0;
    let placements = items
        .iter()
        .enumerate()
        .map(|(index, &id)| {
            let rank = match active {
                None => Some(index),
                Some(subset) => subset.iter().position(|&a| a == id),
            };
            match rank {
                Some(rank) => {
                    visible += 1;
                    let rank = rank as u32;
                    ItemPlacement {
                        id,
                        on: true,
                        x: Some(rank % columns),
                        y: Some(rank / columns),
                    }
                }
                None => ItemPlacement {
                    id,
                    on: false,
                    x: None,
                    y: None,
                },
            }
        })
        .collect();

    GridLayout {
        placements,
        rows,
        visible,
    }
}
