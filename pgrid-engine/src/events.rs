//! Grid event types and event bus
//!
//! Sessions publish their observable transitions here so front-ends and
//! tests can follow along without polling snapshots. Events are serialized
//! with a `type` tag for transport to whatever renders the grid.

use chrono::{DateTime, Utc};
use pgrid_common::{FilterCond, ItemId, TermId};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Grid engine events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GridEvent {
    /// A filter interaction was collected and a resolve launched
    ///
    /// Emitted before the resolve completes; `filtered` reflects the
    /// container marker, which flips immediately on interaction.
    FilterApplied {
        /// Collected term ids, in control order
        terms: Vec<TermId>,
        /// Condition combining them
        cond: FilterCond,
        /// Whether any term is active
        filtered: bool,
        /// When the interaction was processed
        timestamp: DateTime<Utc>,
    },

    /// A resolved subset was applied to the grid
    SubsetResolved {
        /// Subset after sanitization, in server order
        ids: Vec<ItemId>,
        /// Ids dropped because they named no known item
        dropped: usize,
        /// When the subset was applied
        timestamp: DateTime<Utc>,
    },

    /// The layout was recomputed
    ///
    /// Fires for both size notifications and subset changes.
    LayoutUpdated {
        /// Viewport width the layout used
        width: u32,
        /// Published column count
        columns: u32,
        /// Published row count
        rows: u32,
        /// Number of visible items
        visible: usize,
        /// When the layout was published
        timestamp: DateTime<Utc>,
    },

    /// A resolve attempt failed; the grid keeps its last state
    ResolveFailed {
        /// Failure description
        reason: String,
        /// When the failure was observed
        timestamp: DateTime<Utc>,
    },
}

impl GridEvent {
    /// Get event type as string for filtering
    pub fn event_type(&self) -> &str {
        match self {
            GridEvent::FilterApplied { .. } => "FilterApplied",
            GridEvent::SubsetResolved { .. } => "SubsetResolved",
            GridEvent::LayoutUpdated { .. } => "LayoutUpdated",
            GridEvent::ResolveFailed { .. } => "ResolveFailed",
        }
    }
}

/// Broadcast bus for grid events
///
/// Backed by tokio::broadcast: publishing never blocks, slow subscribers
/// lag rather than stall the session, and receivers clean up on drop.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<GridEvent>,
    capacity: usize,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<GridEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, reporting how many subscribers received it
    ///
    /// Errors when no subscriber is listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: GridEvent,
    ) -> Result<usize, broadcast::error::SendError<GridEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring whether anyone is listening
    ///
    /// Sessions use this form; a headless grid with no observers is a
    /// normal state.
    pub fn emit_lossy(&self, event: GridEvent) {
        let _ = self.tx.send(event);
    }

    /// Current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
