//! Grid session
//!
//! One task owns the grid and panel state; commands arrive over a channel
//! and are processed in order. Filter resolution runs on spawned tasks that
//! report back through an internal channel, tagged with the generation that
//! was current when the request left. A response from a superseded
//! generation is discarded, so the newest interaction wins regardless of
//! response arrival order.

use crate::config::GridConfig;
use crate::events::{EventBus, GridEvent};
use crate::filter::FilterPanel;
use crate::grid::{GridSnapshot, GridState};
use crate::resolver::{FilterResolver, ResolverError};
use pgrid_common::api::GridQuery;
use pgrid_common::{Error, ItemId, Result};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, warn};

const COMMAND_CAPACITY: usize = 32;
const EVENT_CAPACITY: usize = 64;

/// Commands the session task processes in order
#[derive(Debug)]
enum GridCommand {
    ToggleTag { group: usize, item: usize },
    SetSelect { group: usize, value: String },
    Resize { width: u32 },
    Refresh,
    Snapshot { reply: oneshot::Sender<GridSnapshot> },
}

/// Outcome of one spawned resolve, tagged with its launch generation
struct Resolved {
    generation: u64,
    outcome: std::result::Result<Vec<ItemId>, ResolverError>,
}

/// Handle to a running grid session
///
/// Cloneable; the session ends when every handle is dropped.
#[derive(Clone)]
pub struct GridHandle {
    cmd_tx: mpsc::Sender<GridCommand>,
    events: EventBus,
}

impl GridHandle {
    /// Toggle one tag control and launch a resolve
    pub async fn toggle_tag(&self, group: usize, item: usize) -> Result<()> {
        self.send(GridCommand::ToggleTag { group, item }).await
    }

    /// Set a select control's raw value and launch a resolve
    pub async fn set_select(&self, group: usize, value: impl Into<String>) -> Result<()> {
        self.send(GridCommand::SetSelect {
            group,
            value: value.into(),
        })
        .await
    }

    /// Report a new viewport width
    pub async fn resize(&self, width: u32) -> Result<()> {
        self.send(GridCommand::Resize { width }).await
    }

    /// Re-collect filter state and launch a resolve
    pub async fn refresh(&self) -> Result<()> {
        self.send(GridCommand::Refresh).await
    }

    /// Fetch the current grid snapshot
    pub async fn snapshot(&self) -> Result<GridSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.send(GridCommand::Snapshot { reply }).await?;
        rx.await
            .map_err(|_| Error::Internal("grid session ended".to_string()))
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<GridEvent> {
        self.events.subscribe()
    }

    /// The session's event bus
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    async fn send(&self, cmd: GridCommand) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| Error::Internal("grid session ended".to_string()))
    }
}

/// Grid session task
///
/// Created through [`GridSession::spawn`], which returns the handle used to
/// drive it.
pub struct GridSession {
    config: GridConfig,
    state: GridState,
    panel: FilterPanel,
    resolver: Arc<dyn FilterResolver>,
    events: EventBus,
    generation: u64,
    cmd_rx: mpsc::Receiver<GridCommand>,
    res_tx: mpsc::Sender<Resolved>,
    res_rx: mpsc::Receiver<Resolved>,
}

impl GridSession {
    /// Spawn a session over an item collection and filter panel
    ///
    /// The grid starts unfiltered at width zero; the first size
    /// notification establishes the real geometry, mirroring a mount
    /// followed by an initial resize observation.
    pub fn spawn(
        config: GridConfig,
        items: Vec<ItemId>,
        panel: FilterPanel,
        resolver: Arc<dyn FilterResolver>,
    ) -> GridHandle {
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (res_tx, res_rx) = mpsc::channel(COMMAND_CAPACITY);
        let events = EventBus::new(EVENT_CAPACITY);
        let state = GridState::new(items, &config.breakpoints);

        let session = GridSession {
            config,
            state,
            panel,
            resolver,
            events: events.clone(),
            generation: 0,
            cmd_rx,
            res_tx,
            res_rx,
        };
        tokio::spawn(session.run());

        GridHandle { cmd_tx, events }
    }

    async fn run(mut self) {
        debug!(items = self.state.items().len(), "grid session started");
        loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                res = self.res_rx.recv() => {
                    if let Some(res) = res {
                        self.handle_resolved(res);
                    }
                }
            }
        }
        debug!("grid session ended");
    }

    fn handle_command(&mut self, cmd: GridCommand) {
        match cmd {
            GridCommand::ToggleTag { group, item } => match self.panel.toggle_tag(group, item) {
                Ok(on) => {
                    debug!(group, item, on, "tag toggled");
                    self.activate();
                }
                Err(e) => warn!(error = %e, "ignoring tag toggle"),
            },
            GridCommand::SetSelect { group, value } => {
                match self.panel.set_select(group, value) {
                    Ok(()) => self.activate(),
                    Err(e) => warn!(error = %e, "ignoring select change"),
                }
            }
            GridCommand::Resize { width } => {
                self.state.resize(width, &self.config.breakpoints);
                self.emit_layout();
            }
            GridCommand::Refresh => self.activate(),
            GridCommand::Snapshot { reply } => {
                let _ = reply.send(self.state.snapshot());
            }
        }
    }

    /// Collect control state, flip the container marker and launch a
    /// resolve
    ///
    /// The marker flips immediately; the subset follows when the response
    /// lands. An empty selection still resolves, which restores the full
    /// catalog order as the active subset.
    fn activate(&mut self) {
        let terms = self.panel.selection();
        let filtered = !terms.is_empty();
        self.state.set_filtered(filtered);

        self.events.emit_lossy(GridEvent::FilterApplied {
            terms: terms.clone(),
            cond: self.config.filter_cond,
            filtered,
            timestamp: chrono::Utc::now(),
        });

        self.generation += 1;
        let generation = self.generation;
        let query = GridQuery::unfiltered(
            self.config.post_type.as_str(),
            self.config.taxonomy.as_str(),
        )
        .with_terms(terms, self.config.filter_cond);

        let resolver = Arc::clone(&self.resolver);
        let res_tx = self.res_tx.clone();
        tokio::spawn(async move {
            let outcome = resolver.resolve(&query).await;
            let _ = res_tx.send(Resolved { generation, outcome }).await;
        });
    }

    fn handle_resolved(&mut self, res: Resolved) {
        if res.generation != self.generation {
            debug!(
                generation = res.generation,
                current = self.generation,
                "discarding stale resolve response"
            );
            return;
        }
        match res.outcome {
            Ok(ids) => {
                let dropped = self.state.set_active(Some(ids));
                self.events.emit_lossy(GridEvent::SubsetResolved {
                    ids: self.state.active().map(<[_]>::to_vec).unwrap_or_default(),
                    dropped,
                    timestamp: chrono::Utc::now(),
                });
                self.emit_layout();
            }
            Err(e) => {
                warn!(error = %e, "filter resolve failed, keeping current subset");
                self.events.emit_lossy(GridEvent::ResolveFailed {
                    reason: e.to_string(),
                    timestamp: chrono::Utc::now(),
                });
            }
        }
    }

    fn emit_layout(&self) {
        self.events.emit_lossy(GridEvent::LayoutUpdated {
            width: self.state.width(),
            columns: self.state.columns(),
            rows: self.state.rows(),
            visible: self.state.visible(),
            timestamp: chrono::Utc::now(),
        });
    }
}
