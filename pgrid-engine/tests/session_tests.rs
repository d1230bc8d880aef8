//! Integration tests for the grid session
//!
//! Sessions are driven end to end with in-process resolvers: commands go
//! in through the handle, events and snapshots come back out. Event
//! subscriptions keep the tests deterministic; only the stale-response
//! test sleeps, to give a deliberately late response time to land.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pgrid_common::api::{GridQuery, TermSummary};
use pgrid_common::{FilterCond, ItemId, TermId};
use pgrid_engine::{
    FilterGroup, FilterPanel, FilterResolver, GridConfig, GridEvent, GridSession, ResolverError,
};
use tokio::sync::{broadcast, Notify};

type Outcome = Result<Vec<ItemId>, ResolverError>;

/// Resolver that answers each call with the next scripted outcome and
/// records the queries it saw
struct ScriptedResolver {
    script: Mutex<VecDeque<Outcome>>,
    queries: Mutex<Vec<GridQuery>>,
}

impl ScriptedResolver {
    fn new(script: Vec<Outcome>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            queries: Mutex::new(Vec::new()),
        })
    }

    fn recorded(&self) -> Vec<GridQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl FilterResolver for ScriptedResolver {
    async fn resolve(&self, query: &GridQuery) -> Outcome {
        self.queries.lock().unwrap().push(query.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Resolver whose responses wait behind gates keyed by the term selection
///
/// Lets a test hold several resolves open at once and release them in any
/// order, regardless of which spawned task runs first.
struct GatedResolver {
    gates: HashMap<Vec<TermId>, Arc<Notify>>,
    outcomes: Mutex<HashMap<Vec<TermId>, Outcome>>,
}

impl GatedResolver {
    fn new(entries: Vec<(Vec<TermId>, Outcome)>) -> Arc<Self> {
        let gates = entries
            .iter()
            .map(|(terms, _)| (terms.clone(), Arc::new(Notify::new())))
            .collect();
        Arc::new(Self {
            gates,
            outcomes: Mutex::new(entries.into_iter().collect()),
        })
    }

    /// Let the resolve for one selection complete
    fn release(&self, terms: &[TermId]) {
        self.gates
            .get(terms)
            .expect("releasing a selection that was never scripted")
            .notify_one();
    }
}

#[async_trait]
impl FilterResolver for GatedResolver {
    async fn resolve(&self, query: &GridQuery) -> Outcome {
        let gate = self
            .gates
            .get(&query.terms)
            .expect("resolver saw an unscripted selection")
            .clone();
        gate.notified().await;
        self.outcomes
            .lock()
            .unwrap()
            .remove(&query.terms)
            .expect("outcome already consumed")
    }
}

/// Wait for the first event matching the predicate, skipping others
async fn wait_for<F>(rx: &mut broadcast::Receiver<GridEvent>, what: &str, pred: F) -> GridEvent
where
    F: Fn(&GridEvent) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match rx.recv().await {
                Ok(event) if pred(&event) => return event,
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => panic!("event stream closed"),
            }
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for {}", what))
}

/// Build a panel with one tag group over the given terms
fn tag_panel(terms: &[(TermId, &str)]) -> FilterPanel {
    let summaries: Vec<TermSummary> = terms
        .iter()
        .map(|&(id, name)| TermSummary {
            id,
            name: name.to_string(),
        })
        .collect();
    FilterPanel::with_groups(vec![FilterGroup::tags(&summaries)])
}

#[tokio::test]
async fn test_mount_is_unfiltered_and_resize_sets_geometry() {
    let resolver = ScriptedResolver::new(vec![]);
    let handle = GridSession::spawn(
        GridConfig::default(),
        vec![10, 20, 30, 40, 50],
        FilterPanel::new(),
        resolver.clone(),
    );
    let mut rx = handle.subscribe();

    handle.resize(1024).await.unwrap();
    wait_for(&mut rx, "layout", |e| {
        matches!(e, GridEvent::LayoutUpdated { .. })
    })
    .await;

    let snap = handle.snapshot().await.unwrap();
    assert!(snap.active);
    assert!(!snap.filtered);
    assert_eq!(snap.width, 1024);
    assert_eq!(snap.columns, 4);
    assert_eq!(snap.rows, 2);
    assert_eq!(snap.subset, None);
    assert_eq!(snap.items.len(), 5);
    assert!(snap.items.iter().all(|p| p.on));
    assert_eq!((snap.items[0].x, snap.items[0].y), (Some(0), Some(0)));
    assert_eq!((snap.items[4].x, snap.items[4].y), (Some(0), Some(1)));

    // Neither mount nor resize asks the catalog anything
    assert!(resolver.recorded().is_empty());
}

#[tokio::test]
async fn test_response_order_drives_layout() {
    let resolver = ScriptedResolver::new(vec![Ok(vec![3, 1, 5])]);
    let handle = GridSession::spawn(
        GridConfig::default(),
        vec![1, 2, 3, 4, 5],
        tag_panel(&[(7, "Web")]),
        resolver.clone(),
    );
    let mut rx = handle.subscribe();

    handle.resize(1024).await.unwrap();
    handle.toggle_tag(0, 0).await.unwrap();
    wait_for(&mut rx, "subset", |e| {
        matches!(e, GridEvent::SubsetResolved { .. })
    })
    .await;

    let snap = handle.snapshot().await.unwrap();
    assert!(snap.filtered);
    assert_eq!(snap.subset.as_deref(), Some([3, 1, 5].as_slice()));
    assert_eq!(snap.rows, 1);

    // Coordinates follow the response order, not the collection order
    let by_id = |id: ItemId| snap.items.iter().find(|p| p.id == id).unwrap();
    assert_eq!((by_id(3).x, by_id(3).y), (Some(0), Some(0)));
    assert_eq!((by_id(1).x, by_id(1).y), (Some(1), Some(0)));
    assert_eq!((by_id(5).x, by_id(5).y), (Some(2), Some(0)));
    assert!(!by_id(2).on);
    assert_eq!(by_id(2).x, None);
    assert!(!by_id(4).on);

    let queries = resolver.recorded();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].post_type, "post");
    assert_eq!(queries[0].taxonomy, "category");
    assert_eq!(queries[0].terms, vec![7]);
    assert_eq!(queries[0].cond, FilterCond::And);
}

#[tokio::test]
async fn test_empty_subset_keeps_one_row() {
    let resolver = ScriptedResolver::new(vec![Ok(Vec::new())]);
    let handle = GridSession::spawn(
        GridConfig::default(),
        vec![1, 2, 3, 4],
        tag_panel(&[(9, "Ghost")]),
        resolver,
    );
    let mut rx = handle.subscribe();

    handle.resize(1024).await.unwrap();
    handle.toggle_tag(0, 0).await.unwrap();
    let event = wait_for(&mut rx, "subset", |e| {
        matches!(e, GridEvent::SubsetResolved { .. })
    })
    .await;
    let layout = wait_for(&mut rx, "layout after subset", |e| {
        matches!(e, GridEvent::LayoutUpdated { .. })
    })
    .await;

    if let GridEvent::SubsetResolved { ids, dropped, .. } = event {
        assert!(ids.is_empty());
        assert_eq!(dropped, 0);
    }
    if let GridEvent::LayoutUpdated { rows, visible, .. } = layout {
        assert_eq!(rows, 1);
        assert_eq!(visible, 0);
    }

    let snap = handle.snapshot().await.unwrap();
    assert!(snap.filtered);
    assert_eq!(snap.subset.as_deref(), Some([].as_slice()));
    assert_eq!(snap.rows, 1);
    assert!(snap.items.iter().all(|p| !p.on));
}

#[tokio::test]
async fn test_unknown_and_repeated_ids_dropped() {
    let resolver = ScriptedResolver::new(vec![Ok(vec![2, 99, 1, 2])]);
    let handle = GridSession::spawn(
        GridConfig::default(),
        vec![1, 2, 3],
        tag_panel(&[(4, "News")]),
        resolver,
    );
    let mut rx = handle.subscribe();

    handle.resize(800).await.unwrap();
    handle.toggle_tag(0, 0).await.unwrap();
    let event = wait_for(&mut rx, "subset", |e| {
        matches!(e, GridEvent::SubsetResolved { .. })
    })
    .await;

    if let GridEvent::SubsetResolved { ids, dropped, .. } = event {
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(dropped, 2);
    }

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.subset.as_deref(), Some([2, 1].as_slice()));
}

#[tokio::test]
async fn test_filtered_marker_flips_before_response() {
    let resolver = GatedResolver::new(vec![(vec![5], Ok(vec![1]))]);
    let handle = GridSession::spawn(
        GridConfig::default(),
        vec![1, 2],
        tag_panel(&[(5, "News")]),
        resolver.clone(),
    );
    let mut rx = handle.subscribe();

    handle.resize(1024).await.unwrap();
    handle.toggle_tag(0, 0).await.unwrap();
    let event = wait_for(&mut rx, "filter applied", |e| {
        matches!(e, GridEvent::FilterApplied { .. })
    })
    .await;

    if let GridEvent::FilterApplied { terms, filtered, .. } = event {
        assert_eq!(terms, vec![5]);
        assert!(filtered);
    }

    // The marker is already set while the resolve is still in flight
    let snap = handle.snapshot().await.unwrap();
    assert!(snap.filtered);
    assert_eq!(snap.subset, None);

    resolver.release(&[5]);
    wait_for(&mut rx, "subset", |e| {
        matches!(e, GridEvent::SubsetResolved { .. })
    })
    .await;

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.subset.as_deref(), Some([1].as_slice()));
}

#[tokio::test]
async fn test_clearing_selection_still_resolves() {
    let resolver = ScriptedResolver::new(vec![Ok(vec![2]), Ok(vec![1, 2, 3])]);
    let handle = GridSession::spawn(
        GridConfig::default(),
        vec![1, 2, 3],
        tag_panel(&[(4, "Only")]),
        resolver.clone(),
    );
    let mut rx = handle.subscribe();

    handle.resize(1024).await.unwrap();
    handle.toggle_tag(0, 0).await.unwrap();
    wait_for(&mut rx, "first subset", |e| {
        matches!(e, GridEvent::SubsetResolved { .. })
    })
    .await;

    // Toggling the same control off leaves no active terms, but the
    // catalog is still asked; the full list replaces the subset
    handle.toggle_tag(0, 0).await.unwrap();
    wait_for(&mut rx, "second subset", |e| {
        matches!(e, GridEvent::SubsetResolved { .. })
    })
    .await;

    let snap = handle.snapshot().await.unwrap();
    assert!(!snap.filtered);
    assert_eq!(snap.subset.as_deref(), Some([1, 2, 3].as_slice()));
    assert!(snap.items.iter().all(|p| p.on));

    let queries = resolver.recorded();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0].terms, vec![4]);
    assert!(queries[1].terms.is_empty());
}

#[tokio::test]
async fn test_resolve_failure_keeps_current_subset() {
    let resolver = ScriptedResolver::new(vec![
        Ok(vec![2, 3]),
        Err(ResolverError::Api(500, "catalog down".to_string())),
    ]);
    let handle = GridSession::spawn(
        GridConfig::default(),
        vec![1, 2, 3],
        tag_panel(&[(1, "A"), (2, "B")]),
        resolver,
    );
    let mut rx = handle.subscribe();

    handle.resize(1024).await.unwrap();
    handle.toggle_tag(0, 0).await.unwrap();
    wait_for(&mut rx, "subset", |e| {
        matches!(e, GridEvent::SubsetResolved { .. })
    })
    .await;

    handle.toggle_tag(0, 1).await.unwrap();
    let event = wait_for(&mut rx, "failure", |e| {
        matches!(e, GridEvent::ResolveFailed { .. })
    })
    .await;

    if let GridEvent::ResolveFailed { reason, .. } = event {
        assert!(reason.contains("catalog down"));
    }

    // The failed interaction leaves the previous subset in place, while
    // the marker still reflects the control state
    let snap = handle.snapshot().await.unwrap();
    assert!(snap.filtered);
    assert_eq!(snap.subset.as_deref(), Some([2, 3].as_slice()));
}

#[tokio::test]
async fn test_stale_response_discarded() {
    let resolver = GatedResolver::new(vec![
        (vec![1], Ok(vec![1])),
        (vec![1, 2], Ok(vec![2, 3])),
    ]);
    let handle = GridSession::spawn(
        GridConfig::default(),
        vec![1, 2, 3],
        tag_panel(&[(1, "A"), (2, "B")]),
        resolver.clone(),
    );
    let mut rx = handle.subscribe();

    handle.resize(1024).await.unwrap();

    // Two interactions, both resolves held open
    handle.toggle_tag(0, 0).await.unwrap();
    handle.toggle_tag(0, 1).await.unwrap();

    // The newer response lands first and is applied
    resolver.release(&[1, 2]);
    let event = wait_for(&mut rx, "newer subset", |e| {
        matches!(e, GridEvent::SubsetResolved { .. })
    })
    .await;
    if let GridEvent::SubsetResolved { ids, .. } = event {
        assert_eq!(ids, vec![2, 3]);
    }

    // The older response arrives afterwards and must be ignored
    resolver.release(&[1]);
    tokio::time::sleep(Duration::from_millis(50)).await;

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.subset.as_deref(), Some([2, 3].as_slice()));

    while let Ok(event) = rx.try_recv() {
        assert_ne!(
            event.event_type(),
            "SubsetResolved",
            "superseded response must not reach the grid"
        );
    }
}

#[tokio::test]
async fn test_select_control_value_drives_selection() {
    let resolver = ScriptedResolver::new(vec![Ok(vec![2]), Ok(vec![1, 2, 3])]);
    let handle = GridSession::spawn(
        GridConfig::default(),
        vec![1, 2, 3],
        FilterPanel::with_groups(vec![FilterGroup::select("")]),
        resolver.clone(),
    );
    let mut rx = handle.subscribe();

    handle.resize(1024).await.unwrap();
    handle.set_select(0, "12").await.unwrap();
    wait_for(&mut rx, "first subset", |e| {
        matches!(e, GridEvent::SubsetResolved { .. })
    })
    .await;

    // A placeholder value contributes no term and resolves unfiltered
    handle.set_select(0, "all").await.unwrap();
    wait_for(&mut rx, "second subset", |e| {
        matches!(e, GridEvent::SubsetResolved { .. })
    })
    .await;

    let queries = resolver.recorded();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0].terms, vec![12]);
    assert!(queries[1].terms.is_empty());

    let snap = handle.snapshot().await.unwrap();
    assert!(!snap.filtered);
}

#[tokio::test]
async fn test_configured_or_condition_reaches_query() {
    let resolver = ScriptedResolver::new(vec![Ok(vec![1])]);
    let config = GridConfig {
        filter_cond: FilterCond::Or,
        ..GridConfig::default()
    };
    let handle = GridSession::spawn(config, vec![1, 2], tag_panel(&[(3, "C")]), resolver.clone());
    let mut rx = handle.subscribe();

    handle.resize(1024).await.unwrap();
    handle.toggle_tag(0, 0).await.unwrap();
    wait_for(&mut rx, "subset", |e| {
        matches!(e, GridEvent::SubsetResolved { .. })
    })
    .await;

    let queries = resolver.recorded();
    assert_eq!(queries[0].cond, FilterCond::Or);
}

#[tokio::test]
async fn test_refresh_replays_current_selection() {
    let resolver = ScriptedResolver::new(vec![Ok(vec![2]), Ok(vec![2])]);
    let handle = GridSession::spawn(
        GridConfig::default(),
        vec![1, 2, 3],
        tag_panel(&[(4, "News")]),
        resolver.clone(),
    );
    let mut rx = handle.subscribe();

    handle.resize(1024).await.unwrap();
    handle.toggle_tag(0, 0).await.unwrap();
    wait_for(&mut rx, "first subset", |e| {
        matches!(e, GridEvent::SubsetResolved { .. })
    })
    .await;

    handle.refresh().await.unwrap();
    wait_for(&mut rx, "refreshed subset", |e| {
        matches!(e, GridEvent::SubsetResolved { .. })
    })
    .await;

    let queries = resolver.recorded();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0], queries[1]);

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.subset.as_deref(), Some([2].as_slice()));
}

#[tokio::test]
async fn test_resize_after_filter_reflows_subset() {
    let resolver = ScriptedResolver::new(vec![Ok(vec![5, 4, 3, 2, 1])]);
    let handle = GridSession::spawn(
        GridConfig::default(),
        vec![1, 2, 3, 4, 5],
        tag_panel(&[(8, "All")]),
        resolver.clone(),
    );
    let mut rx = handle.subscribe();

    handle.resize(1024).await.unwrap();
    handle.toggle_tag(0, 0).await.unwrap();
    wait_for(&mut rx, "subset", |e| {
        matches!(e, GridEvent::SubsetResolved { .. })
    })
    .await;

    // Narrowing the viewport reflows the same subset over fewer columns
    handle.resize(800).await.unwrap();
    let layout = wait_for(&mut rx, "reflow", |e| {
        matches!(e, GridEvent::LayoutUpdated { width: 800, .. })
    })
    .await;

    if let GridEvent::LayoutUpdated { columns, rows, .. } = layout {
        assert_eq!(columns, 3);
        assert_eq!(rows, 2);
    }

    // Reflowing is geometry only; the catalog is not asked again
    assert_eq!(resolver.recorded().len(), 1);

    let snap = handle.snapshot().await.unwrap();
    let by_id = |id: ItemId| snap.items.iter().find(|p| p.id == id).unwrap();
    assert_eq!((by_id(5).x, by_id(5).y), (Some(0), Some(0)));
    assert_eq!((by_id(2).x, by_id(2).y), (Some(0), Some(1)));
}
