//! Cache comparer.
//!
//! One pass reads, in order:
//! - every node and every pod from the authoritative listers
//! - a snapshot of the scheduler cache
//! - the pods pending in the scheduling queue
//!
//! and reconciles node names and pod UIDs between the two views. The reads
//! share no transaction, so a report can describe a transient state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use schedcache_reconcile::{reconcile, Reconciliation};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{CompareError, CompareResult};
use crate::listers::{CacheSnapshotProvider, NodeLister, PodLister, SchedulingQueue};
use crate::sink::{
    DiagnosticSink, ResourceKind, TracingSink, EVENT_CACHE_MISMATCH, EVENT_COMPARER_FINISHED,
    EVENT_COMPARER_STARTED,
};
use crate::types::{CacheSnapshot, Node, Pod};

/// Outcome of one successful comparison pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonReport {
    pub nodes: Reconciliation<String>,
    pub pods: Reconciliation<String>,
    pub checked_at: DateTime<Utc>,
}

impl ComparisonReport {
    /// Returns true if neither nodes nor pods differ.
    pub fn is_consistent(&self) -> bool {
        self.nodes.is_consistent() && self.pods.is_consistent()
    }
}

/// Compares the scheduler cache against authoritative state.
///
/// Holds no mutable state; concurrent calls to [`CacheComparer::compare`]
/// are as safe as the collaborators they read from.
#[derive(Clone)]
pub struct CacheComparer {
    node_lister: Arc<dyn NodeLister>,
    pod_lister: Arc<dyn PodLister>,
    cache: Arc<dyn CacheSnapshotProvider>,
    queue: Arc<dyn SchedulingQueue>,
    sink: Arc<dyn DiagnosticSink>,
}

impl CacheComparer {
    /// Create a comparer that reports through `tracing`.
    pub fn new(
        node_lister: Arc<dyn NodeLister>,
        pod_lister: Arc<dyn PodLister>,
        cache: Arc<dyn CacheSnapshotProvider>,
        queue: Arc<dyn SchedulingQueue>,
    ) -> Self {
        Self {
            node_lister,
            pod_lister,
            cache,
            queue,
            sink: Arc::new(TracingSink),
        }
    }

    /// Replace the diagnostic sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Run a single comparison pass.
    ///
    /// Fails only if an authoritative listing fails, in which case nothing
    /// is reported for either nodes or pods. Discrepancies are reported to
    /// the sink and returned, never raised.
    #[instrument(skip(self))]
    pub async fn compare(&self) -> CompareResult<ComparisonReport> {
        self.sink.info(EVENT_COMPARER_STARTED);
        let result = self.run_pass().await;
        self.sink.info(EVENT_COMPARER_FINISHED);
        result
    }

    async fn run_pass(&self) -> CompareResult<ComparisonReport> {
        let nodes = self
            .node_lister
            .list()
            .await
            .map_err(CompareError::ListNodes)?;

        let pods = self.pod_lister.list().await.map_err(CompareError::ListPods)?;

        let snapshot = self.cache.snapshot();
        let pending = self.queue.pending_pods();

        debug!(
            nodes = nodes.len(),
            pods = pods.len(),
            cached_nodes = snapshot.nodes.len(),
            pending_pods = pending.len(),
            "Read cluster and cache state"
        );

        let node_report = compare_nodes(&nodes, &snapshot);
        self.report(ResourceKind::Nodes, &node_report);

        let pod_report = compare_pods(&pods, &pending, &snapshot);
        self.report(ResourceKind::Pods, &pod_report);

        Ok(ComparisonReport {
            nodes: node_report,
            pods: pod_report,
            checked_at: Utc::now(),
        })
    }

    fn report(&self, resource: ResourceKind, result: &Reconciliation<String>) {
        if !result.is_consistent() {
            self.sink.warn(
                EVENT_CACHE_MISMATCH,
                resource,
                &result.missed,
                &result.redundant,
            );
        }
    }
}

/// Reconcile authoritative node names against the snapshot's node keys.
pub fn compare_nodes(nodes: &[Node], snapshot: &CacheSnapshot) -> Reconciliation<String> {
    let actual: Vec<String> = nodes.iter().map(|n| n.name.clone()).collect();
    let cached: Vec<String> = snapshot.node_names().map(str::to_string).collect();

    reconcile(&actual, &cached)
}

/// Reconcile authoritative pod UIDs against cached and pending pod UIDs.
///
/// Pending pods count as cached: a pod waiting in the queue is legitimately
/// absent from every node. A pod present both on a node and in the queue is
/// counted twice, and the surplus copy is reported as redundant.
pub fn compare_pods(
    pods: &[Pod],
    pending: &[Pod],
    snapshot: &CacheSnapshot,
) -> Reconciliation<String> {
    let actual: Vec<String> = pods.iter().map(|p| p.uid.clone()).collect();
    let cached: Vec<String> = snapshot
        .pods()
        .chain(pending.iter())
        .map(|p| p.uid.clone())
        .collect();

    reconcile(&actual, &cached)
}
