//! In-memory cluster for testing and development.
//!
//! Holds both sides of the comparison in one place: the authoritative node
//! and pod lists, the scheduler cache, and the pending queue. Each side is
//! edited independently so tests can build any kind of drift.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::error::ReadError;
use crate::listers::{CacheSnapshotProvider, NodeLister, PodLister, SchedulingQueue};
use crate::types::{CacheSnapshot, Node, NodeInfo, Pod};

#[derive(Debug, Default)]
struct ClusterState {
    nodes: BTreeMap<String, Node>,
    pods: BTreeMap<String, Pod>,
    cache: CacheSnapshot,
    pending: Vec<Pod>,
    node_list_failure: Option<ReadError>,
    pod_list_failure: Option<ReadError>,
}

/// Shared in-memory cluster. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCluster {
    state: Arc<RwLock<ClusterState>>,
}

impl InMemoryCluster {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, ClusterState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ClusterState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // Authoritative side.

    pub fn add_node(&self, name: impl Into<String>) {
        let node = Node::new(name);
        self.write().nodes.insert(node.name.clone(), node);
    }

    pub fn remove_node(&self, name: &str) {
        self.write().nodes.remove(name);
    }

    pub fn add_pod(&self, pod: Pod) {
        self.write().pods.insert(pod.uid.clone(), pod);
    }

    pub fn remove_pod(&self, uid: &str) {
        self.write().pods.remove(uid);
    }

    /// Make the next node listings fail with `err`.
    pub fn fail_node_list(&self, err: ReadError) {
        self.write().node_list_failure = Some(err);
    }

    /// Make the next pod listings fail with `err`.
    pub fn fail_pod_list(&self, err: ReadError) {
        self.write().pod_list_failure = Some(err);
    }

    pub fn clear_failures(&self) {
        let mut state = self.write();
        state.node_list_failure = None;
        state.pod_list_failure = None;
    }

    // Cache side.

    /// Record a node in the scheduler cache.
    pub fn cache_node(&self, name: impl Into<String>) {
        let node = Node::new(name);
        self.write()
            .cache
            .nodes
            .entry(node.name.clone())
            .or_default()
            .set_node(node);
    }

    /// Drop a node and all its pods from the scheduler cache.
    pub fn evict_node(&self, name: &str) {
        self.write().cache.nodes.remove(name);
    }

    /// Record a pod in the scheduler cache under `node_name`.
    ///
    /// The node record is created without a node object if the cache has not
    /// seen the node yet.
    pub fn cache_pod(&self, node_name: &str, pod: Pod) {
        self.write()
            .cache
            .nodes
            .entry(node_name.to_string())
            .or_insert_with(NodeInfo::default)
            .add_pod(pod);
    }

    /// Drop a pod from whichever cached node holds it.
    pub fn evict_pod(&self, uid: &str) {
        for info in self.write().cache.nodes.values_mut() {
            info.remove_pod(uid);
        }
    }

    pub fn enqueue(&self, pod: Pod) {
        self.write().pending.push(pod);
    }

    pub fn dequeue(&self, uid: &str) {
        self.write().pending.retain(|p| p.uid != uid);
    }

    /// Add a bound pod to both the authoritative list and the cache.
    pub fn bind(&self, node_name: &str, pod: Pod) {
        let pod = pod.on_node(node_name);
        let mut state = self.write();
        state.pods.insert(pod.uid.clone(), pod.clone());
        state
            .cache
            .nodes
            .entry(node_name.to_string())
            .or_insert_with(NodeInfo::default)
            .add_pod(pod);
    }
}

#[async_trait]
impl NodeLister for InMemoryCluster {
    async fn list(&self) -> Result<Vec<Node>, ReadError> {
        let state = self.read();
        if let Some(err) = &state.node_list_failure {
            return Err(err.clone());
        }
        debug!(count = state.nodes.len(), "Listing nodes");
        Ok(state.nodes.values().cloned().collect())
    }
}

#[async_trait]
impl PodLister for InMemoryCluster {
    async fn list(&self) -> Result<Vec<Pod>, ReadError> {
        let state = self.read();
        if let Some(err) = &state.pod_list_failure {
            return Err(err.clone());
        }
        debug!(count = state.pods.len(), "Listing pods");
        Ok(state.pods.values().cloned().collect())
    }
}

impl CacheSnapshotProvider for InMemoryCluster {
    fn snapshot(&self) -> CacheSnapshot {
        self.read().cache.clone()
    }
}

impl SchedulingQueue for InMemoryCluster {
    fn pending_pods(&self) -> Vec<Pod> {
        self.read().pending.clone()
    }
}
