//! Cache dumper.
//!
//! Writes the scheduler cache and the scheduling queue to the log so an
//! operator can inspect what the scheduler currently believes.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::listers::{CacheSnapshotProvider, SchedulingQueue};
use crate::types::{NodeInfo, Pod};

/// Summary of one cached node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeDump {
    pub name: String,
    /// False when the cache holds pods for a node it has not observed.
    pub node_known: bool,
    pub pod_count: usize,
    pub pods: Vec<PodDump>,
}

/// Summary of one pod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PodDump {
    pub key: String,
    pub uid: String,
    pub node_name: Option<String>,
}

impl From<&Pod> for PodDump {
    fn from(pod: &Pod) -> Self {
        Self {
            key: pod.key(),
            uid: pod.uid.clone(),
            node_name: pod.node_name.clone(),
        }
    }
}

/// Everything written by one [`CacheDumper::dump_all`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheDump {
    pub nodes: Vec<NodeDump>,
    pub pending: Vec<PodDump>,
}

#[derive(Clone)]
pub struct CacheDumper {
    cache: Arc<dyn CacheSnapshotProvider>,
    queue: Arc<dyn SchedulingQueue>,
}

impl CacheDumper {
    pub fn new(cache: Arc<dyn CacheSnapshotProvider>, queue: Arc<dyn SchedulingQueue>) -> Self {
        Self { cache, queue }
    }

    /// Dump the cached nodes followed by the scheduling queue.
    pub fn dump_all(&self) -> CacheDump {
        CacheDump {
            nodes: self.dump_nodes(),
            pending: self.dump_scheduling_queue(),
        }
    }

    /// Log every cached node with its pods, in node name order.
    pub fn dump_nodes(&self) -> Vec<NodeDump> {
        let snapshot = self.cache.snapshot();
        info!(nodes = snapshot.nodes.len(), "Dump of cached node info");

        snapshot
            .nodes
            .iter()
            .map(|(name, node_info)| {
                let dump = node_dump(name, node_info);
                info!(
                    node = %dump.name,
                    node_known = dump.node_known,
                    pod_count = dump.pod_count,
                    pods = ?dump.pods.iter().map(|p| p.key.as_str()).collect::<Vec<_>>(),
                    "Cached node"
                );
                dump
            })
            .collect()
    }

    /// Log the pods waiting in the scheduling queue.
    pub fn dump_scheduling_queue(&self) -> Vec<PodDump> {
        let pending: Vec<PodDump> = self.queue.pending_pods().iter().map(PodDump::from).collect();
        info!(
            pending_pods = pending.len(),
            pods = ?pending.iter().map(|p| p.key.as_str()).collect::<Vec<_>>(),
            "Dump of scheduling queue"
        );
        pending
    }
}

fn node_dump(name: &str, node_info: &NodeInfo) -> NodeDump {
    NodeDump {
        name: name.to_string(),
        node_known: node_info.node().is_some(),
        pod_count: node_info.pods().len(),
        pods: node_info.pods().iter().map(PodDump::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryCluster;

    fn dumper(cluster: &InMemoryCluster) -> CacheDumper {
        let cluster = Arc::new(cluster.clone());
        CacheDumper::new(cluster.clone(), cluster)
    }

    #[test]
    fn test_dump_nodes_lists_pods_per_node() {
        let cluster = InMemoryCluster::new();
        cluster.cache_node("b");
        cluster.bind("a", Pod::new("p1", "default", "web-0"));
        cluster.bind("a", Pod::new("p2", "default", "web-1"));

        let nodes = dumper(&cluster).dump_nodes();

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].name, "a");
        assert!(!nodes[0].node_known);
        assert_eq!(nodes[0].pod_count, 2);
        assert_eq!(nodes[0].pods[1].key, "default/web-1");
        assert_eq!(nodes[1].name, "b");
        assert!(nodes[1].node_known);
        assert_eq!(nodes[1].pod_count, 0);
    }

    #[test]
    fn test_dump_all_includes_queue() {
        let cluster = InMemoryCluster::new();
        cluster.enqueue(Pod::new("p9", "batch", "job-1"));

        let dump = dumper(&cluster).dump_all();

        assert!(dump.nodes.is_empty());
        assert_eq!(
            dump.pending,
            vec![PodDump {
                key: "batch/job-1".to_string(),
                uid: "p9".to_string(),
                node_name: None,
            }]
        );
    }
}
