//! Cluster objects as seen by the comparer.
//!
//! Only the fields the comparer and dumper need are modeled. Nodes are keyed
//! by name; pods by UID, since pod names are only unique within a namespace.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A cluster node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Unique node name.
    pub name: String,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A pod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pod {
    /// Unique pod ID.
    pub uid: String,

    pub namespace: String,

    /// Human-readable name, unique only within `namespace`.
    pub name: String,

    /// Node the pod is bound to, if any.
    pub node_name: Option<String>,
}

impl Pod {
    /// Create an unbound pod.
    pub fn new(
        uid: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            uid: uid.into(),
            namespace: namespace.into(),
            name: name.into(),
            node_name: None,
        }
    }

    /// Bind the pod to a node.
    #[must_use]
    pub fn on_node(mut self, node_name: impl Into<String>) -> Self {
        self.node_name = Some(node_name.into());
        self
    }

    /// `namespace/name`, for display only.
    pub fn key(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

/// The cache's record for a single node.
///
/// A record may exist before the node object itself has been observed,
/// when pods bound to the node arrive first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    node: Option<Node>,
    pods: Vec<Pod>,
}

impl NodeInfo {
    /// Create a record for an observed node.
    pub fn new(node: Node) -> Self {
        Self {
            node: Some(node),
            pods: Vec::new(),
        }
    }

    /// The node object, if the cache has seen it.
    pub fn node(&self) -> Option<&Node> {
        self.node.as_ref()
    }

    /// Pods the cache believes are bound to this node.
    pub fn pods(&self) -> &[Pod] {
        &self.pods
    }

    pub fn set_node(&mut self, node: Node) {
        self.node = Some(node);
    }

    pub fn add_pod(&mut self, pod: Pod) {
        self.pods.push(pod);
    }

    /// Remove a pod by UID. Returns true if it was present.
    pub fn remove_pod(&mut self, uid: &str) -> bool {
        let before = self.pods.len();
        self.pods.retain(|p| p.uid != uid);
        self.pods.len() != before
    }
}

/// Point-in-time copy of the scheduler cache, keyed by node name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    pub nodes: BTreeMap<String, NodeInfo>,
}

impl CacheSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of all nodes present in the snapshot.
    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Every pod bound to any node in the snapshot.
    pub fn pods(&self) -> impl Iterator<Item = &Pod> {
        self.nodes.values().flat_map(|info| info.pods().iter())
    }
}
