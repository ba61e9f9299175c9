//! Read interfaces the comparer consumes.
//!
//! Authoritative listers may hit the network and can fail. The cache and the
//! scheduling queue are already materialized in memory, so reading them
//! cannot fail.

use async_trait::async_trait;

use crate::error::ReadError;
use crate::types::{CacheSnapshot, Node, Pod};

/// Authoritative node listing.
#[async_trait]
pub trait NodeLister: Send + Sync {
    /// List every node in the cluster.
    async fn list(&self) -> Result<Vec<Node>, ReadError>;
}

/// Authoritative pod listing.
#[async_trait]
pub trait PodLister: Send + Sync {
    /// List every pod in the cluster.
    async fn list(&self) -> Result<Vec<Pod>, ReadError>;
}

/// Source of scheduler cache snapshots.
pub trait CacheSnapshotProvider: Send + Sync {
    fn snapshot(&self) -> CacheSnapshot;
}

/// The scheduler's queue of pods awaiting a placement decision.
pub trait SchedulingQueue: Send + Sync {
    /// Pods queued but not yet bound to a node.
    fn pending_pods(&self) -> Vec<Pod>;
}
