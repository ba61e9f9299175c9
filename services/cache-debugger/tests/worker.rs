//! Integration tests for the periodic compare worker.
//!
//! Time is paused, so interval ticks are driven by the test's own sleeps.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use schedcache_debugger::sink::{
    EVENT_CACHE_MISMATCH, EVENT_COMPARER_FINISHED, EVENT_COMPARER_STARTED,
};
use schedcache_debugger::{
    CacheComparer, CompareWorker, InMemoryCluster, Node, NodeLister, ReadError, RecordingSink,
};
use tokio::sync::watch;

/// Node lister that takes `delay` to answer.
struct SlowNodeLister {
    cluster: InMemoryCluster,
    delay: Duration,
}

#[async_trait]
impl NodeLister for SlowNodeLister {
    async fn list(&self) -> Result<Vec<Node>, ReadError> {
        tokio::time::sleep(self.delay).await;
        NodeLister::list(&self.cluster).await
    }
}

fn slow_worker(
    cluster: &InMemoryCluster,
    delay: Duration,
    interval: Duration,
) -> (CompareWorker, Arc<RecordingSink>) {
    let nodes = Arc::new(SlowNodeLister {
        cluster: cluster.clone(),
        delay,
    });
    let cluster = Arc::new(cluster.clone());
    let sink = Arc::new(RecordingSink::new());
    let comparer = CacheComparer::new(nodes, cluster.clone(), cluster.clone(), cluster)
        .with_sink(sink.clone());
    (CompareWorker::new(comparer, interval), sink)
}

fn worker(cluster: &InMemoryCluster, interval: Duration) -> (CompareWorker, Arc<RecordingSink>) {
    let cluster = Arc::new(cluster.clone());
    let sink = Arc::new(RecordingSink::new());
    let comparer = CacheComparer::new(cluster.clone(), cluster.clone(), cluster.clone(), cluster)
        .with_sink(sink.clone());
    (CompareWorker::new(comparer, interval), sink)
}

#[tokio::test(start_paused = true)]
async fn test_worker_runs_on_interval_and_stops() {
    let cluster = InMemoryCluster::new();
    cluster.add_node("A");
    let (worker, sink) = worker(&cluster, Duration::from_secs(10));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let handle = tokio::spawn(async move { worker.run(shutdown_rx).await });

    // The first tick is skipped.
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(sink.count(EVENT_COMPARER_STARTED), 0);

    tokio::time::sleep(Duration::from_secs(20)).await;
    assert_eq!(sink.count(EVENT_COMPARER_STARTED), 2);
    assert_eq!(sink.count(EVENT_CACHE_MISMATCH), 2);

    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_worker_survives_failed_pass() {
    let cluster = InMemoryCluster::new();
    cluster.fail_node_list(ReadError::Timeout(Duration::from_secs(1)));
    let (worker, sink) = worker(&cluster, Duration::from_secs(10));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let handle = tokio::spawn(async move { worker.run(shutdown_rx).await });

    tokio::time::sleep(Duration::from_secs(15)).await;
    assert_eq!(sink.count(EVENT_COMPARER_STARTED), 1);
    assert!(sink.warnings().is_empty());

    cluster.clear_failures();
    cluster.add_node("A");
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(sink.count(EVENT_COMPARER_STARTED), 2);
    assert_eq!(sink.warnings().len(), 1);

    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_worker_stops_when_sender_dropped() {
    let cluster = InMemoryCluster::new();
    let (worker, _sink) = worker(&cluster, Duration::from_secs(10));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let handle = tokio::spawn(async move { worker.run(shutdown_rx).await });
    drop(shutdown_tx);

    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_false_update_keeps_pass_in_flight() {
    let cluster = InMemoryCluster::new();
    let (worker, sink) = slow_worker(&cluster, Duration::from_secs(3), Duration::from_secs(10));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let handle = tokio::spawn(async move { worker.run(shutdown_rx).await });

    // The pass starts at t=10 and is still listing nodes at t=11.
    tokio::time::sleep(Duration::from_secs(11)).await;
    assert_eq!(sink.count(EVENT_COMPARER_STARTED), 1);
    assert_eq!(sink.count(EVENT_COMPARER_FINISHED), 0);
    shutdown_tx.send(false).unwrap();

    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(sink.count(EVENT_COMPARER_FINISHED), 1);
    assert!(!handle.is_finished());

    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_cancels_pass_in_flight() {
    let cluster = InMemoryCluster::new();
    let (worker, sink) = slow_worker(&cluster, Duration::from_secs(3), Duration::from_secs(10));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let handle = tokio::spawn(async move { worker.run(shutdown_rx).await });

    tokio::time::sleep(Duration::from_secs(11)).await;
    shutdown_tx.send(true).unwrap();

    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sink.count(EVENT_COMPARER_STARTED), 1);
    assert_eq!(sink.count(EVENT_COMPARER_FINISHED), 0);
}
