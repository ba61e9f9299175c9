//! Cache debugger: comparer plus dumper over the same collaborators.
//!
//! On unix, [`CacheDebugger::listen_for_signal`] runs a compare and a dump
//! every time the process receives `SIGUSR2`. [`CacheDebugger::listen_if_enabled`]
//! does the same only when `dump_on_signal` is configured.

use std::sync::Arc;

#[cfg(unix)]
use tokio::sync::watch;
use tracing::error;
#[cfg(unix)]
use tracing::info;

use crate::comparer::{CacheComparer, ComparisonReport};
#[cfg(unix)]
use crate::config::Config;
use crate::dumper::CacheDumper;
use crate::error::CompareResult;
use crate::listers::{CacheSnapshotProvider, NodeLister, PodLister, SchedulingQueue};
use crate::sink::DiagnosticSink;

#[derive(Clone)]
pub struct CacheDebugger {
    comparer: CacheComparer,
    dumper: CacheDumper,
}

impl CacheDebugger {
    pub fn new(
        node_lister: Arc<dyn NodeLister>,
        pod_lister: Arc<dyn PodLister>,
        cache: Arc<dyn CacheSnapshotProvider>,
        queue: Arc<dyn SchedulingQueue>,
    ) -> Self {
        Self {
            comparer: CacheComparer::new(node_lister, pod_lister, cache.clone(), queue.clone()),
            dumper: CacheDumper::new(cache, queue),
        }
    }

    /// Replace the comparer's diagnostic sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.comparer = self.comparer.with_sink(sink);
        self
    }

    pub fn comparer(&self) -> &CacheComparer {
        &self.comparer
    }

    pub fn dumper(&self) -> &CacheDumper {
        &self.dumper
    }

    /// Compare, then dump. The dump runs even if the comparison fails.
    pub async fn debug_once(&self) -> CompareResult<ComparisonReport> {
        let result = self.comparer.compare().await;
        if let Err(e) = &result {
            error!(error = %e, "Cache comparison failed");
        }
        self.dumper.dump_all();
        result
    }

    /// Run [`Self::debug_once`] on every `SIGUSR2` until shutdown is signaled.
    #[cfg(unix)]
    pub async fn listen_for_signal(
        &self,
        mut shutdown: watch::Receiver<bool>,
    ) -> std::io::Result<()> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut signals = signal(SignalKind::user_defined2())?;
        info!("Cache debugger listening for SIGUSR2");

        loop {
            tokio::select! {
                received = signals.recv() => {
                    if received.is_none() {
                        break;
                    }
                    info!("Received SIGUSR2, debugging scheduler cache");
                    self.debug_once().await.ok();
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Cache debugger shutting down");
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    /// Run [`Self::listen_for_signal`] if `config.dump_on_signal` is set,
    /// otherwise return immediately.
    #[cfg(unix)]
    pub async fn listen_if_enabled(
        &self,
        config: &Config,
        shutdown: watch::Receiver<bool>,
    ) -> std::io::Result<()> {
        if !config.dump_on_signal {
            info!("SIGUSR2 cache dump disabled");
            return Ok(());
        }
        self.listen_for_signal(shutdown).await
    }
}
