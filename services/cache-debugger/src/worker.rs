//! Cache comparer background worker.
//!
//! Runs the cache comparison on a periodic interval. There is no retry
//! policy: a failed pass is logged and the next tick tries again.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

use crate::comparer::CacheComparer;
use crate::config::Config;

/// Worker that runs the comparer periodically.
pub struct CompareWorker {
    comparer: CacheComparer,
    interval: Duration,
}

impl CompareWorker {
    /// Create a new compare worker.
    pub fn new(comparer: CacheComparer, interval: Duration) -> Self {
        Self { comparer, interval }
    }

    /// Create a worker using the configured interval.
    pub fn from_config(comparer: CacheComparer, config: &Config) -> Self {
        Self::new(comparer, config.compare_interval())
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run the compare worker until shutdown is signaled.
    ///
    /// A pass still in flight when shutdown arrives is dropped, which
    /// cancels any outstanding listing.
    #[instrument(skip(self, shutdown))]
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_secs = self.interval.as_secs(),
            "Starting cache compare worker"
        );

        let mut interval = tokio::time::interval(self.interval);
        // Don't immediately tick on startup - wait for first interval
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    tokio::select! {
                        result = self.comparer.compare() => {
                            if let Err(e) = result {
                                error!(
                                    error = %e,
                                    transient = e.read_error().is_transient(),
                                    "Cache comparison failed"
                                );
                            }
                        }
                        _ = stop_requested(&mut shutdown) => {
                            warn!("Cache comparison cancelled by shutdown");
                            break;
                        }
                    }
                }
                _ = stop_requested(&mut shutdown) => {
                    info!("Cache compare worker shutting down");
                    break;
                }
            }
        }
    }
}

/// Resolves once shutdown is `true` or the sender is gone. Updates to
/// `false` are ignored.
async fn stop_requested(shutdown: &mut watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        debug!("Shutdown sender dropped");
    }
}
