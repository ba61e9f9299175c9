//! Configuration for the cache debugger.

use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Default interval between comparison passes.
pub const DEFAULT_COMPARE_INTERVAL: Duration = Duration::from_secs(30);

/// Cache debugger configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Seconds between comparison passes.
    pub compare_interval_secs: u64,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Whether SIGUSR2 triggers a compare and dump.
    pub dump_on_signal: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            compare_interval_secs: DEFAULT_COMPARE_INTERVAL.as_secs(),
            log_level: "info".to_string(),
            dump_on_signal: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let compare_interval_secs = match lookup("SCHEDCACHE_COMPARE_INTERVAL_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("invalid SCHEDCACHE_COMPARE_INTERVAL_SECS: {raw:?}"))?,
            None => defaults.compare_interval_secs,
        };
        if compare_interval_secs == 0 {
            bail!("SCHEDCACHE_COMPARE_INTERVAL_SECS must be greater than zero");
        }

        let log_level = lookup("SCHEDCACHE_LOG_LEVEL").unwrap_or(defaults.log_level);

        let dump_on_signal = lookup("SCHEDCACHE_DUMP_ON_SIGNAL")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(defaults.dump_on_signal);

        Ok(Self {
            compare_interval_secs,
            log_level,
            dump_on_signal,
        })
    }

    pub fn compare_interval(&self) -> Duration {
        Duration::from_secs(self.compare_interval_secs)
    }
}
