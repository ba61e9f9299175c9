//! Tracing setup for processes embedding the debugger.

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Install a JSON tracing subscriber.
///
/// Prefers `RUST_LOG`, falling back to the configured log level. Fails if a
/// global subscriber is already installed.
pub fn init_tracing(config: &Config) -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level.clone().into()))
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_install_fails() {
        let config = Config::default();

        // Only the global subscriber installed here matters; the first call
        // fails too if another test got there first.
        init_tracing(&config).ok();

        assert!(init_tracing(&config).is_err());
    }
}
