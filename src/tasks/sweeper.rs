//! Expiration Sweeper Task
//!
//! Background task that periodically purges expired cache entries.
//! Expiration stays lazy without it; the sweeper only bounds how long
//! expired entries linger when nobody reads them.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheEngine;
use crate::config::Config;
use crate::error::Result;

/// Spawns a background task that periodically purges expired cache entries.
///
/// The task runs until aborted, sleeping for `interval` between sweeps.
/// Each sweep holds the store lock only for the duration of the purge.
///
/// # Example
/// ```ignore
/// let engine = CacheEngine::new();
/// let sweeper = spawn_sweeper_task(engine.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// sweeper.abort();
/// ```
pub fn spawn_sweeper_task(engine: CacheEngine, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(?interval, "Starting expiration sweeper");

        loop {
            tokio::time::sleep(interval).await;

            let removed = engine.purge_expired();
            if removed > 0 {
                info!("Expiration sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiration sweep: no expired entries found");
            }
        }
    })
}

/// Validates `config` and spawns the sweeper if it is enabled.
///
/// Returns Ok(None) when the configured interval is zero.
pub fn spawn_configured_sweeper(
    engine: &CacheEngine,
    config: &Config,
) -> Result<Option<JoinHandle<()>>> {
    config.validate()?;
    Ok(config
        .sweep_period()
        .map(|interval| spawn_sweeper_task(engine.clone(), interval)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{Expiration, ManualClock};
    use crate::error::CacheError;
    use std::sync::Arc;

    fn engine() -> (CacheEngine, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        (CacheEngine::with_clock(&Config::default(), clock.clone()), clock)
    }

    #[tokio::test]
    async fn test_sweeper_removes_expired_entries() {
        let (engine, clock) = engine();
        engine.set("expire_soon", 1, Expiration::Absolute, "value".to_string());
        engine.set("long_lived", 60, Expiration::Absolute, "value".to_string());
        clock.advance_minutes(2);

        let handle = spawn_sweeper_task(engine.clone(), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(200)).await;

        // Gone without anyone reading it
        assert_eq!(engine.len(), 1);
        assert!(engine.contains("long_lived"));
        assert_eq!(engine.stats().expirations, 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweeper_can_be_aborted() {
        let (engine, _) = engine();

        let handle = spawn_sweeper_task(engine, Duration::from_secs(1));
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }

    #[tokio::test]
    async fn test_configured_sweeper_disabled_by_default() {
        let (engine, _) = engine();

        let handle = spawn_configured_sweeper(&engine, &Config::default()).unwrap();
        assert!(handle.is_none());
    }

    #[tokio::test]
    async fn test_configured_sweeper_enabled() {
        let (engine, _) = engine();
        let config = Config {
            sweep_interval: 5,
            ..Config::default()
        };

        let handle = spawn_configured_sweeper(&engine, &config).unwrap().unwrap();
        handle.abort();
    }

    #[tokio::test]
    async fn test_configured_sweeper_rejects_invalid_config() {
        let (engine, _) = engine();
        let config = Config {
            sweep_interval: u64::MAX,
            ..Config::default()
        };

        let result = spawn_configured_sweeper(&engine, &config);
        assert!(matches!(result, Err(CacheError::InvalidConfig(_))));
    }
}
