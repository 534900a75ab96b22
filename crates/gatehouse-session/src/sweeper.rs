//! Background task that periodically empties the session cache.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::SessionCache;
use crate::config::{CacheConfig, RECOMMENDED_MIN_CACHE_DURATION};
use crate::error::{Error, Result};

/// Periodic full-flush eviction for a [`SessionCache`].
pub struct CacheSweeper {
    cache: SessionCache,
    period: Duration,
}

impl CacheSweeper {
    /// Create a sweeper for `cache` from the cache configuration.
    ///
    /// A zero period is rejected even when caching is disabled.
    pub fn new(cache: SessionCache, config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        if config.cache_duration.is_zero() {
            return Err(Error::InvalidDuration(config.cache_duration));
        }
        if config.below_recommended_minimum() {
            warn!(
                period_secs = config.cache_duration.as_secs_f64(),
                recommended_secs = RECOMMENDED_MIN_CACHE_DURATION.as_secs(),
                "Cache duration is below the recommended minimum"
            );
        }
        Ok(Self {
            cache,
            period: config.cache_duration,
        })
    }

    /// Spawn the sweeper onto the current tokio runtime.
    ///
    /// The first clear happens one full period after spawning.
    pub fn spawn(self) -> SweeperHandle {
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(self.run(shutdown.clone()));
        SweeperHandle {
            shutdown,
            task: Some(task),
        }
    }

    /// Run the sweep loop until the cancellation token is triggered.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            period_secs = self.period.as_secs_f64(),
            "Session cache sweeper starting"
        );

        let mut ticker = tokio::time::interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = self.cache.clear();
                    debug!(removed, "Session cache swept");
                }
                _ = shutdown.cancelled() => {
                    info!("Session cache sweeper shutting down");
                    return;
                }
            }
        }
    }
}

/// Owner of a running sweeper task.
///
/// Dropping the handle cancels the task.
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    /// Stop the sweeper and wait for it to exit.
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            warn!(error = %e, "Session cache sweeper task failed");
        }
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheEntry;

    fn config(secs: u64) -> CacheConfig {
        CacheConfig::new().with_cache_duration(Duration::from_secs(secs))
    }

    #[tokio::test(start_paused = true)]
    async fn test_clears_after_one_period() {
        let cache = SessionCache::new();
        let handle = CacheSweeper::new(cache.clone(), &config(30))
            .unwrap()
            .spawn();

        cache.put("tok-1", CacheEntry::new("a@example.com", 0, 1));

        // Not yet
        tokio::time::sleep(Duration::from_secs(29)).await;
        assert!(cache.contains("tok-1"));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!cache.contains("tok-1"));
        assert_eq!(cache.stats().clears, 1);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_clears_repeatedly() {
        let cache = SessionCache::new();
        let handle = CacheSweeper::new(cache.clone(), &config(15))
            .unwrap()
            .spawn();

        for round in 0..3 {
            cache.put(format!("tok-{round}"), CacheEntry::new("a@example.com", 0, 1));
            tokio::time::sleep(Duration::from_secs(16)).await;
            assert!(cache.is_empty());
        }
        assert_eq!(cache.stats().clears, 3);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_sweeping() {
        let cache = SessionCache::new();
        let handle = CacheSweeper::new(cache.clone(), &config(15))
            .unwrap()
            .spawn();

        handle.shutdown().await;

        cache.put("tok-1", CacheEntry::new("a@example.com", 0, 1));
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(cache.contains("tok-1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let cache = SessionCache::new();
        let handle = CacheSweeper::new(cache.clone(), &config(15))
            .unwrap()
            .spawn();
        drop(handle);

        tokio::time::sleep(Duration::from_millis(1)).await;
        cache.put("tok-1", CacheEntry::new("a@example.com", 0, 1));
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(cache.contains("tok-1"));
    }

    #[tokio::test]
    async fn test_zero_period_rejected() {
        let result = CacheSweeper::new(SessionCache::new(), &config(0));
        assert!(matches!(result, Err(Error::InvalidDuration(_))));
    }

    #[tokio::test]
    async fn test_zero_period_rejected_when_disabled() {
        let disabled = CacheConfig::disabled().with_cache_duration(Duration::ZERO);
        assert!(disabled.validate().is_ok());

        let result = CacheSweeper::new(SessionCache::new(), &disabled);
        assert!(matches!(result, Err(Error::InvalidDuration(_))));
    }
}
