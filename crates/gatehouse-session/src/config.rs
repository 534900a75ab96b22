//! Configuration for the session cache.

use std::time::Duration;

use crate::error::{Error, Result};

/// Default interval between full cache clears.
pub const DEFAULT_CACHE_DURATION: Duration = Duration::from_secs(60);

/// Shortest clear interval that still meaningfully dampens upstream rate limits.
/// Shorter intervals are accepted but logged.
pub const RECOMMENDED_MIN_CACHE_DURATION: Duration = Duration::from_secs(15);

/// Configuration for the session cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Whether session metadata is cached at all.
    /// When false, no cache is created and no sweeper is started.
    pub enabled: bool,

    /// Interval at which the sweeper empties the whole cache.
    pub cache_duration: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_duration: DEFAULT_CACHE_DURATION,
        }
    }
}

impl CacheConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// A configuration with caching turned off.
    pub fn disabled() -> Self {
        Self::default().with_enabled(false)
    }

    /// Enable or disable caching.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the full-clear interval.
    pub fn with_cache_duration(mut self, duration: Duration) -> Self {
        self.cache_duration = duration;
        self
    }

    /// Check the configuration is usable.
    ///
    /// A zero interval would spin the sweeper; anything else is accepted.
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.cache_duration.is_zero() {
            return Err(Error::InvalidDuration(self.cache_duration));
        }
        Ok(())
    }

    /// Whether the clear interval is shorter than the recommended minimum.
    pub fn below_recommended_minimum(&self) -> bool {
        self.cache_duration < RECOMMENDED_MIN_CACHE_DURATION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CacheConfig::default();
        assert!(config.enabled);
        assert_eq!(config.cache_duration, DEFAULT_CACHE_DURATION);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_duration_rejected() {
        let config = CacheConfig::new().with_cache_duration(Duration::ZERO);
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidDuration(d)) if d.is_zero()
        ));
    }

    #[test]
    fn test_zero_duration_ignored_when_disabled() {
        let config = CacheConfig::disabled().with_cache_duration(Duration::ZERO);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_recommended_minimum() {
        let short = CacheConfig::new().with_cache_duration(Duration::from_secs(5));
        assert!(short.below_recommended_minimum());
        assert!(short.validate().is_ok());

        let ok = CacheConfig::new().with_cache_duration(Duration::from_secs(15));
        assert!(!ok.below_recommended_minimum());
    }
}
