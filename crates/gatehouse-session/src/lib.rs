//! Session token cache with periodic full-flush eviction.
//!
//! This crate provides the caching layer that sits in front of the remote
//! authentication service:
//! - A concurrent token → metadata map with insert-if-absent writes
//! - No per-entry expiry; entries are removed explicitly or all at once
//! - A cancellable background sweeper that empties the cache on a fixed interval
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use gatehouse_session::{CacheConfig, CacheEntry, CacheSweeper, SessionCache};
//!
//! let config = CacheConfig::new().with_cache_duration(Duration::from_secs(60));
//! let cache = SessionCache::new();
//! let sweeper = CacheSweeper::new(cache.clone(), &config)?.spawn();
//!
//! cache.put("token", CacheEntry::new("user@example.com", 1_900_000_000, 5));
//! assert!(cache.try_get("token").is_some());
//!
//! sweeper.shutdown().await;
//! ```

mod cache;
mod config;
mod error;
mod sweeper;

pub use cache::{CacheEntry, CacheStats, SessionCache};
pub use config::{CacheConfig, DEFAULT_CACHE_DURATION, RECOMMENDED_MIN_CACHE_DURATION};
pub use error::{Error, Result};
pub use sweeper::{CacheSweeper, SweeperHandle};
