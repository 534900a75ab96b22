//! Configuration types.
//!
//! ```toml
//! endpoint = "auth.example.com"
//! project_id = "my-project"
//! timeout_secs = 30
//!
//! [cache]
//! enabled = true
//! duration_secs = 60
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default interval between full cache clears, in seconds.
pub const DEFAULT_CACHE_DURATION_SECS: u64 = 60;

/// Environment variable overriding `endpoint`.
pub const ENDPOINT_ENV: &str = "GATEHOUSE_ENDPOINT";
/// Environment variable overriding `project_id`.
pub const PROJECT_ID_ENV: &str = "GATEHOUSE_PROJECT_ID";
/// Environment variable overriding `cache.enabled`.
pub const CACHE_ENABLED_ENV: &str = "GATEHOUSE_CACHE_ENABLED";
/// Environment variable overriding `cache.duration_secs`.
pub const CACHE_DURATION_ENV: &str = "GATEHOUSE_CACHE_DURATION_SECS";

/// Root configuration.
///
/// Every field is optional so that layers can be merged; accessors apply
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatehouseConfig {
    /// Service host, or a base URL with scheme.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Project identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Session cache settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheSection>,
}

/// `[cache]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    /// Whether session metadata is cached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Seconds between full cache clears.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u64>,
}

impl GatehouseConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: GatehouseConfig) {
        if other.endpoint.is_some() {
            self.endpoint = other.endpoint;
        }
        if other.project_id.is_some() {
            self.project_id = other.project_id;
        }
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
        if let Some(other_cache) = other.cache {
            let cache = self.cache.get_or_insert_with(CacheSection::default);
            if other_cache.enabled.is_some() {
                cache.enabled = other_cache.enabled;
            }
            if other_cache.duration_secs.is_some() {
                cache.duration_secs = other_cache.duration_secs;
            }
        }
    }

    /// Apply `GATEHOUSE_*` environment overrides.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENDPOINT_ENV).filter(|v| !v.is_empty()) {
            self.endpoint = Some(endpoint);
        }
        if let Some(project_id) = lookup(PROJECT_ID_ENV).filter(|v| !v.is_empty()) {
            self.project_id = Some(project_id);
        }
        if let Some(value) = lookup(CACHE_ENABLED_ENV) {
            let enabled = parse_bool(&value).ok_or_else(|| ConfigError::InvalidValue {
                key: CACHE_ENABLED_ENV.to_string(),
                value: value.clone(),
                expected: "true or false".to_string(),
            })?;
            self.cache.get_or_insert_with(CacheSection::default).enabled = Some(enabled);
        }
        if let Some(value) = lookup(CACHE_DURATION_ENV) {
            let secs = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: CACHE_DURATION_ENV.to_string(),
                value: value.clone(),
                expected: "a number of seconds".to_string(),
            })?;
            self.cache.get_or_insert_with(CacheSection::default).duration_secs = Some(secs);
        }
        Ok(())
    }

    /// The configured endpoint, or an error naming how to set it.
    pub fn require_endpoint(&self) -> Result<&str> {
        self.endpoint.as_deref().ok_or_else(|| ConfigError::MissingField {
            field: "endpoint".to_string(),
            env_var: ENDPOINT_ENV.to_string(),
        })
    }

    /// The configured project id, or an error naming how to set it.
    pub fn require_project_id(&self) -> Result<&str> {
        self.project_id.as_deref().ok_or_else(|| ConfigError::MissingField {
            field: "project_id".to_string(),
            env_var: PROJECT_ID_ENV.to_string(),
        })
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Whether caching is enabled (default: true).
    pub fn cache_enabled(&self) -> bool {
        self.cache.as_ref().and_then(|c| c.enabled).unwrap_or(true)
    }

    /// Interval between full cache clears.
    pub fn cache_duration(&self) -> Duration {
        Duration::from_secs(
            self.cache
                .as_ref()
                .and_then(|c| c.duration_secs)
                .unwrap_or(DEFAULT_CACHE_DURATION_SECS),
        )
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
