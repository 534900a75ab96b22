//! Client configuration.

use std::time::Duration;

use gatehouse_session::CacheConfig;
use url::Url;

use crate::error::{Error, Result};

/// Default timeout for requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings passed to [`GatehouseClient::init`](crate::GatehouseClient::init).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service host (`auth.example.com`), or a full base URL with scheme.
    pub endpoint: String,
    /// Project identifier sent with every request.
    pub project_id: String,
    /// Session cache policy.
    pub cache: CacheConfig,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Custom user agent.
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Create a configuration with the default cache policy and timeout.
    pub fn new(endpoint: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            project_id: project_id.into(),
            cache: CacheConfig::default(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Set the cache policy.
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Check the configuration and resolve the service base URL.
    pub(crate) fn validate(&self) -> Result<Url> {
        if self.project_id.trim().is_empty() {
            return Err(Error::Config("project_id is required".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than zero".to_string()));
        }
        self.cache.validate()?;
        base_url(&self.endpoint)
    }
}

/// Turn an endpoint into a base URL ending in `/`.
///
/// A bare host gets `https://`; an endpoint that already carries a scheme is
/// used as given.
pub(crate) fn base_url(endpoint: &str) -> Result<Url> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        return Err(Error::Config("endpoint is required".to_string()));
    }

    let mut url = if endpoint.contains("://") {
        Url::parse(endpoint)?
    } else {
        Url::parse(&format!("https://{endpoint}"))?
    };
    if !url.path().ends_with('/') {
        url.set_path(&format!("{}/", url.path()));
    }
    Ok(url)
}
