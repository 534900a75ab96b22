//! Main client implementation.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use gatehouse_session::{CacheConfig, CacheSweeper, SessionCache, SweeperHandle};
use parking_lot::Mutex;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

use crate::api::{SessionApi, SigninApi};
use crate::codes::ErrorCode;
use crate::config::ClientConfig;
use crate::error::{ApiResult, Error, ErrorResponse, Result};
use crate::types::SessionToken;

/// Gatehouse API client.
///
/// A client starts uninitialized. [`init`](Self::init) configures it exactly
/// once; every operation called before that fails with
/// [`Error::NotInitialized`] without touching the network.
///
/// # Example
///
/// ```no_run
/// use gatehouse_client::{ClientConfig, GatehouseClient};
///
/// # async fn example() -> gatehouse_client::Result<()> {
/// let client = GatehouseClient::new();
/// client.init(ClientConfig::new("auth.example.com", "my-project"))?;
///
/// match client.session().info("token").await? {
///     Ok(info) => println!("signed in as {}", info.email),
///     Err(code) => println!("rejected: {code}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct GatehouseClient {
    /// Inner shared state.
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
#[derive(Default)]
struct ClientInner {
    /// Set once by `init`.
    state: OnceLock<ClientState>,
    /// Running cache sweeper, if caching is enabled.
    sweeper: Mutex<Option<SweeperHandle>>,
}

/// Configuration fixed at initialization.
pub(crate) struct ClientState {
    /// HTTP client.
    pub(crate) http: reqwest::Client,
    /// Base URL for API requests.
    pub(crate) base_url: Url,
    /// Project identifier sent with every request.
    pub(crate) project_id: String,
    /// Request timeout.
    pub(crate) timeout: Duration,
    /// Session cache, when enabled.
    pub(crate) cache: Option<SessionCache>,
}

impl ClientState {
    /// Remember a newly issued token. Only called after a successful response.
    pub(crate) fn cache_token(&self, token: &SessionToken) {
        if let Some(cache) = &self.cache {
            cache.put(token.session_token.clone(), token.cache_entry());
        }
    }
}

impl GatehouseClient {
    /// Create an uninitialized client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Configure the client. May only be called once.
    ///
    /// With caching enabled this spawns the cache sweeper, so it must be
    /// called from within a tokio runtime.
    pub fn init(&self, config: ClientConfig) -> Result<()> {
        if self.inner.state.get().is_some() {
            return Err(Error::AlreadyInitialized);
        }

        let base_url = config.validate()?;
        if config.cache.enabled && tokio::runtime::Handle::try_current().is_err() {
            return Err(Error::Config(
                "session caching requires a running tokio runtime".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let user_agent = config
            .user_agent
            .unwrap_or_else(|| format!("gatehouse-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()?;

        let cache = config.cache.enabled.then(SessionCache::new);
        let state = ClientState {
            http,
            base_url,
            project_id: config.project_id,
            timeout: config.timeout,
            cache: cache.clone(),
        };

        // Lost a race against a concurrent init
        if self.inner.state.set(state).is_err() {
            return Err(Error::AlreadyInitialized);
        }

        if let Some(cache) = cache {
            let handle = CacheSweeper::new(cache, &config.cache)?.spawn();
            *self.inner.sweeper.lock() = Some(handle);
        }

        info!(
            endpoint = %config.endpoint,
            cache_enabled = config.cache.enabled,
            cache_duration_secs = config.cache.cache_duration.as_secs(),
            "Gatehouse client initialized"
        );

        Ok(())
    }

    /// Check whether [`init`](Self::init) has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.inner.state.get().is_some()
    }

    /// Get the base URL, once initialized.
    pub fn base_url(&self) -> Option<&Url> {
        self.inner.state.get().map(|s| &s.base_url)
    }

    /// The session cache, when initialized with caching enabled.
    pub fn cache(&self) -> Option<&SessionCache> {
        self.inner.state.get().and_then(|s| s.cache.as_ref())
    }

    /// Stop the cache sweeper. The cache itself stays usable.
    pub async fn shutdown(&self) {
        let handle = self.inner.sweeper.lock().take();
        if let Some(handle) = handle {
            handle.shutdown().await;
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the sign-in API.
    pub fn signin(&self) -> SigninApi {
        SigninApi::new(self.clone())
    }

    /// Access the session API.
    pub fn session(&self) -> SessionApi {
        SessionApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Get the initialized state.
    pub(crate) fn state(&self) -> Result<&ClientState> {
        self.inner.state.get().ok_or(Error::NotInitialized)
    }

    /// Make a POST request and classify the outcome.
    ///
    /// 200 yields the parsed payload, 400 yields the parsed error code, and
    /// everything else collapses to `connection_error`.
    pub(crate) async fn post<T, E, B>(&self, state: &ClientState, path: &str, body: &B) -> ApiResult<T, E>
    where
        T: DeserializeOwned,
        E: ErrorCode,
        B: Serialize + ?Sized,
    {
        let url = match state.base_url.join(path) {
            Ok(url) => url,
            Err(e) => {
                warn!(path, error = %e, "Failed to build request URL");
                return Err(E::CONNECTION_ERROR);
            }
        };

        let response = match state
            .http
            .post(url)
            .json(body)
            .timeout(state.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(path, error = %e, timeout = e.is_timeout(), "Request failed");
                return Err(E::CONNECTION_ERROR);
            }
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path, status = status.as_u16(), error = %e, "Failed to read response body");
                return Err(E::CONNECTION_ERROR);
            }
        };

        match status {
            StatusCode::OK => match decode_success(&bytes) {
                Ok(payload) => {
                    debug!(path, "Request succeeded");
                    Ok(payload)
                }
                Err(e) => {
                    warn!(path, error = %e, "Malformed success response");
                    Err(E::CONNECTION_ERROR)
                }
            },
            StatusCode::BAD_REQUEST => match serde_json::from_slice::<ErrorResponse<E>>(&bytes) {
                Ok(body) => {
                    debug!(path, code = body.error.as_str(), "Request rejected");
                    Err(body.error)
                }
                Err(e) => {
                    warn!(path, error = %e, "Malformed or unknown error response");
                    Err(E::CONNECTION_ERROR)
                }
            },
            status => {
                warn!(path, status = status.as_u16(), "Unexpected response status");
                Err(E::CONNECTION_ERROR)
            }
        }
    }
}

/// Parse a 200 body. An empty body is read as `{}`.
fn decode_success<T: DeserializeOwned>(bytes: &[u8]) -> serde_json::Result<T> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_slice(b"{}")
    } else {
        serde_json::from_slice(bytes)
    }
}

/// Builder that creates and initializes a [`GatehouseClient`] in one step.
#[derive(Debug, Default)]
pub struct ClientBuilder {
    endpoint: Option<String>,
    project_id: Option<String>,
    cache: CacheConfig,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the service endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the project identifier.
    pub fn project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Set the cache policy.
    pub fn cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Assemble the configuration without initializing a client.
    pub fn config(self) -> Result<ClientConfig> {
        let endpoint = self
            .endpoint
            .ok_or_else(|| Error::Config("endpoint is required".to_string()))?;
        let project_id = self
            .project_id
            .ok_or_else(|| Error::Config("project_id is required".to_string()))?;

        let mut config = ClientConfig::new(endpoint, project_id).with_cache(self.cache);
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        if let Some(agent) = self.user_agent {
            config = config.with_user_agent(agent);
        }
        Ok(config)
    }

    /// Build and initialize the client.
    pub fn build(self) -> Result<GatehouseClient> {
        let config = self.config()?;
        let client = GatehouseClient::new();
        client.init(config)?;
        Ok(client)
    }
}
