//! Client error types.
//!
//! These are local faults only: misuse of the client or a configuration that
//! cannot work. Anything the remote service says, and any failure to reach
//! it, is returned as data through the per-operation codes in [`crate::codes`].

use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// An operation was called before [`init`](crate::GatehouseClient::init).
    #[error("Client is not initialized; call init() first")]
    NotInitialized,

    /// [`init`](crate::GatehouseClient::init) was called a second time.
    #[error("Client is already initialized")]
    AlreadyInitialized,

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Endpoint could not be turned into a URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid cache configuration.
    #[error("Cache configuration error: {0}")]
    Cache(#[from] gatehouse_session::Error),
}

impl Error {
    /// Check if this error comes from calling the client in the wrong state.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Error::NotInitialized | Error::AlreadyInitialized)
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Outcome reported by the remote service: the success payload, or the
/// operation's error code.
pub type ApiResult<T, E> = std::result::Result<T, E>;

/// Body of a 400 response.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ErrorResponse<E> {
    pub error: E,
}
