//! Error types for session cache configuration.

/// Error type for session cache operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The cache clear interval must be non-zero.
    #[error("Invalid cache duration: {0:?}")]
    InvalidDuration(std::time::Duration),
}

/// Result type for session cache operations.
pub type Result<T> = std::result::Result<T, Error>;
