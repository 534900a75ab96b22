//! HTTP client SDK for the Gatehouse authentication service.
//!
//! This crate provides a typed client for signing users in and managing
//! their sessions, with an optional session cache in front of the service.
//!
//! # Example
//!
//! ```no_run
//! use gatehouse_client::{GatehouseClient, InvalidateType, Result};
//!
//! # async fn example() -> Result<()> {
//! let client = GatehouseClient::builder()
//!     .endpoint("auth.example.com")
//!     .project_id("my-project")
//!     .build()?;
//!
//! // Send a one-time code, then exchange it for a session
//! if let Err(code) = client.signin().email("user@example.com").await? {
//!     eprintln!("could not send code: {code}");
//! }
//! let session = match client.signin().email_verify("user@example.com", "123456").await? {
//!     Ok(session) => session,
//!     Err(code) => panic!("verification failed: {code}"),
//! };
//!
//! // Served from the cache, no request
//! let info = client.session().info(&session.session_token).await?;
//!
//! client
//!     .session()
//!     .invalidate(&session.session_token, InvalidateType::OnlyThis)
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Results
//!
//! Operations return `Result<ApiResult<T, E>>`. The outer [`Error`] only
//! reports local misuse (not initialized, initialized twice, bad
//! configuration). The inner [`ApiResult`] is the service's answer: the
//! payload, or a code from the operation's error enum in [`codes`].
//! Network and parse failures are reported as that enum's
//! `ConnectionError` variant.
//!
//! # API Coverage
//!
//! - **Sign-in**: email code, email verify, social URL, social verify
//! - **Session**: info, refresh, invalidate

pub mod api;
pub mod client;
pub mod codes;
pub mod config;
pub mod error;
pub mod types;

pub use client::{ClientBuilder, GatehouseClient};
pub use codes::{
    EmailVerifyError, ErrorCode, SessionInfoError, SessionInvalidateError, SessionRefreshError,
    SigninEmailError, SigninSocialError, SocialVerifyError,
};
pub use config::{ClientConfig, DEFAULT_TIMEOUT};
pub use error::{ApiResult, Error, Result};
pub use gatehouse_session::{CacheConfig, CacheEntry, CacheStats, SessionCache};
pub use types::*;
