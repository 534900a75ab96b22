//! Request and response types for the Gatehouse API.
//!
//! These types mirror the service's wire contract.

use std::fmt;
use std::str::FromStr;

use gatehouse_session::CacheEntry;
use serde::{Deserialize, Serialize};

/// Endpoint paths, relative to the service base URL.
pub(crate) mod paths {
    pub const SIGNIN_EMAIL: &str = "signin/email";
    pub const SIGNIN_EMAIL_VERIFY: &str = "signin/emailverify";
    pub const SIGNIN_SOCIAL: &str = "signin/social";
    pub const SIGNIN_SOCIAL_VERIFY: &str = "signin/socialverify";
    pub const SESSION_INFO: &str = "session/info";
    pub const SESSION_REFRESH: &str = "session/refresh";
    pub const SESSION_INVALIDATE: &str = "session/invalidate";
}

// ─────────────────────────────────────────────────────────────────────────────
// Enumerations
// ─────────────────────────────────────────────────────────────────────────────

/// Supported social sign-in providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialType {
    Google,
    Microsoft,
    Apple,
}

impl SocialType {
    /// Wire representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SocialType::Google => "google",
            SocialType::Microsoft => "microsoft",
            SocialType::Apple => "apple",
        }
    }
}

impl fmt::Display for SocialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SocialType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(SocialType::Google),
            "microsoft" => Ok(SocialType::Microsoft),
            "apple" => Ok(SocialType::Apple),
            other => Err(format!(
                "unknown social type '{other}' (expected google, microsoft or apple)"
            )),
        }
    }
}

/// Which sessions an invalidation applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidateType {
    /// Only the given session.
    #[default]
    OnlyThis,
    /// Every session of the account.
    All,
    /// Every session of the account except the given one.
    AllButThis,
}

impl InvalidateType {
    /// Wire representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            InvalidateType::OnlyThis => "only_this",
            InvalidateType::All => "all",
            InvalidateType::AllButThis => "all_but_this",
        }
    }
}

impl fmt::Display for InvalidateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvalidateType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "only_this" => Ok(InvalidateType::OnlyThis),
            "all" => Ok(InvalidateType::All),
            "all_but_this" => Ok(InvalidateType::AllButThis),
            other => Err(format!(
                "unknown invalidate type '{other}' (expected only_this, all or all_but_this)"
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Responses
// ─────────────────────────────────────────────────────────────────────────────

/// A freshly issued session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    /// Opaque session credential.
    pub session_token: String,
    /// Account the session belongs to.
    pub email: String,
    /// Unix timestamp (seconds) after which the token expires.
    pub expiration: i64,
    /// Remaining refresh allowance.
    pub refresh_left: u32,
}

impl SessionToken {
    /// The metadata cached for this token.
    pub fn cache_entry(&self) -> CacheEntry {
        CacheEntry::new(self.email.clone(), self.expiration, self.refresh_left)
    }
}

/// Metadata of an existing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Account the session belongs to.
    pub email: String,
    /// Unix timestamp (seconds) after which the token expires.
    pub expiration: i64,
    /// Remaining refresh allowance.
    pub refresh_left: u32,
}

impl SessionInfo {
    /// The metadata cached for this session.
    pub fn cache_entry(&self) -> CacheEntry {
        CacheEntry::new(self.email.clone(), self.expiration, self.refresh_left)
    }
}

impl From<CacheEntry> for SessionInfo {
    fn from(entry: CacheEntry) -> Self {
        Self {
            email: entry.email,
            expiration: entry.expiration,
            refresh_left: entry.refresh_left,
        }
    }
}

impl From<SessionToken> for SessionInfo {
    fn from(token: SessionToken) -> Self {
        Self {
            email: token.email,
            expiration: token.expiration,
            refresh_left: token.refresh_left,
        }
    }
}

/// Where to send the user for a social sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialSignin {
    /// Provider authorization URL.
    pub signin_url: String,
}

/// Success body of operations that return no fields.
#[derive(Debug, Deserialize)]
pub(crate) struct Acknowledged {}

// ─────────────────────────────────────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct SigninEmailRequest<'a> {
    pub project_id: &'a str,
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmailVerifyRequest<'a> {
    pub project_id: &'a str,
    pub email: &'a str,
    pub code: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SigninSocialRequest<'a> {
    pub project_id: &'a str,
    pub social_type: SocialType,
}

#[derive(Debug, Serialize)]
pub(crate) struct SocialVerifyRequest<'a> {
    pub project_id: &'a str,
    pub social_type: SocialType,
    pub authorization_code: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SessionRequest<'a> {
    pub project_id: &'a str,
    pub session_token: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct InvalidateRequest<'a> {
    pub project_id: &'a str,
    pub session_token: &'a str,
    pub invalidate_type: InvalidateType,
}
