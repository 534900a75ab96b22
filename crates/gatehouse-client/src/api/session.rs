//! Session API.

use tracing::debug;

use crate::client::GatehouseClient;
use crate::codes::{SessionInfoError, SessionInvalidateError, SessionRefreshError};
use crate::error::{ApiResult, Result};
use crate::types::{
    Acknowledged, InvalidateRequest, InvalidateType, SessionInfo, SessionRequest, SessionToken,
    paths,
};

/// Session API client.
pub struct SessionApi {
    client: GatehouseClient,
}

impl SessionApi {
    pub(crate) fn new(client: GatehouseClient) -> Self {
        Self { client }
    }

    /// Get the metadata of a session.
    ///
    /// With caching enabled a cached entry is returned without a request.
    /// On a miss the fetched metadata is cached, unless another caller cached
    /// the token first.
    pub async fn info(&self, session_token: &str) -> Result<ApiResult<SessionInfo, SessionInfoError>> {
        let state = self.client.state()?;

        if let Some(cache) = &state.cache
            && let Some(entry) = cache.try_get(session_token)
        {
            debug!("Session info served from cache");
            return Ok(Ok(entry.into()));
        }

        let request = SessionRequest {
            project_id: &state.project_id,
            session_token,
        };
        let outcome: ApiResult<SessionInfo, _> = self
            .client
            .post(state, paths::SESSION_INFO, &request)
            .await;

        if let (Ok(info), Some(cache)) = (&outcome, &state.cache) {
            cache.put(session_token, info.cache_entry());
        }
        Ok(outcome)
    }

    /// Trade a session token for a new one.
    ///
    /// On success the old token leaves the cache before the new one is added.
    pub async fn refresh(
        &self,
        session_token: &str,
    ) -> Result<ApiResult<SessionToken, SessionRefreshError>> {
        let state = self.client.state()?;
        let request = SessionRequest {
            project_id: &state.project_id,
            session_token,
        };
        let outcome: ApiResult<SessionToken, _> = self
            .client
            .post(state, paths::SESSION_REFRESH, &request)
            .await;

        if let (Ok(token), Some(cache)) = (&outcome, &state.cache) {
            cache.remove(session_token);
            state.cache_token(token);
        }
        Ok(outcome)
    }

    /// Invalidate a session, or other sessions of the same account.
    ///
    /// On success the given token leaves the cache.
    pub async fn invalidate(
        &self,
        session_token: &str,
        invalidate_type: InvalidateType,
    ) -> Result<ApiResult<(), SessionInvalidateError>> {
        let state = self.client.state()?;
        let request = InvalidateRequest {
            project_id: &state.project_id,
            session_token,
            invalidate_type,
        };
        let outcome: ApiResult<Acknowledged, _> = self
            .client
            .post(state, paths::SESSION_INVALIDATE, &request)
            .await;

        if outcome.is_ok()
            && let Some(cache) = &state.cache
        {
            cache.remove(session_token);
        }
        Ok(outcome.map(|_| ()))
    }
}
