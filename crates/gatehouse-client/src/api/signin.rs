//! Sign-in API.

use crate::client::GatehouseClient;
use crate::codes::{EmailVerifyError, SigninEmailError, SigninSocialError, SocialVerifyError};
use crate::error::{ApiResult, Result};
use crate::types::{
    Acknowledged, EmailVerifyRequest, SessionToken, SigninEmailRequest, SigninSocialRequest,
    SocialSignin, SocialType, SocialVerifyRequest, paths,
};

/// Sign-in API client.
pub struct SigninApi {
    client: GatehouseClient,
}

impl SigninApi {
    pub(crate) fn new(client: GatehouseClient) -> Self {
        Self { client }
    }

    /// Ask the service to email a one-time code to `email`.
    pub async fn email(&self, email: &str) -> Result<ApiResult<(), SigninEmailError>> {
        let state = self.client.state()?;
        let request = SigninEmailRequest {
            project_id: &state.project_id,
            email,
        };
        let outcome: ApiResult<Acknowledged, _> = self
            .client
            .post(state, paths::SIGNIN_EMAIL, &request)
            .await;
        Ok(outcome.map(|_| ()))
    }

    /// Exchange an emailed code for a session token.
    ///
    /// The new token is cached on success.
    pub async fn email_verify(
        &self,
        email: &str,
        code: &str,
    ) -> Result<ApiResult<SessionToken, EmailVerifyError>> {
        let state = self.client.state()?;
        let request = EmailVerifyRequest {
            project_id: &state.project_id,
            email,
            code,
        };
        let outcome = self
            .client
            .post(state, paths::SIGNIN_EMAIL_VERIFY, &request)
            .await;
        if let Ok(token) = &outcome {
            state.cache_token(token);
        }
        Ok(outcome)
    }

    /// Get the provider URL to start a social sign-in.
    pub async fn social(
        &self,
        social_type: SocialType,
    ) -> Result<ApiResult<SocialSignin, SigninSocialError>> {
        let state = self.client.state()?;
        let request = SigninSocialRequest {
            project_id: &state.project_id,
            social_type,
        };
        Ok(self
            .client
            .post(state, paths::SIGNIN_SOCIAL, &request)
            .await)
    }

    /// Exchange a provider authorization code for a session token.
    ///
    /// The new token is cached on success.
    pub async fn social_verify(
        &self,
        social_type: SocialType,
        authorization_code: &str,
    ) -> Result<ApiResult<SessionToken, SocialVerifyError>> {
        let state = self.client.state()?;
        let request = SocialVerifyRequest {
            project_id: &state.project_id,
            social_type,
            authorization_code,
        };
        let outcome = self
            .client
            .post(state, paths::SIGNIN_SOCIAL_VERIFY, &request)
            .await;
        if let Ok(token) = &outcome {
            state.cache_token(token);
        }
        Ok(outcome)
    }
}
