//! OAuth onboarding: consent URL and authorization-code exchange.

use std::sync::Arc;

use serde_json::{Value, json};

use crate::domain::providers::{ConsentUrl, OAuthProvider, TokenBundle};
use crate::error::AppError;

/// Message returned when Google grants no long-lived credential.
pub const MISSING_REFRESH_TOKEN: &str =
    "Google did not return a refresh_token. Ensure 'prompt=consent' and 'access_type=offline'.";

/// Tokens handed back to the client after a successful exchange.
///
/// Unlike [`TokenBundle`] the refresh token is guaranteed present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedTokens {
    pub refresh_token: String,
    pub access_token: String,
    pub expiry_date: Option<i64>,
    pub scope: Option<String>,
    pub token_type: String,
}

/// Service driving the OAuth authorization-code flow.
///
/// Nothing is stored server-side: the refresh token goes straight back to
/// the client, which sends it with every metrics request.
pub struct AuthService {
    provider: Arc<dyn OAuthProvider>,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(provider: Arc<dyn OAuthProvider>) -> Self {
        Self { provider }
    }

    /// Builds the consent URL, embedding the caller's anti-forgery state.
    ///
    /// Blank states are treated as absent.
    pub fn consent_url(&self, state: Option<String>) -> ConsentUrl {
        let state = state.filter(|s| !s.trim().is_empty());
        self.provider.authorize_url(state)
    }

    /// Exchanges an authorization code for a refresh token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the code is empty or no refresh
    /// token was granted, [`AppError::Internal`] if the exchange fails
    /// upstream.
    pub async fn exchange(
        &self,
        code: &str,
        redirect_uri: Option<String>,
    ) -> Result<IssuedTokens, AppError> {
        if code.trim().is_empty() {
            return Err(AppError::bad_request(
                "Missing authorization code from Google OAuth.",
                json!({ "field": "code" }),
            ));
        }

        let bundle = self
            .provider
            .exchange_code(code, redirect_uri)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Failed to exchange OAuth code");
                AppError::upstream("Failed to exchange authorization code.", &e)
            })?;

        Self::issue(bundle)
    }

    fn issue(bundle: TokenBundle) -> Result<IssuedTokens, AppError> {
        let TokenBundle {
            access_token,
            refresh_token,
            expiry_date,
            scope,
            token_type,
        } = bundle;

        let refresh_token = refresh_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::bad_request(MISSING_REFRESH_TOKEN, Value::Null))?;

        Ok(IssuedTokens {
            refresh_token,
            access_token,
            expiry_date,
            scope,
            token_type,
        })
    }
}
