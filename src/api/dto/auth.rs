//! DTOs for OAuth onboarding endpoints.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use validator::Validate;

use crate::application::services::IssuedTokens;
use crate::domain::providers::ConsentUrl;

/// Query parameters of `GET /auth/url`.
#[derive(Debug, Default, Deserialize)]
pub struct AuthUrlQuery {
    /// Opaque anti-forgery token echoed back on the OAuth callback.
    pub state: Option<String>,
}

/// Consent URL the client should redirect the user to.
#[derive(Debug, Serialize)]
pub struct AuthUrlResponse {
    pub url: String,
    pub state: String,
}

impl From<ConsentUrl> for AuthUrlResponse {
    fn from(consent: ConsentUrl) -> Self {
        Self {
            url: consent.url,
            state: consent.state,
        }
    }
}

/// Body of `POST /auth/exchange`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRequest {
    #[validate(
        required(message = "Missing authorization code from Google OAuth."),
        length(min = 1, message = "Missing authorization code from Google OAuth.")
    )]
    pub code: Option<String>,

    /// Overrides the configured redirect URI; must match the one used for consent.
    #[validate(url(message = "redirectUri must be a valid URL."))]
    pub redirect_uri: Option<String>,
}

/// Tokens returned to the client after a successful exchange.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeResponse {
    pub refresh_token: String,
    pub access_token: String,
    /// Access-token expiry as epoch milliseconds.
    pub expiry_date: Option<i64>,
    pub scope: Option<String>,
    pub token_type: String,
}

impl From<IssuedTokens> for ExchangeResponse {
    fn from(tokens: IssuedTokens) -> Self {
        Self {
            refresh_token: tokens.refresh_token,
            access_token: tokens.access_token,
            expiry_date: tokens.expiry_date,
            scope: tokens.scope,
            token_type: tokens.token_type,
        }
    }
}
