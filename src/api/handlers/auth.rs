//! Handlers for the OAuth onboarding flow.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use validator::Validate;

use crate::api::dto::auth::{AuthUrlQuery, AuthUrlResponse, ExchangeRequest, ExchangeResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Builds the Google consent URL.
///
/// # Endpoint
///
/// `GET /auth/url?state=<opaque>`
///
/// # Response
///
/// ```json
/// {
///   "url": "https://accounts.google.com/o/oauth2/v2/auth?response_type=code&...&prompt=consent",
///   "state": "<opaque>"
/// }
/// ```
///
/// A random `state` is generated when the caller does not supply one.
pub async fn auth_url_handler(
    State(state): State<AppState>,
    Query(params): Query<AuthUrlQuery>,
) -> Json<AuthUrlResponse> {
    Json(state.auth_service.consent_url(params.state).into())
}

/// Exchanges an authorization code for a long-lived refresh token.
///
/// # Endpoint
///
/// `POST /auth/exchange`
///
/// # Request Body
///
/// ```json
/// { "code": "4/0Ab...", "redirectUri": "http://localhost:5173/oauth/callback" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if `code` is missing, `redirectUri` is not a URL,
/// or Google did not grant a refresh token.
/// Returns 500 Internal Server Error if the exchange fails upstream.
pub async fn exchange_handler(
    State(state): State<AppState>,
    payload: Result<Json<ExchangeRequest>, JsonRejection>,
) -> Result<Json<ExchangeResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let code = payload.code.unwrap_or_default();
    let tokens = state
        .auth_service
        .exchange(&code, payload.redirect_uri)
        .await?;

    Ok(Json(tokens.into()))
}
