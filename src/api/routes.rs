//! API route configuration.

use crate::api::handlers::{auth_url_handler, exchange_handler, metrics_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Onboarding and reporting routes.
///
/// # Endpoints
///
/// - `GET  /auth/url`            - Google consent URL
/// - `POST /auth/exchange`       - Exchange an authorization code for a refresh token
/// - `POST /metrics`             - Dashboard reports for a customer
/// - `POST /google-ads/metrics`  - Alias of `/metrics`
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/url", get(auth_url_handler))
        .route("/auth/exchange", post(exchange_handler))
        .route("/metrics", post(metrics_handler))
        .route("/google-ads/metrics", post(metrics_handler))
}
