//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`              - Liveness check
//! - `GET  /auth/url`            - Google consent URL
//! - `POST /auth/exchange`       - Authorization code exchange
//! - `POST /metrics`             - Dashboard reports
//! - `POST /google-ads/metrics`  - Alias of `/metrics`
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Allow-list or mirrored origin, with credentials
//! - **Body limit** - Request bodies capped at 1 MiB
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{cors, tracing};
use crate::error::AppError;
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::Uri;
use axum::routing::get;
use serde_json::json;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `allowed_origins` - CORS allow-list; `None` mirrors the request origin
pub fn app_router(state: AppState, allowed_origins: Option<&[String]>) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/health", get(health_handler))
        .merge(api::routes::routes())
        .fallback(not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors::layer(allowed_origins))
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::not_found("Route not found", json!({ "path": uri.path() }))
}
