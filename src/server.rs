//! HTTP server initialization and runtime setup.
//!
//! Wires the Google clients into the services and runs the Axum server
//! until Ctrl-C or SIGTERM.

use crate::application::services::{AuthService, ReportService};
use crate::config::Config;
use crate::infrastructure::google::{
    GoogleAdsClient, GoogleOAuthProvider, build_http_client, build_oauth_client,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Builds the application state from configuration.
///
/// # Errors
///
/// Returns an error if the HTTP or OAuth client cannot be built.
pub fn build_state(config: &Config) -> Result<AppState> {
    let http = build_http_client(config.http_timeout()).context("Failed to build HTTP client")?;
    let oauth = build_oauth_client(
        &config.google_client_id,
        &config.google_client_secret,
        &config.google_redirect_uri,
    )
    .context("Failed to build OAuth client")?;

    let oauth_provider = Arc::new(GoogleOAuthProvider::new(oauth.clone(), http.clone()));
    let ads_client = Arc::new(
        GoogleAdsClient::new(http, oauth, config.developer_token.clone())
            .with_base_url(config.ads_api_base_url.clone())
            .with_api_version(config.ads_api_version.clone()),
    );

    let auth_service = Arc::new(AuthService::new(oauth_provider));
    let report_service = Arc::new(
        ReportService::new(ads_client)
            .with_default_login_customer_id(config.login_customer_id.clone())
            .with_timeout(config.report_timeout()),
    );

    Ok(AppState::new(auth_service, report_service))
}

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - A Google client cannot be built
/// - The listen address is invalid or bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let state = build_state(&config)?;
    let app = app_router(state, config.allowed_origins.as_deref());

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
