//! # Ads Dashboard
//!
//! Backend for a Google Ads performance dashboard, built with Axum.
//!
//! It walks an account owner through Google's OAuth consent, hands the
//! resulting refresh token back to the client, and on request runs six GAQL
//! reports concurrently, normalizing them into a dashboard-ready payload.
//! Nothing is persisted: the client sends its refresh token with every call.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Date ranges, reports, normalization, provider traits
//! - **Application Layer** ([`application`]) - OAuth onboarding and report fan-out
//! - **Infrastructure Layer** ([`infrastructure`]) - Google OAuth and Google Ads clients
//! - **API Layer** ([`api`]) - REST handlers, DTOs and middleware
//!
//! ## Quick Start
//!
//! ```bash
//! export GOOGLE_CLIENT_ID="..."
//! export GOOGLE_CLIENT_SECRET="..."
//! export GOOGLE_DEVELOPER_TOKEN="..."
//! export GOOGLE_OAUTH_REDIRECT_URI="http://localhost:5173/oauth/callback"
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{AuthService, MetricsReport, ReportService};
    pub use crate::domain::date_range::{DateClause, DateRange};
    pub use crate::domain::providers::{
        ConsentUrl, OAuthProvider, ProviderError, ReportSource, TokenBundle,
    };
    pub use crate::domain::report::ReportKind;
    pub use crate::domain::session::{AuthorizedSession, CustomerSession};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
