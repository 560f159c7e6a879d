//! Application layer services orchestrating the domain.
//!
//! Services consume the provider traits from [`crate::domain::providers`]
//! and expose a small API for HTTP handlers and the CLI.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - OAuth consent URL and code exchange
//! - [`services::report_service::ReportService`] - Concurrent report fan-out and payload assembly

pub mod services;
