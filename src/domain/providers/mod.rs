//! Trait definitions for the upstream services the dashboard depends on.
//!
//! These traits abstract Google's authorization server and the Google Ads
//! reporting API. They are implemented in `crate::infrastructure::google`.
//!
//! # Architecture
//!
//! - Traits define the contract for upstream calls
//! - Implementations live in `crate::infrastructure::google`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Providers
//!
//! - [`OAuthProvider`] - Consent URL and authorization-code exchange
//! - [`ReportSource`] - Access-token refresh and GAQL report execution

pub mod error;
pub mod oauth_provider;
pub mod report_source;

pub use error::ProviderError;
pub use oauth_provider::{ConsentUrl, OAuthProvider, TokenBundle};
pub use report_source::ReportSource;

#[cfg(test)]
pub use oauth_provider::MockOAuthProvider;
#[cfg(test)]
pub use report_source::MockReportSource;
