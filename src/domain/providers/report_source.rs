//! Reporting-service abstraction.

use async_trait::async_trait;
use serde_json::Value;

use super::ProviderError;
use crate::domain::session::{AuthorizedSession, CustomerSession};

/// Remote execution of GAQL report queries.
///
/// Rows are returned in the upstream nested JSON shape; see
/// [`crate::domain::normalize`] for how they are flattened.
///
/// # Implementations
///
/// - [`crate::infrastructure::google::GoogleAdsClient`] - Google Ads REST API
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Exchanges the session's refresh credential for an access token.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Authorization`] if the refresh token is
    /// rejected.
    async fn authorize(&self, session: CustomerSession)
    -> Result<AuthorizedSession, ProviderError>;

    /// Runs one query and returns every row it produced.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Api`] when the service rejects the query or
    /// the credentials, [`ProviderError::Http`] on transport failures.
    async fn search(
        &self,
        session: &AuthorizedSession,
        query: &str,
    ) -> Result<Vec<Value>, ProviderError>;
}
