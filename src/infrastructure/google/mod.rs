//! Google implementations of the upstream provider traits.
//!
//! - [`GoogleOAuthProvider`] - consent URL and code exchange against Google accounts
//! - [`GoogleAdsClient`] - refresh-token exchange and GAQL `searchStream` calls
//!
//! Both share one `reqwest::Client` (connection pool) and one OAuth client.

mod ads;
mod oauth;

pub use ads::{
    DEFAULT_ADS_API_BASE_URL, DEFAULT_ADS_API_VERSION, GoogleAdsClient, extract_error_message,
};
pub use oauth::{
    ADWORDS_SCOPE, GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL, GoogleOAuthClient, GoogleOAuthProvider,
    build_oauth_client,
};

use std::time::Duration;

use crate::domain::providers::ProviderError;

/// Builds the HTTP client used for every Google call.
///
/// Redirects are disabled: the OAuth token endpoint must never be followed
/// to another host.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .connect_timeout(Duration::from_secs(10))
        .timeout(timeout)
        .user_agent(concat!("ads-dashboard/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(ProviderError::from)
}
