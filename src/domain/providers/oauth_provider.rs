//! Authorization-server abstraction.

use async_trait::async_trait;
use serde::Serialize;

use super::ProviderError;

/// Consent URL plus the anti-forgery state embedded in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsentUrl {
    pub url: String,
    pub state: String,
}

/// Tokens granted for an authorization code.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenBundle {
    pub access_token: String,
    /// Absent when the server did not grant offline access.
    pub refresh_token: Option<String>,
    /// Access-token expiry as epoch milliseconds.
    pub expiry_date: Option<i64>,
    pub scope: Option<String>,
    pub token_type: String,
}

impl std::fmt::Debug for TokenBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenBundle")
            .field("access_token", &"***")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "***"))
            .field("expiry_date", &self.expiry_date)
            .field("scope", &self.scope)
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// OAuth 2.0 authorization-code flow against the advertising platform.
///
/// # Implementations
///
/// - [`crate::infrastructure::google::GoogleOAuthProvider`] - Google accounts
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// Builds the consent URL requesting offline, consent-forcing access to
    /// the reporting scope.
    ///
    /// When `state` is `None` a random anti-forgery token is generated.
    fn authorize_url(&self, state: Option<String>) -> ConsentUrl;

    /// Exchanges an authorization code for tokens.
    ///
    /// `redirect_uri` overrides the configured redirect target; it must match
    /// the one used to obtain the code.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Authorization`] if the code is rejected and
    /// [`ProviderError::Http`] on transport failures.
    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: Option<String>,
    ) -> Result<TokenBundle, ProviderError>;
}
