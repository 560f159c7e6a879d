//! Google OAuth 2.0 client.

use std::borrow::Cow;

use async_trait::async_trait;
use chrono::Utc;
use oauth2::basic::{BasicClient, BasicErrorResponse};
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    RedirectUrl, RequestTokenError, Scope, TokenResponse, TokenUrl,
};

use crate::domain::providers::{ConsentUrl, OAuthProvider, ProviderError, TokenBundle};

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Scope granting access to the Google Ads API.
pub const ADWORDS_SCOPE: &str = "https://www.googleapis.com/auth/adwords";

pub type GoogleOAuthClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Builds the OAuth client for the configured Google Cloud app.
///
/// # Errors
///
/// Returns [`ProviderError::Config`] if any value is blank or the redirect
/// URI does not parse.
pub fn build_oauth_client(
    client_id: &str,
    client_secret: &str,
    redirect_uri: &str,
) -> Result<GoogleOAuthClient, ProviderError> {
    if client_id.trim().is_empty() {
        return Err(ProviderError::Config("Missing GOOGLE_CLIENT_ID".to_string()));
    }
    if client_secret.trim().is_empty() {
        return Err(ProviderError::Config("Missing GOOGLE_CLIENT_SECRET".to_string()));
    }

    let auth_url = AuthUrl::new(GOOGLE_AUTH_URL.to_string())
        .map_err(|e| ProviderError::Config(e.to_string()))?;
    let token_url = TokenUrl::new(GOOGLE_TOKEN_URL.to_string())
        .map_err(|e| ProviderError::Config(e.to_string()))?;
    let redirect_url = RedirectUrl::new(redirect_uri.to_string())
        .map_err(|e| ProviderError::Config(format!("Invalid redirect URI: {e}")))?;

    Ok(BasicClient::new(ClientId::new(client_id.to_string()))
        .set_client_secret(ClientSecret::new(client_secret.to_string()))
        .set_auth_uri(auth_url)
        .set_token_uri(token_url)
        .set_redirect_uri(redirect_url))
}

/// Maps a token-endpoint failure onto [`ProviderError`].
pub(crate) fn token_error<RE>(err: RequestTokenError<RE, BasicErrorResponse>) -> ProviderError
where
    RE: std::error::Error + 'static,
{
    match err {
        RequestTokenError::ServerResponse(resp) => {
            let kind = resp.error().to_string();
            match resp.error_description() {
                Some(description) => ProviderError::Authorization(format!("{kind}: {description}")),
                None => ProviderError::Authorization(kind),
            }
        }
        RequestTokenError::Request(e) => ProviderError::Http(e.to_string()),
        RequestTokenError::Parse(e, _) => ProviderError::Decode(e.to_string()),
        RequestTokenError::Other(message) => ProviderError::Http(message),
    }
}

/// Google accounts as the authorization server.
pub struct GoogleOAuthProvider {
    client: GoogleOAuthClient,
    http: reqwest::Client,
}

impl GoogleOAuthProvider {
    pub fn new(client: GoogleOAuthClient, http: reqwest::Client) -> Self {
        Self { client, http }
    }
}

#[async_trait]
impl OAuthProvider for GoogleOAuthProvider {
    fn authorize_url(&self, state: Option<String>) -> ConsentUrl {
        let (url, csrf) = self
            .client
            .authorize_url(move || state.map(CsrfToken::new).unwrap_or_else(CsrfToken::new_random))
            .add_scope(Scope::new(ADWORDS_SCOPE.to_string()))
            .add_extra_param("access_type", "offline")
            .add_extra_param("prompt", "consent")
            .url();

        ConsentUrl {
            url: url.to_string(),
            state: csrf.secret().to_string(),
        }
    }

    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: Option<String>,
    ) -> Result<TokenBundle, ProviderError> {
        let override_url = redirect_uri
            .map(|uri| {
                RedirectUrl::new(uri)
                    .map_err(|e| ProviderError::Config(format!("Invalid redirect URI: {e}")))
            })
            .transpose()?;

        let mut request = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()));
        if let Some(url) = override_url {
            request = request.set_redirect_uri(Cow::Owned(url));
        }

        let token = request
            .request_async(&self.http)
            .await
            .map_err(token_error)?;

        let expiry_date = token
            .expires_in()
            .and_then(|d| chrono::Duration::from_std(d).ok())
            .map(|d| (Utc::now() + d).timestamp_millis());

        Ok(TokenBundle {
            access_token: token.access_token().secret().to_string(),
            refresh_token: token.refresh_token().map(|t| t.secret().to_string()),
            expiry_date,
            scope: token.scopes().map(|scopes| {
                scopes
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            }),
            token_type: token.token_type().as_ref().to_string(),
        })
    }
}
