//! Google Ads REST client.

use async_trait::async_trait;
use oauth2::{RefreshToken, TokenResponse};
use serde::Deserialize;
use serde_json::{Value, json};

use super::oauth::{GoogleOAuthClient, token_error};
use crate::domain::providers::{ProviderError, ReportSource};
use crate::domain::session::{AuthorizedSession, CustomerSession};

pub const DEFAULT_ADS_API_BASE_URL: &str = "https://googleads.googleapis.com";
pub const DEFAULT_ADS_API_VERSION: &str = "v21";

/// Upstream error bodies longer than this are cut before being reported.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// One batch of a `searchStream` response.
#[derive(Debug, Deserialize)]
struct SearchStreamBatch {
    #[serde(default)]
    results: Vec<Value>,
}

/// Report source backed by the Google Ads API.
pub struct GoogleAdsClient {
    http: reqwest::Client,
    oauth: GoogleOAuthClient,
    developer_token: String,
    base_url: String,
    api_version: String,
}

impl GoogleAdsClient {
    pub fn new(
        http: reqwest::Client,
        oauth: GoogleOAuthClient,
        developer_token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            oauth,
            developer_token: developer_token.into(),
            base_url: DEFAULT_ADS_API_BASE_URL.to_string(),
            api_version: DEFAULT_ADS_API_VERSION.to_string(),
        }
    }

    /// Points the client at another host, e.g. a local stub.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// `searchStream` endpoint for a customer.
    pub fn search_url(&self, customer_id: &str) -> String {
        format!(
            "{}/{}/customers/{}/googleAds:searchStream",
            self.base_url.trim_end_matches('/'),
            self.api_version,
            customer_id
        )
    }
}

#[async_trait]
impl ReportSource for GoogleAdsClient {
    async fn authorize(
        &self,
        session: CustomerSession,
    ) -> Result<AuthorizedSession, ProviderError> {
        let refresh_token = RefreshToken::new(session.refresh_token().to_string());

        let token = self
            .oauth
            .exchange_refresh_token(&refresh_token)
            .request_async(&self.http)
            .await
            .map_err(token_error)?;

        Ok(AuthorizedSession::new(
            session,
            token.access_token().secret().to_string(),
        ))
    }

    async fn search(
        &self,
        session: &AuthorizedSession,
        query: &str,
    ) -> Result<Vec<Value>, ProviderError> {
        let mut request = self
            .http
            .post(self.search_url(session.customer.customer_id()))
            .bearer_auth(session.access_token())
            .header("developer-token", self.developer_token.as_str())
            .json(&json!({ "query": query }));

        if let Some(login_customer_id) = session.customer.login_customer_id() {
            request = request.header("login-customer-id", login_customer_id);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        let batches: Vec<SearchStreamBatch> = response.json().await?;
        Ok(batches.into_iter().flat_map(|batch| batch.results).collect())
    }
}

/// Reduces a Google API error body to its most specific message.
///
/// Prefers the Google Ads failure messages in `error.details[].errors[]`,
/// then `error.message`, then the (truncated) raw body. `searchStream` wraps
/// errors in an array, so both shapes are accepted.
pub fn extract_error_message(body: &str) -> String {
    let raw = || {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            "empty error response".to_string()
        } else {
            trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
        }
    };

    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return raw();
    };

    let error = match &value {
        Value::Array(items) => items.iter().find_map(|item| item.get("error")),
        other => other.get("error"),
    };
    let Some(error) = error else {
        return raw();
    };

    let failures: Vec<&str> = error
        .get("details")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|detail| detail.get("errors").and_then(Value::as_array))
        .flatten()
        .filter_map(|failure| failure.get("message").and_then(Value::as_str))
        .collect();

    if !failures.is_empty() {
        return failures.join("; ");
    }

    error
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(raw)
}
