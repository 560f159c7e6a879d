//! Errors raised by upstream providers.

use std::time::Duration;
use thiserror::Error;

/// Failure talking to Google's authorization server or reporting API.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport-level failure (DNS, TLS, connection reset, ...).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The upstream API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The authorization server rejected a code or refresh token.
    #[error("Authorization failed: {0}")]
    Authorization(String),

    /// The upstream response could not be decoded.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Local misconfiguration, e.g. an unparsable redirect URI.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The report fan-out exceeded its deadline.
    #[error("Timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Http(e.to_string())
        }
    }
}
