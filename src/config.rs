//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Listen Address
//!
//! ### Method 1: Full address
//!
//! ```bash
//! export LISTEN="127.0.0.1:4000"
//! ```
//!
//! ### Method 2: Individual components
//!
//! ```bash
//! export HOST="0.0.0.0"
//! export PORT="4000"
//! ```
//!
//! If `LISTEN` is not set, it is built from `HOST` (default `0.0.0.0`) and
//! `PORT` (default `4000`).
//!
//! ## Required Variables
//!
//! - `GOOGLE_CLIENT_ID` / `GOOGLE_CLIENT_SECRET` - OAuth client credentials
//! - `GOOGLE_DEVELOPER_TOKEN` - Google Ads API developer token
//! - `GOOGLE_OAUTH_REDIRECT_URI` - Redirect URI registered for the client
//!
//! ## Optional Variables
//!
//! - `GOOGLE_LOGIN_CUSTOMER_ID` - Default manager account for metrics requests
//! - `GOOGLE_ADS_API_BASE_URL` - API host (default: `https://googleads.googleapis.com`)
//! - `GOOGLE_ADS_API_VERSION` - API version (default: `v21`)
//! - `ALLOWED_ORIGINS` - Comma-separated CORS allow-list (default: mirror any origin)
//! - `REPORT_TIMEOUT_SECONDS` - Deadline for one metrics fan-out (default: none)
//! - `HTTP_TIMEOUT_SECONDS` - Timeout per upstream HTTP call (default: 45)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)

use anyhow::{Context, Result};
use std::env;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use url::Url;

use crate::domain::session::sanitize_customer_id;
use crate::infrastructure::google::{DEFAULT_ADS_API_BASE_URL, DEFAULT_ADS_API_VERSION};

static API_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v[0-9]+$").expect("valid API version regex"));

/// Service configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,

    // ── Google OAuth client ─────────────────────────────────────────────────
    pub google_client_id: String,
    pub google_client_secret: String,
    pub google_redirect_uri: String,

    // ── Google Ads API ──────────────────────────────────────────────────────
    pub developer_token: String,
    /// Manager account used when a metrics request names none. Digits only.
    pub login_customer_id: Option<String>,
    pub ads_api_base_url: String,
    pub ads_api_version: String,

    /// CORS allow-list. `None` mirrors the request origin.
    pub allowed_origins: Option<Vec<String>>,
    /// Deadline for the whole report fan-out (`REPORT_TIMEOUT_SECONDS`).
    pub report_timeout_seconds: Option<u64>,
    /// Timeout for a single upstream HTTP call (`HTTP_TIMEOUT_SECONDS`, default: 45).
    pub http_timeout_seconds: u64,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a numeric
    /// variable does not parse.
    pub fn from_env() -> Result<Self> {
        let listen_addr = Self::load_listen_addr();
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let google_client_id = required("GOOGLE_CLIENT_ID")?;
        let google_client_secret = required("GOOGLE_CLIENT_SECRET")?;
        let google_redirect_uri = required("GOOGLE_OAUTH_REDIRECT_URI")?;
        let developer_token = required("GOOGLE_DEVELOPER_TOKEN")?;

        let login_customer_id = env::var("GOOGLE_LOGIN_CUSTOMER_ID")
            .ok()
            .map(|v| sanitize_customer_id(&v))
            .filter(|v| !v.is_empty());

        let ads_api_base_url = env::var("GOOGLE_ADS_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_ADS_API_BASE_URL.to_string());
        let ads_api_version = env::var("GOOGLE_ADS_API_VERSION")
            .unwrap_or_else(|_| DEFAULT_ADS_API_VERSION.to_string());

        let allowed_origins = Self::load_allowed_origins();

        let report_timeout_seconds = match env::var("REPORT_TIMEOUT_SECONDS") {
            Ok(v) => Some(
                v.parse()
                    .context("REPORT_TIMEOUT_SECONDS must be a whole number of seconds")?,
            ),
            Err(_) => None,
        };

        let http_timeout_seconds = match env::var("HTTP_TIMEOUT_SECONDS") {
            Ok(v) => v
                .parse()
                .context("HTTP_TIMEOUT_SECONDS must be a whole number of seconds")?,
            Err(_) => 45,
        };

        Ok(Self {
            listen_addr,
            log_level,
            log_format,
            google_client_id,
            google_client_secret,
            google_redirect_uri,
            developer_token,
            login_customer_id,
            ads_api_base_url,
            ads_api_version,
            allowed_origins,
            report_timeout_seconds,
            http_timeout_seconds,
        })
    }

    /// Loads the bind address.
    ///
    /// Priority:
    /// 1. `LISTEN` environment variable
    /// 2. Constructed from `HOST` and `PORT`
    fn load_listen_addr() -> String {
        if let Ok(listen) = env::var("LISTEN") {
            return listen;
        }

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "4000".to_string());
        format!("{host}:{port}")
    }

    /// Parses `ALLOWED_ORIGINS` as a comma-separated list.
    ///
    /// Returns `None` when the variable is unset or lists nothing.
    fn load_allowed_origins() -> Option<Vec<String>> {
        let raw = env::var("ALLOWED_ORIGINS").ok()?;
        let origins: Vec<String> = raw
            .split(',')
            .map(|o| o.trim().trim_end_matches('/').to_string())
            .filter(|o| !o.is_empty())
            .collect();

        (!origins.is_empty()).then_some(origins)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is not `host:port`
    /// - a Google credential is blank
    /// - the redirect URI or API base URL is not an http(s) URL
    /// - the API version does not look like `v<digits>`
    /// - a timeout is zero
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        for (name, value) in [
            ("GOOGLE_CLIENT_ID", &self.google_client_id),
            ("GOOGLE_CLIENT_SECRET", &self.google_client_secret),
            ("GOOGLE_DEVELOPER_TOKEN", &self.developer_token),
        ] {
            if value.trim().is_empty() {
                anyhow::bail!("{name} must not be empty");
            }
        }

        validate_http_url("GOOGLE_OAUTH_REDIRECT_URI", &self.google_redirect_uri)?;
        validate_http_url("GOOGLE_ADS_API_BASE_URL", &self.ads_api_base_url)?;

        if !API_VERSION_RE.is_match(&self.ads_api_version) {
            anyhow::bail!(
                "GOOGLE_ADS_API_VERSION must look like 'v21', got '{}'",
                self.ads_api_version
            );
        }

        if self.report_timeout_seconds == Some(0) {
            anyhow::bail!("REPORT_TIMEOUT_SECONDS must be greater than 0");
        }
        if self.http_timeout_seconds == 0 {
            anyhow::bail!("HTTP_TIMEOUT_SECONDS must be greater than 0");
        }

        Ok(())
    }

    pub fn report_timeout(&self) -> Option<Duration> {
        self.report_timeout_seconds.map(Duration::from_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  OAuth client: {}", mask_secret(&self.google_client_id));
        tracing::info!("  OAuth redirect: {}", self.google_redirect_uri);
        tracing::info!("  Developer token: {}", mask_secret(&self.developer_token));
        tracing::info!(
            "  Ads API: {}/{}",
            self.ads_api_base_url.trim_end_matches('/'),
            self.ads_api_version
        );

        match &self.login_customer_id {
            Some(id) => tracing::info!("  Default login customer: {}", id),
            None => tracing::info!("  Default login customer: none"),
        }

        match &self.allowed_origins {
            Some(origins) => tracing::info!("  CORS origins: {}", origins.join(", ")),
            None => tracing::info!("  CORS origins: any (mirrored)"),
        }

        match self.report_timeout_seconds {
            Some(secs) => tracing::info!("  Report timeout: {}s", secs),
            None => tracing::info!("  Report timeout: none"),
        }

        tracing::info!("  HTTP timeout: {}s", self.http_timeout_seconds);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("listen_addr", &self.listen_addr)
            .field("google_client_id", &self.google_client_id)
            .field("google_client_secret", &"***")
            .field("google_redirect_uri", &self.google_redirect_uri)
            .field("developer_token", &"***")
            .field("login_customer_id", &self.login_customer_id)
            .field("ads_api_base_url", &self.ads_api_base_url)
            .field("ads_api_version", &self.ads_api_version)
            .field("allowed_origins", &self.allowed_origins)
            .field("report_timeout_seconds", &self.report_timeout_seconds)
            .field("http_timeout_seconds", &self.http_timeout_seconds)
            .finish()
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("{name} must be set"))
}

fn validate_http_url(name: &str, value: &str) -> Result<()> {
    let url = Url::parse(value)
        .with_context(|| format!("{name} must be a valid URL, got '{value}'"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("{name} must use http or https, got '{value}'");
    }
    Ok(())
}

/// Masks a credential for logging, keeping only its first four characters.
///
/// - `1234567890-abc.apps.googleusercontent.com` → `1234***`
/// - `abc` → `***`
fn mask_secret(value: &str) -> String {
    if value.chars().count() <= 8 {
        return "***".to_string();
    }

    let prefix: String = value.chars().take(4).collect();
    format!("{prefix}***")
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if required variables are missing or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const GOOGLE_VARS: [(&str, &str); 4] = [
        ("GOOGLE_CLIENT_ID", "1234567890-abc.apps.googleusercontent.com"),
        ("GOOGLE_CLIENT_SECRET", "GOCSPX-secret"),
        ("GOOGLE_DEVELOPER_TOKEN", "dev-token-123"),
        (
            "GOOGLE_OAUTH_REDIRECT_URI",
            "http://localhost:5173/oauth/callback",
        ),
    ];

    const OPTIONAL_VARS: [&str; 10] = [
        "LISTEN",
        "HOST",
        "PORT",
        "GOOGLE_LOGIN_CUSTOMER_ID",
        "GOOGLE_ADS_API_BASE_URL",
        "GOOGLE_ADS_API_VERSION",
        "ALLOWED_ORIGINS",
        "REPORT_TIMEOUT_SECONDS",
        "HTTP_TIMEOUT_SECONDS",
        "LOG_FORMAT",
    ];

    fn set_google_vars() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            for (name, value) in GOOGLE_VARS {
                env::set_var(name, value);
            }
        }
    }

    fn clear_vars() {
        // SAFETY: Tests are run serially
        unsafe {
            for (name, _) in GOOGLE_VARS {
                env::remove_var(name);
            }
            for name in OPTIONAL_VARS {
                env::remove_var(name);
            }
        }
    }

    fn valid_config() -> Config {
        Config {
            listen_addr: "0.0.0.0:4000".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            google_client_id: "client-id".to_string(),
            google_client_secret: "secret".to_string(),
            google_redirect_uri: "http://localhost:5173/oauth/callback".to_string(),
            developer_token: "dev-token".to_string(),
            login_customer_id: None,
            ads_api_base_url: DEFAULT_ADS_API_BASE_URL.to_string(),
            ads_api_version: "v21".to_string(),
            allowed_origins: None,
            report_timeout_seconds: None,
            http_timeout_seconds: 45,
        }
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(
            mask_secret("1234567890-abc.apps.googleusercontent.com"),
            "1234***"
        );
        assert_eq!(mask_secret("short"), "***");
        assert_eq!(mask_secret(""), "***");
    }

    #[test]
    fn test_config_validation() {
        let mut config = valid_config();
        assert!(config.validate().is_ok());

        config.log_format = "invalid".to_string();
        assert!(config.validate().is_err());
        config.log_format = "json".to_string();
        assert!(config.validate().is_ok());

        config.listen_addr = "4000".to_string();
        assert!(config.validate().is_err());
        config.listen_addr = "0.0.0.0:4000".to_string();

        config.google_redirect_uri = "not a url".to_string();
        assert!(config.validate().is_err());
        config.google_redirect_uri = "ftp://example.com/cb".to_string();
        assert!(config.validate().is_err());
        config.google_redirect_uri = "https://app.example.com/cb".to_string();

        config.ads_api_version = "21".to_string();
        assert!(config.validate().is_err());
        config.ads_api_version = "v20".to_string();

        config.developer_token = "  ".to_string();
        assert!(config.validate().is_err());
        config.developer_token = "dev-token".to_string();

        config.report_timeout_seconds = Some(0);
        assert!(config.validate().is_err());
        config.report_timeout_seconds = Some(30);

        config.http_timeout_seconds = 0;
        assert!(config.validate().is_err());
        config.http_timeout_seconds = 10;

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_masks_secrets() {
        let rendered = format!("{:?}", valid_config());
        assert!(!rendered.contains("dev-token"));
        assert!(!rendered.contains("\"secret\""));
        assert!(rendered.contains("client-id"));
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_vars();
        set_google_vars();

        let config = Config::from_env().unwrap();

        assert_eq!(config.listen_addr, "0.0.0.0:4000");
        assert_eq!(config.ads_api_base_url, DEFAULT_ADS_API_BASE_URL);
        assert_eq!(config.ads_api_version, DEFAULT_ADS_API_VERSION);
        assert_eq!(config.login_customer_id, None);
        assert_eq!(config.allowed_origins, None);
        assert_eq!(config.report_timeout(), None);
        assert_eq!(config.http_timeout(), Duration::from_secs(45));
        assert!(config.validate().is_ok());

        clear_vars();
    }

    #[test]
    #[serial]
    fn test_missing_required_variable() {
        clear_vars();
        set_google_vars();
        // SAFETY: Tests are run serially
        unsafe {
            env::remove_var("GOOGLE_DEVELOPER_TOKEN");
        }

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("GOOGLE_DEVELOPER_TOKEN"));

        clear_vars();
    }

    #[test]
    #[serial]
    fn test_listen_addr_priority() {
        clear_vars();
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("HOST", "127.0.0.1");
            env::set_var("PORT", "8080");
        }
        assert_eq!(Config::load_listen_addr(), "127.0.0.1:8080");

        // LISTEN should take priority
        unsafe {
            env::set_var("LISTEN", "0.0.0.0:9000");
        }
        assert_eq!(Config::load_listen_addr(), "0.0.0.0:9000");

        clear_vars();
    }

    #[test]
    #[serial]
    fn test_optional_values_are_parsed() {
        clear_vars();
        set_google_vars();
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("GOOGLE_LOGIN_CUSTOMER_ID", "111-222-3333");
            env::set_var(
                "ALLOWED_ORIGINS",
                "http://localhost:5173, https://ads.example.com/ ,",
            );
            env::set_var("REPORT_TIMEOUT_SECONDS", "30");
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.login_customer_id.as_deref(), Some("1112223333"));
        assert_eq!(
            config.allowed_origins,
            Some(vec![
                "http://localhost:5173".to_string(),
                "https://ads.example.com".to_string(),
            ])
        );
        assert_eq!(config.report_timeout(), Some(Duration::from_secs(30)));

        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("REPORT_TIMEOUT_SECONDS", "soon");
        }
        assert!(Config::from_env().is_err());

        clear_vars();
    }
}
