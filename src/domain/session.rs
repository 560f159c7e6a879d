//! Caller-held credentials used to read reports.

use std::fmt;

/// Keeps only the ASCII digits of a customer id (`123-456-7890` -> `1234567890`).
pub fn sanitize_customer_id(id: &str) -> String {
    id.chars().filter(char::is_ascii_digit).collect()
}

/// The customer to report on and the refresh credential that grants access.
///
/// Identifiers are sanitized on construction. The service never stores a
/// session; the client sends it with every request.
#[derive(Clone, PartialEq, Eq)]
pub struct CustomerSession {
    customer_id: String,
    login_customer_id: Option<String>,
    refresh_token: String,
}

impl CustomerSession {
    pub fn new(
        customer_id: &str,
        login_customer_id: Option<&str>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            customer_id: sanitize_customer_id(customer_id),
            login_customer_id: login_customer_id
                .map(sanitize_customer_id)
                .filter(|id| !id.is_empty()),
            refresh_token: refresh_token.into(),
        }
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    /// Manager account the request is made through, if any.
    pub fn login_customer_id(&self) -> Option<&str> {
        self.login_customer_id.as_deref()
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }
}

impl fmt::Debug for CustomerSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomerSession")
            .field("customer_id", &self.customer_id)
            .field("login_customer_id", &self.login_customer_id)
            .field("refresh_token", &"***")
            .finish()
    }
}

/// A session whose refresh credential has been exchanged for an access token.
///
/// Shared read-only by every report request of one fan-out.
#[derive(Clone)]
pub struct AuthorizedSession {
    pub customer: CustomerSession,
    access_token: String,
}

impl AuthorizedSession {
    pub fn new(customer: CustomerSession, access_token: impl Into<String>) -> Self {
        Self {
            customer,
            access_token: access_token.into(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl fmt::Debug for AuthorizedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizedSession")
            .field("customer", &self.customer)
            .field("access_token", &"***")
            .finish()
    }
}
