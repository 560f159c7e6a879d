//! Application error type and its HTTP rendering.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use validator::ValidationErrors;

use crate::domain::providers::ProviderError;

/// JSON error body: `{"error": "<message>", "code": "<kind>", "details": ...}`.
///
/// `error` is always a plain string so browser clients can surface it
/// directly. `details` is omitted when there is nothing to add.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub details: Value,
}

#[derive(Debug)]
pub enum AppError {
    Validation { message: String, details: Value },
    NotFound { message: String, details: Value },
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Wraps an upstream failure, keeping its message as the `details` string.
    pub fn upstream(message: impl Into<String>, err: &ProviderError) -> Self {
        Self::internal(message, Value::String(err.to_string()))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Validation { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::Internal { message, .. } => message,
        }
    }

    pub fn to_error_body(&self) -> ErrorBody {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::Internal { message, details } => ("internal_error", message, details),
        };

        ErrorBody {
            error: message.clone(),
            code,
            details: details.clone(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.status())
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            let details = self.to_error_body().details;
            tracing::error!(error = %self, details = %details, "Request failed");
        }

        (status, Json(self.to_error_body())).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let message = first_validation_message(&errors)
            .unwrap_or_else(|| "Request validation failed".to_string());
        let details = errors
            .field_errors()
            .into_iter()
            .map(|(field, field_errors)| {
                let value = serde_json::to_value(field_errors).unwrap_or(Value::Null);
                (camel_case(&field), value)
            })
            .collect::<serde_json::Map<_, _>>();

        AppError::bad_request(message, Value::Object(details))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request("Invalid JSON body", Value::String(rejection.body_text()))
    }
}

/// Picks the first field message in declaration-independent, sorted order.
fn first_validation_message(errors: &ValidationErrors) -> Option<String> {
    let fields = errors.field_errors();
    let mut names: Vec<_> = fields.keys().collect();
    names.sort();

    names.into_iter().find_map(|name| {
        fields.get(name)?.iter().find_map(|e| {
            e.message
                .as_ref()
                .map(|m| m.to_string())
                .or_else(|| Some(format!("{} is invalid", camel_case(name))))
        })
    })
}

/// Renders a Rust field name the way the JSON API spells it (`customer_id` -> `customerId`).
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use validator::Validate;

    #[derive(Validate)]
    struct MetricsInput {
        #[validate(required(message = "customerId is required."))]
        customer_id: Option<String>,
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::bad_request("x", json!({})).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::not_found("x", json!({})).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::internal("x", json!({})).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_errors_keep_field_message() {
        let errors = MetricsInput { customer_id: None }.validate().unwrap_err();
        let err = AppError::from(errors);

        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(err.message(), "customerId is required.");
    }

    #[test]
    fn test_upstream_error_carries_reason() {
        let err = AppError::upstream(
            "Unable to fetch Google Ads metrics.",
            &ProviderError::Api {
                status: 403,
                message: "PERMISSION_DENIED".to_string(),
            },
        );

        let body = err.to_error_body();
        assert_eq!(body.code, "internal_error");
        assert_eq!(body.error, "Unable to fetch Google Ads metrics.");
        assert_eq!(body.details, "API error (403): PERMISSION_DENIED");
    }

    #[test]
    fn test_error_body_is_flat() {
        let err = AppError::bad_request("refreshToken is required.", Value::Null);
        let body = serde_json::to_value(err.to_error_body()).unwrap();

        assert_eq!(
            body,
            json!({ "error": "refreshToken is required.", "code": "validation_error" })
        );
    }

    #[test]
    fn test_validation_details_use_api_field_names() {
        let errors = MetricsInput { customer_id: None }.validate().unwrap_err();
        let body = AppError::from(errors).to_error_body();

        assert!(body.details.get("customerId").is_some());
        assert!(body.details.get("customer_id").is_none());
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("customer_id"), "customerId");
        assert_eq!(camel_case("login_customer_id"), "loginCustomerId");
        assert_eq!(camel_case("code"), "code");
    }
}
