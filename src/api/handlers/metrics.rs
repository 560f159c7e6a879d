//! Handler for the dashboard metrics endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::metrics::{MetricsRequest, MetricsResponse};
use crate::domain::date_range::DateRange;
use crate::error::AppError;
use crate::state::AppState;

/// Runs the six dashboard reports for a customer.
///
/// # Endpoint
///
/// `POST /metrics` (also served at `POST /google-ads/metrics`)
///
/// # Request Body
///
/// ```json
/// {
///   "customerId": "123-456-7890",
///   "loginCustomerId": "111-222-3333",  // optional, null for none
///   "refreshToken": "1//0g...",
///   "dateRange": { "preset": "LAST_7_DAYS" }  // or { "startDate", "endDate" }
/// }
/// ```
///
/// Customer ids are reduced to their digits. Omitting `loginCustomerId`
/// selects the configured manager account; sending `null` selects none.
/// A missing or malformed `dateRange` selects the last 30 days.
///
/// # Errors
///
/// Returns 400 Bad Request if `customerId` or `refreshToken` is missing.
/// Returns 500 Internal Server Error if authorization or any report fails;
/// no partial data is returned.
pub async fn metrics_handler(
    State(state): State<AppState>,
    payload: Result<Json<MetricsRequest>, JsonRejection>,
) -> Result<Json<MetricsResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let customer_id = payload.customer_id.unwrap_or_default();
    let refresh_token = payload.refresh_token.unwrap_or_default();

    let login_customer_id = payload.login_customer_id.as_ref().map(|id| id.as_deref());
    let session = state
        .report_service
        .session(&customer_id, login_customer_id, &refresh_token);
    if session.customer_id().is_empty() {
        return Err(AppError::bad_request(
            "customerId must contain digits.",
            json!({ "customerId": customer_id }),
        ));
    }

    let date_range = DateRange::from_json(&payload.date_range);
    let report = state
        .report_service
        .fetch_metrics(session, &date_range)
        .await?;

    Ok(Json(report.into()))
}
