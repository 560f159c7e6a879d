//! DTOs for the metrics endpoint.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;
use validator::Validate;

use crate::application::services::MetricsReport;
use crate::domain::normalize::ReportRow;
use crate::domain::totals::Totals;

/// Body of `POST /metrics`.
///
/// `dateRange` is kept untyped: anything that is not a well-formed range
/// resolves to the default period instead of failing the request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MetricsRequest {
    #[serde(default, deserialize_with = "string_or_number")]
    #[validate(
        required(message = "customerId is required."),
        length(min = 1, message = "customerId is required.")
    )]
    pub customer_id: Option<String>,

    /// `None` when the key is absent (the configured default applies),
    /// `Some(None)` when it is sent as `null` or a non-id value.
    #[serde(default, deserialize_with = "present_string_or_number")]
    pub login_customer_id: Option<Option<String>>,

    #[validate(
        required(message = "refreshToken is required."),
        length(min = 1, message = "refreshToken is required.")
    )]
    pub refresh_token: Option<String>,

    #[serde(default)]
    pub date_range: Value,
}

/// Accepts ids sent either as strings or as bare JSON numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Like [`string_or_number`], but records that the key was present.
fn present_string_or_number<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    string_or_number(deserializer).map(Some)
}

/// The dashboard payload.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    pub customer_id: String,
    pub login_customer_id: Option<String>,
    pub date_clause: String,
    pub daily_spend: Vec<ReportRow>,
    pub campaign_performance: Vec<ReportRow>,
    pub ad_groups: Vec<ReportRow>,
    pub keywords: Vec<ReportRow>,
    pub locations: Vec<ReportRow>,
    pub devices: Vec<ReportRow>,
    pub totals: Totals,
}

impl From<MetricsReport> for MetricsResponse {
    fn from(report: MetricsReport) -> Self {
        Self {
            customer_id: report.customer_id,
            login_customer_id: report.login_customer_id,
            date_clause: report.date_clause.into_string(),
            daily_spend: report.daily_spend,
            campaign_performance: report.campaign_performance,
            ad_groups: report.ad_groups,
            keywords: report.keywords,
            locations: report.locations,
            devices: report.devices,
            totals: report.totals,
        }
    }
}
