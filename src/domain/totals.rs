//! Summary totals over the daily spend report.

use serde::Serialize;

use super::normalize::{ReportRow, round6, serialize_number};

/// Sums across the daily spend rows plus the derived average CPC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    #[serde(serialize_with = "serialize_number")]
    pub cost: f64,
    #[serde(serialize_with = "serialize_number")]
    pub impressions: f64,
    #[serde(serialize_with = "serialize_number")]
    pub clicks: f64,
    #[serde(serialize_with = "serialize_number")]
    pub conversions: f64,
    #[serde(serialize_with = "serialize_number")]
    pub average_cpc: f64,
}

impl Totals {
    /// Folds normalized daily spend rows into totals.
    ///
    /// `average_cpc` is `cost / clicks` rounded to 6 places, or zero when
    /// there were no clicks.
    pub fn from_rows(rows: &[ReportRow]) -> Self {
        let mut totals = rows.iter().fold(Self::default(), |acc, row| Self {
            cost: acc.cost + row.metric("cost"),
            impressions: acc.impressions + row.metric("impressions"),
            clicks: acc.clicks + row.metric("clicks"),
            conversions: acc.conversions + row.metric("conversions"),
            average_cpc: 0.0,
        });

        if totals.clicks > 0.0 {
            totals.average_cpc = round6(totals.cost / totals.clicks);
        }

        totals
    }
}
