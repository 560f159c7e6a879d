//! Flattening of raw Google Ads rows into display-ready records.
//!
//! Every report is described by a table of [`FieldSpec`]s: an output key, a
//! path into the nested upstream row, and a coercion rule. A single routine,
//! [`normalize_rows`], applies that table. It never fails: the upstream shape
//! is not under our control, so missing dimensions are omitted and bad
//! metrics read as zero.

use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};

use super::report::ReportKind;

const MICROS_PER_UNIT: f64 = 1_000_000.0;

/// Largest integer an `f64` holds exactly (2^53).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// How a raw value becomes an output value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Copied as-is; omitted when the path is missing.
    Dimension,
    /// Coerced to a finite number, zero otherwise.
    Number,
    /// Coerced like [`Coercion::Number`], then converted from micro-units.
    Micros,
}

/// One output field of a normalized row.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub path: &'static [&'static str],
    pub coercion: Coercion,
}

const fn dimension(key: &'static str, path: &'static [&'static str]) -> FieldSpec {
    FieldSpec {
        key,
        path,
        coercion: Coercion::Dimension,
    }
}

const fn number(key: &'static str, path: &'static [&'static str]) -> FieldSpec {
    FieldSpec {
        key,
        path,
        coercion: Coercion::Number,
    }
}

const fn micros(key: &'static str, path: &'static [&'static str]) -> FieldSpec {
    FieldSpec {
        key,
        path,
        coercion: Coercion::Micros,
    }
}

const COST: FieldSpec = micros("cost", &["metrics", "costMicros"]);
const IMPRESSIONS: FieldSpec = number("impressions", &["metrics", "impressions"]);
const CLICKS: FieldSpec = number("clicks", &["metrics", "clicks"]);
const CONVERSIONS: FieldSpec = number("conversions", &["metrics", "conversions"]);
const AVERAGE_CPC: FieldSpec = micros("averageCpc", &["metrics", "averageCpc"]);

const DAILY_SPEND_FIELDS: &[FieldSpec] = &[
    dimension("date", &["segments", "date"]),
    COST,
    IMPRESSIONS,
    CLICKS,
    CONVERSIONS,
];

const CAMPAIGN_FIELDS: &[FieldSpec] = &[
    dimension("id", &["campaign", "id"]),
    dimension("name", &["campaign", "name"]),
    dimension("status", &["campaign", "status"]),
    COST,
    IMPRESSIONS,
    CLICKS,
    CONVERSIONS,
    AVERAGE_CPC,
];

const AD_GROUP_FIELDS: &[FieldSpec] = &[
    dimension("id", &["adGroup", "id"]),
    dimension("name", &["adGroup", "name"]),
    dimension("campaignId", &["campaign", "id"]),
    dimension("campaignName", &["campaign", "name"]),
    COST,
    IMPRESSIONS,
    CLICKS,
    CONVERSIONS,
];

const KEYWORD_FIELDS: &[FieldSpec] = &[
    dimension("adGroupId", &["adGroup", "id"]),
    dimension("adGroupName", &["adGroup", "name"]),
    dimension("campaignId", &["campaign", "id"]),
    dimension("campaignName", &["campaign", "name"]),
    dimension("text", &["adGroupCriterion", "keyword", "text"]),
    dimension("matchType", &["adGroupCriterion", "keyword", "matchType"]),
    IMPRESSIONS,
    CLICKS,
    COST,
    CONVERSIONS,
    AVERAGE_CPC,
];

const LOCATION_FIELDS: &[FieldSpec] = &[
    dimension("country", &["segments", "geoTargetCountry"]),
    dimension("region", &["segments", "geoTargetRegion"]),
    dimension("city", &["segments", "geoTargetCity"]),
    IMPRESSIONS,
    CLICKS,
    COST,
    CONVERSIONS,
];

const DEVICE_FIELDS: &[FieldSpec] = &[
    dimension("device", &["segments", "device"]),
    IMPRESSIONS,
    CLICKS,
    COST,
    CONVERSIONS,
];

impl ReportKind {
    /// Output fields of the normalized report.
    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            ReportKind::DailySpend => DAILY_SPEND_FIELDS,
            ReportKind::CampaignPerformance => CAMPAIGN_FIELDS,
            ReportKind::AdGroups => AD_GROUP_FIELDS,
            ReportKind::Keywords => KEYWORD_FIELDS,
            ReportKind::Locations => LOCATION_FIELDS,
            ReportKind::Devices => DEVICE_FIELDS,
        }
    }
}

/// A flat, display-ready report row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ReportRow(Map<String, Value>);

impl ReportRow {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Reads a metric field, treating anything non-numeric as zero.
    pub fn metric(&self, key: &str) -> f64 {
        self.0.get(key).and_then(Value::as_f64).unwrap_or(0.0)
    }
}

/// Normalizes every raw row of a report.
pub fn normalize_rows(kind: ReportKind, rows: &[Value]) -> Vec<ReportRow> {
    let fields = kind.fields();
    rows.iter().map(|row| normalize_row(fields, row)).collect()
}

/// Applies a field table to one raw row.
pub fn normalize_row(fields: &[FieldSpec], row: &Value) -> ReportRow {
    let mut out = Map::with_capacity(fields.len());

    for field in fields {
        let raw = lookup(row, field.path);
        match field.coercion {
            Coercion::Dimension => {
                if let Some(value) = raw {
                    out.insert(field.key.to_string(), value.clone());
                }
            }
            Coercion::Number => {
                out.insert(field.key.to_string(), number_value(number_or_zero(raw)));
            }
            Coercion::Micros => {
                out.insert(field.key.to_string(), number_value(micros_to_currency(raw)));
            }
        }
    }

    ReportRow(out)
}

fn lookup<'a>(row: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(row, |node, segment| node.get(*segment))
}

/// Coerces an upstream value to a finite number.
///
/// Google's REST encoding sends 64-bit integers as strings, so numeric
/// strings are parsed. Anything else that is not a finite number is zero.
pub fn number_or_zero(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };

    parsed.filter(|n| n.is_finite()).unwrap_or(0.0)
}

/// Converts a micro-unit amount into major currency units.
pub fn micros_to_currency(value: Option<&Value>) -> f64 {
    round6(number_or_zero(value) / MICROS_PER_UNIT)
}

/// Rounds to 6 decimal places.
pub fn round6(value: f64) -> f64 {
    let rounded = (value * MICROS_PER_UNIT).round() / MICROS_PER_UNIT;
    if rounded.is_finite() { rounded } else { value }
}

/// Renders a number the way a JSON client expects: integral values without
/// a fractional part.
pub fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INTEGER {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::from(0))
    }
}

/// `serialize_with` helper applying [`number_value`].
pub fn serialize_number<S: Serializer>(n: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    number_value(*n).serialize(serializer)
}
