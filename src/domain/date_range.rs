//! Date range resolution into a GAQL `segments.date` predicate.

use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

/// Clause used whenever the caller's range is missing or malformed.
pub const DEFAULT_DATE_CLAUSE: &str = "segments.date DURING LAST_30_DAYS";

/// Named periods accepted by `DURING`, matched against the upper-cased preset.
static PRESET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:LAST_[0-9]+_DAYS|THIS_[0-9A-Za-z_]+|LAST_[0-9A-Za-z_]+|TODAY|YESTERDAY|ALL_TIME)$",
    )
    .expect("preset pattern is valid")
});

/// Calendar dates are checked by shape only.
static DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date pattern is valid"));

/// Caller-supplied reporting period.
///
/// Either a named `preset` (`LAST_7_DAYS`, `THIS_MONTH`, ...) or an explicit
/// `start_date`/`end_date` pair. Resolution never fails: anything that does
/// not fit falls back to [`DEFAULT_DATE_CLAUSE`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub preset: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateRange {
    /// Range selecting a named period.
    pub fn preset(preset: impl Into<String>) -> Self {
        Self {
            preset: Some(preset.into()),
            ..Self::default()
        }
    }

    /// Range selecting an inclusive pair of `YYYY-MM-DD` dates.
    pub fn between(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            preset: None,
            start_date: Some(start_date.into()),
            end_date: Some(end_date.into()),
        }
    }

    /// Reads a range from an untyped JSON payload.
    ///
    /// Non-object payloads and non-string fields are ignored rather than
    /// rejected, so a sloppy client still gets the default period.
    pub fn from_json(value: &Value) -> Self {
        let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_owned);

        Self {
            preset: field("preset"),
            start_date: field("startDate"),
            end_date: field("endDate"),
        }
    }

    /// Resolves the range into the filter clause shared by every report.
    pub fn resolve(&self) -> DateClause {
        if let Some(preset) = self.preset.as_deref().map(str::to_uppercase)
            && PRESET_REGEX.is_match(&preset)
        {
            return DateClause(format!("segments.date DURING {preset}"));
        }

        if let (Some(start), Some(end)) = (self.start_date.as_deref(), self.end_date.as_deref())
            && DATE_REGEX.is_match(start)
            && DATE_REGEX.is_match(end)
        {
            return DateClause(format!("segments.date BETWEEN '{start}' AND '{end}'"));
        }

        DateClause::default()
    }
}

/// A resolved `segments.date` predicate, safe to splice into GAQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateClause(String);

impl DateClause {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for DateClause {
    fn default() -> Self {
        Self(DEFAULT_DATE_CLAUSE.to_string())
    }
}

impl fmt::Display for DateClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
