//! The fixed set of dashboard reports and their GAQL queries.

use std::fmt;

use super::date_range::DateClause;

/// Metrics selected by every report.
const STANDARD_METRICS: &[&str] = &[
    "metrics.impressions",
    "metrics.clicks",
    "metrics.cost_micros",
    "metrics.conversions",
];

/// One of the six reports shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReportKind {
    DailySpend,
    CampaignPerformance,
    AdGroups,
    Keywords,
    Locations,
    Devices,
}

impl ReportKind {
    /// Every report, in response order.
    pub const ALL: [ReportKind; 6] = [
        ReportKind::DailySpend,
        ReportKind::CampaignPerformance,
        ReportKind::AdGroups,
        ReportKind::Keywords,
        ReportKind::Locations,
        ReportKind::Devices,
    ];

    /// Report name as it appears in the response payload.
    pub fn name(self) -> &'static str {
        match self {
            ReportKind::DailySpend => "dailySpend",
            ReportKind::CampaignPerformance => "campaignPerformance",
            ReportKind::AdGroups => "adGroups",
            ReportKind::Keywords => "keywords",
            ReportKind::Locations => "locations",
            ReportKind::Devices => "devices",
        }
    }

    /// Static shape of the report: everything except the date clause.
    pub fn definition(self) -> ReportDefinition {
        match self {
            ReportKind::DailySpend => ReportDefinition {
                resource: "customer",
                dimensions: &["segments.date"],
                extra_metrics: &[],
                status_filter: None,
                order_by: "segments.date DESC",
                limit: Some(30),
            },
            ReportKind::CampaignPerformance => ReportDefinition {
                resource: "campaign",
                dimensions: &["campaign.id", "campaign.name", "campaign.status"],
                extra_metrics: &["metrics.average_cpc"],
                status_filter: Some("campaign.status != 'REMOVED'"),
                order_by: "metrics.cost_micros DESC",
                limit: Some(50),
            },
            ReportKind::AdGroups => ReportDefinition {
                resource: "ad_group",
                dimensions: &["ad_group.id", "ad_group.name", "campaign.id", "campaign.name"],
                extra_metrics: &[],
                status_filter: Some("ad_group.status != 'REMOVED'"),
                order_by: "metrics.cost_micros DESC",
                limit: Some(75),
            },
            ReportKind::Keywords => ReportDefinition {
                resource: "keyword_view",
                dimensions: &[
                    "ad_group.id",
                    "ad_group.name",
                    "ad_group_criterion.keyword.text",
                    "ad_group_criterion.keyword.match_type",
                    "campaign.id",
                    "campaign.name",
                ],
                extra_metrics: &["metrics.average_cpc"],
                status_filter: Some("ad_group_criterion.status != 'REMOVED'"),
                order_by: "metrics.clicks DESC",
                limit: Some(100),
            },
            ReportKind::Locations => ReportDefinition {
                resource: "campaign",
                dimensions: &[
                    "segments.geo_target_country",
                    "segments.geo_target_region",
                    "segments.geo_target_city",
                ],
                extra_metrics: &[],
                status_filter: None,
                order_by: "metrics.clicks DESC",
                limit: Some(100),
            },
            ReportKind::Devices => ReportDefinition {
                resource: "campaign",
                dimensions: &["segments.device"],
                extra_metrics: &[],
                status_filter: None,
                order_by: "metrics.clicks DESC",
                limit: None,
            },
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Projection, filter, ordering and row limit of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDefinition {
    pub resource: &'static str,
    pub dimensions: &'static [&'static str],
    pub extra_metrics: &'static [&'static str],
    pub status_filter: Option<&'static str>,
    pub order_by: &'static str,
    pub limit: Option<u32>,
}

impl ReportDefinition {
    /// All selected fields: dimensions, standard metrics, then extras.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.dimensions
            .iter()
            .chain(STANDARD_METRICS)
            .chain(self.extra_metrics)
            .copied()
    }

    /// Renders the GAQL statement for the given date clause.
    pub fn to_gaql(&self, clause: &DateClause) -> String {
        let fields = self.fields().collect::<Vec<_>>().join(",\n  ");

        let mut query = format!(
            "SELECT\n  {fields}\nFROM {}\nWHERE {clause}",
            self.resource
        );
        if let Some(filter) = self.status_filter {
            query.push_str("\n  AND ");
            query.push_str(filter);
        }
        query.push_str("\nORDER BY ");
        query.push_str(self.order_by);
        if let Some(limit) = self.limit {
            query.push_str(&format!("\nLIMIT {limit}"));
        }

        query
    }
}

/// A report paired with its rendered query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportQuery {
    pub kind: ReportKind,
    pub gaql: String,
}

/// The six report queries for one request, all sharing a date clause.
#[derive(Debug, Clone)]
pub struct ReportQuerySet {
    clause: DateClause,
    queries: Vec<ReportQuery>,
}

impl ReportQuerySet {
    pub fn new(clause: &DateClause) -> Self {
        let queries = ReportKind::ALL
            .into_iter()
            .map(|kind| ReportQuery {
                kind,
                gaql: kind.definition().to_gaql(clause),
            })
            .collect();

        Self {
            clause: clause.clone(),
            queries,
        }
    }

    pub fn clause(&self) -> &DateClause {
        &self.clause
    }

    pub fn get(&self, kind: ReportKind) -> Option<&ReportQuery> {
        self.queries.iter().find(|q| q.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReportQuery> {
        self.queries.iter()
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

impl IntoIterator for ReportQuerySet {
    type Item = ReportQuery;
    type IntoIter = std::vec::IntoIter<ReportQuery>;

    fn into_iter(self) -> Self::IntoIter {
        self.queries.into_iter()
    }
}
