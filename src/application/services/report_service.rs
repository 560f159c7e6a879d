//! Report fan-out and assembly of the dashboard payload.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::domain::date_range::{DateClause, DateRange};
use crate::domain::normalize::{ReportRow, normalize_rows};
use crate::domain::providers::{ProviderError, ReportSource};
use crate::domain::report::{ReportKind, ReportQuerySet};
use crate::domain::session::{AuthorizedSession, CustomerSession};
use crate::domain::totals::Totals;
use crate::error::AppError;

/// Raw upstream rows keyed by report.
pub type RawReports = HashMap<ReportKind, Vec<Value>>;

/// Everything the dashboard shows for one request.
#[derive(Debug, Clone)]
pub struct MetricsReport {
    pub customer_id: String,
    pub login_customer_id: Option<String>,
    pub date_clause: DateClause,
    pub daily_spend: Vec<ReportRow>,
    pub campaign_performance: Vec<ReportRow>,
    pub ad_groups: Vec<ReportRow>,
    pub keywords: Vec<ReportRow>,
    pub locations: Vec<ReportRow>,
    pub devices: Vec<ReportRow>,
    pub totals: Totals,
}

impl MetricsReport {
    /// Normalizes every report and derives totals from the daily spend.
    ///
    /// A report missing from `raw` is treated as empty.
    pub fn assemble(
        session: &CustomerSession,
        date_clause: DateClause,
        mut raw: RawReports,
    ) -> Self {
        let mut take =
            |kind: ReportKind| normalize_rows(kind, &raw.remove(&kind).unwrap_or_default());

        let daily_spend = take(ReportKind::DailySpend);
        let campaign_performance = take(ReportKind::CampaignPerformance);
        let ad_groups = take(ReportKind::AdGroups);
        let keywords = take(ReportKind::Keywords);
        let locations = take(ReportKind::Locations);
        let devices = take(ReportKind::Devices);
        let totals = Totals::from_rows(&daily_spend);

        Self {
            customer_id: session.customer_id().to_string(),
            login_customer_id: session.login_customer_id().map(str::to_owned),
            date_clause,
            daily_spend,
            campaign_performance,
            ad_groups,
            keywords,
            locations,
            devices,
            totals,
        }
    }

    /// Rows of one report.
    pub fn rows(&self, kind: ReportKind) -> &[ReportRow] {
        match kind {
            ReportKind::DailySpend => &self.daily_spend,
            ReportKind::CampaignPerformance => &self.campaign_performance,
            ReportKind::AdGroups => &self.ad_groups,
            ReportKind::Keywords => &self.keywords,
            ReportKind::Locations => &self.locations,
            ReportKind::Devices => &self.devices,
        }
    }
}

/// Service running the six dashboard reports for a customer.
///
/// All reads of one request share a single access token and run
/// concurrently. The batch is all-or-nothing: the first failing read fails
/// the request and the reads still in flight are aborted.
pub struct ReportService {
    source: Arc<dyn ReportSource>,
    default_login_customer_id: Option<String>,
    timeout: Option<Duration>,
}

impl ReportService {
    /// Creates a new report service.
    pub fn new(source: Arc<dyn ReportSource>) -> Self {
        Self {
            source,
            default_login_customer_id: None,
            timeout: None,
        }
    }

    /// Manager account used when the caller does not name one.
    pub fn with_default_login_customer_id(mut self, login_customer_id: Option<String>) -> Self {
        self.default_login_customer_id = login_customer_id;
        self
    }

    /// Deadline applied to the whole fan-out.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds a session for the caller's identifiers.
    ///
    /// `login_customer_id` is `None` when the caller did not name a manager
    /// account, in which case the configured one applies. `Some(None)` opts
    /// out of any manager account.
    pub fn session(
        &self,
        customer_id: &str,
        login_customer_id: Option<Option<&str>>,
        refresh_token: &str,
    ) -> CustomerSession {
        let login = login_customer_id.unwrap_or(self.default_login_customer_id.as_deref());
        CustomerSession::new(customer_id, login, refresh_token)
    }

    /// Resolves the period, runs all reports and assembles the payload.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the refresh token is rejected or any
    /// single report fails.
    pub async fn fetch_metrics(
        &self,
        session: CustomerSession,
        date_range: &DateRange,
    ) -> Result<MetricsReport, AppError> {
        let date_clause = date_range.resolve();
        let queries = ReportQuerySet::new(&date_clause);

        info!(
            customer_id = session.customer_id(),
            clause = %date_clause,
            "Fetching dashboard reports"
        );

        let raw = self
            .fetch_raw(session.clone(), queries)
            .await
            .map_err(|e| AppError::upstream("Unable to fetch Google Ads metrics.", &e))?;

        Ok(MetricsReport::assemble(&session, date_clause, raw))
    }

    /// Authorizes the session once and runs every query concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first [`ProviderError`] raised by authorization or any read,
    /// or [`ProviderError::Timeout`] if the deadline passes.
    pub async fn fetch_raw(
        &self,
        session: CustomerSession,
        queries: ReportQuerySet,
    ) -> Result<RawReports, ProviderError> {
        let authorized = Arc::new(self.source.authorize(session).await?);

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.fan_out(authorized, queries))
                .await
                .map_err(|_| ProviderError::Timeout(limit))?,
            None => self.fan_out(authorized, queries).await,
        }
    }

    async fn fan_out(
        &self,
        session: Arc<AuthorizedSession>,
        queries: ReportQuerySet,
    ) -> Result<RawReports, ProviderError> {
        let mut tasks = JoinSet::new();

        for query in queries {
            let source = Arc::clone(&self.source);
            let session = Arc::clone(&session);
            tasks.spawn(async move {
                let rows = source.search(&session, &query.gaql).await;
                (query.kind, rows)
            });
        }

        let mut raw = RawReports::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            let (kind, rows) = joined.map_err(|e| ProviderError::Http(e.to_string()))?;
            match rows {
                Ok(rows) => {
                    debug!(report = %kind, rows = rows.len(), "Report fetched");
                    raw.insert(kind, rows);
                }
                Err(e) => {
                    warn!(report = %kind, error = %e, "Report failed; aborting batch");
                    return Err(e);
                }
            }
        }

        Ok(raw)
    }
}
