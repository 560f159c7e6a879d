#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use ads_dashboard::prelude::{
    AppState, AuthService, AuthorizedSession, ConsentUrl, CustomerSession, OAuthProvider,
    ProviderError, ReportKind, ReportService, ReportSource, TokenBundle,
};
use async_trait::async_trait;
use serde_json::{Value, json};

pub const VALID_CODE: &str = "4/valid-code";
pub const NO_REFRESH_CODE: &str = "4/no-refresh";
pub const VALID_REFRESH_TOKEN: &str = "1//valid-refresh";

/// OAuth provider that accepts [`VALID_CODE`] and [`NO_REFRESH_CODE`].
#[derive(Default)]
pub struct FakeOAuth {
    pub redirects: Mutex<Vec<Option<String>>>,
}

#[async_trait]
impl OAuthProvider for FakeOAuth {
    fn authorize_url(&self, state: Option<String>) -> ConsentUrl {
        let state = state.unwrap_or_else(|| "generated-state".to_string());
        ConsentUrl {
            url: format!(
                "https://accounts.google.com/o/oauth2/v2/auth?response_type=code&client_id=test\
                 &scope=https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fadwords&state={state}\
                 &access_type=offline&prompt=consent"
            ),
            state,
        }
    }

    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: Option<String>,
    ) -> Result<TokenBundle, ProviderError> {
        self.redirects.lock().unwrap().push(redirect_uri);

        let refresh_token = match code {
            VALID_CODE => Some(VALID_REFRESH_TOKEN.to_string()),
            NO_REFRESH_CODE => None,
            _ => {
                return Err(ProviderError::Authorization(
                    "invalid_grant: Bad Request".to_string(),
                ));
            }
        };

        Ok(TokenBundle {
            access_token: "ya29.access".to_string(),
            refresh_token,
            expiry_date: Some(1_700_000_000_000),
            scope: Some("https://www.googleapis.com/auth/adwords".to_string()),
            token_type: "Bearer".to_string(),
        })
    }
}

/// Report source serving canned rows and recording what it was asked.
#[derive(Default)]
pub struct FakeAds {
    pub failing: HashSet<ReportKind>,
    pub queries: Mutex<Vec<String>>,
    pub sessions: Mutex<Vec<CustomerSession>>,
}

impl FakeAds {
    pub fn failing(kind: ReportKind) -> Self {
        Self {
            failing: HashSet::from([kind]),
            ..Self::default()
        }
    }

    pub fn recorded_queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn recorded_sessions(&self) -> Vec<CustomerSession> {
        self.sessions.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportSource for FakeAds {
    async fn authorize(
        &self,
        session: CustomerSession,
    ) -> Result<AuthorizedSession, ProviderError> {
        self.sessions.lock().unwrap().push(session.clone());

        if session.refresh_token() != VALID_REFRESH_TOKEN {
            return Err(ProviderError::Authorization(
                "invalid_grant: Token has been expired or revoked.".to_string(),
            ));
        }
        Ok(AuthorizedSession::new(session, "ya29.access"))
    }

    async fn search(
        &self,
        _session: &AuthorizedSession,
        query: &str,
    ) -> Result<Vec<Value>, ProviderError> {
        self.queries.lock().unwrap().push(query.to_string());

        let kind = kind_of(query);
        if self.failing.contains(&kind) {
            return Err(ProviderError::Api {
                status: 403,
                message: "The caller does not have permission".to_string(),
            });
        }
        Ok(canned_rows(kind))
    }
}

/// Identifies which report a GAQL query belongs to.
pub fn kind_of(query: &str) -> ReportKind {
    if query.contains("FROM keyword_view") {
        ReportKind::Keywords
    } else if query.contains("FROM ad_group") {
        ReportKind::AdGroups
    } else if query.contains("segments.geo_target_country") {
        ReportKind::Locations
    } else if query.contains("segments.device") {
        ReportKind::Devices
    } else if query.contains("campaign.status") {
        ReportKind::CampaignPerformance
    } else {
        ReportKind::DailySpend
    }
}

/// Upstream-shaped rows: camelCase paths, int64 values as strings.
pub fn canned_rows(kind: ReportKind) -> Vec<Value> {
    match kind {
        ReportKind::DailySpend => vec![
            json!({
                "segments": { "date": "2024-01-02" },
                "metrics": {
                    "costMicros": "2500000",
                    "impressions": "100",
                    "clicks": "5",
                    "conversions": 1.5
                }
            }),
            json!({
                "segments": { "date": "2024-01-01" },
                "metrics": { "costMicros": "1000000", "impressions": "50", "clicks": "10" }
            }),
        ],
        ReportKind::CampaignPerformance => vec![json!({
            "campaign": { "id": "111", "name": "Brand", "status": "ENABLED" },
            "metrics": {
                "costMicros": "3500000",
                "impressions": "150",
                "clicks": "15",
                "conversions": 1.5,
                "averageCpc": "233333"
            }
        })],
        ReportKind::AdGroups => vec![json!({
            "adGroup": { "id": "222", "name": "Shoes" },
            "campaign": { "id": "111", "name": "Brand" },
            "metrics": { "costMicros": "3500000", "impressions": "150", "clicks": "15" }
        })],
        ReportKind::Keywords => vec![json!({
            "adGroup": { "id": "222", "name": "Shoes" },
            "campaign": { "id": "111", "name": "Brand" },
            "adGroupCriterion": { "keyword": { "text": "running shoes", "matchType": "PHRASE" } },
            "metrics": {
                "costMicros": "1200000",
                "impressions": "40",
                "clicks": "4",
                "averageCpc": "300000"
            }
        })],
        ReportKind::Locations => vec![json!({
            "segments": { "geoTargetCountry": "geoTargetConstants/2840" },
            "metrics": { "impressions": "150", "clicks": "15", "costMicros": "3500000" }
        })],
        ReportKind::Devices => vec![
            json!({
                "segments": { "device": "MOBILE" },
                "metrics": { "impressions": "120", "clicks": "12", "costMicros": "2000000" }
            }),
            json!({
                "segments": { "device": "DESKTOP" },
                "metrics": { "impressions": "30", "clicks": "3", "costMicros": "1500000" }
            }),
        ],
    }
}

pub struct TestContext {
    pub state: AppState,
    pub oauth: Arc<FakeOAuth>,
    pub ads: Arc<FakeAds>,
}

pub fn create_test_state() -> TestContext {
    create_test_state_with(FakeAds::default(), None)
}

pub fn create_test_state_with(
    ads: FakeAds,
    default_login_customer_id: Option<&str>,
) -> TestContext {
    let oauth = Arc::new(FakeOAuth::default());
    let ads = Arc::new(ads);

    let auth_service = Arc::new(AuthService::new(oauth.clone()));
    let report_service = Arc::new(
        ReportService::new(ads.clone())
            .with_default_login_customer_id(default_login_customer_id.map(str::to_owned)),
    );

    TestContext {
        state: AppState::new(auth_service, report_service),
        oauth,
        ads,
    }
}
