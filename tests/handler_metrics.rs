mod common;

use axum::{Router, routing::post};
use axum_test::TestServer;
use ads_dashboard::api::handlers::metrics_handler;
use ads_dashboard::domain::report::ReportKind;
use serde_json::json;

fn make_server(ctx: &common::TestContext) -> TestServer {
    let app = Router::new()
        .route("/metrics", post(metrics_handler))
        .route("/google-ads/metrics", post(metrics_handler))
        .with_state(ctx.state.clone());
    TestServer::new(app).unwrap()
}

fn request(date_range: serde_json::Value) -> serde_json::Value {
    json!({
        "customerId": "123-456-7890",
        "refreshToken": common::VALID_REFRESH_TOKEN,
        "dateRange": date_range
    })
}

// ─── SUCCESS ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_metrics_success() {
    let ctx = common::create_test_state();
    let server = make_server(&ctx);

    let response = server
        .post("/metrics")
        .json(&request(json!({ "preset": "last_7_days" })))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["customerId"], "1234567890");
    assert!(json.get("loginCustomerId").is_none());
    assert_eq!(json["dateClause"], "segments.date DURING LAST_7_DAYS");

    for key in [
        "dailySpend",
        "campaignPerformance",
        "adGroups",
        "keywords",
        "locations",
        "devices",
    ] {
        assert!(json[key].is_array(), "{key} should be an array");
    }

    assert_eq!(json["dailySpend"][0]["date"], "2024-01-02");
    assert_eq!(json["dailySpend"][0]["cost"], 2.5);
    assert_eq!(json["dailySpend"][0]["clicks"], 5);
    assert_eq!(json["dailySpend"][1]["conversions"], 0);
    assert_eq!(json["keywords"][0]["text"], "running shoes");
    assert_eq!(json["keywords"][0]["averageCpc"], 0.3);
    assert!(json["locations"][0].get("region").is_none());
    assert_eq!(json["devices"].as_array().unwrap().len(), 2);

    assert_eq!(json["totals"]["cost"], 3.5);
    assert_eq!(json["totals"]["impressions"], 150);
    assert_eq!(json["totals"]["clicks"], 15);
    assert_eq!(json["totals"]["conversions"], 1.5);
    assert_eq!(json["totals"]["averageCpc"], 0.233333);
}

#[tokio::test]
async fn test_metrics_runs_every_report_with_one_clause() {
    let ctx = common::create_test_state();
    let server = make_server(&ctx);

    server
        .post("/metrics")
        .json(&request(json!({ "startDate": "2024-01-01", "endDate": "2024-01-31" })))
        .await
        .assert_status_ok();

    let queries = ctx.ads.recorded_queries();
    assert_eq!(queries.len(), ReportKind::ALL.len());
    assert!(
        queries
            .iter()
            .all(|q| q.contains("segments.date BETWEEN '2024-01-01' AND '2024-01-31'"))
    );

    let sessions = ctx.ads.recorded_sessions();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].customer_id(), "1234567890");
}

#[tokio::test]
async fn test_metrics_alias_route() {
    let ctx = common::create_test_state();
    let server = make_server(&ctx);

    let response = server.post("/google-ads/metrics").json(&request(json!(null))).await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<serde_json::Value>()["dateClause"],
        "segments.date DURING LAST_30_DAYS"
    );
}

#[tokio::test]
async fn test_metrics_malformed_range_uses_default() {
    let ctx = common::create_test_state();
    let server = make_server(&ctx);

    for date_range in [
        json!({ "preset": "LAST WEEK; DROP" }),
        json!({ "startDate": "2024/01/01", "endDate": "2024-01-31" }),
        json!({ "startDate": "2024-01-01" }),
        json!("LAST_7_DAYS"),
    ] {
        let response = server.post("/metrics").json(&request(date_range)).await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<serde_json::Value>()["dateClause"],
            "segments.date DURING LAST_30_DAYS"
        );
    }
}

#[tokio::test]
async fn test_metrics_numeric_customer_id() {
    let ctx = common::create_test_state();
    let server = make_server(&ctx);

    let response = server
        .post("/metrics")
        .json(&json!({
            "customerId": 1234567890u64,
            "loginCustomerId": "999-888-7777",
            "refreshToken": common::VALID_REFRESH_TOKEN
        }))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["customerId"], "1234567890");
    assert_eq!(json["loginCustomerId"], "9998887777");
}

#[tokio::test]
async fn test_metrics_default_login_customer_id() {
    let ctx = common::create_test_state_with(common::FakeAds::default(), Some("5556667777"));
    let server = make_server(&ctx);

    let response = server.post("/metrics").json(&request(json!(null))).await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<serde_json::Value>()["loginCustomerId"],
        "5556667777"
    );
    assert_eq!(
        ctx.ads.recorded_sessions()[0].login_customer_id(),
        Some("5556667777")
    );
}

#[tokio::test]
async fn test_metrics_null_login_customer_id_skips_default() {
    let ctx = common::create_test_state_with(common::FakeAds::default(), Some("5556667777"));
    let server = make_server(&ctx);

    let response = server
        .post("/metrics")
        .json(&json!({
            "customerId": "123-456-7890",
            "loginCustomerId": null,
            "refreshToken": common::VALID_REFRESH_TOKEN
        }))
        .await;

    response.assert_status_ok();
    assert!(response.json::<serde_json::Value>().get("loginCustomerId").is_none());
    assert_eq!(ctx.ads.recorded_sessions()[0].login_customer_id(), None);
}

// ─── VALIDATION ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_metrics_missing_customer_id() {
    let ctx = common::create_test_state();
    let server = make_server(&ctx);

    let response = server
        .post("/metrics")
        .json(&json!({ "refreshToken": common::VALID_REFRESH_TOKEN }))
        .await;

    response.assert_status_bad_request();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["code"], "validation_error");
    assert_eq!(json["error"], "customerId is required.");
    assert!(ctx.ads.recorded_sessions().is_empty());
}

#[tokio::test]
async fn test_metrics_error_body_is_readable_by_dashboard() {
    let ctx = common::create_test_state();
    let server = make_server(&ctx);

    let response = server
        .post("/google-ads/metrics")
        .json(&json!({ "refreshToken": "x" }))
        .await;

    response.assert_status_bad_request();

    let json = response.json::<serde_json::Value>();
    assert!(json["error"].is_string());
    assert_eq!(json["error"], "customerId is required.");
    assert!(json["details"].get("customerId").is_some());
    assert!(json["details"].get("customer_id").is_none());
}

#[tokio::test]
async fn test_metrics_missing_refresh_token() {
    let ctx = common::create_test_state();
    let server = make_server(&ctx);

    let response = server
        .post("/metrics")
        .json(&json!({ "customerId": "123-456-7890" }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(
        response.json::<serde_json::Value>()["error"],
        "refreshToken is required."
    );
}

#[tokio::test]
async fn test_metrics_customer_id_without_digits() {
    let ctx = common::create_test_state();
    let server = make_server(&ctx);

    let response = server
        .post("/metrics")
        .json(&json!({ "customerId": "abc", "refreshToken": common::VALID_REFRESH_TOKEN }))
        .await;

    response.assert_status_bad_request();
    assert!(ctx.ads.recorded_sessions().is_empty());
}

// ─── UPSTREAM FAILURES ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_metrics_single_report_failure_fails_request() {
    let ctx = common::create_test_state_with(common::FakeAds::failing(ReportKind::Keywords), None);
    let server = make_server(&ctx);

    let response = server.post("/metrics").json(&request(json!(null))).await;

    response.assert_status_internal_server_error();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["code"], "internal_error");
    assert_eq!(json["error"], "Unable to fetch Google Ads metrics.");
    assert!(json["details"].as_str().unwrap().contains("403"));
    assert!(json.get("dailySpend").is_none());
}

#[tokio::test]
async fn test_metrics_rejected_refresh_token() {
    let ctx = common::create_test_state();
    let server = make_server(&ctx);

    let response = server
        .post("/metrics")
        .json(&json!({ "customerId": "1234567890", "refreshToken": "1//revoked" }))
        .await;

    response.assert_status_internal_server_error();
    assert!(ctx.ads.recorded_queries().is_empty());
}
