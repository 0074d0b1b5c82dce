//! End-to-end router tests: shorten, follow, and card rendering against
//! faked upstream sources.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use tc_domain::config::Config;
use tc_domain::error::{Error, Result};
use tc_gateway::links::LinkStore;
use tc_gateway::state::AppState;
use tc_upstream::aggregator::IdentityDataAggregator;
use tc_upstream::allowance::{AllowanceEntry, AllowanceSource};
use tc_upstream::identity::{Interactor, InteractorResolver, VerifiedAddresses};
use tc_upstream::points::PointsSource;

// ── Fakes ───────────────────────────────────────────────────────────

struct FakeIdentity {
    fail: bool,
}

#[async_trait]
impl InteractorResolver for FakeIdentity {
    async fn interactor(&self, fid: u64) -> Result<Interactor> {
        if self.fail {
            return Err(Error::Upstream {
                service: "identity".into(),
                message: "hub unreachable".into(),
            });
        }
        Ok(Interactor {
            fid,
            username: "alice".into(),
            pfp_url: "https://example.com/alice.png".into(),
            custody_address: None,
            verified_addresses: VerifiedAddresses {
                eth_addresses: vec!["0xaaa".into()],
            },
        })
    }
}

struct FakePoints;

#[async_trait]
impl PointsSource for FakePoints {
    async fn points_for_wallet(&self, wallet: &str) -> Result<Option<String>> {
        Ok((wallet == "0xaaa").then(|| "777".to_owned()))
    }
}

struct FakeAllowance;

#[async_trait]
impl AllowanceSource for FakeAllowance {
    async fn allowances_for_fid(&self, _fid: &str) -> Result<Vec<AllowanceEntry>> {
        let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
        Ok(vec![AllowanceEntry {
            snapshot_day: format!("{today}T00:00:00Z"),
            tip_allowance: "100".into(),
            remaining_tip_allowance: "40".into(),
        }])
    }
}

fn test_app(identity_fails: bool) -> axum::Router {
    let config = Config::default();
    let links = Arc::new(LinkStore::new(&config.links));
    let aggregator = Arc::new(IdentityDataAggregator::new(
        Arc::new(FakePoints),
        Arc::new(FakeAllowance),
    ));
    let state = AppState {
        config: Arc::new(config),
        links,
        aggregator,
        identity: Arc::new(FakeIdentity {
            fail: identity_fails,
        }),
    };
    tc_gateway::api::router().with_state(state)
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ── Card ────────────────────────────────────────────────────────────

#[tokio::test]
async fn cold_get_renders_defaults() {
    let app = test_app(false);
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("fc:frame:button:1"));
    assert!(html.contains("<dd>50000</dd>"));
    assert!(html.contains("<dd>unknown</dd>"));
}

#[tokio::test]
async fn query_params_flow_into_the_card() {
    let app = test_app(false);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/?fid=123&username=carol")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let html = body_string(response).await;
    assert!(html.contains("<dd>123</dd>"));
    assert!(html.contains("<dd>carol</dd>"));
}

#[tokio::test]
async fn post_url_preserves_explicit_overrides() {
    let app = test_app(false);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/?imageTop=42&username=carol")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let html = body_string(response).await;
    let post_url_tag = html
        .lines()
        .find(|l| l.contains("fc:frame:post_url"))
        .expect("post_url meta tag present");
    assert!(
        post_url_tag.contains("imageTop=42"),
        "override must survive the post-back: {post_url_tag}"
    );
    assert!(post_url_tag.contains("username=carol"));
    assert!(post_url_tag.contains("action=my_state"));
}

#[tokio::test]
async fn my_state_post_back_aggregates_upstream_data() {
    let app = test_app(false);
    let payload = serde_json::json!({
        "untrustedData": { "fid": 3621, "buttonIndex": 1 }
    });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/?action=my_state")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("<dd>3621</dd>"));
    assert!(html.contains("<dd>alice</dd>"));
    assert!(html.contains("<dd>777</dd>"), "points from the fake source");
    assert!(html.contains("<dd>100</dd>"), "tip allowance");
    assert!(html.contains("<dd>40</dd>"), "remaining");
    assert!(html.contains("<dd>60</dd>"), "tipped = allowance - remaining");
}

#[tokio::test]
async fn my_state_with_broken_hub_still_renders() {
    let app = test_app(true);
    let payload = serde_json::json!({
        "untrustedData": { "fid": 3621, "buttonIndex": 1 }
    });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/?action=my_state")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    // Identity failed before aggregation, so placeholders survive.
    assert!(html.contains("<dd>N/A</dd>"));
}

// ── Shorten + follow ────────────────────────────────────────────────

#[tokio::test]
async fn shorten_then_follow_round_trip() {
    let app = test_app(false);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/shorten?fid=123&username=alice&ignoredKey=dropped")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let minted: serde_json::Value =
        serde_json::from_str(&body_string(response).await).unwrap();
    let id = minted["id"].as_str().unwrap().to_owned();
    assert_eq!(id.len(), 10);
    assert!(minted["shortUrl"].as_str().unwrap().ends_with(&id));

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    assert!(html.contains("http-equiv=\"refresh\""));
    assert!(html.contains("fid=123"));
    assert!(html.contains("username=alice"));
    assert!(!html.contains("ignoredKey"), "unrecognized keys are dropped");
    // Link unfurlers get the full fixed preview.
    assert!(html.contains(r#"property="og:type" content="website""#));
    assert!(html.contains(r#"property="og:image:width" content="1200""#));
    assert!(html.contains(r#"property="og:image:height" content="1200""#));
}

#[tokio::test]
async fn shorten_rejects_requests_without_card_params() {
    let app = test_app(false);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/shorten?buttonValue=my_state")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: serde_json::Value =
        serde_json::from_str(&body_string(response).await).unwrap();
    assert!(error["error"].as_str().unwrap().contains("parameters"));
}

#[tokio::test]
async fn unknown_short_id_is_404() {
    let app = test_app(false);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/ffffffffff")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ── Health ──────────────────────────────────────────────────────────

#[tokio::test]
async fn healthz_reports_ok() {
    let app = test_app(false);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value =
        serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], "ok");
}
