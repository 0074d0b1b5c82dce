//! Aggregator fallback-policy tests against fake upstream sources.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tc_domain::error::{Error, Result};
use tc_domain::state::ResolvedState;
use tc_upstream::aggregator::{today_utc, IdentityDataAggregator};
use tc_upstream::allowance::{AllowanceEntry, AllowanceSource};
use tc_upstream::identity::{Interactor, VerifiedAddresses};
use tc_upstream::points::PointsSource;

// ── fakes ───────────────────────────────────────────────────────────

/// Points source backed by a wallet → response map, recording every query.
struct FakePoints {
    responses: HashMap<String, Option<String>>,
    fail_wallets: Vec<String>,
    queried: Mutex<Vec<String>>,
}

impl FakePoints {
    fn new(responses: &[(&str, Option<&str>)]) -> Self {
        Self {
            responses: responses
                .iter()
                .map(|(w, p)| ((*w).to_owned(), p.map(str::to_owned)))
                .collect(),
            fail_wallets: Vec::new(),
            queried: Mutex::new(Vec::new()),
        }
    }

    fn failing_for(mut self, wallet: &str) -> Self {
        self.fail_wallets.push(wallet.to_owned());
        self
    }

    fn queried(&self) -> Vec<String> {
        self.queried.lock().clone()
    }
}

#[async_trait]
impl PointsSource for FakePoints {
    async fn points_for_wallet(&self, wallet: &str) -> Result<Option<String>> {
        self.queried.lock().push(wallet.to_owned());
        if self.fail_wallets.iter().any(|w| w == wallet) {
            return Err(Error::Upstream {
                service: "points".into(),
                message: "returned 503: unavailable".into(),
            });
        }
        Ok(self.responses.get(wallet).cloned().flatten())
    }
}

struct FakeAllowance {
    entries: Vec<AllowanceEntry>,
    fail: bool,
}

impl FakeAllowance {
    fn with_entries(entries: Vec<AllowanceEntry>) -> Self {
        Self {
            entries,
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            entries: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl AllowanceSource for FakeAllowance {
    async fn allowances_for_fid(&self, _fid: &str) -> Result<Vec<AllowanceEntry>> {
        if self.fail {
            return Err(Error::Timeout("deadline exceeded".into()));
        }
        Ok(self.entries.clone())
    }
}

fn entry(day: &str, tip: &str, remaining: &str) -> AllowanceEntry {
    serde_json::from_str(&format!(
        r#"{{"snapshot_day":"{day}","tip_allowance":"{tip}","remaining_tip_allowance":"{remaining}"}}"#
    ))
    .unwrap()
}

fn interactor(fid: u64, eth: &[&str], custody: Option<&str>) -> Interactor {
    Interactor {
        fid,
        username: "alice".into(),
        pfp_url: "https://example.com/pfp.png".into(),
        custody_address: custody.map(str::to_owned),
        verified_addresses: VerifiedAddresses {
            eth_addresses: eth.iter().map(|s| (*s).to_owned()).collect(),
        },
    }
}

fn aggregator(
    points: FakePoints,
    allowance: FakeAllowance,
) -> (IdentityDataAggregator, Arc<FakePoints>) {
    let points = Arc::new(points);
    let agg = IdentityDataAggregator::new(points.clone(), Arc::new(allowance));
    (agg, points)
}

// ── wallet short-circuit ────────────────────────────────────────────

#[tokio::test]
async fn first_non_empty_wallet_wins_and_stops_the_loop() {
    let (agg, points) = aggregator(
        FakePoints::new(&[("0xa", None), ("0xb", Some("120")), ("0xc", Some("999"))]),
        FakeAllowance::with_entries(vec![]),
    );

    let resolved = agg
        .resolve_points(&["0xa".into(), "0xb".into(), "0xc".into()])
        .await;
    assert_eq!(resolved.as_deref(), Some("120"));
    assert_eq!(points.queried(), vec!["0xa", "0xb"], "0xc must not be queried");
}

#[tokio::test]
async fn failed_wallet_falls_through_to_the_next() {
    let (agg, points) = aggregator(
        FakePoints::new(&[("0xb", Some("77"))]).failing_for("0xa"),
        FakeAllowance::with_entries(vec![]),
    );

    let resolved = agg.resolve_points(&["0xa".into(), "0xb".into()]).await;
    assert_eq!(resolved.as_deref(), Some("77"));
    assert_eq!(points.queried(), vec!["0xa", "0xb"]);
}

#[tokio::test]
async fn all_empty_wallets_leave_points_at_prior_value() {
    let (agg, _) = aggregator(
        FakePoints::new(&[("0xa", None), ("0xb", None)]),
        FakeAllowance::with_entries(vec![]),
    );

    let mut state = ResolvedState::default();
    state.points = "555".into();
    agg.apply(&interactor(1, &["0xa", "0xb"], None), &mut state)
        .await;
    assert_eq!(state.points, "555", "prior value must survive an all-miss");
}

// ── allowance resolution ────────────────────────────────────────────

#[tokio::test]
async fn todays_snapshot_drives_allowance_and_tipped() {
    let today = today_utc();
    let (agg, _) = aggregator(
        FakePoints::new(&[]),
        FakeAllowance::with_entries(vec![
            entry("2020-01-01 00:00:00", "999", "999"),
            entry(&format!("{today} 00:00:00"), "100", "40"),
        ]),
    );

    let figures = agg.resolve_allowance("3621", &today).await;
    assert_eq!(figures.tip_allowance, "100");
    assert_eq!(figures.remaining_tip_allowance, "40");
    assert_eq!(figures.tipped, "60");
}

#[tokio::test]
async fn no_snapshot_for_today_zeroes_all_three() {
    let (agg, _) = aggregator(
        FakePoints::new(&[]),
        FakeAllowance::with_entries(vec![entry("2020-01-01", "100", "40")]),
    );

    let figures = agg.resolve_allowance("3621", &today_utc()).await;
    assert_eq!(figures.tip_allowance, "0");
    assert_eq!(figures.remaining_tip_allowance, "0");
    assert_eq!(figures.tipped, "0");
}

#[tokio::test]
async fn allowance_failure_zeroes_all_three() {
    let (agg, _) = aggregator(FakePoints::new(&[]), FakeAllowance::failing());

    let figures = agg.resolve_allowance("3621", &today_utc()).await;
    assert_eq!(figures.tip_allowance, "0");
    assert_eq!(figures.remaining_tip_allowance, "0");
    assert_eq!(figures.tipped, "0");
}

// ── full apply ──────────────────────────────────────────────────────

#[tokio::test]
async fn apply_overwrites_identity_but_preserves_geometry() {
    let today = today_utc();
    let (agg, _) = aggregator(
        FakePoints::new(&[("0xa", Some("42"))]),
        FakeAllowance::with_entries(vec![entry(&today, "100", "40")]),
    );

    let mut state = ResolvedState::default();
    state.image_top = "17".into();
    state.image_left = "33".into();

    agg.apply(&interactor(3621, &["0xa"], None), &mut state).await;

    assert_eq!(state.fid, "3621");
    assert_eq!(state.username, "alice");
    assert_eq!(state.pfp_url, "https://example.com/pfp.png");
    assert_eq!(state.points, "42");
    assert_eq!(state.tipped, "60");
    // Resolver-owned geometry fields are untouched by aggregation.
    assert_eq!(state.image_top, "17");
    assert_eq!(state.image_left, "33");
}

#[tokio::test]
async fn apply_with_empty_username_falls_back_to_unknown() {
    let (agg, _) = aggregator(FakePoints::new(&[]), FakeAllowance::failing());

    let mut who = interactor(9, &[], None);
    who.username = String::new();

    let mut state = ResolvedState::default();
    state.username = "bob".into();
    agg.apply(&who, &mut state).await;
    assert_eq!(state.username, "unknown");
}

#[tokio::test]
async fn apply_never_fails_when_everything_is_down() {
    let (agg, _) = aggregator(
        FakePoints::new(&[]).failing_for("0xa"),
        FakeAllowance::failing(),
    );

    let mut state = ResolvedState::default();
    agg.apply(&interactor(9, &["0xa"], None), &mut state).await;

    // Always a fully-populated state, zeros/defaults where data is missing.
    assert_eq!(state.fid, "9");
    assert_eq!(state.tip_allowance, "0");
    assert_eq!(state.points, "N/A");
}
