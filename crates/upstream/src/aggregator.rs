//! Best-effort aggregation of identity-linked financial data.
//!
//! Invoked only on the "My State" path. Every upstream failure is caught
//! here, logged, and downgraded to "no data" — the card always renders,
//! with defaults where data is missing.

use std::sync::Arc;

use chrono::Utc;
use tc_domain::state::ResolvedState;

use crate::allowance::AllowanceSource;
use crate::identity::Interactor;
use crate::points::PointsSource;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Allowance figures
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The three allowance-derived display values. Defaults to all-zero,
/// which is also the answer whenever today's snapshot is missing or the
/// service misbehaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowanceFigures {
    pub tip_allowance: String,
    pub remaining_tip_allowance: String,
    pub tipped: String,
}

impl Default for AllowanceFigures {
    fn default() -> Self {
        Self {
            tip_allowance: "0".into(),
            remaining_tip_allowance: "0".into(),
            tipped: "0".into(),
        }
    }
}

/// `max(tip_allowance − remaining, 0)` as a base-10 integer string.
/// Unparseable inputs yield `"0"`.
pub fn compute_tipped(tip_allowance: &str, remaining: &str) -> String {
    let tip = tip_allowance.parse::<f64>().unwrap_or(f64::NAN);
    let rem = remaining.parse::<f64>().unwrap_or(f64::NAN);
    let diff = tip - rem;
    if diff > 0.0 {
        format!("{}", diff as i64)
    } else {
        "0".into()
    }
}

/// Today's UTC calendar day as an ISO date string (`YYYY-MM-DD`).
pub fn today_utc() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IdentityDataAggregator
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct IdentityDataAggregator {
    points: Arc<dyn PointsSource>,
    allowance: Arc<dyn AllowanceSource>,
}

impl IdentityDataAggregator {
    pub fn new(points: Arc<dyn PointsSource>, allowance: Arc<dyn AllowanceSource>) -> Self {
        Self { points, allowance }
    }

    /// Overwrite the aggregator-owned fields of `state` with fresh data
    /// for `interactor`: identity attributes, today's allowance figures,
    /// and wallet-derived points. Geometry and other resolver-owned
    /// fields are untouched. Never fails.
    pub async fn apply(&self, interactor: &Interactor, state: &mut ResolvedState) {
        state.fid = interactor.fid.to_string();
        if interactor.username.is_empty() {
            state.username = "unknown".into();
        } else {
            state.username = interactor.username.clone();
        }
        if !interactor.pfp_url.is_empty() {
            state.pfp_url = interactor.pfp_url.clone();
        }

        let figures = self.resolve_allowance(&state.fid, &today_utc()).await;
        state.tip_allowance = figures.tip_allowance;
        state.remaining_tip_allowance = figures.remaining_tip_allowance;
        state.tipped = figures.tipped;

        let wallets = interactor.wallet_set();
        if wallets.is_empty() {
            tracing::debug!(fid = interactor.fid, "no wallets for interactor");
        } else if let Some(points) = self.resolve_points(&wallets).await {
            state.points = points;
        }
    }

    /// Walk the wallet set in order and adopt the first non-empty points
    /// value. The loop is deliberately sequential: "first in wallet order
    /// that returned non-empty" is the contract, not "first to respond",
    /// and later wallets must not be queried once one hits.
    pub async fn resolve_points(&self, wallets: &[String]) -> Option<String> {
        for wallet in wallets {
            match self.points.points_for_wallet(wallet).await {
                Ok(Some(points)) if !points.is_empty() => {
                    tracing::debug!(wallet = %wallet, points = %points, "points resolved");
                    return Some(points);
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(wallet = %wallet, error = %e, "points lookup failed");
                }
            }
        }
        None
    }

    /// Today's allowance figures for a fid. Any failure, and any day
    /// without a matching snapshot, yields all-zero figures.
    pub async fn resolve_allowance(&self, fid: &str, today: &str) -> AllowanceFigures {
        let entries = match self.allowance.allowances_for_fid(fid).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(fid = %fid, error = %e, "allowance lookup failed");
                return AllowanceFigures::default();
            }
        };

        match entries.iter().find(|e| e.snapshot_day.starts_with(today)) {
            Some(entry) => {
                let tip_allowance = non_empty_or_zero(&entry.tip_allowance);
                let remaining = non_empty_or_zero(&entry.remaining_tip_allowance);
                let tipped = compute_tipped(&tip_allowance, &remaining);
                AllowanceFigures {
                    tip_allowance,
                    remaining_tip_allowance: remaining,
                    tipped,
                }
            }
            None => {
                tracing::debug!(fid = %fid, today = %today, "no allowance snapshot for today");
                AllowanceFigures::default()
            }
        }
    }
}

fn non_empty_or_zero(value: &str) -> String {
    if value.is_empty() {
        "0".into()
    } else {
        value.to_owned()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
