//! AppState construction and background-task spawning extracted from `main.rs`.
//!
//! `serve` and the config CLI share the validation path; only `serve`
//! wires the upstream clients and spawns the sweep task.

use std::sync::Arc;

use anyhow::Context;

use tc_domain::config::{Config, ConfigSeverity};
use tc_upstream::aggregator::IdentityDataAggregator;
use tc_upstream::allowance::AllowanceClient;
use tc_upstream::identity::HubIdentityClient;
use tc_upstream::points::PointsClient;

use crate::links::LinkStore;
use crate::state::AppState;

/// Validate config, initialize every subsystem and return a fully-wired
/// [`AppState`].
pub fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    // ── Config validation ────────────────────────────────────────────
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    if issues.iter().any(|i| i.severity == ConfigSeverity::Error) {
        anyhow::bail!(
            "config validation failed with {} error(s)",
            issues
                .iter()
                .filter(|i| i.severity == ConfigSeverity::Error)
                .count()
        );
    }

    // ── Short-link store ─────────────────────────────────────────────
    let links = Arc::new(LinkStore::new(&config.links));
    tracing::info!(
        max_entries = ?config.links.max_entries,
        ttl_minutes = ?config.links.ttl_minutes,
        "link store ready"
    );

    // ── Upstream clients ─────────────────────────────────────────────
    let identity = Arc::new(
        HubIdentityClient::new(&config.upstream).context("initializing identity hub client")?,
    );
    let points = Arc::new(
        PointsClient::new(&config.upstream).context("initializing points client")?,
    );
    let allowance = Arc::new(
        AllowanceClient::new(&config.upstream).context("initializing allowance client")?,
    );
    let aggregator = Arc::new(IdentityDataAggregator::new(points, allowance));
    tracing::info!(
        identity_base = %config.upstream.identity_base_url,
        points_base = %config.upstream.points_base_url,
        allowance_base = %config.upstream.allowance_base_url,
        "upstream clients ready"
    );

    Ok(AppState {
        config,
        links,
        aggregator,
        identity,
    })
}

/// Spawn the long-running background tokio tasks.
///
/// Call this **after** [`build_app_state`] when running the HTTP server.
pub fn spawn_background_tasks(state: &AppState) {
    // ── Periodic expired-link sweep ──────────────────────────────────
    if state.links.has_expiry() {
        let links = state.links.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
            loop {
                interval.tick().await;
                let removed = links.prune_expired();
                if removed > 0 {
                    tracing::debug!(removed, "pruned expired short links");
                }
            }
        });
        tracing::info!("background tasks spawned");
    } else {
        tracing::info!("no link TTL configured, sweep task not started");
    }
}
