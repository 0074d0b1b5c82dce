//! Allowance service client — daily tip-allowance snapshots.

use async_trait::async_trait;
use serde::Deserialize;
use tc_domain::config::UpstreamConfig;
use tc_domain::error::Result;

use crate::http::UpstreamHttp;

/// One allowance snapshot. `snapshot_day` is a date-prefixed string
/// (`"2026-08-23 00:00:00"` or plain ISO date) bucketing the record to a
/// UTC calendar day.
#[derive(Debug, Clone, Deserialize)]
pub struct AllowanceEntry {
    #[serde(default)]
    pub snapshot_day: String,
    #[serde(default)]
    pub tip_allowance: String,
    #[serde(default)]
    pub remaining_tip_allowance: String,
}

/// Source of allowance snapshots for a fid. Trait seam for testing.
#[async_trait]
pub trait AllowanceSource: Send + Sync {
    async fn allowances_for_fid(&self, fid: &str) -> Result<Vec<AllowanceEntry>>;
}

/// HTTP client for the allowance service.
pub struct AllowanceClient {
    http: UpstreamHttp,
    base_url: String,
}

impl AllowanceClient {
    pub fn new(cfg: &UpstreamConfig) -> Result<Self> {
        Ok(Self {
            http: UpstreamHttp::new("allowance", cfg)?,
            base_url: cfg.allowance_base_url.clone(),
        })
    }
}

#[async_trait]
impl AllowanceSource for AllowanceClient {
    async fn allowances_for_fid(&self, fid: &str) -> Result<Vec<AllowanceEntry>> {
        self.http
            .get_json(&self.base_url, &[("fid", fid)], &[])
            .await
    }
}
