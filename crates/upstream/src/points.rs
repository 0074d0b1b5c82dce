//! Points service client — per-wallet airdrop points.

use async_trait::async_trait;
use serde::Deserialize;
use tc_domain::config::UpstreamConfig;
use tc_domain::error::Result;

use crate::http::UpstreamHttp;

/// One record from the points endpoint. The service returns more fields
/// (display name, avatar, fname); only `points` matters here and serde
/// drops the rest.
#[derive(Debug, Clone, Deserialize)]
pub struct PointsRecord {
    #[serde(default)]
    pub points: String,
    #[serde(default)]
    pub wallet_address: String,
}

/// Source of per-wallet points. Trait seam so the aggregator can be
/// tested without the network.
#[async_trait]
pub trait PointsSource: Send + Sync {
    /// Points for a single wallet; `Ok(None)` means the service had no
    /// record for it (an empty array on the wire).
    async fn points_for_wallet(&self, wallet: &str) -> Result<Option<String>>;
}

/// HTTP client for the points service.
pub struct PointsClient {
    http: UpstreamHttp,
    base_url: String,
}

impl PointsClient {
    pub fn new(cfg: &UpstreamConfig) -> Result<Self> {
        Ok(Self {
            http: UpstreamHttp::new("points", cfg)?,
            base_url: cfg.points_base_url.clone(),
        })
    }
}

#[async_trait]
impl PointsSource for PointsClient {
    async fn points_for_wallet(&self, wallet: &str) -> Result<Option<String>> {
        let records: Vec<PointsRecord> = self
            .http
            .get_json(&self.base_url, &[("wallet", wallet)], &[])
            .await?;

        // First record wins; an empty array means no points for this wallet.
        Ok(records
            .into_iter()
            .next()
            .map(|r| r.points)
            .filter(|p| !p.is_empty()))
    }
}
