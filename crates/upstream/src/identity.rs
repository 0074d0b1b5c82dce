//! Interactor identity — the account that pressed the button.
//!
//! The identity hub itself is a black box behind [`InteractorResolver`];
//! the gateway only cares about the handful of attributes it supplies.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tc_domain::config::UpstreamConfig;
use tc_domain::error::{Error, Result};

use crate::http::UpstreamHttp;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Interactor
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedAddresses {
    #[serde(default)]
    pub eth_addresses: Vec<String>,
}

/// Attributes of the interacting identity, as supplied by the hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interactor {
    pub fid: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub pfp_url: String,
    #[serde(default)]
    pub custody_address: Option<String>,
    #[serde(default)]
    pub verified_addresses: VerifiedAddresses,
}

impl Interactor {
    /// Candidate wallets in lookup order: verified addresses first (in
    /// provider order), then the custody address. Duplicates are possible
    /// and harmless — the points loop stops at the first hit.
    pub fn wallet_set(&self) -> Vec<String> {
        let mut wallets = self.verified_addresses.eth_addresses.clone();
        if let Some(custody) = &self.custody_address {
            if !custody.is_empty() {
                wallets.push(custody.clone());
            }
        }
        wallets
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Resolver seam
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Supplies interactor attributes for a fid. The shipped implementation
/// talks to the identity hub over HTTP; tests substitute fakes.
#[async_trait]
pub trait InteractorResolver: Send + Sync {
    async fn interactor(&self, fid: u64) -> Result<Interactor>;
}

/// HTTP resolver against the configured identity hub.
pub struct HubIdentityClient {
    http: UpstreamHttp,
    base_url: String,
    api_key: String,
}

impl HubIdentityClient {
    /// Build the hub client. Fails when no API key is resolvable — callers
    /// check this at boot, so a running server always has a key.
    pub fn new(cfg: &UpstreamConfig) -> Result<Self> {
        let api_key = cfg
            .resolve_hub_api_key()
            .ok_or_else(|| Error::Config("hub API key missing".into()))?;
        Ok(Self {
            http: UpstreamHttp::new("identity", cfg)?,
            base_url: cfg.identity_base_url.trim_end_matches('/').to_owned(),
            api_key,
        })
    }
}

#[async_trait]
impl InteractorResolver for HubIdentityClient {
    async fn interactor(&self, fid: u64) -> Result<Interactor> {
        let url = format!("{}/v1/user", self.base_url);
        let fid_str = fid.to_string();
        self.http
            .get_json(
                &url,
                &[("fid", fid_str.as_str())],
                &[("x-hub-api-key", self.api_key.as_str())],
            )
            .await
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
