use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Upstream services
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Endpoints and client settings for the points, allowance and identity
/// collaborators.
///
/// Every outbound call carries `timeout_ms` as a hard deadline; transient
/// failures (5xx, timeouts) are retried up to `max_retries` times with
/// exponential back-off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Points service. Queried as `{points_base_url}?wallet=<address>`.
    #[serde(default = "d_points_base_url")]
    pub points_base_url: String,
    /// Allowance service. Queried as `{allowance_base_url}?fid=<fid>`.
    #[serde(default = "d_allowance_base_url")]
    pub allowance_base_url: String,
    /// Identity hub supplying interactor attributes.
    #[serde(default = "d_identity_base_url")]
    pub identity_base_url: String,
    /// Hub API key. When absent, the env var named by `hub_api_key_env`
    /// is consulted. Required for `serve`.
    #[serde(default)]
    pub hub_api_key: Option<String>,
    /// Environment variable holding the hub API key.
    #[serde(default = "d_hub_api_key_env")]
    pub hub_api_key_env: String,
    /// Per-call request timeout in milliseconds.
    #[serde(default = "d_timeout_ms")]
    pub timeout_ms: u64,
    /// Retries on transient failures (0 = single attempt).
    #[serde(default = "d_max_retries")]
    pub max_retries: u32,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            points_base_url: d_points_base_url(),
            allowance_base_url: d_allowance_base_url(),
            identity_base_url: d_identity_base_url(),
            hub_api_key: None,
            hub_api_key_env: d_hub_api_key_env(),
            timeout_ms: d_timeout_ms(),
            max_retries: d_max_retries(),
        }
    }
}

impl UpstreamConfig {
    /// Resolve the hub API key: explicit config value first, then the
    /// configured environment variable. Empty strings count as unset.
    pub fn resolve_hub_api_key(&self) -> Option<String> {
        self.hub_api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .map(str::to_owned)
            .or_else(|| {
                std::env::var(&self.hub_api_key_env)
                    .ok()
                    .filter(|k| !k.is_empty())
            })
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_points_base_url() -> String {
    "https://api.degen.tips/airdrop2/current/points".into()
}
fn d_allowance_base_url() -> String {
    "https://api.degen.tips/airdrop2/allowances".into()
}
fn d_identity_base_url() -> String {
    "https://hubs.airstack.xyz".into()
}
fn d_hub_api_key_env() -> String {
    "TIPCARD_HUB_API_KEY".into()
}
fn d_timeout_ms() -> u64 {
    5_000
}
fn d_max_retries() -> u32 {
    2
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
