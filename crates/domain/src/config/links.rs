use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Link store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Short-link store sizing policy.
///
/// With both fields unset the store is unbounded and entries live for the
/// process lifetime — the accepted default. Setting `max_entries` enables
/// oldest-first eviction; setting `ttl_minutes` expires entries and
/// enables the background sweep task.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LinksConfig {
    /// Maximum number of stored links. Oldest entries are evicted first
    /// when the cap is exceeded.
    #[serde(default)]
    pub max_entries: Option<usize>,
    /// Entry time-to-live in minutes. Expired entries resolve as not-found
    /// and are removed by the periodic sweep.
    #[serde(default)]
    pub ttl_minutes: Option<u64>,
}
