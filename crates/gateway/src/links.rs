//! LinkStore — hash-addressed ephemeral short-link storage.
//!
//! A short id is a pure function of the canonical (sorted-key,
//! form-urlencoded) serialization of a parameter set: the first
//! [`SHORT_ID_LEN`] hex chars of its SHA-256 digest. Identical params
//! always mint the same id; `create` is idempotent and last-write-wins
//! on the (accepted, low-probability) truncated-digest collision.
//!
//! The store is in-memory and process-lifetime by default. `[links]`
//! config can bound it with a TTL and/or a capacity cap, swept by a
//! background task.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use tc_domain::config::LinksConfig;

/// Length of a minted short id, in hex chars.
pub const SHORT_ID_LEN: usize = 10;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Canonical serialization
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Serialize a parameter set as a canonical query string. BTreeMap
/// iteration gives the stable sorted-key ordering.
pub fn canonical_query(params: &BTreeMap<String, String>) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

/// Deterministic short id for a parameter set.
pub fn short_id(params: &BTreeMap<String, String>) -> String {
    let digest = Sha256::digest(canonical_query(params).as_bytes());
    hex::encode(digest)[..SHORT_ID_LEN].to_owned()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LinkStore
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone)]
pub struct LinkRecord {
    pub id: String,
    pub params: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
}

pub struct LinkStore {
    inner: RwLock<HashMap<String, LinkRecord>>,
    max_entries: Option<usize>,
    ttl: Option<chrono::Duration>,
}

impl LinkStore {
    pub fn new(cfg: &LinksConfig) -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            max_entries: cfg.max_entries,
            ttl: cfg
                .ttl_minutes
                .map(|m| chrono::Duration::minutes(m as i64)),
        }
    }

    /// Mint (or re-mint) the short id for `params` and store the record,
    /// overwriting any existing record under the same id.
    pub fn create(&self, params: &BTreeMap<String, String>) -> String {
        let id = short_id(params);
        let record = LinkRecord {
            id: id.clone(),
            params: params.clone(),
            created_at: Utc::now(),
        };

        let mut map = self.inner.write();
        map.insert(id.clone(), record);
        if let Some(cap) = self.max_entries {
            evict_over_capacity(&mut map, cap, &id);
        }
        id
    }

    /// Pure lookup. Expired records resolve as not-found even before the
    /// sweep removes them.
    pub fn resolve(&self, id: &str) -> Option<BTreeMap<String, String>> {
        let map = self.inner.read();
        let record = map.get(id)?;
        if self.is_expired(record) {
            return None;
        }
        Some(record.params.clone())
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Whether the periodic sweep task is worth running.
    pub fn has_expiry(&self) -> bool {
        self.ttl.is_some()
    }

    /// Drop every expired record; returns how many were removed.
    pub fn prune_expired(&self) -> usize {
        if self.ttl.is_none() {
            return 0;
        }
        let mut map = self.inner.write();
        let before = map.len();
        let now = Utc::now();
        map.retain(|_, record| !expired_at(record, self.ttl, now));
        before - map.len()
    }

    fn is_expired(&self, record: &LinkRecord) -> bool {
        expired_at(record, self.ttl, Utc::now())
    }
}

fn expired_at(
    record: &LinkRecord,
    ttl: Option<chrono::Duration>,
    now: DateTime<Utc>,
) -> bool {
    match ttl {
        Some(ttl) => now - record.created_at > ttl,
        None => false,
    }
}

/// Evict oldest-first until the map fits the cap, never evicting the
/// record that was just written.
fn evict_over_capacity(map: &mut HashMap<String, LinkRecord>, cap: usize, keep: &str) {
    while map.len() > cap {
        let oldest = map
            .values()
            .filter(|r| r.id != keep)
            .min_by_key(|r| r.created_at)
            .map(|r| r.id.clone());
        match oldest {
            Some(id) => {
                map.remove(&id);
                tracing::debug!(id = %id, "evicted link over capacity");
            }
            None => break,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    fn unbounded() -> LinkStore {
        LinkStore::new(&LinksConfig::default())
    }

    #[test]
    fn canonical_query_is_sorted_and_encoded() {
        let q = canonical_query(&params(&[("username", "a lice"), ("fid", "123")]));
        assert_eq!(q, "fid=123&username=a+lice");
    }

    #[test]
    fn same_params_same_id() {
        let p = params(&[("fid", "123"), ("username", "alice")]);
        assert_eq!(short_id(&p), short_id(&p));
        assert_eq!(short_id(&p).len(), SHORT_ID_LEN);
    }

    #[test]
    fn different_params_different_id() {
        let a = params(&[("fid", "123")]);
        let b = params(&[("fid", "124")]);
        assert_ne!(short_id(&a), short_id(&b));
    }

    #[test]
    fn create_is_idempotent() {
        let store = unbounded();
        let p = params(&[("fid", "123"), ("username", "alice")]);
        let id1 = store.create(&p);
        let id2 = store.create(&p);
        assert_eq!(id1, id2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn round_trip() {
        let store = unbounded();
        let p = params(&[("fid", "123"), ("username", "alice")]);
        let id = store.create(&p);
        assert_eq!(store.resolve(&id), Some(p));
    }

    #[test]
    fn unknown_id_is_not_found() {
        let store = unbounded();
        assert!(store.resolve("doesnotexist").is_none());
    }

    #[test]
    fn expired_record_resolves_as_not_found() {
        let store = LinkStore::new(&LinksConfig {
            max_entries: None,
            ttl_minutes: Some(10),
        });
        let id = store.create(&params(&[("fid", "1")]));

        // Backdate the record past the TTL.
        {
            let mut map = store.inner.write();
            map.get_mut(&id).unwrap().created_at =
                Utc::now() - chrono::Duration::minutes(11);
        }
        assert!(store.resolve(&id).is_none());
        assert_eq!(store.prune_expired(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn prune_is_a_no_op_without_ttl() {
        let store = unbounded();
        store.create(&params(&[("fid", "1")]));
        assert_eq!(store.prune_expired(), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn capacity_evicts_oldest_first() {
        let store = LinkStore::new(&LinksConfig {
            max_entries: Some(2),
            ttl_minutes: None,
        });
        let first = store.create(&params(&[("fid", "1")]));

        // Make the first record clearly the oldest.
        {
            let mut map = store.inner.write();
            map.get_mut(&first).unwrap().created_at =
                Utc::now() - chrono::Duration::minutes(5);
        }

        store.create(&params(&[("fid", "2")]));
        let third = store.create(&params(&[("fid", "3")]));

        assert_eq!(store.len(), 2);
        assert!(store.resolve(&first).is_none(), "oldest must be evicted");
        assert!(store.resolve(&third).is_some(), "newest must survive");
    }
}
