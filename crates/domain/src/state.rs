//! The resolved card view-state.
//!
//! A [`ResolvedState`] is built fresh for every request by layering
//! parameter sources over hard defaults. Every field is always a
//! concrete string — there is no "missing" state anywhere downstream,
//! which keeps the rendering and link-minting paths total.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Wire parameter keys
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Every query-string key the card understands, in canonical order.
/// The wire names are camelCase; struct fields are snake_case.
pub const PARAM_KEYS: [&str; 11] = [
    "fid",
    "username",
    "pfpUrl",
    "tipAllowance",
    "remainingTipAllowance",
    "tipped",
    "points",
    "imageWidth",
    "imageHeight",
    "imageTop",
    "imageLeft",
];

/// True when `key` is one of the recognized card parameters.
pub fn is_param_key(key: &str) -> bool {
    PARAM_KEYS.contains(&key)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ResolvedState
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Fully-resolved per-request view state for the card.
///
/// All fields are strings with deterministic defaults; upstream data that
/// never arrives leaves the default in place rather than producing an
/// absent value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedState {
    pub fid: String,
    pub username: String,
    pub pfp_url: String,
    pub tip_allowance: String,
    pub remaining_tip_allowance: String,
    pub tipped: String,
    pub points: String,
    pub image_width: String,
    pub image_height: String,
    pub image_top: String,
    pub image_left: String,
}

impl Default for ResolvedState {
    fn default() -> Self {
        Self {
            fid: "50000".into(),
            username: "unknown".into(),
            pfp_url: String::new(),
            tip_allowance: "N/A".into(),
            remaining_tip_allowance: "N/A".into(),
            tipped: "N/A".into(),
            points: "N/A".into(),
            image_width: "1200".into(),
            image_height: "1200".into(),
            image_top: "0".into(),
            image_left: "0".into(),
        }
    }
}

impl ResolvedState {
    /// Look up a field by its wire key.
    pub fn get(&self, key: &str) -> Option<&str> {
        let value = match key {
            "fid" => &self.fid,
            "username" => &self.username,
            "pfpUrl" => &self.pfp_url,
            "tipAllowance" => &self.tip_allowance,
            "remainingTipAllowance" => &self.remaining_tip_allowance,
            "tipped" => &self.tipped,
            "points" => &self.points,
            "imageWidth" => &self.image_width,
            "imageHeight" => &self.image_height,
            "imageTop" => &self.image_top,
            "imageLeft" => &self.image_left,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Set a field by its wire key. Unknown keys are ignored; returns
    /// whether the key was recognized.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        let slot = match key {
            "fid" => &mut self.fid,
            "username" => &mut self.username,
            "pfpUrl" => &mut self.pfp_url,
            "tipAllowance" => &mut self.tip_allowance,
            "remainingTipAllowance" => &mut self.remaining_tip_allowance,
            "tipped" => &mut self.tipped,
            "points" => &mut self.points,
            "imageWidth" => &mut self.image_width,
            "imageHeight" => &mut self.image_height,
            "imageTop" => &mut self.image_top,
            "imageLeft" => &mut self.image_left,
            _ => return false,
        };
        *slot = value.to_owned();
        true
    }

    /// Overlay a parameter layer: every recognized key present in `pairs`
    /// overwrites the current value. Empty values are treated as absent,
    /// matching the "first defined of several candidates" behavior of the
    /// layered resolution contract.
    pub fn apply_layer<'a, I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in pairs {
            if !value.is_empty() {
                self.set(key, value);
            }
        }
    }

    /// Canonical parameter view: all known keys, sorted (BTreeMap order).
    pub fn to_params(&self) -> BTreeMap<String, String> {
        PARAM_KEYS
            .iter()
            .map(|k| {
                let v = self.get(k).unwrap_or_default();
                ((*k).to_owned(), v.to_owned())
            })
            .collect()
    }

    /// Rebuild a state from a stored parameter set. Missing keys fall back
    /// to the hard defaults; unknown keys are ignored.
    pub fn from_params(params: &BTreeMap<String, String>) -> Self {
        let mut state = Self::default();
        state.apply_layer(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        state
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
