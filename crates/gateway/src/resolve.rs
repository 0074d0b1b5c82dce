//! ParamResolver — layered-default resolution of the card view-state.
//!
//! Sources are applied lowest-priority first:
//!
//! 1. hard defaults (`ResolvedState::default()`)
//! 2. top-level request query parameters
//! 3. parameters carried by an embedded `embeds[]` URL
//!
//! A key present at a higher layer wins; an absent (or empty) key falls
//! through to the layer below. Resolution is total: malformed embedded
//! URLs are logged and skipped, never surfaced.

use std::collections::HashMap;

use tc_domain::state::ResolvedState;
use url::Url;

/// Query key carrying the embedded share URL.
pub const EMBEDS_KEY: &str = "embeds[]";

/// Query key carrying the opaque share token (`timestamp-fid-random`).
pub const LINK_ID_KEY: &str = "linkId";

/// Dash-delimited segment of the share token holding the fid.
const TOKEN_FID_SEGMENT: usize = 1;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Resolution
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Merge the layer table into one state. `layers` are ordered lowest
/// priority first; each overlays the result of the previous ones.
pub fn layered_resolve(layers: &[&[(String, String)]]) -> ResolvedState {
    let mut state = ResolvedState::default();
    for layer in layers {
        state.apply_layer(layer.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    state
}

/// Resolve the card view-state from the request's query parameters.
pub fn resolve(query: &HashMap<String, String>) -> ResolvedState {
    let top_level: Vec<(String, String)> = query
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    let embedded: Vec<(String, String)> = match query.get(EMBEDS_KEY) {
        Some(raw) => parse_embed_params(raw).unwrap_or_default(),
        None => Vec::new(),
    };

    // Embedded parameters outrank top-level ones when both are present.
    let mut state = layered_resolve(&[&top_level, &embedded]);

    // An opaque share token overrides only the identity field.
    if let Some(token) = query.get(LINK_ID_KEY) {
        if let Some(fid) = fid_from_token(token) {
            state.fid = fid;
        }
    }

    state
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Embedded URL parsing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Extract the query pairs of an embedded URL.
///
/// The value may arrive percent-encoded once more than the transport
/// already decoded (the share composer double-encodes it), so a failed
/// parse is retried after one extra decode pass. `None` on any failure —
/// the caller logs and falls back to the lower layers.
pub fn parse_embed_params(raw: &str) -> Option<Vec<(String, String)>> {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(first_err) => {
            let decoded = match urlencoding::decode(raw) {
                Ok(decoded) => decoded,
                Err(e) => {
                    tracing::warn!(error = %e, "embeds[] value is not valid UTF-8, ignoring");
                    return None;
                }
            };
            match Url::parse(&decoded) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!(
                        first_error = %first_err,
                        decoded_error = %e,
                        "failed to parse embeds[] URL, ignoring"
                    );
                    return None;
                }
            }
        }
    };

    Some(
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect(),
    )
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Share token
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Pull the fid out of a `timestamp-fid-random` share token.
///
/// Fixed-position split; assumes the fid itself never contains a dash
/// (safe for numeric ids, which is all the hub issues).
pub fn fid_from_token(token: &str) -> Option<String> {
    token
        .split('-')
        .nth(TOKEN_FID_SEGMENT)
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
