//! Shorten endpoint — mint a short id for an explicit parameter set.

use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};

use tc_domain::state::is_param_key;

use crate::api::api_error;
use crate::state::AppState;

/// POST /shorten. Card parameters arrive on the query string;
/// unrecognized keys are dropped rather than rejected, so callers can
/// post a full query-string dump without pre-filtering.
pub async fn shorten(
    State(state): State<AppState>,
    Query(query): Query<BTreeMap<String, String>>,
) -> impl IntoResponse {
    let params: BTreeMap<String, String> = query
        .into_iter()
        .filter(|(key, _)| is_param_key(key))
        .collect();

    if params.is_empty() {
        return api_error(
            StatusCode::BAD_REQUEST,
            "no recognized card parameters supplied",
        );
    }

    let id = state.links.create(&params);
    let short_url = format!("{}/{id}", state.config.server.public_base());

    tracing::debug!(link_id = %id, params = params.len(), "short link minted");
    Json(serde_json::json!({ "id": id, "shortUrl": short_url })).into_response()
}
