//! Card endpoint — the frame entry point.
//!
//! Serves both the cold GET (someone following a shared link) and the
//! POST a frame client sends when a button is pressed. Rendering never
//! fails: upstream trouble degrades to placeholder values and the card
//! is returned anyway.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Json};
use serde::Deserialize;

use crate::frame::{self, FrameState};
use crate::state::AppState;

/// Query key carrying the pressed-button action.
const ACTION_KEY: &str = "action";

/// Signed interaction payload a frame client posts back. Only the
/// untrusted envelope is read; signature verification is out of scope
/// here.
#[derive(Debug, Deserialize)]
pub struct FramePayload {
    #[serde(rename = "untrustedData")]
    pub untrusted_data: Option<UntrustedData>,
}

#[derive(Debug, Deserialize)]
pub struct UntrustedData {
    pub fid: Option<u64>,
    #[serde(rename = "buttonIndex")]
    pub button_index: Option<u32>,
}

pub async fn render_card(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    payload: Option<Json<FramePayload>>,
) -> impl IntoResponse {
    let mut resolved = crate::resolve::resolve(&query);
    let frame_state = FrameState::from_action(query.get(ACTION_KEY).map(String::as_str));

    if frame_state == FrameState::MyState {
        // The post-back fid outranks whatever the query layers resolved.
        let fid = payload
            .as_ref()
            .and_then(|Json(p)| p.untrusted_data.as_ref())
            .and_then(|d| d.fid)
            .or_else(|| resolved.fid.parse().ok());

        match fid {
            Some(fid) => match state.identity.interactor(fid).await {
                Ok(interactor) => {
                    state.aggregator.apply(&interactor, &mut resolved).await;
                }
                Err(error) => {
                    tracing::warn!(fid, %error, "identity lookup failed, rendering placeholders");
                }
            },
            None => {
                tracing::warn!(fid = %resolved.fid, "no usable fid on MyState, rendering placeholders");
            }
        }
    }

    let params = resolved.to_params();
    let id = state.links.create(&params);

    let public_base = state.config.server.public_base();
    let short_url = format!("{public_base}/{id}");
    let compose_url = frame::compose_share_url(&state.config.card, &short_url);
    let post_url = frame::my_state_post_url(public_base, &params);

    tracing::debug!(link_id = %id, state = ?frame_state, "card rendered");
    Html(frame::render_frame(
        &state.config.card,
        &resolved,
        &post_url,
        &compose_url,
    ))
}
