pub mod card;
pub mod health;
pub mod redirect;
pub mod shorten;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the full API router.
///
/// The card endpoint answers both GET (cold load from a shared link)
/// and POST (frame button post-back). The short-id catch-all sits last
/// so the fixed routes always win.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(card::render_card).post(card::render_card))
        .route("/shorten", post(shorten::shorten))
        .route("/healthz", get(health::healthz))
        .route("/:id", get(redirect::follow_link))
}

/// Uniform JSON error body.
pub fn api_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({ "error": message.into() })),
    )
        .into_response()
}
