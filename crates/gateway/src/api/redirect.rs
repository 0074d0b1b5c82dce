//! Short-link follower — expand a minted id back into the full card URL.
//!
//! Served as an HTML page rather than a 3xx so crawlers still see the
//! og/frame meta tags; a zero-delay meta refresh carries browsers on to
//! the canonical card URL.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};

use crate::frame::escape_html;
use crate::links::canonical_query;
use crate::state::AppState;

pub async fn follow_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let Some(params) = state.links.resolve(&id) else {
        tracing::debug!(link_id = %id, "short link not found");
        return (
            StatusCode::NOT_FOUND,
            Html("<!DOCTYPE html><html><body><h1>Not found</h1></body></html>".to_owned()),
        );
    };

    let card = &state.config.card;
    let target = format!(
        "{}/?{}",
        state.config.server.public_base(),
        canonical_query(&params)
    );

    let title = escape_html(&card.title);
    let description = escape_html(&card.description);
    let image = escape_html(&card.image_url);
    let target = escape_html(&target);

    let page = format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<meta property="og:title" content="{title}">
<meta property="og:type" content="website">
<meta property="og:description" content="{description}">
<meta property="og:image" content="{image}">
<meta property="og:image:width" content="{width}">
<meta property="og:image:height" content="{height}">
<meta http-equiv="refresh" content="0;url={target}">
</head>
<body>
<p>Redirecting to <a href="{target}">{title}</a>…</p>
</body>
</html>
"#,
        width = card.image_width,
        height = card.image_height,
    );

    (StatusCode::OK, Html(page))
}
