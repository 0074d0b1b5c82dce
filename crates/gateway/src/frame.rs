//! Frame rendering and the per-request interaction state machine.
//!
//! Two states: `Idle` (no button pressed, or the Share link was
//! followed) and `MyState` (the "My State" button posted back). MyState
//! re-runs aggregation every time; there is no terminal state and every
//! response re-offers both buttons.

use std::collections::BTreeMap;

use tc_domain::config::CardConfig;
use tc_domain::state::ResolvedState;

use crate::links::canonical_query;

/// Query value carried on the post-back URL by the "My State" button.
pub const MY_STATE_ACTION: &str = "my_state";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Interaction state machine
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// Render from resolved parameters only.
    Idle,
    /// Invoke the aggregator and overwrite its subset of fields.
    MyState,
}

impl FrameState {
    /// Decide the state from the interaction-button value.
    pub fn from_action(action: Option<&str>) -> Self {
        match action {
            Some(MY_STATE_ACTION) => Self::MyState,
            _ => Self::Idle,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// URLs
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Compose-action URL for the Share button: prefilled text plus the
/// short link as the embedded URL.
pub fn compose_share_url(card: &CardConfig, embed_url: &str) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    serializer.append_pair("text", &card.share_text);
    serializer.append_pair("embeds[]", embed_url);
    format!("{}?{}", card.compose_base_url, serializer.finish())
}

/// Post-back URL for the "My State" button. Carries the full resolved
/// parameter set so overrides (geometry, identity) survive the button
/// press and feed the next resolution pass.
pub fn my_state_post_url(public_base: &str, params: &BTreeMap<String, String>) -> String {
    format!(
        "{public_base}/?{}&action={MY_STATE_ACTION}",
        canonical_query(params)
    )
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Frame HTML
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Render the card response: a frame document whose meta tags carry the
/// image, the two action buttons and the resolved display values.
/// Image compositing happens elsewhere — this document only references
/// the configured image and exposes the state for whoever draws it.
pub fn render_frame(
    card: &CardConfig,
    state: &ResolvedState,
    post_url: &str,
    compose_url: &str,
) -> String {
    let title = escape_html(&card.title);
    let description = escape_html(&card.description);
    let image = escape_html(&card.image_url);
    let post_url = escape_html(post_url);
    let compose_url = escape_html(compose_url);

    format!(
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
<meta property="fc:frame" content="vNext">
<meta property="fc:frame:image" content="{image}">
<meta property="fc:frame:image:aspect_ratio" content="1:1">
<meta property="fc:frame:post_url" content="{post_url}">
<meta property="fc:frame:button:1" content="My State">
<meta property="fc:frame:button:1:action" content="post">
<meta property="fc:frame:button:2" content="Share">
<meta property="fc:frame:button:2:action" content="link">
<meta property="fc:frame:button:2:target" content="{compose_url}">
</head>
<body>
<h1>{title}</h1>
<dl>
<dt>fid</dt><dd>{fid}</dd>
<dt>username</dt><dd>{username}</dd>
<dt>tip allowance</dt><dd>{tip_allowance}</dd>
<dt>remaining</dt><dd>{remaining}</dd>
<dt>tipped</dt><dd>{tipped}</dd>
<dt>points</dt><dd>{points}</dd>
</dl>
</body>
</html>
"#,
        width = card.image_width,
        height = card.image_height,
        fid = escape_html(&state.fid),
        username = escape_html(&state.username),
        tip_allowance = escape_html(&state.tip_allowance),
        remaining = escape_html(&state.remaining_tip_allowance),
        tipped = escape_html(&state.tipped),
        points = escape_html(&state.points),
    )
}

/// Minimal HTML escaping for text and attribute positions.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
