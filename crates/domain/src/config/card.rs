use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Card presentation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Deployment-level card presentation settings.
///
/// These feed the frame meta tags and the fixed link-preview metadata on
/// the redirect page. The preview is intentionally static per deployment
/// (link unfurlers see a stable preview; the browser gets redirected to
/// the parameter-bearing canonical page).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardConfig {
    #[serde(default = "d_title")]
    pub title: String,
    #[serde(default = "d_description")]
    pub description: String,
    /// Background/preview image for the card.
    #[serde(default = "d_image_url")]
    pub image_url: String,
    #[serde(default = "d_image_dim")]
    pub image_width: u32,
    #[serde(default = "d_image_dim")]
    pub image_height: u32,
    /// Text prefilled into the social compose action by the Share button.
    #[serde(default = "d_share_text")]
    pub share_text: String,
    /// Base URL of the social compose action.
    #[serde(default = "d_compose_base_url")]
    pub compose_base_url: String,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            title: d_title(),
            description: d_description(),
            image_url: d_image_url(),
            image_width: d_image_dim(),
            image_height: d_image_dim(),
            share_text: d_share_text(),
            compose_base_url: d_compose_base_url(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_title() -> String {
    "Degen State".into()
}
fn d_description() -> String {
    "An interactive card summarizing your tipping stats.".into()
}
fn d_image_url() -> String {
    "https://i.imgur.com/XznXt9o.png".into()
}
fn d_image_dim() -> u32 {
    1200
}
fn d_share_text() -> String {
    "Check Your Degen State\n".into()
}
fn d_compose_base_url() -> String {
    "https://warpcast.com/~/compose".into()
}
