// Defaults are compiled in; `<script id="app-config" type="application/json">`
// may override any subset of fields.

use serde::Deserialize;

pub const CONFIG_ELEMENT_ID: &str = "app-config";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub theme_mode_key: String,
    pub completed_poems_key: String,
    /// How often automatic mode re-reads the clock.
    pub theme_poll_ms: u32,
    pub wrong_answer_notice_ms: u32,
    pub copied_notice_ms: u32,
    pub distractor_count: usize,
    pub library_render_cap: usize,
    pub animation_base_path: String,
    pub player_script_urls: Vec<String>,
    pub autoplay: bool,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme_mode_key: "app-theme-mode".into(),
            completed_poems_key: "completedPoems".into(),
            theme_poll_ms: 60_000,
            wrong_answer_notice_ms: 2_000,
            copied_notice_ms: 2_000,
            distractor_count: 3,
            library_render_cap: 20,
            animation_base_path: "/swf".into(),
            player_script_urls: vec![
                "https://unpkg.com/@ruffle-rs/ruffle@latest/ruffle.js".into(),
                "https://cdn.jsdelivr.net/npm/@ruffle-rs/ruffle@latest/ruffle.js".into(),
            ],
            autoplay: true,
            log_level: "info".into(),
        }
    }
}

impl AppConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Read the page's config block. An absent or empty block yields the
    /// defaults; a malformed one is an error so the caller can report it
    /// once logging is up.
    pub fn from_document() -> Result<Self, serde_json::Error> {
        let raw = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|element| element.text_content());

        match raw.filter(|raw| !raw.trim().is_empty()) {
            Some(raw) => Self::from_json(&raw),
            None => Ok(Self::default()),
        }
    }

    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}
