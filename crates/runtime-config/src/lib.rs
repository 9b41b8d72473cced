//! Shared viewer configuration types.
//!
//! The TUI reads `sessionlens.toml` into these types; the viewport engine
//! takes its tuning knobs from [`ViewportSettings`]. File discovery and CLI
//! overrides live in the TUI crate.

use serde::{Deserialize, Serialize};

/// Canonical config file name.
pub const CONFIG_FILE_NAME: &str = "sessionlens.toml";

/// Top-level viewer configuration (persisted as `sessionlens.toml`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ViewerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub viewer: ViewerSettings,
    #[serde(default)]
    pub viewport: ViewportSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_server_url")]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerSettings {
    #[serde(default = "default_session_limit")]
    pub session_limit: u32,
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
    /// Seconds between update checks for the open session. 0 disables polling.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Event poll timeout of the main loop; bounds how often a frame is drawn.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    #[serde(default = "default_false")]
    pub newest_first: bool,
    /// Collapse tool messages to a single line.
    #[serde(default = "default_false")]
    pub compact_tools: bool,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            session_limit: default_session_limit(),
            search_limit: default_search_limit(),
            poll_interval_secs: default_poll_interval_secs(),
            frame_interval_ms: default_frame_interval_ms(),
            newest_first: false,
            compact_tools: false,
        }
    }
}

/// Virtual-scroll tuning, in terminal rows unless noted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportSettings {
    #[serde(default = "default_estimated_height")]
    pub estimated_height: u32,
    #[serde(default = "default_gap")]
    pub gap: u32,
    #[serde(default = "default_overscan")]
    pub overscan: u32,
    #[serde(default = "default_recalc_debounce_ms")]
    pub recalc_debounce_ms: u64,
    #[serde(default = "default_repaint_threshold_pct")]
    pub repaint_threshold_pct: u32,
    #[serde(default = "default_repaint_item_threshold")]
    pub repaint_item_threshold: usize,
    #[serde(default = "default_minimap_min_block")]
    pub minimap_min_block: f64,
    #[serde(default = "default_minimap_settle_ms")]
    pub minimap_settle_ms: u64,
    /// Device rows per terminal row in the minimap (2 = half blocks).
    #[serde(default = "default_minimap_pixel_ratio")]
    pub minimap_pixel_ratio: u32,
    #[serde(default = "default_selection_margin")]
    pub selection_margin: u32,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            estimated_height: default_estimated_height(),
            gap: default_gap(),
            overscan: default_overscan(),
            recalc_debounce_ms: default_recalc_debounce_ms(),
            repaint_threshold_pct: default_repaint_threshold_pct(),
            repaint_item_threshold: default_repaint_item_threshold(),
            minimap_min_block: default_minimap_min_block(),
            minimap_settle_ms: default_minimap_settle_ms(),
            minimap_pixel_ratio: default_minimap_pixel_ratio(),
            selection_margin: default_selection_margin(),
        }
    }
}

fn default_false() -> bool {
    false
}
fn default_server_url() -> String {
    "http://127.0.0.1:8787".to_string()
}
fn default_timeout_secs() -> u64 {
    15
}
fn default_session_limit() -> u32 {
    200
}
fn default_search_limit() -> u32 {
    50
}
fn default_poll_interval_secs() -> u64 {
    5
}
fn default_frame_interval_ms() -> u64 {
    16
}
fn default_estimated_height() -> u32 {
    4
}
fn default_gap() -> u32 {
    1
}
fn default_overscan() -> u32 {
    40
}
fn default_recalc_debounce_ms() -> u64 {
    100
}
fn default_repaint_threshold_pct() -> u32 {
    5
}
fn default_repaint_item_threshold() -> usize {
    20
}
fn default_minimap_min_block() -> f64 {
    1.0
}
fn default_minimap_settle_ms() -> u64 {
    200
}
fn default_minimap_pixel_ratio() -> u32 {
    2
}
fn default_selection_margin() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let cfg: ViewerConfig = toml::from_str("").expect("parse toml");
        assert_eq!(cfg, ViewerConfig::default());
        assert_eq!(cfg.viewport.minimap_pixel_ratio, 2);
    }

    #[test]
    fn partial_sections_keep_field_defaults() {
        let cfg: ViewerConfig = toml::from_str(
            r#"
[server]
url = "https://sessions.example.com"

[viewport]
estimated_height = 6
"#,
        )
        .expect("parse toml");
        assert_eq!(cfg.server.url, "https://sessions.example.com");
        assert_eq!(cfg.server.timeout_secs, 15);
        assert_eq!(cfg.viewport.estimated_height, 6);
        assert_eq!(cfg.viewport.overscan, 40);
        assert_eq!(cfg.viewer.poll_interval_secs, 5);
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let mut cfg = ViewerConfig::default();
        cfg.viewer.newest_first = true;
        cfg.server.api_key = "k".to_string();
        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let back: ViewerConfig = toml::from_str(&text).expect("parse");
        assert_eq!(back, cfg);
    }
}
