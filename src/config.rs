//! Application settings read from the environment
//!
//! - `SWINGSET_ASSET_DIR`: root of the texture assets (default `static/textures`)
//! - `SWINGSET_DEBUG_PANEL`: `1` or `true` shows the debug panel at startup

use std::path::PathBuf;

use crate::swing::controls::PANEL_WIDTH;

pub const ASSET_DIR_VAR: &str = "SWINGSET_ASSET_DIR";
pub const DEBUG_PANEL_VAR: &str = "SWINGSET_DEBUG_PANEL";
pub const DEFAULT_ASSET_DIR: &str = "static/textures";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub title: String,
    /// Initial logical window size
    pub width: u32,
    pub height: u32,
    pub asset_root: PathBuf,
    pub show_debug_panel: bool,
    pub panel_width: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Swing Set".to_string(),
            width: 1200,
            height: 800,
            asset_root: PathBuf::from(DEFAULT_ASSET_DIR),
            show_debug_panel: false,
            panel_width: PANEL_WIDTH,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup(ASSET_DIR_VAR).filter(|dir| !dir.is_empty()) {
            config.asset_root = PathBuf::from(dir);
        }
        if let Some(flag) = lookup(DEBUG_PANEL_VAR) {
            config.show_debug_panel = matches!(flag.trim(), "1" | "true" | "TRUE" | "yes");
        }

        log::debug!("{:?}", config);
        config
    }
}
