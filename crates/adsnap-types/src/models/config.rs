//! Service configuration model.
//!
//! Built once at process start and passed by reference into every component.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_BRIA_BASE_URL: &str = "https://engine.prod.bria-api.com";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Image-editing provider token (sent as `api_token` header).
    #[serde(default)]
    pub bria_api_key: String,

    /// Key for the multimodal model and video generation. Optional: without it
    /// prompt merging is skipped and video generation is rejected.
    #[serde(default)]
    pub google_api_key: Option<String>,

    #[serde(default = "default_bria_base_url")]
    pub bria_base_url: String,

    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,

    #[serde(default = "default_vision_model")]
    pub vision_model: String,

    #[serde(default = "default_video_model")]
    pub video_model: String,

    /// Root that relative image paths resolve against.
    #[serde(default = "default_asset_root")]
    pub asset_root: PathBuf,

    /// Template directory, relative to `asset_root`.
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,

    /// Per-request provider timeout in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_poll_interval")]
    pub video_poll_interval_secs: u64,

    #[serde(default = "default_poll_attempts")]
    pub video_poll_max_attempts: u32,

    /// TrueType font used for CTA text. Without one only the band is drawn.
    #[serde(default)]
    pub cta_font_path: Option<PathBuf>,
}

fn default_bria_base_url() -> String {
    DEFAULT_BRIA_BASE_URL.to_string()
}

fn default_gemini_base_url() -> String {
    DEFAULT_GEMINI_BASE_URL.to_string()
}

fn default_vision_model() -> String {
    "gemini-1.5-pro".to_string()
}

fn default_video_model() -> String {
    "veo-3.1-generate-001".to_string()
}

fn default_asset_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("assets/templates")
}

fn default_timeout() -> u64 {
    120
}

fn default_poll_interval() -> u64 {
    10
}

fn default_poll_attempts() -> u32 {
    40
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bria_api_key: String::new(),
            google_api_key: None,
            bria_base_url: default_bria_base_url(),
            gemini_base_url: default_gemini_base_url(),
            vision_model: default_vision_model(),
            video_model: default_video_model(),
            asset_root: default_asset_root(),
            templates_dir: default_templates_dir(),
            request_timeout_secs: default_timeout(),
            video_poll_interval_secs: default_poll_interval(),
            video_poll_max_attempts: default_poll_attempts(),
            cta_font_path: None,
        }
    }
}

impl ServiceConfig {
    /// Google key, if set to something non-blank.
    pub fn vision_key(&self) -> Option<&str> {
        self.google_api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn templates_path(&self) -> PathBuf {
        self.asset_root.join(&self.templates_dir)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let cfg: ServiceConfig =
            serde_json::from_str(r#"{"bria_api_key": "k", "google_api_key": "  "}"#).unwrap();
        assert_eq!(cfg.bria_base_url, DEFAULT_BRIA_BASE_URL);
        assert_eq!(cfg.video_poll_interval_secs, 10);
        assert_eq!(cfg.video_poll_max_attempts, 40);
        assert!(cfg.vision_key().is_none());
    }
}
