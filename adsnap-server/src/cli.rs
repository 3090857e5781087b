use clap::Parser;
use std::path::PathBuf;

use adsnap_types::models::config::{DEFAULT_BRIA_BASE_URL, DEFAULT_GEMINI_BASE_URL};
use adsnap_types::ServiceConfig;

#[derive(Parser, Debug)]
#[command(
    name = "adsnap-server",
    about = "AdSnap - product-photography edit proxy",
    version = env!("CARGO_PKG_VERSION"),
    author
)]
pub struct Cli {
    #[arg(short, long, env = "PORT", default_value = "5000")]
    pub port: u16,

    #[arg(long, env = "ADSNAP_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "BRIA_API_KEY", default_value = "", hide_env_values = true)]
    pub bria_api_key: String,

    /// Enables prompt merging and video generation
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub google_api_key: Option<String>,

    #[arg(long, env = "ADSNAP_BRIA_BASE_URL", default_value = DEFAULT_BRIA_BASE_URL)]
    pub bria_base_url: String,

    #[arg(long, env = "ADSNAP_GEMINI_BASE_URL", default_value = DEFAULT_GEMINI_BASE_URL)]
    pub gemini_base_url: String,

    #[arg(long, env = "ADSNAP_VISION_MODEL", default_value = "gemini-1.5-pro")]
    pub vision_model: String,

    #[arg(long, env = "ADSNAP_VIDEO_MODEL", default_value = "veo-3.1-generate-001")]
    pub video_model: String,

    #[arg(long, env = "ADSNAP_ASSET_ROOT", default_value = ".")]
    pub asset_root: PathBuf,

    #[arg(long, env = "ADSNAP_TEMPLATES_DIR", default_value = "assets/templates")]
    pub templates_dir: PathBuf,

    #[arg(long, env = "ADSNAP_REQUEST_TIMEOUT", default_value = "120")]
    pub request_timeout_secs: u64,

    #[arg(long, env = "ADSNAP_VIDEO_POLL_INTERVAL", default_value = "10")]
    pub video_poll_interval_secs: u64,

    #[arg(long, env = "ADSNAP_VIDEO_POLL_ATTEMPTS", default_value = "40")]
    pub video_poll_max_attempts: u32,

    #[arg(long, env = "ADSNAP_CTA_FONT")]
    pub cta_font_path: Option<PathBuf>,
}

impl Cli {
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            bria_api_key: self.bria_api_key.clone(),
            google_api_key: self.google_api_key.clone(),
            bria_base_url: self.bria_base_url.clone(),
            gemini_base_url: self.gemini_base_url.clone(),
            vision_model: self.vision_model.clone(),
            video_model: self.video_model.clone(),
            asset_root: self.asset_root.clone(),
            templates_dir: self.templates_dir.clone(),
            request_timeout_secs: self.request_timeout_secs,
            video_poll_interval_secs: self.video_poll_interval_secs,
            video_poll_max_attempts: self.video_poll_max_attempts,
            cta_font_path: self.cta_font_path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_config() {
        let cli = Cli::try_parse_from(["adsnap-server", "--bria-api-key", "k"]).unwrap();
        let cfg = cli.service_config();
        let defaults = ServiceConfig::default();
        assert_eq!(cfg.bria_api_key, "k");
        assert_eq!(cfg.bria_base_url, defaults.bria_base_url);
        assert_eq!(cfg.video_poll_interval_secs, defaults.video_poll_interval_secs);
        assert_eq!(cfg.video_poll_max_attempts, defaults.video_poll_max_attempts);
        assert_eq!(cfg.templates_dir, defaults.templates_dir);
    }
}
