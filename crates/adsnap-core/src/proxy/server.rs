use std::sync::Arc;

use ab_glyph::FontVec;
use adsnap_types::models::config::{DEFAULT_BRIA_BASE_URL, DEFAULT_GEMINI_BASE_URL};
use adsnap_types::ServiceConfig;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tracing::{info, warn};

use super::common::{build_http_client, resolve_base_url};
use super::compositing::load_font;
use super::handlers;
use super::media::ImageResolver;
use super::providers::BriaClient;
use super::video::{VeoBackend, VideoBackend, VideoPoller};
use super::vision::{GeminiVision, PromptMerger, VisionModel};
use crate::error::{AppError, AppResult};

/// Shared, read-only service state. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub http: reqwest::Client,
    pub bria: BriaClient,
    pub resolver: ImageResolver,
    pub merger: PromptMerger,
    /// `None` without a Google key; video requests are then rejected.
    pub video: Option<Arc<dyn VideoBackend>>,
    pub poller: VideoPoller,
    pub cta_font: Option<Arc<FontVec>>,
}

impl AppState {
    pub fn from_config(config: ServiceConfig) -> AppResult<Self> {
        let http = build_http_client(config.request_timeout_secs).map_err(AppError::Config)?;
        let resolver = ImageResolver::new(config.asset_root.clone());

        let bria_base = resolve_base_url(&config.bria_base_url, DEFAULT_BRIA_BASE_URL);
        if config.bria_api_key.trim().is_empty() {
            warn!("BRIA_API_KEY is not set, provider calls will be rejected upstream");
        }
        let bria = BriaClient::new(http.clone(), &bria_base, config.bria_api_key.trim());

        let gemini_base = resolve_base_url(&config.gemini_base_url, DEFAULT_GEMINI_BASE_URL);
        let (vision, video) = match config.vision_key() {
            Some(key) => {
                let vision: Arc<dyn VisionModel> =
                    Arc::new(GeminiVision::new(http.clone(), &gemini_base, &config.vision_model, key));
                let video: Arc<dyn VideoBackend> = Arc::new(VeoBackend::new(
                    http.clone(),
                    &gemini_base,
                    &config.video_model,
                    key,
                    resolver.clone(),
                ));
                (Some(vision), Some(video))
            },
            None => {
                warn!("GOOGLE_API_KEY is not set: prompt merging and video generation disabled");
                (None, None)
            },
        };

        let cta_font = match config.cta_font_path.as_deref() {
            Some(path) => match load_font(path) {
                Ok(font) => {
                    info!(path = %path.display(), "Loaded CTA font");
                    Some(Arc::new(font))
                },
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "CTA font unavailable");
                    None
                },
            },
            None => None,
        };

        let merger = PromptMerger::new(vision, resolver.clone(), http.clone());
        let poller = VideoPoller::from_config(&config);

        Ok(Self {
            config: Arc::new(config),
            http,
            bria,
            resolver,
            merger,
            video,
            poller,
            cta_font,
        })
    }

    /// Replace the multimodal model used for prompt merging.
    pub fn with_vision(mut self, vision: Option<Arc<dyn VisionModel>>) -> Self {
        self.merger = PromptMerger::new(vision, self.resolver.clone(), self.http.clone());
        self
    }

    pub fn with_video_backend(mut self, video: Option<Arc<dyn VideoBackend>>) -> Self {
        self.video = video;
        self
    }

    pub fn with_poller(mut self, poller: VideoPoller) -> Self {
        self.poller = poller;
        self
    }
}

/// Build the `/api` routes plus template file serving.
pub fn build_router(state: AppState) -> Router {
    let templates = ServeDir::new(state.config.templates_path());

    Router::new()
        .route("/api/list_templates", get(handlers::templates::handle_list_templates))
        .route("/api/enhance_prompt", post(handlers::prompt::handle_enhance_prompt))
        .route("/api/generate_hd", post(handlers::prompt::handle_generate_hd))
        .route(
            "/api/process_photography",
            post(handlers::photography::handle_process_photography),
        )
        .route("/api/cta_overlay", post(handlers::cta::handle_cta_overlay))
        .route("/api/generate_video", post(handlers::video::handle_generate_video))
        .nest_service("/assets/templates", templates)
        .with_state(state)
}
