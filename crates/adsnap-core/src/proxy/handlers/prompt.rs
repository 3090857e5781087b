use adsnap_types::NormalizedResult;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::{normalized, trace_id};
use crate::error::AppResult;
use crate::proxy::providers::HdOptions;
use crate::proxy::server::AppState;

#[derive(Debug, Deserialize)]
pub struct EnhanceRequest {
    #[serde(default)]
    pub prompt: String,
}

pub async fn handle_enhance_prompt(
    State(state): State<AppState>,
    Json(req): Json<EnhanceRequest>,
) -> AppResult<Json<Value>> {
    let trace_id = trace_id();
    info!("[{}] Enhancing prompt ({} chars)", trace_id, req.prompt.len());
    let enhanced = state.bria.enhance_prompt(&req.prompt).await?;
    Ok(Json(json!({ "enhanced_prompt": enhanced })))
}

#[derive(Debug, Deserialize)]
pub struct HdRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,
    #[serde(default = "default_style")]
    pub style: String,
}

fn default_aspect_ratio() -> String {
    "1:1".to_string()
}

fn default_style() -> String {
    "photography".to_string()
}

pub async fn handle_generate_hd(
    State(state): State<AppState>,
    Json(req): Json<HdRequest>,
) -> AppResult<Json<NormalizedResult>> {
    let trace_id = trace_id();
    info!("[{}] HD generation: ratio={}, style={}", trace_id, req.aspect_ratio, req.style);

    let opts = HdOptions {
        aspect_ratio: req.aspect_ratio,
        medium: req.style,
        sync: true,
        ..HdOptions::default()
    };
    let raw = state.bria.generate_hd(&req.prompt, &opts).await?;
    Ok(normalized(raw))
}
