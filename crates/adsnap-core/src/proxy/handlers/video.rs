use adsnap_types::{ImageReference, ProviderError, VideoRequest};
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::trace_id;
use crate::error::{AppError, AppResult};
use crate::proxy::server::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateVideoRequest {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,
    /// Seconds, as a number or a numeric string
    #[serde(default = "default_duration")]
    pub duration: Value,
}

fn default_aspect_ratio() -> String {
    "16:9".to_string()
}

fn default_duration() -> Value {
    Value::from("5")
}

fn parse_duration(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl GenerateVideoRequest {
    pub fn into_video_request(self) -> Result<VideoRequest, ProviderError> {
        let image = self.image_url.filter(|s| !s.is_empty());
        let prompt = self.prompt.filter(|s| !s.is_empty());
        let (Some(image), Some(prompt)) = (image, prompt) else {
            return Err(ProviderError::invalid("Missing data"));
        };
        let duration_secs = parse_duration(&self.duration)
            .filter(|d| *d > 0)
            .ok_or_else(|| ProviderError::invalid("Invalid duration"))?;
        Ok(VideoRequest {
            image: ImageReference::from_remote(image),
            prompt,
            duration_secs,
            aspect_ratio: self.aspect_ratio,
        })
    }
}

/// Blocks until the job settles. If the client goes away the handler future
/// is dropped, which drops the job handle and stops polling.
pub async fn handle_generate_video(
    State(state): State<AppState>,
    Json(req): Json<GenerateVideoRequest>,
) -> AppResult<Json<Value>> {
    let trace_id = trace_id();
    let request = req.into_video_request()?;
    let backend = state
        .video
        .clone()
        .ok_or_else(|| AppError::Config("Video generation is not configured".to_string()))?;

    info!(
        "[{}] Video job: {}s, ratio={}, polling every {:?} up to {} times",
        trace_id,
        request.duration_secs,
        request.aspect_ratio,
        state.poller.interval(),
        state.poller.max_attempts()
    );

    let job = state.poller.spawn(backend, request).wait().await?;
    info!(
        "[{}] Video ready after {} polls ({}s)",
        trace_id,
        job.polls,
        job.elapsed().num_seconds()
    );
    Ok(Json(json!({ "video_url": job.result_url })))
}
