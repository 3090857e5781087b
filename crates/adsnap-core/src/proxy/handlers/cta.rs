use adsnap_types::{ImageReference, ProviderError};
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::{blocking, png_data_uri, trace_id};
use crate::error::AppResult;
use crate::proxy::compositing::add_cta;
use crate::proxy::server::AppState;

#[derive(Debug, Deserialize)]
pub struct CtaRequest {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub subheadline: String,
}

pub async fn handle_cta_overlay(
    State(state): State<AppState>,
    Json(req): Json<CtaRequest>,
) -> AppResult<Json<Value>> {
    let trace_id = trace_id();
    let url = req
        .image_url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ProviderError::invalid("Failed to get image"))?;

    let image = state
        .resolver
        .load_bytes(&state.http, &ImageReference::from_remote(url))
        .await
        .map_err(|e| {
            warn!("[{}] CTA source image unavailable: {}", trace_id, e);
            ProviderError::invalid("Failed to get image")
        })?;
    info!("[{}] CTA overlay on {} bytes", trace_id, image.data.len());

    let font = state.cta_font.clone();
    let (headline, subheadline) = (req.headline, req.subheadline);
    let png = blocking(move || add_cta(&image.data, &headline, &subheadline, font.as_deref())).await?;
    Ok(Json(json!({ "result_b64": png_data_uri(&png) })))
}
