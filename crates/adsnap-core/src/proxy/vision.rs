//! Vision-assisted prompt merging.
//!
//! A multimodal model looks at the reference scene and rewrites the user's
//! request so it keeps the reference's surface, perspective and lighting.
//! This is an enhancement only: every failure degrades to the raw prompt.

use std::sync::Arc;

use adsnap_types::ImageReference;
use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::media::{ImageBytes, ImageResolver};

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("vision model is not configured")]
    MissingKey,

    #[error("upstream request failed: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Model { status: u16, body: String },

    #[error("invalid model response: {0}")]
    Malformed(String),

    #[error("model returned an empty prompt")]
    Empty,
}

/// A model that answers a text instruction, optionally looking at one image.
#[async_trait]
pub trait VisionModel: Send + Sync {
    async fn generate(
        &self,
        instruction: &str,
        image: Option<&ImageBytes>,
    ) -> Result<String, MergeError>;
}

/// Gemini `generateContent` over REST.
pub struct GeminiVision {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiVision {
    pub fn new(client: reqwest::Client, base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl VisionModel for GeminiVision {
    async fn generate(
        &self,
        instruction: &str,
        image: Option<&ImageBytes>,
    ) -> Result<String, MergeError> {
        let mut parts = vec![json!({ "text": instruction })];
        if let Some(img) = image {
            parts.push(json!({
                "inline_data": { "mime_type": img.mime, "data": img.to_base64() }
            }));
        }
        let body = json!({ "contents": [{ "role": "user", "parts": parts }] });
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| MergeError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(MergeError::Model { status, body });
        }

        let v: Value = resp.json().await.map_err(|e| MergeError::Malformed(e.to_string()))?;
        let parts = v
            .get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(Value::as_array)
            .ok_or_else(|| {
                MergeError::Malformed("missing candidates[0].content.parts".to_string())
            })?;

        Ok(parts.iter().filter_map(|p| p.get("text").and_then(Value::as_str)).collect())
    }
}

/// Instruction sent alongside the reference image.
pub fn build_merge_instruction(user_prompt: &str) -> String {
    format!(
        "Act as a professional product photographer.\n\
         1. ANALYZE THE REFERENCE IMAGE: identify the exact physical surface (e.g. wooden \
         table, marble floor), the camera perspective (e.g. eye-level, top-down) and the lighting.\n\
         2. ANALYZE THE USER REQUEST: \"{user_prompt}\"\n\
         3. MERGE THEM: write one detailed prompt that recreates the exact setting of the \
         reference image while incorporating the user's request.\n\n\
         CRITICAL: the product must be described as resting naturally ON the physical surface \
         from the reference image. Describe materials, textures and camera depth (e.g. 'sharp \
         focus on the product on the rustic wooden surface, soft bokeh background').\n\n\
         Output ONLY the final merged prompt, with no commentary."
    )
}

#[derive(Clone)]
pub struct PromptMerger {
    vision: Option<Arc<dyn VisionModel>>,
    resolver: ImageResolver,
    client: reqwest::Client,
}

impl PromptMerger {
    pub fn new(
        vision: Option<Arc<dyn VisionModel>>,
        resolver: ImageResolver,
        client: reqwest::Client,
    ) -> Self {
        Self { vision, resolver, client }
    }

    pub fn is_available(&self) -> bool {
        self.vision.is_some()
    }

    /// Merge the reference scene into the user's prompt, or return the
    /// prompt unchanged when anything goes wrong.
    pub async fn merge(&self, reference: &ImageReference, user_prompt: &str) -> String {
        match self.try_merge(reference, user_prompt).await {
            Ok(merged) => {
                info!(len = merged.len(), "Vision model merged reference and prompt");
                merged
            },
            Err(e) => {
                warn!(error = %e, "Prompt merging failed, using the original prompt");
                user_prompt.to_string()
            },
        }
    }

    pub async fn try_merge(
        &self,
        reference: &ImageReference,
        user_prompt: &str,
    ) -> Result<String, MergeError> {
        let vision = self.vision.as_ref().ok_or(MergeError::MissingKey)?;

        // An unreadable reference still gets a text-only merge.
        let image = match self.resolver.load_bytes(&self.client, reference).await {
            Ok(img) => Some(img),
            Err(e) => {
                debug!(kind = reference.kind(), error = %e, "Reference image unavailable");
                None
            },
        };

        let instruction = build_merge_instruction(user_prompt);
        let merged = vision.generate(&instruction, image.as_ref()).await?;
        let merged = merged.trim();
        if merged.is_empty() {
            return Err(MergeError::Empty);
        }
        Ok(merged.to_string())
    }
}
