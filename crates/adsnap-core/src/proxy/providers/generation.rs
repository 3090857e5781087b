//! Text-to-image generation and prompt enhancement.

use adsnap_types::ProviderError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::BriaClient;

pub const HD_PATH: &str = "/v1/text-to-image/hd/2.3";
pub const ENHANCE_PATH: &str = "/v1/prompt_enhancer";

/// Keys the enhanced prompt may come back under, in lookup order.
const ENHANCED_KEYS: [&str; 4] = ["prompt variations", "prompt_variations", "enhanced_prompt", "prompt"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HdOptions {
    pub aspect_ratio: String,
    /// Rendering medium, e.g. `photography` or `art`
    pub medium: String,
    pub num_results: u32,
    pub sync: bool,
}

impl Default for HdOptions {
    fn default() -> Self {
        Self {
            aspect_ratio: "1:1".to_string(),
            medium: "photography".to_string(),
            num_results: 1,
            sync: true,
        }
    }
}

impl BriaClient {
    pub async fn generate_hd(&self, prompt: &str, opts: &HdOptions) -> Result<Value, ProviderError> {
        if prompt.trim().is_empty() {
            return Err(ProviderError::invalid("Missing prompt"));
        }
        let body = json!({
            "prompt": prompt,
            "num_results": opts.num_results.max(1),
            "aspect_ratio": opts.aspect_ratio,
            "medium": opts.medium,
            "sync": opts.sync,
        });
        self.post_json(HD_PATH, &body).await
    }

    /// Rewrite a short prompt into a richer one.
    pub async fn enhance_prompt(&self, prompt: &str) -> Result<String, ProviderError> {
        if prompt.trim().is_empty() {
            return Err(ProviderError::invalid("Missing prompt"));
        }
        let raw = self.send(ENHANCE_PATH, &json!({ "prompt": prompt })).await?;
        if !raw.is_success() {
            return Err(raw.into_upstream());
        }
        let Ok(value) = serde_json::from_str::<Value>(&raw.body) else {
            return Ok(raw.body.trim().to_string());
        };
        if let Some(err) = raw.reported_error(&value) {
            return Err(err);
        }
        Ok(enhanced_text(&value).unwrap_or_else(|| {
            debug!("No known enhanced-prompt key, returning raw body");
            raw.body.trim().to_string()
        }))
    }
}

/// Pull the enhanced prompt out of an enhancement response.
pub fn enhanced_text(value: &Value) -> Option<String> {
    let container = value.get("result").filter(|v| v.is_object()).unwrap_or(value);
    ENHANCED_KEYS.iter().find_map(|key| match container.get(*key)? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.first()?.as_str().map(str::to_string),
        _ => None,
    })
}
