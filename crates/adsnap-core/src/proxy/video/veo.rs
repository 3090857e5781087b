use adsnap_types::{ProviderError, VideoRequest};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::{OperationStatus, VideoBackend};
use crate::proxy::media::ImageResolver;

const VEO: &str = "veo";

/// Veo long-running video generation over the Gemini REST API.
pub struct VeoBackend {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    resolver: ImageResolver,
}

impl VeoBackend {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        model: &str,
        api_key: &str,
        resolver: ImageResolver,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            resolver,
        }
    }

    async fn read_json(resp: reqwest::Response) -> Result<Value, ProviderError> {
        let status = resp.status();
        let body = resp.text().await.map_err(|e| ProviderError::transport(VEO, e))?;
        if !status.is_success() {
            return Err(ProviderError::Upstream {
                provider: VEO.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(|_| ProviderError::Upstream {
            provider: VEO.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl VideoBackend for VeoBackend {
    async fn submit(&self, request: &VideoRequest) -> Result<String, ProviderError> {
        let image = self.resolver.load_bytes(&self.http, &request.image).await?;
        let body = json!({
            "instances": [{
                "prompt": request.prompt,
                "image": { "bytesBase64Encoded": image.to_base64(), "mimeType": image.mime },
            }],
            "parameters": {
                "aspectRatio": request.aspect_ratio,
                "durationSeconds": request.duration_secs,
            },
        });
        let url = format!("{}/models/{}:predictLongRunning", self.base_url, self.model);
        debug!(url = %url, image_len = image.data.len(), "Submitting video job");

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::transport(VEO, e))?;
        let value = Self::read_json(resp).await?;

        value.get("name").and_then(Value::as_str).map(str::to_string).ok_or_else(|| {
            ProviderError::Upstream {
                provider: VEO.to_string(),
                status: 502,
                body: value.to_string(),
            }
        })
    }

    async fn check(&self, operation: &str) -> Result<OperationStatus, ProviderError> {
        let url = format!("{}/{}", self.base_url, operation.trim_start_matches('/'));
        let resp = self
            .http
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::transport(VEO, e))?;
        Ok(parse_operation(&Self::read_json(resp).await?))
    }
}

/// Read `{done, error, response}` from a long-running operation.
pub fn parse_operation(value: &Value) -> OperationStatus {
    let done = value.get("done").and_then(Value::as_bool).unwrap_or(false);
    let error = value.get("error").filter(|e| !e.is_null()).map(|e| {
        e.get("message").and_then(Value::as_str).map(str::to_string).unwrap_or_else(|| e.to_string())
    });

    let response = value.get("response");
    let samples = response
        .and_then(|r| r.pointer("/generateVideoResponse/generatedSamples"))
        .or_else(|| response.and_then(|r| r.get("generatedVideos")));
    let video_uri = samples
        .and_then(|s| s.get(0))
        .and_then(|s| s.pointer("/video/uri"))
        .and_then(Value::as_str)
        .map(str::to_string);

    OperationStatus { done, error, video_uri }
}
