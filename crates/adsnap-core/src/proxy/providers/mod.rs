//! Synchronous image-editing provider clients.
//!
//! One [`BriaClient`] is shared by every operation; each submodule adds the
//! request builders for one family of endpoints.

pub mod background;
pub mod generation;
pub mod lifestyle;

use adsnap_types::ProviderError;
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::{debug, info};

pub use background::REMOVE_BACKGROUND_PATHS;
pub use generation::{enhanced_text, HdOptions, ENHANCE_PATH, HD_PATH};
pub use lifestyle::{ImageShotOptions, PlacementOptions, TextShotOptions, BY_IMAGE_PATH, BY_TEXT_PATH};

pub const BRIA: &str = "bria";

#[derive(Clone)]
pub struct BriaClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// A provider answer that has not been judged yet.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as JSON, or as a JSON string when it does not parse.
    pub fn body_value(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or_else(|_| Value::String(self.body.clone()))
    }

    /// Judge a synchronous client response.
    ///
    /// Non-2xx and unparsable bodies become [`ProviderError::Upstream`]; a 2xx
    /// body carrying an `error` member becomes [`ProviderError::ProviderReported`].
    pub fn into_json(self) -> Result<Value, ProviderError> {
        if !self.is_success() {
            return Err(self.into_upstream());
        }
        let Ok(value) = serde_json::from_str::<Value>(&self.body) else {
            return Err(self.into_upstream());
        };
        match self.reported_error(&value) {
            Some(err) => Err(err),
            None => Ok(value),
        }
    }

    /// An `error` member the provider put in an otherwise successful body.
    pub fn reported_error(&self, value: &Value) -> Option<ProviderError> {
        let err = value.get("error").filter(|e| !e.is_null())?;
        Some(ProviderError::ProviderReported {
            status_code: self.status,
            error: err.clone(),
            url_attempted: self.url.clone(),
        })
    }

    pub fn into_upstream(self) -> ProviderError {
        ProviderError::Upstream { provider: BRIA.to_string(), status: self.status, body: self.body }
    }

    pub fn into_reported(self) -> ProviderError {
        ProviderError::ProviderReported {
            error: self.body_value(),
            status_code: self.status,
            url_attempted: self.url,
        }
    }
}

impl BriaClient {
    pub fn new(http: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a JSON body. Only transport failures are errors here.
    pub async fn send(&self, path: &str, body: &Value) -> Result<RawResponse, ProviderError> {
        let url = self.endpoint(path);
        debug!(url = %url, keys = ?body_keys(body), "Sending provider request");

        let resp = self
            .http
            .post(&url)
            .header("api_token", &self.api_key)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::transport(BRIA, e))?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| ProviderError::transport(BRIA, e))?;
        info!(url = %url, status, len = body.len(), "Provider responded");
        Ok(RawResponse { url, status, body })
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ProviderError> {
        self.send(path, body).await?.into_json()
    }
}

/// Top-level field names, for logs that must not carry base64 payloads.
pub(crate) fn body_keys(body: &Value) -> Vec<&str> {
    body.as_object().map(|o| o.keys().map(String::as_str).collect()).unwrap_or_default()
}
