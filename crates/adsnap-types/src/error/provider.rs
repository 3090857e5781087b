//! Provider-related errors.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while talking to (or instead of talking to) a provider.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum ProviderError {
    /// Required input missing or malformed; no provider call was made
    #[error("{message}")]
    InvalidRequest { message: String },

    /// Network failure or timeout before any HTTP response arrived
    #[error("{provider} request failed: {message}")]
    Transport { provider: String, message: String },

    /// Non-2xx response from a synchronous provider client
    #[error("{provider} returned HTTP {status}: {body}")]
    Upstream {
        provider: String,
        status: u16,
        body: String,
    },

    /// The provider answered, and its answer is an error payload
    #[error("Provider rejected request to {url_attempted} (HTTP {status_code})")]
    ProviderReported {
        status_code: u16,
        error: Value,
        url_attempted: String,
    },

    /// Bounded polling ran out of attempts
    #[error("Timeout after {attempts} status checks ({waited_secs}s)")]
    Timeout { attempts: u32, waited_secs: u64 },

    /// Asynchronous job finished with an error
    #[error("Video generation failed: {detail}")]
    JobFailed { detail: String },

    /// Local image compositing failed
    #[error("Compositing failed: {message}")]
    Compositing { message: String },

    /// Bugs, unexpected states
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ProviderError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest { message: message.into() }
    }

    pub fn transport(provider: &str, message: impl std::fmt::Display) -> Self {
        Self::Transport { provider: provider.to_string(), message: message.to_string() }
    }

    /// Check if this is a client error (4xx equivalent).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status_code())
    }

    /// Get HTTP status code for this error.
    ///
    /// Provider statuses pass through when they are real error codes.
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidRequest { .. } => 400,
            Self::Transport { .. } => 502,
            Self::Upstream { status, .. } => passthrough_status(*status, 502),
            Self::ProviderReported { status_code, .. } => passthrough_status(*status_code, 500),
            Self::Timeout { .. } => 504,
            Self::JobFailed { .. } | Self::Compositing { .. } | Self::Internal { .. } => 500,
        }
    }
}

fn passthrough_status(status: u16, fallback: u16) -> u16 {
    if (400..600).contains(&status) {
        status
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_status_codes() {
        assert_eq!(ProviderError::invalid("No image provided").http_status_code(), 400);
        assert_eq!(ProviderError::transport("bria", "connection refused").http_status_code(), 502);
        assert_eq!(ProviderError::Timeout { attempts: 40, waited_secs: 400 }.http_status_code(), 504);
    }

    #[test]
    fn test_provider_status_passthrough() {
        let rejected = ProviderError::ProviderReported {
            status_code: 422,
            error: json!({"message": "bad scene"}),
            url_attempted: "https://x/v1/product/lifestyle_shot_by_text".to_string(),
        };
        assert_eq!(rejected.http_status_code(), 422);
        assert!(rejected.is_client_error());

        let odd = ProviderError::Upstream {
            provider: "bria".to_string(),
            status: 200,
            body: String::new(),
        };
        assert_eq!(odd.http_status_code(), 502);
    }

    #[test]
    fn test_display_carries_status_and_body() {
        let err = ProviderError::Upstream {
            provider: "bria".to_string(),
            status: 400,
            body: "{\"error\":\"bad file\"}".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("400"));
        assert!(msg.contains("bad file"));
    }
}
