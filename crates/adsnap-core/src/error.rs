//! Unified error type for AdSnap Core.

use adsnap_types::ProviderError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Main error type for all AdSnap operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    /// Provider call or input validation failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Image decode/encode failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// File system I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation failed.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for AdSnap operations.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Provider(e) => {
                StatusCode::from_u16(e.http_status_code()).unwrap_or(StatusCode::BAD_GATEWAY)
            },
            AppError::Image(_) | AppError::Io(_) | AppError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            // The body reports the status actually sent, which differs from the
            // provider's own code when a 2xx answer carried an error payload.
            AppError::Provider(ProviderError::ProviderReported { error, url_attempted, .. }) => {
                json!({
                    "error": error,
                    "status_code": status.as_u16(),
                    "url_attempted": url_attempted,
                })
            },
            other => json!({ "error": other.to_string() }),
        };
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), body = %body, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), body = %body, "Request rejected");
        }
        (status, Json(body)).into_response()
    }
}
