//! Handlers module - axum endpoint handlers
//!
//! Every handler returns `AppResult`, so failures reach the client as
//! `{error}` (or the structured provider error) with a matching status.

pub mod cta;
pub mod photography;
pub mod prompt;
pub mod templates;
pub mod video;

use adsnap_types::{NormalizedResult, ProviderError};
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::Value;

use crate::error::AppResult;
use crate::proxy::extract;

/// Short per-request id used as a log prefix.
pub(crate) fn trace_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

pub(crate) fn normalized(raw: Value) -> Json<NormalizedResult> {
    Json(extract::normalize(raw))
}

pub(crate) fn png_data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

/// Run CPU-bound image work off the async workers.
pub(crate) async fn blocking<T, F>(work: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ProviderError::Compositing { message: e.to_string() })?
}
