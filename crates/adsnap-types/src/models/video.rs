//! Asynchronous video job model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::image::ImageReference;

/// Image-to-video submission.
#[derive(Debug, Clone)]
pub struct VideoRequest {
    pub image: ImageReference,
    pub prompt: String,
    pub duration_secs: u32,
    pub aspect_ratio: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VideoStatus {
    Pending,
    Done,
    Error,
}

/// Lives for one submission; mutated only by poll responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoJob {
    /// Opaque operation handle returned by the provider
    pub operation: String,
    pub status: VideoStatus,
    pub result_url: Option<String>,
    pub error_detail: Option<String>,
    pub polls: u32,
    pub submitted_at: DateTime<Utc>,
}

impl VideoJob {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: VideoStatus::Pending,
            result_url: None,
            error_detail: None,
            polls: 0,
            submitted_at: Utc::now(),
        }
    }

    /// Wall-clock time since submission.
    pub fn elapsed(&self) -> chrono::Duration {
        Utc::now() - self.submitted_at
    }

    pub fn is_terminal(&self) -> bool {
        self.status != VideoStatus::Pending
    }

    /// Terminal transitions are ignored once the job has settled.
    pub fn complete(&mut self, uri: String) {
        if !self.is_terminal() {
            self.status = VideoStatus::Done;
            self.result_url = Some(uri);
        }
    }

    pub fn fail(&mut self, detail: String) {
        if !self.is_terminal() {
            self.status = VideoStatus::Error;
            self.error_detail = Some(detail);
        }
    }
}
