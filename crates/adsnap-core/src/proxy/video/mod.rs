//! Image-to-video generation.
//!
//! Submission returns an opaque operation handle at once; [`VideoPoller`]
//! then checks it at a fixed interval within a bounded attempt budget.

mod poller;
mod veo;

use adsnap_types::{ProviderError, VideoRequest};
use async_trait::async_trait;

pub use poller::{VideoJobHandle, VideoPoller};
pub use veo::{parse_operation, VeoBackend};

/// What one status check reported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationStatus {
    pub done: bool,
    pub error: Option<String>,
    pub video_uri: Option<String>,
}

#[async_trait]
pub trait VideoBackend: Send + Sync {
    /// Start a job and return its operation handle.
    async fn submit(&self, request: &VideoRequest) -> Result<String, ProviderError>;

    async fn check(&self, operation: &str) -> Result<OperationStatus, ProviderError>;
}
