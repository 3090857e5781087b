use std::sync::Arc;
use std::time::Duration;

use adsnap_types::{ProviderError, ServiceConfig, VideoJob, VideoRequest};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::VideoBackend;

/// Fixed-interval, bounded status polling.
#[derive(Debug, Clone, Copy)]
pub struct VideoPoller {
    interval: Duration,
    max_attempts: u32,
}

impl VideoPoller {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self { interval, max_attempts: max_attempts.max(1) }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(
            Duration::from_secs(config.video_poll_interval_secs),
            config.video_poll_max_attempts,
        )
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Submit and poll to a terminal state.
    ///
    /// Each check waits one interval first and is awaited before the next one
    /// is scheduled. Returns the settled job on success.
    pub async fn run(
        &self,
        backend: &dyn VideoBackend,
        request: &VideoRequest,
    ) -> Result<VideoJob, ProviderError> {
        let operation = backend.submit(request).await?;
        let mut job = VideoJob::new(operation);
        info!(operation = %job.operation, "Video job submitted");

        for attempt in 1..=self.max_attempts {
            tokio::time::sleep(self.interval).await;
            job.polls = attempt;

            let status = backend.check(&job.operation).await?;
            if !status.done {
                debug!(operation = %job.operation, attempt, "Video job still running");
                continue;
            }

            if let Some(detail) = status.error {
                job.fail(detail.clone());
                warn!(operation = %job.operation, attempt, error = %detail, "Video job failed");
                return Err(ProviderError::JobFailed { detail });
            }

            return match status.video_uri {
                Some(uri) => {
                    job.complete(uri);
                    info!(operation = %job.operation, attempt, "Video job done");
                    Ok(job)
                },
                None => {
                    let detail = "operation finished without a generated video".to_string();
                    job.fail(detail.clone());
                    Err(ProviderError::JobFailed { detail })
                },
            };
        }

        warn!(operation = %job.operation, attempts = self.max_attempts, "Video job timed out");
        Err(ProviderError::Timeout {
            attempts: self.max_attempts,
            waited_secs: self.interval.as_secs() * u64::from(self.max_attempts),
        })
    }

    /// Run the job on its own task.
    pub fn spawn(&self, backend: Arc<dyn VideoBackend>, request: VideoRequest) -> VideoJobHandle {
        let poller = *self;
        let task = tokio::spawn(async move { poller.run(backend.as_ref(), &request).await });
        VideoJobHandle { task }
    }
}

/// Owns a spawned video job. Dropping it aborts the polling task, so an
/// abandoned request stops polling.
pub struct VideoJobHandle {
    task: JoinHandle<Result<VideoJob, ProviderError>>,
}

impl VideoJobHandle {
    pub async fn wait(mut self) -> Result<VideoJob, ProviderError> {
        match (&mut self.task).await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => {
                Err(ProviderError::Internal { message: "video job was cancelled".to_string() })
            },
            Err(e) => Err(ProviderError::Internal { message: format!("video task failed: {e}") }),
        }
    }

    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for VideoJobHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
