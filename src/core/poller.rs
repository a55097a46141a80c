//! Bounded status polling.
//!
//! A waiting check queries the backend up to `max_poll_attempts` times, sleeping
//! `poll_interval` before every query but the first. The first terminal status
//! ends the loop: `Succeeded` publishes the audio, `Failed` reports the
//! backend's reason. Running out of attempts is a normal outcome, not an error;
//! the backend job keeps going and a later check may still succeed.
//!
//! Status strings the backend did not document are treated as "still working".

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::backend::{BackendJobStatus, SynthesisBackend};
use super::error::{BackendError, SynthesisError, SynthesisResult};
use super::job::JobStatus;
use super::materializer::{CompletedAudio, ResultMaterializer};
use crate::config::SynthesisSettings;

/// How long one check call may wait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollMode {
    /// Poll until terminal or out of attempts
    #[default]
    Wait,
    /// Query once and report what the backend says
    Once,
}

/// Result of one check call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckOutcome {
    Completed(CompletedAudio),
    /// Still working when a single-query check returned
    Processing { backend_status: String },
    Failed { error_detail: String },
    #[serde(rename = "timeout")]
    TimedOut { elapsed_seconds: u64 },
}

fn status_error(error: BackendError) -> SynthesisError {
    match error {
        BackendError::NotFound(job_id) => SynthesisError::NotFound(job_id),
        other => SynthesisError::BackendStatus(other),
    }
}

/// Local view of the job; only ever moves forward
fn advance(local: &mut JobStatus, next: JobStatus, job_id: &str) {
    if local.can_advance_to(next) {
        debug!(synthesis_id = %job_id, from = %local, to = %next, "Job status advanced");
        *local = next;
    }
}

pub struct StatusPoller {
    backend: Arc<dyn SynthesisBackend>,
    materializer: ResultMaterializer,
    settings: Arc<SynthesisSettings>,
}

impl StatusPoller {
    pub fn new(
        backend: Arc<dyn SynthesisBackend>,
        materializer: ResultMaterializer,
        settings: Arc<SynthesisSettings>,
    ) -> Self {
        Self {
            backend,
            materializer,
            settings,
        }
    }

    pub async fn check(&self, job_id: &str, mode: PollMode) -> SynthesisResult<CheckOutcome> {
        let max_attempts = match mode {
            PollMode::Wait => self.settings.max_poll_attempts,
            PollMode::Once => 1,
        };
        let interval = self.settings.poll_interval;
        let mut local = JobStatus::Created;
        let mut last_status = BackendJobStatus::NotStarted;

        for attempt in 0..max_attempts {
            if attempt > 0 {
                info!(
                    synthesis_id = %job_id,
                    attempt = attempt + 1,
                    max_attempts,
                    wait_seconds = interval.as_secs_f64(),
                    "Polling synthesis status"
                );
                tokio::time::sleep(interval).await;
            }

            let report = self.backend.get_status(job_id).await.map_err(status_error)?;
            info!(
                synthesis_id = %job_id,
                status = %report.status,
                attempt = attempt + 1,
                "Synthesis status"
            );

            match &report.status {
                BackendJobStatus::NotStarted => {}
                BackendJobStatus::Running => advance(&mut local, JobStatus::Running, job_id),
                BackendJobStatus::Succeeded => {
                    advance(&mut local, JobStatus::Succeeded, job_id);
                    let audio = self.materializer.materialize(job_id, &report).await?;
                    info!(
                        synthesis_id = %job_id,
                        size_bytes = audio.size_bytes,
                        "Synthesis complete"
                    );
                    return Ok(CheckOutcome::Completed(audio));
                }
                BackendJobStatus::Failed => {
                    advance(&mut local, JobStatus::Failed, job_id);
                    let error_detail = report
                        .failure_reason
                        .clone()
                        .unwrap_or_else(|| "Unknown error".to_string());
                    warn!(synthesis_id = %job_id, error = %error_detail, "Synthesis failed");
                    return Ok(CheckOutcome::Failed { error_detail });
                }
                BackendJobStatus::Unknown(other) => {
                    warn!(synthesis_id = %job_id, status = %other, "Unknown status, continuing to poll");
                }
            }
            last_status = report.status;
        }

        match mode {
            PollMode::Once => Ok(CheckOutcome::Processing {
                backend_status: last_status.to_string(),
            }),
            PollMode::Wait => {
                advance(&mut local, JobStatus::TimedOut, job_id);
                let elapsed_seconds = self.settings.poll_budget().as_secs();
                warn!(synthesis_id = %job_id, elapsed_seconds, "Synthesis still running after poll budget");
                Ok(CheckOutcome::TimedOut { elapsed_seconds })
            }
        }
    }
}
