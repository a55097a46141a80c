use chrono::{DateTime, Utc};
use serde::Serialize;

/// Lifecycle of a synthesis job as seen by this service.
///
/// Status only moves forward: `Created -> Running -> {Succeeded | Failed | TimedOut}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Created,
    Running,
    Succeeded,
    Failed,
    TimedOut,
}

impl JobStatus {
    fn rank(self) -> u8 {
        match self {
            JobStatus::Created => 0,
            JobStatus::Running => 1,
            JobStatus::Succeeded | JobStatus::Failed | JobStatus::TimedOut => 2,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.rank() == 2
    }

    /// Whether moving from `self` to `next` is a legal transition
    pub fn can_advance_to(self, next: JobStatus) -> bool {
        !self.is_terminal() && next.rank() > self.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Created => "created",
            JobStatus::Running => "running",
            JobStatus::Succeeded => "succeeded",
            JobStatus::Failed => "failed",
            JobStatus::TimedOut => "timed_out",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A submitted synthesis job.
///
/// Immutable once created; progress lives with the backend and is tracked per
/// check by the poller. The input text is not kept, only its length.
#[derive(Debug, Clone, Serialize)]
pub struct SynthesisJob {
    job_id: String,
    voice: String,
    style: Option<String>,
    text_length: usize,
    created_at: DateTime<Utc>,
}

impl SynthesisJob {
    pub fn new(
        job_id: impl Into<String>,
        voice: impl Into<String>,
        style: Option<String>,
        text_length: usize,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            voice: voice.into(),
            style,
            text_length,
            created_at: Utc::now(),
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn voice(&self) -> &str {
        &self.voice
    }

    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    pub fn text_length(&self) -> usize {
        self.text_length
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Rough narration length: half a minute per thousand characters
    pub fn estimated_duration_minutes(&self) -> f64 {
        self.text_length as f64 / 1000.0 * 0.5
    }
}
