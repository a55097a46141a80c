//! Speech synthesis backend interface.
//!
//! The backend owns all job state: it accepts a markup payload under a caller
//! chosen id, reports progress, and serves the finished result bundle. The
//! service itself never stores jobs.

mod azure;
mod memory;

pub use azure::{AzureBatchClient, BATCH_API_VERSION};
pub use memory::{CreatedJob, ScriptedBackend};

use async_trait::async_trait;
use bytes::Bytes;

use super::error::BackendError;

/// Status string reported by the backend for one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendJobStatus {
    NotStarted,
    Running,
    Succeeded,
    Failed,
    /// Anything else; treated as still working
    Unknown(String),
}

impl BackendJobStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "NotStarted" => Self::NotStarted,
            "Running" => Self::Running,
            "Succeeded" => Self::Succeeded,
            "Failed" => Self::Failed,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::NotStarted => "NotStarted",
            Self::Running => "Running",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Unknown(other) => other.as_str(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl std::fmt::Display for BackendJobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One synthesis job as submitted to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub markup: String,
    pub description: String,
    pub output_format: String,
    pub ttl_hours: u64,
}

/// Result of one status query
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub status: BackendJobStatus,
    /// Where the result bundle can be fetched once succeeded
    pub result_url: Option<String>,
    pub failure_reason: Option<String>,
    pub duration_ms: Option<u64>,
    pub size_bytes: Option<u64>,
}

impl StatusReport {
    pub fn new(status: BackendJobStatus) -> Self {
        Self {
            status,
            result_url: None,
            failure_reason: None,
            duration_ms: None,
            size_bytes: None,
        }
    }

    pub fn with_result_url(mut self, url: impl Into<String>) -> Self {
        self.result_url = Some(url.into());
        self
    }

    pub fn with_failure_reason(mut self, reason: impl Into<String>) -> Self {
        self.failure_reason = Some(reason.into());
        self
    }

    pub fn with_metrics(mut self, duration_ms: Option<u64>, size_bytes: Option<u64>) -> Self {
        self.duration_ms = duration_ms;
        self.size_bytes = size_bytes;
        self
    }
}

#[async_trait]
pub trait SynthesisBackend: Send + Sync {
    /// Create a job under `job_id`; not retried by callers
    async fn create_job(&self, job_id: &str, request: &JobRequest) -> Result<(), BackendError>;

    /// Current status of `job_id`; `BackendError::NotFound` for unknown ids
    async fn get_status(&self, job_id: &str) -> Result<StatusReport, BackendError>;

    /// Download the result bundle referenced by a succeeded status
    async fn fetch_result(&self, result_ref: &str) -> Result<Bytes, BackendError>;
}
