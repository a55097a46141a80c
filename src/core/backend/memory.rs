use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Mutex;

use super::{BackendJobStatus, JobRequest, StatusReport, SynthesisBackend};
use crate::core::error::BackendError;

/// A job accepted by [`ScriptedBackend::create_job`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedJob {
    pub job_id: String,
    pub request: JobRequest,
}

/// Deterministic in-memory backend.
///
/// Status queries replay a script in order; once the script runs out the last
/// entry repeats. Every query is counted so callers can assert how often the
/// backend was polled.
///
/// ```rust
/// # tokio_test_block(async {
/// use tonisynth::core::backend::{BackendJobStatus, ScriptedBackend, StatusReport, SynthesisBackend};
///
/// let backend = ScriptedBackend::new(vec![
///     StatusReport::new(BackendJobStatus::Running),
///     StatusReport::new(BackendJobStatus::Failed),
/// ]);
/// assert_eq!(backend.get_status("job").await.unwrap().status, BackendJobStatus::Running);
/// assert_eq!(backend.get_status("job").await.unwrap().status, BackendJobStatus::Failed);
/// assert_eq!(backend.get_status("job").await.unwrap().status, BackendJobStatus::Failed);
/// assert_eq!(backend.status_queries(), 3);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    script: Vec<Result<StatusReport, BackendError>>,
    create_error: Option<BackendError>,
    results: HashMap<String, Bytes>,
    created: Mutex<Vec<CreatedJob>>,
    status_queries: AtomicUsize,
    fetches: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new(statuses: Vec<StatusReport>) -> Self {
        Self {
            script: statuses.into_iter().map(Ok).collect(),
            ..Default::default()
        }
    }

    /// Reports `Running` for `running_polls` queries, then `Succeeded` with a
    /// bundle available at `result_url`
    pub fn succeeding_after(running_polls: usize, result_url: &str, bundle: Bytes) -> Self {
        let mut statuses = vec![StatusReport::new(BackendJobStatus::Running); running_polls];
        statuses.push(StatusReport::new(BackendJobStatus::Succeeded).with_result_url(result_url));
        Self::new(statuses).with_result(result_url, bundle)
    }

    /// Every status query fails with `error`
    pub fn failing_status(error: BackendError) -> Self {
        Self {
            script: vec![Err(error)],
            ..Default::default()
        }
    }

    pub fn with_result(mut self, result_url: &str, bundle: Bytes) -> Self {
        self.results.insert(result_url.to_string(), bundle);
        self
    }

    pub fn with_create_error(mut self, error: BackendError) -> Self {
        self.create_error = Some(error);
        self
    }

    pub fn status_queries(&self) -> usize {
        self.status_queries.load(Ordering::SeqCst)
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub async fn created_jobs(&self) -> Vec<CreatedJob> {
        self.created.lock().await.clone()
    }
}

#[async_trait]
impl SynthesisBackend for ScriptedBackend {
    async fn create_job(&self, job_id: &str, request: &JobRequest) -> Result<(), BackendError> {
        if let Some(error) = &self.create_error {
            return Err(error.clone());
        }
        self.created.lock().await.push(CreatedJob {
            job_id: job_id.to_string(),
            request: request.clone(),
        });
        Ok(())
    }

    async fn get_status(&self, job_id: &str) -> Result<StatusReport, BackendError> {
        let query = self.status_queries.fetch_add(1, Ordering::SeqCst);
        match self.script.get(query).or_else(|| self.script.last()) {
            Some(entry) => entry.clone(),
            None => Err(BackendError::NotFound(job_id.to_string())),
        }
    }

    async fn fetch_result(&self, result_ref: &str) -> Result<Bytes, BackendError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.results.get(result_ref).cloned().ok_or(BackendError::Http {
            status: 404,
            body: format!("no result at {result_ref}"),
        })
    }
}
