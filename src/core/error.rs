use thiserror::Error;

/// Error codes carried in JSON error bodies
pub mod error_codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const TEXT_TOO_LONG: &str = "TEXT_TOO_LONG";
    pub const SPEECH_SERVICE_ERROR: &str = "SPEECH_SERVICE_ERROR";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const SYNTHESIS_NOT_FOUND: &str = "SYNTHESIS_NOT_FOUND";
    pub const SYNTHESIS_FAILED: &str = "SYNTHESIS_FAILED";
    pub const SYNTHESIS_TIMEOUT: &str = "SYNTHESIS_TIMEOUT";
    pub const CONFIGURATION_ERROR: &str = "CONFIGURATION_ERROR";
}

/// Failures talking to the speech synthesis backend.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BackendError {
    #[error("Synthesis job not found: {0}")]
    NotFound(String),

    #[error("Backend request failed: {0}")]
    Request(String),

    #[error("Backend returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid backend response: {0}")]
    Protocol(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Request(err.to_string())
    }
}

impl BackendError {
    /// HTTP status reported by the backend, if the failure carried one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            BackendError::Http { status, .. } => Some(*status),
            BackendError::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

/// Failures reading from or writing to the audio store.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StorageError {
    #[error("Failed to upload {key}: {message}")]
    Upload { key: String, message: String },

    #[error("Failed to read {key}: {message}")]
    Read { key: String, message: String },

    #[error("Failed to sign URL for {key}: {message}")]
    Signing { key: String, message: String },

    #[error("Failed to list blobs: {0}")]
    Listing(String),

    #[error("Failed to delete {key}: {message}")]
    Delete { key: String, message: String },

    #[error("Storage configuration error: {0}")]
    Configuration(String),
}

/// Errors surfaced by the synthesis workflow (submit, check, speak).
///
/// A poll that runs out of attempts is not an error; it is reported as
/// [`CheckOutcome::TimedOut`](crate::core::poller::CheckOutcome).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SynthesisError {
    /// Bad client input, never retried
    #[error("{message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Text longer than the endpoint accepts
    #[error("Text length ({length}) exceeds maximum ({max_length})")]
    TextTooLong { length: usize, max_length: usize },

    /// Creating the backend job failed
    #[error("Batch synthesis request failed: {0}")]
    BackendSubmit(BackendError),

    /// Querying the job status failed
    #[error("Failed to check synthesis status: {0}")]
    BackendStatus(BackendError),

    /// The backend does not know the job id
    #[error("Synthesis job not found: {0}")]
    NotFound(String),

    /// The result bundle could not be turned into published audio
    #[error("Failed to materialize synthesis result: {0}")]
    Materialization(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl SynthesisError {
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        SynthesisError::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Get the error code for structured error responses
    pub fn error_code(&self) -> &'static str {
        match self {
            SynthesisError::Validation { .. } => error_codes::VALIDATION_ERROR,
            SynthesisError::TextTooLong { .. } => error_codes::TEXT_TOO_LONG,
            SynthesisError::BackendSubmit(_) | SynthesisError::BackendStatus(_) => {
                error_codes::SPEECH_SERVICE_ERROR
            }
            SynthesisError::NotFound(_) => error_codes::SYNTHESIS_NOT_FOUND,
            SynthesisError::Materialization(_) => error_codes::SYNTHESIS_FAILED,
            SynthesisError::Storage(_) => error_codes::STORAGE_ERROR,
            SynthesisError::Configuration(_) => error_codes::CONFIGURATION_ERROR,
        }
    }

    /// Input field the error refers to, for validation failures
    pub fn field(&self) -> Option<&str> {
        match self {
            SynthesisError::Validation { field, .. } => field.as_deref(),
            SynthesisError::TextTooLong { .. } => Some("text"),
            _ => None,
        }
    }

    /// True for errors caused by the request rather than by a collaborator
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SynthesisError::Validation { .. }
                | SynthesisError::TextTooLong { .. }
                | SynthesisError::NotFound(_)
        )
    }
}

pub type SynthesisResult<T> = Result<T, SynthesisError>;
