use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value, json};

use crate::core::error::{SynthesisError, error_codes};

/// Application error type
///
/// Renders as `{"error", "error_code", "details"?, "field"?}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Synthesis(err) => match err {
                SynthesisError::Validation { .. } | SynthesisError::TextTooLong { .. } => {
                    StatusCode::BAD_REQUEST
                }
                SynthesisError::NotFound(_) => StatusCode::NOT_FOUND,
                SynthesisError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
                SynthesisError::BackendSubmit(_)
                | SynthesisError::BackendStatus(_)
                | SynthesisError::Materialization(_)
                | SynthesisError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Synthesis(err) => err.error_code(),
            AppError::BadRequest(_) => error_codes::VALIDATION_ERROR,
            AppError::ServiceUnavailable(_) => error_codes::CONFIGURATION_ERROR,
            AppError::InternalServerError(_) => "INTERNAL_ERROR",
        }
    }

    /// Short message for clients and the optional detail behind it
    fn message_and_details(&self) -> (String, Option<String>) {
        match self {
            AppError::Synthesis(err) => match err {
                SynthesisError::Validation { message, .. } => (message.clone(), None),
                SynthesisError::TextTooLong { .. } => (
                    "Text too long for synchronous synthesis, use batch-start".to_string(),
                    Some(err.to_string()),
                ),
                SynthesisError::NotFound(id) => {
                    ("Synthesis job not found".to_string(), Some(id.clone()))
                }
                SynthesisError::BackendSubmit(e) | SynthesisError::BackendStatus(e) => {
                    ("Speech service error".to_string(), Some(e.to_string()))
                }
                SynthesisError::Materialization(detail) => (
                    "Failed to process synthesis result".to_string(),
                    Some(detail.clone()),
                ),
                SynthesisError::Storage(e) => ("Storage error".to_string(), Some(e.to_string())),
                SynthesisError::Configuration(detail) => {
                    ("Service not configured".to_string(), Some(detail.clone()))
                }
            },
            AppError::BadRequest(msg) => (msg.clone(), None),
            AppError::ServiceUnavailable(msg) => {
                ("Service unavailable".to_string(), Some(msg.clone()))
            }
            AppError::InternalServerError(msg) => {
                ("Internal server error".to_string(), Some(msg.clone()))
            }
        }
    }

    fn field(&self) -> Option<&str> {
        match self {
            AppError::Synthesis(err) => err.field(),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let (message, details) = self.message_and_details();
        let mut body = Map::new();
        body.insert("error".into(), json!(message));
        body.insert("error_code".into(), json!(self.error_code()));
        if let Some(details) = details {
            body.insert("details".into(), json!(details));
        }
        if let Some(field) = self.field() {
            body.insert("field".into(), json!(field));
        }

        (status, Json(Value::Object(body))).into_response()
    }
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
