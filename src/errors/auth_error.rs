use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE},
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Error codes for structured error responses
pub mod error_codes {
    pub const MISSING_CREDENTIALS: &str = "missing_credentials";
    pub const INVALID_AUTH_HEADER: &str = "invalid_auth_header";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const CONFIG_ERROR: &str = "config_error";
}

/// Challenge sent with every 401
const BEARER_CHALLENGE: &str = r#"Bearer realm="tonisynth""#;

/// Rejections produced by the API secret middleware
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Neither an Authorization header nor a `code` query parameter was sent
    #[error("Missing API secret: send 'Authorization: Bearer <secret>' or '?code=<secret>'")]
    MissingCredentials,

    /// Authorization header present but not `Bearer <secret>`
    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Auth is required but no secret is configured; no request can pass
    #[error("Auth configuration error: {0}")]
    ConfigError(String),
}

impl AuthError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingCredentials => error_codes::MISSING_CREDENTIALS,
            AuthError::InvalidAuthHeader => error_codes::INVALID_AUTH_HEADER,
            AuthError::Unauthorized(_) => error_codes::UNAUTHORIZED,
            AuthError::ConfigError(_) => error_codes::CONFIG_ERROR,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::ConfigError(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn is_challenge(&self) -> bool {
        self.status_code() == StatusCode::UNAUTHORIZED
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            // Routine for unauthenticated probes
            AuthError::MissingCredentials | AuthError::InvalidAuthHeader => {
                tracing::debug!(error_code = self.error_code(), "{self}");
            }
            AuthError::Unauthorized(_) => tracing::warn!("{self}"),
            AuthError::ConfigError(_) => tracing::error!("{self}"),
        }

        let body = Json(json!({
            "error": self.to_string(),
            "error_code": self.error_code(),
        }));
        let mut response = (self.status_code(), body).into_response();
        if self.is_challenge() {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static(BEARER_CHALLENGE));
        }
        response
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
