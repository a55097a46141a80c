use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use url::form_urlencoded;

use crate::auth::{Auth, match_api_secret_id};
use crate::errors::auth_error::AuthError;
use crate::state::AppState;

/// Query parameter accepted in place of the Authorization header
const CODE_PARAM: &str = "code";

/// Secret sent by the client, header first, then `?code=`
fn presented_secret(request: &Request) -> Result<String, AuthError> {
    if let Some(header) = request.headers().get("authorization") {
        let value = header.to_str().map_err(|_| AuthError::InvalidAuthHeader)?;
        return value
            .strip_prefix("Bearer ")
            .map(str::to_string)
            .ok_or(AuthError::InvalidAuthHeader);
    }

    request
        .uri()
        .query()
        .and_then(|query| {
            form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == CODE_PARAM)
                .map(|(_, value)| value.into_owned())
        })
        .filter(|code| !code.is_empty())
        .ok_or(AuthError::MissingCredentials)
}

/// API secret authentication middleware
///
/// Accepts `Authorization: Bearer <secret>` or a `code` query parameter and
/// compares it in constant time against the configured secrets. On success
/// the matching secret id is inserted as an [`Auth`] extension. With
/// `auth_required` off every request passes with an empty context.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if !state.config.auth_required {
        tracing::debug!("Authentication disabled, inserting empty Auth context");
        request.extensions_mut().insert(Auth::empty());
        return Ok(next.run(request).await);
    }

    if !state.config.has_api_secret_auth() {
        return Err(AuthError::ConfigError(
            "Authentication required but no API secret configured".to_string(),
        ));
    }

    let request_method = request.method().to_string();
    let request_path = request.uri().path().to_string();
    let secret = presented_secret(&request)?;

    match match_api_secret_id(&secret, &state.config.auth_api_secrets) {
        Some(secret_id) => {
            tracing::debug!(
                method = %request_method,
                path = %request_path,
                auth_id = %secret_id,
                "API secret authentication successful"
            );
            request.extensions_mut().insert(Auth::new(secret_id));
            Ok(next.run(request).await)
        }
        None => {
            tracing::warn!(
                method = %request_method,
                path = %request_path,
                "API secret authentication failed: token mismatch"
            );
            Err(AuthError::Unauthorized("Invalid API secret".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;

    fn request(uri: &str, authorization: Option<&str>) -> Request {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = authorization {
            builder = builder.header("authorization", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_bearer_header() {
        let req = request("/api/voices", Some("Bearer abc"));
        assert_eq!(presented_secret(&req).unwrap(), "abc");
    }

    #[test]
    fn test_header_wins_over_code() {
        let req = request("/api/voices?code=from-query", Some("Bearer from-header"));
        assert_eq!(presented_secret(&req).unwrap(), "from-header");
    }

    #[test]
    fn test_code_query_parameter() {
        let req = request("/api/batch-check?synthesis_id=x&code=a%2Bb", None);
        assert_eq!(presented_secret(&req).unwrap(), "a+b");
    }

    #[test]
    fn test_missing_and_malformed() {
        assert!(matches!(
            presented_secret(&request("/api/voices", None)),
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            presented_secret(&request("/api/voices?code=", None)),
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            presented_secret(&request("/api/voices", Some("Basic abc"))),
            Err(AuthError::InvalidAuthHeader)
        ));
    }
}
