// ============================
// promptdesk-backend-lib/src/middleware/auth.rs
// ============================
//! Bearer-token extraction and session validation middleware.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::AppState;

/// Identity of the authenticated caller, injected as a request extension.
#[derive(Debug, Clone)]
pub struct AuthedUser(pub String);

/// Pull the bearer token out of the request headers. This is the only thing
/// the middleware knows about requests: whether they carry an
/// `Authorization: Bearer` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthenticated)?;

    if token.is_empty() {
        return Err(AppError::Unauthenticated);
    }
    Ok(token)
}

/// Route layer for protected endpoints: resolves the bearer token to a
/// username via the auth service and stashes it for the handler. Failures
/// surface as typed auth errors, which the error type renders as 401s.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?.to_string();
    let username = state.auth.validate(&token).await?;

    request.extensions_mut().insert(AuthedUser(username));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        let headers = headers_with_auth("Bearer abc123");
        assert_eq!(bearer_token(&headers).unwrap(), "abc123");
    }

    #[test]
    fn test_missing_header() {
        let headers = HeaderMap::new();
        assert!(matches!(
            bearer_token(&headers),
            Err(AppError::Unauthenticated)
        ));
    }

    #[test]
    fn test_wrong_scheme() {
        let headers = headers_with_auth("Basic dXNlcjpwYXNz");
        assert!(matches!(
            bearer_token(&headers),
            Err(AppError::Unauthenticated)
        ));
    }

    #[test]
    fn test_empty_token() {
        let headers = headers_with_auth("Bearer ");
        assert!(matches!(
            bearer_token(&headers),
            Err(AppError::Unauthenticated)
        ));
    }
}
