//! Auth Middleware
//!
//! Two orthogonal layers applied in front of the handlers:
//! - `authorize`: demands a valid bearer token for the operations in
//!   [`PROTECTED_OPERATIONS`]. Register/Login/Refresh are intentionally
//!   unauthenticated entry points and are not listed.
//! - `track_request`: records operation, duration, and outcome for every
//!   call. Pure observability; no effect on control flow.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kernel::error::app_error::AppError;
use std::sync::Arc;
use std::time::Instant;

use crate::application::config::AuthConfig;

/// Operations that require a valid bearer token.
///
/// Paths are relative to the auth router; nesting strips any mount
/// prefix before this middleware runs.
pub const PROTECTED_OPERATIONS: &[&str] = &["/check"];

/// Authorize middleware state
#[derive(Clone)]
pub struct AuthorizeState {
    pub config: Arc<AuthConfig>,
}

/// Middleware gating protected operations behind a valid bearer token.
///
/// Validates signature and expiry only; unlike the refresh flow it does
/// not re-check the device binding.
pub async fn authorize(
    State(state): State<AuthorizeState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    if PROTECTED_OPERATIONS.contains(&req.uri().path()) {
        let Some(token) = bearer_token(req.headers()) else {
            return Err(AppError::unauthorized("Token is not provided").into_response());
        };

        if let Err(e) = state.config.token_codec().validate(token) {
            tracing::warn!(operation = req.uri().path(), error = %e, "Rejected bearer token");
            return Err(AppError::forbidden("Token is not valid").into_response());
        }
    }

    Ok(next.run(req).await)
}

/// Extract the bearer token from the Authorization header.
///
/// Accepts both `Bearer <token>` and a bare token value.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then_some(token)
}

/// Middleware recording operation, wall-clock duration, and outcome for
/// every call, protected or not.
pub async fn track_request(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let operation = req.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let elapsed = start.elapsed();

    if status.is_server_error() {
        tracing::error!(%method, operation, %status, ?elapsed, "Request failed");
    } else if status.is_client_error() {
        tracing::warn!(%method, operation, %status, ?elapsed, "Request rejected");
    } else {
        tracing::info!(%method, operation, %status, ?elapsed, "Request completed");
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
