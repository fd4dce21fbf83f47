//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.
//!
//! Business errors keep a stable, specific identity all the way to the
//! caller (client behavior depends on which one occurred). Infrastructure
//! errors are logged with context and surfaced as an opaque internal
//! failure; storage error text never reaches a client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::token::TokenError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Account with this email already exists
    #[error("Account already exists")]
    AlreadyExists,

    /// Account not found (storage contract error; login remaps this to
    /// `InvalidCredentials` before it can reach a caller)
    #[error("Account not found")]
    AccountNotFound,

    /// Invalid credentials (account not found, presented as a generic
    /// failure to prevent account enumeration)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Wrong password (distinct from `InvalidCredentials` internally)
    #[error("Wrong password")]
    WrongPassword,

    /// Device quota reached (at most 5 live bindings per account)
    #[error("Device limit exceeded")]
    QuotaExceeded,

    /// Device binding expired or was revoked since token issuance
    #[error("Device not found")]
    DeviceNotFound,

    /// Token was presented from a device other than the one it was
    /// issued for
    #[error("Device address mismatch")]
    AddressMismatch,

    /// Token validation failure, carrying the specific cause
    #[error("Token validation failed: {0}")]
    Token(#[from] TokenError),

    /// Request input failed validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Password hashing failure
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// A storage call exceeded its per-call deadline
    #[error("Storage query timed out")]
    StorageTimeout,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::AlreadyExists => StatusCode::CONFLICT,
            AuthError::AccountNotFound | AuthError::DeviceNotFound => StatusCode::NOT_FOUND,
            AuthError::InvalidCredentials | AuthError::WrongPassword | AuthError::Token(_) => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::QuotaExceeded => StatusCode::TOO_MANY_REQUESTS,
            AuthError::AddressMismatch => StatusCode::PRECONDITION_FAILED,
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Hashing(_)
            | AuthError::StorageTimeout
            | AuthError::Database(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::AlreadyExists => ErrorKind::Conflict,
            AuthError::AccountNotFound | AuthError::DeviceNotFound => ErrorKind::NotFound,
            AuthError::InvalidCredentials | AuthError::WrongPassword | AuthError::Token(_) => {
                ErrorKind::Unauthorized
            }
            AuthError::QuotaExceeded => ErrorKind::TooManyRequests,
            AuthError::AddressMismatch => ErrorKind::PreconditionFailed,
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::Hashing(_)
            | AuthError::StorageTimeout
            | AuthError::Database(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Infrastructure failures collapse into an opaque message here;
    /// their detail lives only in the server-side log.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Hashing(_)
            | AuthError::StorageTimeout
            | AuthError::Database(_)
            | AuthError::Internal(_) => AppError::internal("Internal server error"),
            AuthError::QuotaExceeded => AppError::new(self.kind(), self.to_string())
                .with_action("Sign out from an unused device and try again"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::StorageTimeout => {
                tracing::error!("Auth storage query timed out");
            }
            AuthError::Hashing(msg) => {
                tracing::error!(message = %msg, "Password hashing failed");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials | AuthError::WrongPassword => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::QuotaExceeded => {
                tracing::warn!("Device limit exceeded");
            }
            AuthError::AddressMismatch => {
                tracing::warn!("Token replayed from a different device");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => AuthError::Validation(err.message().to_string()),
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AuthError::AlreadyExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::QuotaExceeded.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AuthError::AddressMismatch.status_code(),
            StatusCode::PRECONDITION_FAILED
        );
        assert_eq!(
            AuthError::DeviceNotFound.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AuthError::Token(TokenError::Expired).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_infrastructure_detail_is_opaque() {
        let err = AuthError::Internal("pool exhausted on pg-replica-3".to_string());
        let app = err.to_app_error();
        assert_eq!(app.status_code(), 500);
        assert_eq!(app.message(), "Internal server error");

        let err = AuthError::StorageTimeout;
        assert_eq!(err.to_app_error().message(), "Internal server error");
    }

    #[test]
    fn test_business_errors_keep_identity() {
        let app = AuthError::QuotaExceeded.to_app_error();
        assert_eq!(app.status_code(), 429);
        assert_eq!(app.message(), "Device limit exceeded");
        assert!(app.action().is_some());
    }
}
