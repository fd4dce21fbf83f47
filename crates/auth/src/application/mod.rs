//! Application Layer
//!
//! Use cases and application services. Each flow is a short linear
//! state machine with early exit on failure; every storage-touching
//! step runs under its own bounded deadline.

pub mod config;
pub mod login;
pub mod refresh_token;
pub mod register;

// Re-exports
pub use config::AuthConfig;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use refresh_token::{RefreshTokenInput, RefreshTokenOutput, RefreshTokenUseCase};
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};

use std::future::Future;
use std::time::Duration;

use crate::error::{AuthError, AuthResult};

/// Run a storage-facing step under a fresh bounded deadline.
///
/// A deadline overrun is a transient internal error; nothing in this
/// layer retries automatically.
pub(crate) async fn with_query_timeout<F, T>(timeout: Duration, fut: F) -> AuthResult<T>
where
    F: Future<Output = AuthResult<T>>,
{
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| AuthError::StorageTimeout)?
}

/// Mask an email for logging: keep the first character of the local
/// part and the domain.
pub(crate) fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let head = local.chars().next().map(String::from).unwrap_or_default();
            format!("{head}***@{domain}")
        }
        None => "***".to_string(),
    }
}
