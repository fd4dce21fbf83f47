//! Register Use Case
//!
//! Creates a new account. Registering never creates a device binding;
//! the first binding appears on the first successful login.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::{mask_email, with_query_timeout};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub email: String,
    pub password: String,
}

/// Register output
#[derive(Debug)]
pub struct RegisterOutput {
    pub account_id: i64,
}

/// Register use case
pub struct RegisterUseCase<A>
where
    A: AccountRepository,
{
    account_repo: Arc<A>,
    config: Arc<AuthConfig>,
}

impl<A> RegisterUseCase<A>
where
    A: AccountRepository,
{
    pub fn new(account_repo: Arc<A>, config: Arc<AuthConfig>) -> Self {
        Self {
            account_repo,
            config,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let email = Email::new(input.email)?;

        let password = ClearTextPassword::new(input.password)
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        // Argon2id costs tens of milliseconds; keep it off the async
        // worker threads
        let password_hash = tokio::task::spawn_blocking(move || password.hash())
            .await
            .map_err(|e| AuthError::Internal(format!("Hashing task failed: {e}")))?
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        let account_id = with_query_timeout(
            self.config.query_timeout,
            self.account_repo.save_account(&email, &password_hash),
        )
        .await
        .inspect_err(|e| {
            if matches!(e, AuthError::AlreadyExists) {
                tracing::warn!(email = %mask_email(email.as_str()), "Account already exists");
            }
        })?;

        tracing::info!(
            email = %mask_email(email.as_str()),
            account_id,
            "Account registered"
        );

        Ok(RegisterOutput { account_id })
    }
}
