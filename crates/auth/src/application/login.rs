//! Login Use Case
//!
//! Authenticates an account, binds the requesting device, and issues a
//! device-bound access token.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::{mask_email, with_query_timeout};
use crate::domain::device_registry::DeviceRegistry;
use crate::domain::repository::{AccountRepository, DeviceRepository};
use crate::domain::value_object::{DeviceAddress, Email};
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
    pub device_address: String,
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    pub token: String,
}

/// Login use case
pub struct LoginUseCase<A, D>
where
    A: AccountRepository,
    D: DeviceRepository,
{
    account_repo: Arc<A>,
    device_registry: DeviceRegistry<D>,
    config: Arc<AuthConfig>,
}

impl<A, D> LoginUseCase<A, D>
where
    A: AccountRepository,
    D: DeviceRepository,
{
    pub fn new(account_repo: Arc<A>, device_repo: Arc<D>, config: Arc<AuthConfig>) -> Self {
        Self {
            account_repo,
            device_registry: DeviceRegistry::new(device_repo),
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let email = Email::new(input.email)?;
        let device = DeviceAddress::new(input.device_address)?;
        let password = ClearTextPassword::new(input.password)
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        let account = with_query_timeout(
            self.config.query_timeout,
            self.account_repo.find_by_email(&email),
        )
        .await?
        // Unknown email is reported exactly like a wrong password to
        // prevent account enumeration; the log keeps the distinction
        .ok_or_else(|| {
            tracing::warn!(email = %mask_email(email.as_str()), "Account not found");
            AuthError::InvalidCredentials
        })?;

        let hash = account.password_hash.clone();
        let password_valid = tokio::task::spawn_blocking(move || hash.verify(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("Verify task failed: {e}")))?;

        if !password_valid {
            return Err(AuthError::WrongPassword);
        }

        match with_query_timeout(
            self.config.query_timeout,
            self.device_registry.bind(&email, &device),
        )
        .await
        {
            Ok(()) => {}
            // The account row was read moments ago; losing it mid-flow
            // is a consistency anomaly, not a caller mistake
            Err(AuthError::AccountNotFound) => {
                return Err(AuthError::Internal(
                    "Account disappeared while binding device".to_string(),
                ));
            }
            Err(e) => return Err(e),
        }

        let token = self
            .config
            .token_codec()
            .issue(email.as_str(), device.as_str(), self.config.token_ttl);

        tracing::info!(
            email = %mask_email(email.as_str()),
            device = %device,
            "Login succeeded"
        );

        Ok(LoginOutput { token })
    }
}
