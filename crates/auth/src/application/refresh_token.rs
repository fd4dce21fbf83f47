//! Refresh Token Use Case
//!
//! Exchanges a valid device-bound token for a fresh one without
//! re-presenting the password. Security rests on signature
//! unforgeability plus the device-match check: a token stolen and
//! replayed from another device must not be refreshable.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{mask_email, with_query_timeout};
use crate::domain::device_registry::DeviceRegistry;
use crate::domain::repository::DeviceRepository;
use crate::domain::value_object::{DeviceAddress, Email};
use crate::error::{AuthError, AuthResult};

/// Refresh token input
pub struct RefreshTokenInput {
    pub device_address: String,
    pub access_token: String,
}

/// Refresh token output
#[derive(Debug)]
pub struct RefreshTokenOutput {
    pub token: String,
}

/// Refresh token use case
pub struct RefreshTokenUseCase<D>
where
    D: DeviceRepository,
{
    device_registry: DeviceRegistry<D>,
    config: Arc<AuthConfig>,
}

impl<D> RefreshTokenUseCase<D>
where
    D: DeviceRepository,
{
    pub fn new(device_repo: Arc<D>, config: Arc<AuthConfig>) -> Self {
        Self {
            device_registry: DeviceRegistry::new(device_repo),
            config,
        }
    }

    pub async fn execute(&self, input: RefreshTokenInput) -> AuthResult<RefreshTokenOutput> {
        let device = DeviceAddress::new(input.device_address)?;

        // Codec failures propagate by name: callers treat Expired as
        // "retry refresh" and everything else as "force re-login"
        let claims = self.config.token_codec().validate(&input.access_token)?;

        if claims.device_address != device.as_str() {
            return Err(AuthError::AddressMismatch);
        }

        // Claims were validated at issuance; no re-validation here
        let email = Email::from_db(claims.email);

        let bound = with_query_timeout(
            self.config.query_timeout,
            self.device_registry.is_bound(&email, &device),
        )
        .await?;

        if !bound {
            tracing::warn!(
                email = %mask_email(email.as_str()),
                device = %device,
                "Device binding expired or revoked"
            );
            return Err(AuthError::DeviceNotFound);
        }

        let token = self
            .config
            .token_codec()
            .issue(email.as_str(), device.as_str(), self.config.token_ttl);

        tracing::info!(
            email = %mask_email(email.as_str()),
            device = %device,
            "Token refreshed"
        );

        Ok(RefreshTokenOutput { token })
    }
}
