//! Device Registry
//!
//! Domain service enforcing the device-to-account binding policy: at
//! most [`MAX_DEVICES_PER_ACCOUNT`] live bindings per email, each valid
//! for [`DEVICE_BINDING_TTL`] and implicitly renewed by repeated logins.
//!
//! The atomicity of the quota check lives in the repository (the
//! check-and-insert must be race-free under concurrent binds); the
//! registry owns the policy constants and the binding lifecycle.

use std::sync::Arc;

use chrono::Duration;

use crate::domain::entity::DeviceBinding;
use crate::domain::repository::DeviceRepository;
use crate::domain::value_object::{DeviceAddress, Email};
use crate::error::AuthResult;

/// Maximum number of simultaneously live device bindings per account
pub const MAX_DEVICES_PER_ACCOUNT: i64 = 5;

/// How long a binding stays live without being refreshed by a login
pub const DEVICE_BINDING_TTL: Duration = Duration::days(7);

/// Device registry domain service
pub struct DeviceRegistry<D>
where
    D: DeviceRepository,
{
    device_repo: Arc<D>,
}

impl<D> DeviceRegistry<D>
where
    D: DeviceRepository,
{
    pub fn new(device_repo: Arc<D>) -> Self {
        Self { device_repo }
    }

    /// Bind a device to an account, or refresh an existing binding.
    ///
    /// Idempotent for an already-bound (email, device) pair: the expiry
    /// window is renewed and no quota slot is consumed. A new pair when
    /// the account already holds [`MAX_DEVICES_PER_ACCOUNT`] live
    /// bindings fails with `QuotaExceeded` and leaves existing bindings
    /// untouched.
    pub async fn bind(&self, email: &Email, device: &DeviceAddress) -> AuthResult<()> {
        let binding = DeviceBinding::new(email.clone(), device.clone(), DEVICE_BINDING_TTL);
        self.device_repo.bind_device(&binding).await
    }

    /// Check whether the device still holds a live binding.
    ///
    /// Used by the refresh flow to confirm the device was not revoked or
    /// swept since the token was issued.
    pub async fn is_bound(&self, email: &Email, device: &DeviceAddress) -> AuthResult<bool> {
        self.device_repo.device_exists(email, device).await
    }
}
