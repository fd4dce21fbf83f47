//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in the
//! infrastructure layer; the core holds no cached copies across calls
//! (every flow re-reads through these traits within its own call).

use crate::domain::entity::{Account, DeviceBinding};
use crate::domain::value_object::{DeviceAddress, Email};
use crate::error::AuthResult;

/// Account repository trait
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Persist a new account, returning its assigned id.
    ///
    /// Fails with `AuthError::AlreadyExists` when the email is taken.
    async fn save_account(
        &self,
        email: &Email,
        password_hash: &platform::password::HashedPassword,
    ) -> AuthResult<i64>;

    /// Find an account by email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>>;
}

/// Device binding repository trait
#[trait_variant::make(DeviceRepository: Send)]
pub trait LocalDeviceRepository {
    /// Insert or refresh a device binding.
    ///
    /// Must be atomic: the quota check and the insert happen under one
    /// unit so concurrent binds for the same account cannot both cross
    /// the limit. Fails with `AuthError::AccountNotFound` when the
    /// account does not exist and `AuthError::QuotaExceeded` when the
    /// account already has the maximum number of live bindings; on
    /// failure no binding state changes.
    async fn bind_device(&self, binding: &DeviceBinding) -> AuthResult<()>;

    /// Check whether a live (unexpired) binding exists
    async fn device_exists(&self, email: &Email, device: &DeviceAddress) -> AuthResult<bool>;
}
