//! Device Binding Entity
//!
//! A device binding asserts that a device address is authorized to act
//! on behalf of an account. Bindings are keyed by (email, device
//! address), created on the first successful login from a device,
//! re-touched on subsequent logins, and eligible for removal by the
//! expiry sweep once their window lapses.

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_object::{DeviceAddress, Email};

/// Device binding entity
#[derive(Debug, Clone)]
pub struct DeviceBinding {
    pub email: Email,
    pub device_address: DeviceAddress,
    /// When this binding was created or last refreshed
    pub bound_at: DateTime<Utc>,
    /// When this binding becomes eligible for the expiry sweep
    pub expires_at: DateTime<Utc>,
}

impl DeviceBinding {
    /// Create a binding valid for `ttl` from now.
    pub fn new(email: Email, device_address: DeviceAddress, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            email,
            device_address,
            bound_at: now,
            expires_at: now + ttl,
        }
    }

    /// Check if the binding's window has lapsed
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Refresh the expiry window (repeated login from the same device)
    pub fn touch(&mut self, ttl: Duration) {
        let now = Utc::now();
        self.bound_at = now;
        self.expires_at = now + ttl;
    }
}
