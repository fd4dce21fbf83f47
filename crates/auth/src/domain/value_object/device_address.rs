//! Device Address Value Object
//!
//! Opaque client-supplied device identifier. The service binds tokens and
//! quota slots to this value; it carries no structure beyond being a
//! bounded, printable string.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Maximum device address length
const DEVICE_ADDRESS_MAX_LENGTH: usize = 255;

/// Device address value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceAddress(String);

impl DeviceAddress {
    /// Create a new device address with validation
    pub fn new(address: impl Into<String>) -> AppResult<Self> {
        let address = address.into();

        if address.trim().is_empty() {
            return Err(AppError::bad_request("Device address cannot be empty"));
        }

        if address.len() > DEVICE_ADDRESS_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Device address must be at most {} characters",
                DEVICE_ADDRESS_MAX_LENGTH
            )));
        }

        if address.chars().any(|c| c.is_control()) {
            return Err(AppError::bad_request(
                "Device address contains invalid characters",
            ));
        }

        Ok(Self(address))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Get the address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for DeviceAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
