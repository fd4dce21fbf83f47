//! Value Objects

pub mod device_address;
pub mod email;

pub use device_address::DeviceAddress;
pub use email::Email;
