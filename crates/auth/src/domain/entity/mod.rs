//! Entities

pub mod account;
pub mod device_binding;

pub use account::Account;
pub use device_binding::DeviceBinding;
