//! Domain Layer
//!
//! Entities, value objects, repository traits, and domain services.

pub mod device_registry;
pub mod entity;
pub mod repository;
pub mod value_object;
