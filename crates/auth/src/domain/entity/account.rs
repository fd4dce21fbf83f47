//! Account Entity
//!
//! An account is created on Register and never mutated or deleted by
//! this subsystem. Credential changes are a future operation.

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;

use crate::domain::value_object::Email;

/// Account entity
#[derive(Debug, Clone)]
pub struct Account {
    /// Sequential identifier assigned by storage
    pub id: i64,
    /// Unique email, case-sensitive as stored
    pub email: Email,
    /// Argon2id password hash (PHC string)
    pub password_hash: HashedPassword,
    /// Registration timestamp
    pub registered_at: DateTime<Utc>,
}
