//! Platform - Shared infrastructure primitives
//!
//! Leaf crate with no domain knowledge:
//! - `password`: Argon2id password hashing and verification
//! - `token`: HMAC-signed access token codec

pub mod password;
pub mod token;
