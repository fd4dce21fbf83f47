//! Infrastructure Layer
//!
//! Database implementations of repository traits.

pub mod postgres;
