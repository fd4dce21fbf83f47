//! Application Configuration
//!
//! Configuration for the Auth application layer. The token secret is an
//! explicit value passed by construction; nothing reads it from ambient
//! or static state.

use std::time::Duration;

use platform::token::AccessTokenCodec;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Symmetric secret for token signing (HMAC-SHA256)
    pub token_secret: Vec<u8>,
    /// Access token TTL (1 hour)
    pub token_ttl: Duration,
    /// Per-call deadline for each storage-facing step
    pub query_timeout: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: Vec::new(),
            token_ttl: Duration::from_secs(3600),
            query_timeout: Duration::from_secs(3),
        }
    }
}

impl AuthConfig {
    /// Create config with a random token secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = vec![0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            token_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development
    pub fn development() -> Self {
        Self::with_random_secret()
    }

    /// Build the token codec keyed by this config's secret
    pub fn token_codec(&self) -> AccessTokenCodec {
        AccessTokenCodec::new(self.token_secret.clone())
    }
}
