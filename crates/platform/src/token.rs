//! Access Token Codec
//!
//! Issues and validates compact HMAC-signed bearer tokens in the JWT wire
//! format: three dot-separated base64url segments (header, claims,
//! signature), signed with HMAC-SHA256.
//!
//! The codec is stateless; a token's validity is purely a function of its
//! signature and a wall-clock comparison against the `exp` claim. The
//! server keeps no session table.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use std::time::Duration;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// The only accepted signing algorithm. Tokens asserting anything else
/// (including "none") are rejected before the signature is checked.
const EXPECTED_ALG: &str = "HS256";

/// Token validation errors, ordered by the validation ladder.
///
/// Callers depend on the distinction: `Expired` means "retry the refresh
/// flow", everything else means "force re-login". Validation always
/// reports the most specific cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Token does not have the three-segment structure, or a segment is
    /// not valid base64url / JSON
    #[error("malformed token")]
    Malformed,

    /// Header asserts a signing algorithm other than HS256
    #[error("invalid signing method")]
    InvalidSignMethod,

    /// Signature does not verify against the secret
    #[error("invalid signature")]
    InvalidSignature,

    /// A required claim is absent or has the wrong type
    #[error("failed to extract claims from token")]
    MissingClaims,

    /// The `exp` claim is not a number
    #[error("incorrect expiration claim value")]
    IncorrectExpiration,

    /// The `exp` claim is in the past
    #[error("token expired")]
    Expired,
}

/// Validated claims extracted from a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub email: String,
    pub device_address: String,
    /// Issued-at, seconds since epoch
    pub issued_at: i64,
    /// Expiry, seconds since epoch
    pub expires_at: i64,
}

#[derive(Serialize)]
struct Header<'a> {
    alg: &'a str,
    typ: &'a str,
}

#[derive(Serialize)]
struct Claims<'a> {
    email: &'a str,
    #[serde(rename = "deviceAddress")]
    device_address: &'a str,
    iat: i64,
    exp: i64,
}

/// Signs and verifies access tokens with a symmetric secret.
///
/// The secret is supplied by construction; there is no ambient or static
/// key access anywhere in the codec.
#[derive(Clone)]
pub struct AccessTokenCodec {
    secret: Vec<u8>,
}

impl AccessTokenCodec {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Issue a token for `(email, device_address)` valid for `ttl`.
    ///
    /// Claims are `{email, deviceAddress, iat, exp}` with whole-second
    /// timestamps. The claims encoding is deterministic (fixed field
    /// order), so two tokens differ only when their claims differ.
    pub fn issue(&self, email: &str, device_address: &str, ttl: Duration) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            email,
            device_address,
            iat: now,
            exp: now + ttl.as_secs() as i64,
        };

        let header = Header {
            alg: EXPECTED_ALG,
            typ: "JWT",
        };

        // Serializing a struct with known fields cannot fail
        let header_json = serde_json::to_vec(&header).expect("header serialization");
        let claims_json = serde_json::to_vec(&claims).expect("claims serialization");

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(&header_json),
            URL_SAFE_NO_PAD.encode(&claims_json)
        );

        let signature = self.sign(signing_input.as_bytes());

        format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature))
    }

    /// Validate a token and extract its claims.
    ///
    /// Checks run in a fixed order so the most specific failure wins:
    /// 1. structural parse (three segments, base64url, JSON)
    /// 2. signing algorithm must be HS256
    /// 3. signature verification (constant time)
    /// 4. required claims present and correctly typed
    /// 5. `exp` strictly greater than now
    pub fn validate(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let mut segments = token.split('.');
        let (Some(header_b64), Some(claims_b64), Some(signature_b64), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenError::Malformed);
        };

        let header_json = URL_SAFE_NO_PAD
            .decode(header_b64)
            .map_err(|_| TokenError::Malformed)?;
        let claims_json = URL_SAFE_NO_PAD
            .decode(claims_b64)
            .map_err(|_| TokenError::Malformed)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| TokenError::Malformed)?;

        let header: serde_json::Value =
            serde_json::from_slice(&header_json).map_err(|_| TokenError::Malformed)?;
        let claims: serde_json::Value =
            serde_json::from_slice(&claims_json).map_err(|_| TokenError::Malformed)?;

        if header.get("alg").and_then(|v| v.as_str()) != Some(EXPECTED_ALG) {
            return Err(TokenError::InvalidSignMethod);
        }

        let signing_input = &token[..header_b64.len() + 1 + claims_b64.len()];
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::InvalidSignature)?;

        let email = claims
            .get("email")
            .and_then(|v| v.as_str())
            .ok_or(TokenError::MissingClaims)?;
        let device_address = claims
            .get("deviceAddress")
            .and_then(|v| v.as_str())
            .ok_or(TokenError::MissingClaims)?;
        let issued_at = claims
            .get("iat")
            .and_then(|v| v.as_i64())
            .ok_or(TokenError::MissingClaims)?;
        let expires_at = claims
            .get("exp")
            .ok_or(TokenError::MissingClaims)?
            .as_i64()
            .ok_or(TokenError::IncorrectExpiration)?;

        if expires_at <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(TokenClaims {
            email: email.to_string(),
            device_address: device_address.to_string(),
            issued_at,
            expires_at,
        })
    }

    fn sign(&self, data: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC can take key of any size");
        mac.update(data);
        mac.finalize().into_bytes().to_vec()
    }
}

impl std::fmt::Debug for AccessTokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessTokenCodec")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-key";
    const TTL: Duration = Duration::from_secs(3600);

    fn codec() -> AccessTokenCodec {
        AccessTokenCodec::new(SECRET)
    }

    /// Sign an arbitrary header/claims pair with the test secret.
    fn forge(header: &str, claims: &str) -> String {
        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header),
            URL_SAFE_NO_PAD.encode(claims)
        );
        let signature = codec().sign(signing_input.as_bytes());
        format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature))
    }

    #[test]
    fn test_issue_and_validate_roundtrip() {
        let token = codec().issue("a@x.com", "dev-1", TTL);
        assert_eq!(token.split('.').count(), 3);

        let claims = codec().validate(&token).unwrap();
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.device_address, "dev-1");
        assert_eq!(claims.expires_at, claims.issued_at + 3600);
    }

    #[test]
    fn test_wrong_secret_fails_even_if_unexpired() {
        let token = codec().issue("a@x.com", "dev-1", TTL);
        let other = AccessTokenCodec::new(b"different-secret".to_vec());
        assert_eq!(other.validate(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_tampered_claims_fail_signature() {
        let token = codec().issue("a@x.com", "dev-1", TTL);
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_claims = URL_SAFE_NO_PAD.encode(
            r#"{"email":"b@x.com","deviceAddress":"dev-1","iat":0,"exp":9999999999}"#,
        );
        parts[1] = &forged_claims;
        let tampered = parts.join(".");
        assert_eq!(
            codec().validate(&tampered),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_structural_failures_are_malformed() {
        assert_eq!(codec().validate(""), Err(TokenError::Malformed));
        assert_eq!(codec().validate("just-one-part"), Err(TokenError::Malformed));
        assert_eq!(codec().validate("a.b"), Err(TokenError::Malformed));
        assert_eq!(codec().validate("a.b.c.d"), Err(TokenError::Malformed));
        // Not base64url
        assert_eq!(codec().validate("!!.??.##"), Err(TokenError::Malformed));
        // Valid base64 but not JSON
        let garbage = URL_SAFE_NO_PAD.encode("not json");
        let token = format!("{g}.{g}.{g}", g = garbage);
        assert_eq!(codec().validate(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn test_none_algorithm_rejected() {
        let token = forge(
            r#"{"alg":"none","typ":"JWT"}"#,
            r#"{"email":"a@x.com","deviceAddress":"dev-1","iat":0,"exp":9999999999}"#,
        );
        assert_eq!(codec().validate(&token), Err(TokenError::InvalidSignMethod));
    }

    #[test]
    fn test_foreign_algorithm_rejected_before_signature() {
        // Correctly signed, but the header claims RS256
        let token = forge(
            r#"{"alg":"RS256","typ":"JWT"}"#,
            r#"{"email":"a@x.com","deviceAddress":"dev-1","iat":0,"exp":9999999999}"#,
        );
        assert_eq!(codec().validate(&token), Err(TokenError::InvalidSignMethod));
    }

    #[test]
    fn test_missing_claims() {
        let token = forge(
            r#"{"alg":"HS256","typ":"JWT"}"#,
            r#"{"email":"a@x.com","iat":0,"exp":9999999999}"#,
        );
        assert_eq!(codec().validate(&token), Err(TokenError::MissingClaims));

        // Wrong type counts as missing
        let token = forge(
            r#"{"alg":"HS256","typ":"JWT"}"#,
            r#"{"email":42,"deviceAddress":"dev-1","iat":0,"exp":9999999999}"#,
        );
        assert_eq!(codec().validate(&token), Err(TokenError::MissingClaims));
    }

    #[test]
    fn test_incorrect_expiration_claim() {
        let token = forge(
            r#"{"alg":"HS256","typ":"JWT"}"#,
            r#"{"email":"a@x.com","deviceAddress":"dev-1","iat":0,"exp":"tomorrow"}"#,
        );
        assert_eq!(
            codec().validate(&token),
            Err(TokenError::IncorrectExpiration)
        );
    }

    #[test]
    fn test_expired_with_correct_signature() {
        let token = forge(
            r#"{"alg":"HS256","typ":"JWT"}"#,
            r#"{"email":"a@x.com","deviceAddress":"dev-1","iat":0,"exp":1}"#,
        );
        assert_eq!(codec().validate(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_expired_wins_over_nothing_else() {
        // exp exactly now is already expired (strict comparison)
        let now = Utc::now().timestamp();
        let claims = format!(
            r#"{{"email":"a@x.com","deviceAddress":"dev-1","iat":{now},"exp":{now}}}"#
        );
        let token = forge(r#"{"alg":"HS256","typ":"JWT"}"#, &claims);
        assert_eq!(codec().validate(&token), Err(TokenError::Expired));
    }
}
