//! Signed session credentials issued by the access gate.
//!
//! A credential is `base64url(claims-json) . hex(sha256(secret || payload))`.
//! The payload binds the user id and username; verification checks the
//! signature with a constant-time comparison before trusting anything in the
//! payload, then enforces the expiry timestamp.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

/// Verified payload carried by a session credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Identifier of the authenticated user.
    pub sub: Uuid,
    /// Username at the time the credential was issued.
    pub username: String,
    /// Expiry as Unix seconds.
    pub exp: u64,
}

/// Reasons a credential fails to verify. Handlers collapse all of these into
/// a single unauthorized response so callers learn nothing about the cause.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The token does not have the expected `payload.signature` shape.
    #[error("malformed credential")]
    Malformed,
    /// The signature does not match the payload.
    #[error("credential signature mismatch")]
    InvalidSignature,
    /// The credential's expiry timestamp has passed.
    #[error("credential expired")]
    Expired,
    /// The claims payload could not be serialized.
    #[error("failed to encode claims: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Issues and verifies signed session credentials.
pub struct TokenSigner {
    secret: String,
    ttl: Duration,
}

impl TokenSigner {
    /// Build a signer from the configured secret and credential lifetime.
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            secret: secret.to_owned(),
            ttl,
        }
    }

    /// Issue a credential binding `sub` and `username`, expiring after the
    /// configured lifetime.
    pub fn sign(&self, sub: Uuid, username: &str) -> Result<String, CredentialError> {
        let claims = Claims {
            sub,
            username: username.to_owned(),
            exp: now_unix() + self.ttl.as_secs(),
        };
        self.sign_claims(&claims)
    }

    /// Verify a credential and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, CredentialError> {
        let (payload, signature) = token.split_once('.').ok_or(CredentialError::Malformed)?;

        let expected = self.signature(payload);
        if !constant_time_eq(expected.as_bytes(), signature.as_bytes()) {
            return Err(CredentialError::InvalidSignature);
        }

        let decoded = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| CredentialError::Malformed)?;
        let claims: Claims =
            serde_json::from_slice(&decoded).map_err(|_| CredentialError::Malformed)?;

        if claims.exp < now_unix() {
            return Err(CredentialError::Expired);
        }

        Ok(claims)
    }

    fn sign_claims(&self, claims: &Claims) -> Result<String, CredentialError> {
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims)?);
        let signature = self.signature(&payload);
        Ok(format!("{payload}.{signature}"))
    }

    fn signature(&self, payload: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(b".");
        hasher.update(payload.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Current time as Unix seconds.
fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}

/// Constant-time byte comparison so signature checks do not leak a prefix
/// length through timing.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use base64::Engine as _;

    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new("test-secret", Duration::from_secs(3600))
    }

    #[test]
    fn sign_then_verify_roundtrips_claims() {
        let signer = signer();
        let sub = Uuid::new_v4();

        let token = signer.sign(sub, "admin").unwrap();
        let claims = signer.verify(&token).unwrap();

        assert_eq!(claims.sub, sub);
        assert_eq!(claims.username, "admin");
        assert!(claims.exp > now_unix());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let signer = signer();
        let token = signer.sign(Uuid::new_v4(), "admin").unwrap();

        let (payload, signature) = token.split_once('.').unwrap();
        let forged_claims = Claims {
            sub: Uuid::new_v4(),
            username: "intruder".into(),
            exp: now_unix() + 3600,
        };
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged_claims).unwrap());
        assert_ne!(payload, forged_payload);

        let forged = format!("{forged_payload}.{signature}");
        assert!(matches!(
            signer.verify(&forged),
            Err(CredentialError::InvalidSignature)
        ));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = signer().sign(Uuid::new_v4(), "admin").unwrap();

        let other = TokenSigner::new("other-secret", Duration::from_secs(3600));
        assert!(matches!(
            other.verify(&token),
            Err(CredentialError::InvalidSignature)
        ));
    }

    #[test]
    fn expired_credential_is_rejected() {
        let signer = signer();
        let claims = Claims {
            sub: Uuid::new_v4(),
            username: "admin".into(),
            exp: now_unix() - 1,
        };

        let token = signer.sign_claims(&claims).unwrap();
        assert!(matches!(signer.verify(&token), Err(CredentialError::Expired)));
    }

    #[test]
    fn garbage_tokens_are_malformed() {
        let signer = signer();
        for token in ["", "no-dot", "a.b.c", "!!!.???"] {
            assert!(signer.verify(token).is_err(), "accepted `{token}`");
        }
    }

    #[test]
    fn constant_time_eq_basics() {
        assert!(constant_time_eq(b"hello", b"hello"));
        assert!(!constant_time_eq(b"hello", b"world"));
        assert!(!constant_time_eq(b"hello", b"hell"));
        assert!(constant_time_eq(b"", b""));
    }
}
