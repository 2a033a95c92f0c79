//! Signed bearer tokens.
//!
//! A token is `base64url(claims JSON) + "." + hex(SHA-256(secret || "." || payload))`.
//! The MAC comparison is constant-time; a forged or truncated token is
//! indistinguishable from a tampered one.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use constant_time_eq::constant_time_eq;
use sha2::{Digest, Sha256};

use crate::user::User;

use super::{AuthError, Claims};

/// Token lifetime from issuance.
const TOKEN_TTL_HOURS: i64 = 24;

/// Issues signed bearer tokens and resolves `Authorization` headers back
/// to verified claims.
pub struct TokenGate {
    secret: String,
}

impl TokenGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Issue a token for a user, valid for 24 hours.
    pub fn issue(&self, user: &User) -> String {
        self.issue_claims(&Claims {
            user_id: user.id.clone(),
            username: user.username.clone(),
            exp: (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        })
    }

    fn issue_claims(&self, claims: &Claims) -> String {
        let json = serde_json::to_vec(claims).expect("claims are serializable");
        let payload = URL_SAFE_NO_PAD.encode(json);
        let mac = self.mac(&payload);
        format!("{payload}.{mac}")
    }

    fn mac(&self, payload: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(b".");
        hasher.update(payload.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Verify a raw token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let (payload, mac) = token.split_once('.').ok_or(AuthError::Invalid)?;

        let expected = self.mac(payload);
        if !constant_time_eq(mac.as_bytes(), expected.as_bytes()) {
            return Err(AuthError::Invalid);
        }

        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| AuthError::Invalid)?;
        let claims: Claims = serde_json::from_slice(&bytes).map_err(|_| AuthError::Invalid)?;

        if claims.exp < Utc::now().timestamp() {
            return Err(AuthError::Expired);
        }

        Ok(claims)
    }

    /// Resolve an `Authorization` header value to claims.
    ///
    /// Accepts the bare token or a `Bearer ` prefix, matching what clients
    /// actually send.
    pub fn resolve(&self, header: Option<&str>) -> Result<Claims, AuthError> {
        let raw = header.ok_or(AuthError::Missing)?;
        let token = raw
            .strip_prefix("Bearer ")
            .or_else(|| raw.strip_prefix("bearer "))
            .unwrap_or(raw);
        self.verify(token)
    }
}
