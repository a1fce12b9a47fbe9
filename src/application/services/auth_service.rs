//! Authentication service for owner tokens.
//!
//! Tokens are self-contained and signed:
//!
//! ```text
//! base64url("<owner_id>.<expires_unix>") "." hex(HMAC-SHA256(secret, payload))
//! ```
//!
//! Verification needs no store round-trip, which keeps the live endpoint's
//! handshake cheap.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;

use crate::domain::OwnerId;
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Service for issuing and verifying owner tokens.
pub struct AuthService {
    signing_secret: String,
}

impl AuthService {
    /// Creates a new authentication service.
    ///
    /// `signing_secret` is the HMAC key; it must match the value used when
    /// tokens were issued.
    pub fn new(signing_secret: String) -> Self {
        Self { signing_secret }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length")
    }

    /// Issues a token for `owner_id` valid for `ttl`.
    pub fn issue(&self, owner_id: OwnerId, ttl: Duration) -> String {
        self.issue_with_expiry(owner_id, Utc::now() + ttl)
    }

    fn issue_with_expiry(&self, owner_id: OwnerId, expires_at: DateTime<Utc>) -> String {
        let payload = URL_SAFE_NO_PAD.encode(format!("{}.{}", owner_id, expires_at.timestamp()));

        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        format!("{}.{}", payload, signature)
    }

    /// Verifies a token and returns the owner it was issued for.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is malformed, its
    /// signature does not match, or it has expired.
    pub fn verify(&self, token: &str) -> Result<OwnerId, AppError> {
        let (payload, signature) = token
            .split_once('.')
            .ok_or_else(|| invalid("Malformed token"))?;

        let signature = hex::decode(signature).map_err(|_| invalid("Malformed token"))?;

        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| invalid("Invalid signature"))?;

        let decoded = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| invalid("Malformed token"))?;
        let decoded = String::from_utf8(decoded).map_err(|_| invalid("Malformed token"))?;

        let (owner_id, expires_at) = decoded
            .split_once('.')
            .ok_or_else(|| invalid("Malformed token"))?;
        let owner_id: OwnerId = owner_id.parse().map_err(|_| invalid("Malformed token"))?;
        let expires_at: i64 = expires_at.parse().map_err(|_| invalid("Malformed token"))?;

        if Utc::now().timestamp() >= expires_at {
            return Err(invalid("Token expired"));
        }

        Ok(owner_id)
    }
}

fn invalid(reason: &str) -> AppError {
    AppError::unauthorized("Unauthorized", json!({ "reason": reason }))
}
