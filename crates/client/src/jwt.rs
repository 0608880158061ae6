//! Client-side reading of access-token claims.
//!
//! The client never holds the signing key, so signatures are not checked
//! here; the server remains the authority. The claims are only used to
//! schedule the next refresh.

use std::collections::HashSet;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use punch_core::types::Timestamp;
use serde::{Deserialize, Serialize};

use crate::config::RefreshSettings;

/// Claims issued by the backend's JWT layer. Only `exp` matters to the
/// client; the rest is kept for logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiration time (UTC Unix timestamp).
    #[serde(default)]
    pub exp: Option<i64>,
    /// Issued-at time (UTC Unix timestamp).
    #[serde(default)]
    pub iat: Option<i64>,
    /// `"access"` or `"refresh"`.
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub jti: Option<String>,
}

/// Decode the payload of `token` without verifying its signature or expiry.
pub fn decode_claims(token: &str) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();

    let data = decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}

/// Expiry of `token`, or `None` when it is not a JWT or lacks `exp`.
pub fn expires_at(token: &str) -> Option<Timestamp> {
    let claims = decode_claims(token).ok()?;
    Utc.timestamp_opt(claims.exp?, 0).single()
}

/// How long to wait before renewing `access_token`.
///
/// Renews `settings.margin` before `exp`; an already-expired token yields
/// zero. Tokens without a readable `exp` use the fallback interval.
pub fn refresh_delay(access_token: &str, now: Timestamp, settings: &RefreshSettings) -> Duration {
    match expires_at(access_token) {
        Some(exp) => (exp - now)
            .to_std()
            .unwrap_or(Duration::ZERO)
            .saturating_sub(settings.margin),
        None => settings.fallback_interval,
    }
}
