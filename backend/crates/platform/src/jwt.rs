//! Session Tokens (JWT, HS256)
//!
//! Payload is `{ userId, iat, exp }`. The subject is kept as a string so the
//! claims stay readable by any client that already speaks this format.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,

    #[error("Failed to issue token: {0}")]
    Issue(String),
}

/// Sign a token for `user_id` valid for `ttl`
pub fn issue(secret: &[u8], user_id: &str, ttl: Duration) -> Result<String, TokenError> {
    let now = Utc::now();
    let expires_at = now
        .checked_add_signed(ttl)
        .ok_or_else(|| TokenError::Issue("expiration overflow".to_string()))?;

    let claims = Claims {
        user_id: user_id.to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    encode_claims(secret, &claims)
}

/// Sign arbitrary claims
pub fn encode_claims(secret: &[u8], claims: &Claims) -> Result<String, TokenError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| TokenError::Issue(e.to_string()))
}

/// Check signature and expiry, returning the claims
pub fn verify(secret: &[u8], token: &str) -> Result<Claims, TokenError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })
}
