//! Session tokens: HS256-signed JWTs carrying the user id.
//!
//! Tokens are bearer credentials minted at register/login and checked by the
//! auth middleware on every protected route. Lifetime comes from config and
//! defaults to seven days.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id, stringified per JWT convention.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("failed to sign token")]
    Sign(#[source] jsonwebtoken::errors::Error),
    #[error("token rejected")]
    Verify(#[source] jsonwebtoken::errors::Error),
    #[error("token subject is not a user id")]
    Subject,
}

/// Mints and verifies session tokens with a single shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    #[must_use]
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(ttl_days),
        }
    }

    /// Issue a token for the user, valid for the configured lifetime.
    pub fn mint(&self, user_id: i32) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::Sign)
    }

    /// Check signature and expiry, returning the user id the token was
    /// minted for.
    pub fn verify(&self, token: &str) -> Result<i32, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(TokenError::Verify)?;

        data.claims.sub.parse().map_err(|_| TokenError::Subject)
    }
}
