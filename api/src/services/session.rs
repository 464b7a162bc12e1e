//! Session tokens: validation of the JWT access token that identifies the caller.
//!
//! Tokens are issued by the login flow, which lives outside this service.
//! `create_access_token` is kept for that flow and for tests.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Signed payload of the `access_token` cookie
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Decimal user id
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    fn for_user(user_id: i64, issued_at: DateTime<Utc>) -> Self {
        Self {
            sub: user_id.to_string(),
            exp: (issued_at + Duration::minutes(TOKEN_LIFETIME_MINUTES)).timestamp(),
            iat: issued_at.timestamp(),
        }
    }

    fn user_id(&self) -> Result<i64, SessionError> {
        self.sub.parse().map_err(|_| SessionError::InvalidToken)
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    Expired,
}

impl From<jsonwebtoken::errors::Error> for SessionError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => SessionError::Expired,
            _ => SessionError::InvalidToken,
        }
    }
}

const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;
const TOKEN_LIFETIME_MINUTES: i64 = 10;

fn token_validation() -> Validation {
    let mut validation = Validation::new(TOKEN_ALGORITHM);
    validation.set_required_spec_claims(&["exp", "sub", "iat"]);
    validation
}

pub fn create_access_token(user_id: i64, secret: &[u8]) -> Result<String, SessionError> {
    let claims = Claims::for_user(user_id, Utc::now());
    let token = encode(
        &Header::new(TOKEN_ALGORITHM),
        &claims,
        &EncodingKey::from_secret(secret),
    )?;
    Ok(token)
}

/// Verifies signature and expiry, yielding the user id in `sub`
pub fn validate_access_token(token: &str, secret: &[u8]) -> Result<i64, SessionError> {
    let decoded = decode::<Claims>(token, &DecodingKey::from_secret(secret), &token_validation())
        .inspect_err(|err| tracing::debug!(error = %err, "access token rejected"))?;
    decoded.claims.user_id()
}
