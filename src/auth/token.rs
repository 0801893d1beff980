use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Represents the claims encoded within a session token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Identifier of the authenticated user.
    pub user_id: String,
    /// Display name at issuance time.
    pub name: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Why a presented token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Signature or algorithm mismatch.
    Invalid,
    /// Signature is fine but `exp` is in the past.
    Expired,
    /// Not a decodable token at all.
    Malformed,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenError::Invalid => write!(f, "invalid token signature"),
            TokenError::Expired => write!(f, "token has expired"),
            TokenError::Malformed => write!(f, "malformed token"),
        }
    }
}

impl std::error::Error for TokenError {}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        match error.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_)
            | ErrorKind::MissingRequiredClaim(_) => TokenError::Malformed,
            _ => TokenError::Invalid,
        }
    }
}

/// HS256 signing and verification keys derived from the server secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenKeys {
    /// Fails with `AppError::Signing` when the secret is empty.
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, AppError> {
        if secret.is_empty() {
            return Err(AppError::Signing(
                "token signing secret is not configured".into(),
            ));
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
            ttl,
        })
    }

    /// Issues a token for the user that expires after the configured lifetime.
    pub fn issue(&self, user_id: &str, name: &str) -> Result<String, AppError> {
        let expires_at = Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Signing("token lifetime out of range".into()))?;
        self.issue_expiring_at(user_id, name, expires_at)
    }

    pub fn issue_expiring_at(
        &self,
        user_id: &str,
        name: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let claims = Claims {
            user_id: user_id.to_string(),
            name: name.to_string(),
            exp: expires_at.timestamp().max(0) as usize,
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|e| {
            log::error!("failed to sign token: {}", e);
            AppError::Signing("failed to generate token".into())
        })
    }

    /// Verifies signature and expiry and returns the embedded claims.
    pub fn parse(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::from)
    }
}
