//! Credential handling and the request authentication gate.

pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::Config;
use crate::error::AppError;
use crate::validation::{validate_required, Constrained};

pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, validate_password, verify_password, MAX_PASSWORD_BYTES};
pub use token::{Claims, TokenError, TokenKeys};

/// Password hashing and session token issuance, configured once at startup.
#[derive(Clone)]
pub struct Credentials {
    tokens: TokenKeys,
    cost: u32,
}

impl Credentials {
    /// Builds the credential service.
    ///
    /// # Arguments
    /// * `secret` - HS256 signing secret. Must not be empty.
    /// * `token_ttl` - Lifetime of issued session tokens.
    /// * `bcrypt_cost` - Work factor for password hashing.
    ///
    /// # Returns
    /// `AppError::Signing` if the secret is empty.
    pub fn new(secret: &str, token_ttl: Duration, bcrypt_cost: u32) -> Result<Self, AppError> {
        Ok(Self {
            tokens: TokenKeys::new(secret, token_ttl)?,
            cost: bcrypt_cost,
        })
    }

    /// Builds the credential service from the startup configuration.
    ///
    /// # Returns
    /// `AppError::Signing` if the secret is empty or the token lifetime is out of range.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let token_ttl = Duration::try_hours(config.token_ttl_hours)
            .ok_or_else(|| AppError::Signing("token lifetime out of range".into()))?;
        Self::new(&config.jwt_secret, token_ttl, config.bcrypt_cost)
    }

    /// Hashes a plain-text password with the configured cost.
    ///
    /// # Arguments
    /// * `password` - The plain-text password.
    ///
    /// # Returns
    /// The bcrypt digest, or `AppError::Hash` on failure.
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        hash_password(password, self.cost)
    }

    /// Checks a candidate password against a stored digest.
    ///
    /// # Arguments
    /// * `digest` - The stored bcrypt digest.
    /// * `candidate` - The plain-text password to check.
    ///
    /// # Returns
    /// `true` only if the candidate matches. Malformed digests never match.
    pub fn verify(&self, digest: &str, candidate: &str) -> bool {
        verify_password(digest, candidate)
    }

    /// Issues a session token for a user.
    ///
    /// # Arguments
    /// * `user_id` - Identifier embedded as the `user_id` claim.
    /// * `name` - Display name embedded as the `name` claim.
    ///
    /// # Returns
    /// The signed token, or `AppError::Signing` if encoding fails.
    pub fn issue_token(&self, user_id: &str, name: &str) -> Result<String, AppError> {
        self.tokens.issue(user_id, name)
    }

    /// Verifies a session token and decodes its claims.
    ///
    /// # Arguments
    /// * `token` - The compact token string, without the `Bearer ` prefix.
    ///
    /// # Returns
    /// The claims, or a `TokenError` saying why the token was rejected.
    pub fn parse_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.tokens.parse(token)
    }
}

/// Represents the payload for a user login request.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterRequest {
    /// Desired display name. Required, at most 255 characters, unique.
    #[validate(custom = "validate_required", length(max = 255))]
    pub name: String,
    /// Plain-text password. Required, at most 72 bytes (bcrypt's input limit).
    #[validate(custom = "validate_password")]
    pub password: String,
}

impl Constrained for RegisterRequest {
    const FIELDS: &'static [&'static str] = &["name", "password"];
}
