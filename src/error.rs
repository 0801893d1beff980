//!
//! # Custom Error Handling
//!
//! This module defines the `AppError` type shared by the workflows and the HTTP layer.
//! Every variant maps to exactly one HTTP status code and is rendered as the standard
//! response envelope (`{"message": ..., "ok": false}`) by its `ResponseError` impl.
//!
//! Infrastructure failures (database, hashing, token signing) are logged where they are
//! converted and reach the client only as a generic message.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::fmt;
use validator::ValidationErrors;

use crate::response::Envelope;
use crate::validation;

/// Represents all possible errors that can occur within the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Inbound entity failed its field constraints (HTTP 400).
    Validation(String),
    /// Request body could not be decoded (HTTP 400).
    BadRequest(String),
    /// Registration attempted with a name that is already taken (HTTP 400).
    DuplicateName(String),
    /// Login with an unknown name or a wrong password (HTTP 400).
    InvalidCredentials(String),
    /// Requested task or user does not exist (HTTP 404).
    NotFound(String),
    /// Missing, malformed, invalid or expired bearer token (HTTP 401).
    Unauthenticated(String),
    /// Authenticated caller is not allowed to mutate the resource (HTTP 403).
    Forbidden(String),
    /// The persistence layer failed (HTTP 500).
    Persistence(String),
    /// Password hashing failed (HTTP 500).
    Hash(String),
    /// Token issuance failed (HTTP 500).
    Signing(String),
}

impl AppError {
    /// The client-facing message carried by this error.
    pub fn message(&self) -> &str {
        match self {
            AppError::Validation(msg)
            | AppError::BadRequest(msg)
            | AppError::DuplicateName(msg)
            | AppError::InvalidCredentials(msg)
            | AppError::NotFound(msg)
            | AppError::Unauthenticated(msg)
            | AppError::Forbidden(msg)
            | AppError::Persistence(msg)
            | AppError::Hash(msg)
            | AppError::Signing(msg) => msg,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::DuplicateName(msg) => write!(f, "Duplicate Name: {}", msg),
            AppError::InvalidCredentials(msg) => write!(f, "Invalid Credentials: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Unauthenticated(msg) => write!(f, "Unauthenticated: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::Persistence(msg) => write!(f, "Persistence Error: {}", msg),
            AppError::Hash(msg) => write!(f, "Hash Error: {}", msg),
            AppError::Signing(msg) => write!(f, "Signing Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `AppError` variants into enveloped JSON responses.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::BadRequest(_)
            | AppError::DuplicateName(_)
            | AppError::InvalidCredentials(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Persistence(_) | AppError::Hash(_) | AppError::Signing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(Envelope::failure(self.message()))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` becomes `NotFound`; everything else is logged and reported as a
/// generic persistence failure.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("record not found".into()),
            other => {
                log::error!("database error: {}", other);
                AppError::Persistence("database operation failed".into())
            }
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::Validation` with
/// user-facing per-field messages, ordered by field name. Use `validation::check` to
/// report fields in declaration order.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        AppError::Validation(validation::describe(&errors, &[]))
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        log::error!("password hashing failed: {}", error);
        AppError::Hash("failed to hash password".into())
    }
}
