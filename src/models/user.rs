use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::validation::{validate_required, Constrained};

/// A registered identity.
///
/// The password digest is never serialized outward and is left empty on
/// deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct User {
    pub id: String,
    /// Display name, unique across users.
    #[validate(custom = "validate_required", length(max = 255))]
    pub name: String,
    #[serde(skip)]
    #[validate(custom = "validate_required", length(max = 255))]
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl Constrained for User {
    const FIELDS: &'static [&'static str] = &["name", "password"];
}

impl User {
    /// Builds a not-yet-persisted user from a name and an already hashed password.
    pub fn new(name: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            password: password_hash,
            created_at: Utc::now(),
        }
    }
}
