use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::User;
use crate::validation::{validate_required, Constrained};

/// Request body for creating a task.
///
/// Missing fields default to empty values so that the validator, not the JSON
/// decoder, reports them. Any owner field in the body is ignored.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskInput {
    pub title: String,
    pub description: String,
    pub completed: bool,
}

/// Request body for updating a task. Present fields replace the stored values.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Task {
    pub id: String,
    #[validate(custom = "validate_required", length(max = 255))]
    pub title: String,
    #[validate(custom = "validate_required", length(max = 500))]
    pub description: String,
    pub completed: bool,
    /// Identifier of the owning user, bound at creation from the authenticated caller.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_id: String,
    /// Owner snapshot, present on reads that preload it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    pub created_at: DateTime<Utc>,
}

impl Constrained for Task {
    const FIELDS: &'static [&'static str] = &["title", "description"];
}

impl Task {
    /// Creates a new `Task` owned by `owner_id` with a fresh id and timestamp.
    pub fn new(input: TaskInput, owner_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            description: input.description,
            completed: input.completed,
            user_id: owner_id.to_string(),
            user: None,
            created_at: Utc::now(),
        }
    }

    /// Overlays the fields supplied in `patch`. Ownership is never touched.
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}
