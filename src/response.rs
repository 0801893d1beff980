//! Uniform response envelope.
//!
//! Every endpoint answers with a JSON object carrying a human-readable `message`,
//! an `ok` flag and, on success, exactly one payload key (`task`, `tasks`, `user`,
//! or `token` + `user`). The payload structs below are flattened into the envelope.

use actix_web::{http::StatusCode, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::models::{Task, User};

/// Response wrapper shared by successful and failed requests.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub message: String,
    pub ok: bool,
    #[serde(flatten)]
    pub payload: T,
}

/// Payload of failed requests: nothing beyond `message` and `ok`.
#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoPayload {}

impl<T: Serialize> Envelope<T> {
    pub fn success(message: impl Into<String>, payload: T) -> Self {
        Self {
            message: message.into(),
            ok: true,
            payload,
        }
    }

    /// Builds an HTTP response with the given status and this envelope as JSON body.
    pub fn respond(self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(self)
    }
}

impl Envelope<NoPayload> {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ok: false,
            payload: NoPayload::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TaskPayload {
    pub task: Task,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TaskListPayload {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserPayload {
    pub user: User,
}

/// Payload of a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionPayload {
    pub token: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_envelope_shape() {
        let value = serde_json::to_value(Envelope::failure("nope")).unwrap();
        assert_eq!(value, json!({ "message": "nope", "ok": false }));
    }

    #[test]
    fn test_success_envelope_flattens_payload() {
        let envelope = Envelope::success("tasks listed", TaskListPayload { tasks: vec![] });
        let value = serde_json::to_value(envelope).unwrap();
        assert_eq!(
            value,
            json!({ "message": "tasks listed", "ok": true, "tasks": [] })
        );
    }
}
