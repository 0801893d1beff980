use actix_web::{get, http::StatusCode, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::response::Envelope;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthPayload {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// Liveness check. Answers without touching the database.
#[get("/health")]
pub async fn health() -> HttpResponse {
    let payload = HealthPayload {
        status: "ok".to_string(),
        timestamp: Utc::now(),
    };
    Envelope::success("service is running", payload).respond(StatusCode::OK)
}
