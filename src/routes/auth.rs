use actix_web::{http::StatusCode, post, web, Responder};

use crate::{
    auth::{LoginRequest, RegisterRequest},
    error::AppError,
    response::{Envelope, SessionPayload, UserPayload},
    services::AuthService,
};

/// Registers a new user.
///
/// ## Responses:
/// - `201 Created`: `{user}` without any password field.
/// - `400 Bad Request`: name already taken, or missing / too long fields.
/// - `500 Internal Server Error`: hashing or database failure.
#[post("/register")]
pub async fn register(
    service: web::Data<AuthService>,
    body: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let user = service.register(body.into_inner()).await?;

    Ok(Envelope::success("user registered successfully", UserPayload { user })
        .respond(StatusCode::CREATED))
}

/// Authenticates a user and returns a session token.
///
/// ## Responses:
/// - `200 OK`: `{token, user}`.
/// - `400 Bad Request`: unknown user or incorrect password.
/// - `500 Internal Server Error`: token issuance or database failure.
#[post("/login")]
pub async fn login(
    service: web::Data<AuthService>,
    body: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let (token, user) = service.login(body.into_inner()).await?;

    Ok(Envelope::success("login successful", SessionPayload { token, user })
        .respond(StatusCode::OK))
}
