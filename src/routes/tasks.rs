use actix_web::{delete, get, http::StatusCode, post, put, web, Responder};

use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{TaskInput, TaskPatch},
    response::{Envelope, TaskListPayload, TaskPayload},
    services::TaskService,
};

/// Lists every task with its owner. Public.
///
/// ## Responses:
/// - `200 OK`: `{tasks: [...]}`, possibly empty.
/// - `500 Internal Server Error`: database failure.
#[get("/")]
pub async fn list_tasks(service: web::Data<TaskService>) -> Result<impl Responder, AppError> {
    let tasks = service.list_all().await?;

    Ok(Envelope::success("tasks listed successfully", TaskListPayload { tasks })
        .respond(StatusCode::OK))
}

/// Creates a task owned by the authenticated caller.
///
/// Any owner field in the body is ignored.
///
/// ## Responses:
/// - `201 Created`: `{task}` with generated `id` and `created_at`.
/// - `400 Bad Request`: undecodable body or constraint violation.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `500 Internal Server Error`: database failure.
#[post("/")]
pub async fn create_task(
    service: web::Data<TaskService>,
    caller: AuthenticatedUser,
    body: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let task = service.create(body.into_inner(), caller.id()).await?;

    Ok(Envelope::success("task created successfully", TaskPayload { task })
        .respond(StatusCode::CREATED))
}

/// Fetches a single task. Public.
///
/// ## Responses:
/// - `200 OK`: `{task}`.
/// - `404 Not Found`: no task with this id.
#[get("/{id}")]
pub async fn get_task(
    service: web::Data<TaskService>,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let task = service.get_by_id(&id).await?;

    Ok(Envelope::success("task found", TaskPayload { task }).respond(StatusCode::OK))
}

/// Overlays the supplied fields onto a task owned by the caller.
///
/// ## Responses:
/// - `200 OK`: the updated `{task}`.
/// - `400 Bad Request`: undecodable body or constraint violation.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `403 Forbidden`: the caller does not own the task.
/// - `404 Not Found`: no task with this id.
/// - `500 Internal Server Error`: database failure.
#[put("/{id}")]
pub async fn update_task(
    service: web::Data<TaskService>,
    caller: AuthenticatedUser,
    id: web::Path<String>,
    body: web::Json<TaskPatch>,
) -> Result<impl Responder, AppError> {
    let task = service
        .update(&id, body.into_inner(), caller.id())
        .await?;

    Ok(Envelope::success("task updated successfully", TaskPayload { task })
        .respond(StatusCode::OK))
}

/// Deletes a task owned by the caller and returns its last state.
///
/// ## Responses:
/// - `200 OK`: the deleted `{task}`.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `403 Forbidden`: the caller does not own the task.
/// - `404 Not Found`: no task with this id.
/// - `500 Internal Server Error`: database failure.
#[delete("/{id}")]
pub async fn delete_task(
    service: web::Data<TaskService>,
    caller: AuthenticatedUser,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let task = service.delete(&id, caller.id()).await?;

    Ok(Envelope::success("task deleted successfully", TaskPayload { task })
        .respond(StatusCode::OK))
}
