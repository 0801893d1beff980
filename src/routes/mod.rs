pub mod auth;
pub mod health;
pub mod tasks;

use actix_cors::Cors;
use actix_web::{
    http::{header, Method},
    web,
};

use crate::auth::AuthMiddleware;
use crate::error::AppError;
use crate::AppState;

/// Registers every endpoint together with the shared workflow state.
///
/// Reads under `/tasks` are public; every other `/tasks` request must carry a
/// bearer token.
pub fn configure(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.app_data(web::Data::new(state.tasks.clone()))
        .app_data(web::Data::new(state.auth.clone()))
        .app_data(json_config())
        .service(health::health)
        .service(
            web::scope("/auth")
                .service(auth::register)
                .service(auth::login),
        )
        .service(
            web::scope("/tasks")
                .wrap(AuthMiddleware::new(state.credentials.clone()).allow(Method::GET))
                .service(tasks::list_tasks)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
}

/// Undecodable JSON bodies become a 400 envelope instead of actix's plain-text error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("invalid request body: {}", err)).into()
    })
}

/// CORS policy for the given browser origins.
pub fn cors(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
        ])
        .expose_headers(vec![header::CONTENT_LENGTH])
        .supports_credentials()
        .max_age(12 * 60 * 60)
}
