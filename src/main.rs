use std::io;

use actix_web::{middleware::Logger, App, HttpServer};
use tasks_api::{config::Config, routes, store, AppState};

fn fatal(context: &str, error: impl std::fmt::Display) -> io::Error {
    log::error!("{}: {}", context, error);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, error))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| fatal("invalid configuration", e))?;

    let pool = store::connect(&config.database_url, config.database_max_connections)
        .await
        .map_err(|e| fatal("failed to connect to database", e))?;
    store::migrate(&pool)
        .await
        .map_err(|e| fatal("failed to migrate database", e))?;

    let state =
        AppState::from_config(pool, &config).map_err(|e| fatal("failed to set up credentials", e))?;

    log::info!("starting server at {}", config.server_url());
    let origins = config.allowed_origins.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(routes::cors(&origins))
            .wrap(Logger::default())
            .configure(|cfg| routes::configure(cfg, &state))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
