#![doc = "The `tasks_api` library crate."]
#![doc = ""]
#![doc = "A task-management REST API: user registration and login with JWT session tokens,"]
#![doc = "and task CRUD where reads are public and mutations require a bearer token."]
#![doc = "The binary (`main.rs`) loads the configuration and serves `routes::configure`."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod store;
pub mod validation;

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::Credentials;
use crate::config::Config;
use crate::error::AppError;
use crate::services::{AuthService, TaskService};
use crate::store::SqliteStore;

/// Everything the HTTP layer shares across workers.
#[derive(Clone)]
pub struct AppState {
    pub tasks: TaskService,
    pub auth: AuthService,
    pub credentials: Arc<Credentials>,
}

impl AppState {
    pub fn new(pool: SqlitePool, credentials: Credentials) -> Self {
        let store = Arc::new(SqliteStore::new(pool));
        let credentials = Arc::new(credentials);
        Self {
            tasks: TaskService::new(store.clone()),
            auth: AuthService::new(store, credentials.clone()),
            credentials,
        }
    }

    pub fn from_config(pool: SqlitePool, config: &Config) -> Result<Self, AppError> {
        Ok(Self::new(pool, Credentials::from_config(config)?))
    }
}
