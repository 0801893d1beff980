//! Persistence for `User` and `Task` records.
//!
//! The workflows only see the `UserStore` and `TaskStore` traits. `SqliteStore`
//! implements both on top of a `sqlx` SQLite pool.

mod sqlite;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::models::{Task, User};

pub use sqlite::SqliteStore;

/// Whether task reads should carry the owner snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preload {
    Owner,
    Nothing,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new user and returns the stored record.
    async fn insert(&self, user: &User) -> Result<User, sqlx::Error>;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, sqlx::Error>;

    async fn find_by_name(&self, name: &str) -> Result<Option<User>, sqlx::Error>;

    async fn list(&self) -> Result<Vec<User>, sqlx::Error>;

    /// Replaces every column of an existing user.
    async fn update(&self, user: &User) -> Result<User, sqlx::Error>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: &str) -> Result<bool, sqlx::Error>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Persists a new task and returns the stored record with its owner snapshot.
    async fn insert(&self, task: &Task) -> Result<Task, sqlx::Error>;

    async fn find(&self, id: &str, preload: Preload) -> Result<Option<Task>, sqlx::Error>;

    /// All tasks in insertion order.
    async fn list(&self, preload: Preload) -> Result<Vec<Task>, sqlx::Error>;

    /// Replaces every mutable column of an existing task.
    async fn update(&self, task: &Task) -> Result<Task, sqlx::Error>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: &str) -> Result<bool, sqlx::Error>;
}

/// Opens a connection pool, creating the database file when it does not exist.
///
/// Idle connections are never reaped so that `sqlite::memory:` pools keep their data.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

const SCHEMA: [&str; 2] = [
    "CREATE TABLE IF NOT EXISTS users (
        id VARCHAR(36) PRIMARY KEY NOT NULL,
        name VARCHAR(255) NOT NULL UNIQUE,
        password VARCHAR(255) NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS tasks (
        id VARCHAR(36) PRIMARY KEY NOT NULL,
        title VARCHAR(255) NOT NULL,
        description VARCHAR(500) NOT NULL,
        completed BOOLEAN NOT NULL DEFAULT FALSE,
        user_id VARCHAR(36) REFERENCES users (id),
        created_at TEXT NOT NULL
    )",
];

/// Reconciles the schema with the entity definitions. Safe to run on every start.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    log::debug!("database schema is up to date");
    Ok(())
}
