use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePool, FromRow};

use super::{Preload, TaskStore, UserStore};
use crate::models::{Task, User};

/// `UserStore` and `TaskStore` backed by a SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: String,
    name: String,
    password: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            password: row.password,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct TaskRow {
    id: String,
    title: String,
    description: String,
    completed: bool,
    user_id: Option<String>,
    created_at: DateTime<Utc>,
    owner_id: Option<String>,
    owner_name: Option<String>,
    owner_created_at: Option<DateTime<Utc>>,
}

impl TaskRow {
    fn into_task(self, preload: Preload) -> Task {
        // The snapshot never carries the password digest.
        let user = match (preload, self.owner_id, self.owner_name, self.owner_created_at) {
            (Preload::Owner, Some(id), Some(name), Some(created_at)) => Some(User {
                id,
                name,
                password: String::new(),
                created_at,
            }),
            _ => None,
        };

        Task {
            id: self.id,
            title: self.title,
            description: self.description,
            completed: self.completed,
            user_id: self.user_id.unwrap_or_default(),
            user,
            created_at: self.created_at,
        }
    }
}

const USER_COLUMNS: &str = "SELECT id, name, password, created_at FROM users";

const TASK_COLUMNS: &str = "SELECT t.id, t.title, t.description, t.completed, t.user_id, t.created_at, \
     u.id AS owner_id, u.name AS owner_name, u.created_at AS owner_created_at \
     FROM tasks t LEFT JOIN users u ON u.id = t.user_id";

#[async_trait]
impl UserStore for SqliteStore {
    async fn insert(&self, user: &User) -> Result<User, sqlx::Error> {
        sqlx::query("INSERT INTO users (id, name, password, created_at) VALUES (?, ?, ?, ?)")
            .bind(&user.id)
            .bind(&user.name)
            .bind(&user.password)
            .bind(user.created_at)
            .execute(&self.pool)
            .await?;

        UserStore::find_by_id(self, &user.id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{USER_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{USER_COLUMNS} WHERE name = ?"))
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn list(&self) -> Result<Vec<User>, sqlx::Error> {
        let rows = sqlx::query_as::<_, UserRow>(&format!("{USER_COLUMNS} ORDER BY rowid"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn update(&self, user: &User) -> Result<User, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET name = ?, password = ? WHERE id = ?")
            .bind(&user.name)
            .bind(&user.password)
            .bind(&user.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        UserStore::find_by_id(self, &user.id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    async fn delete(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TaskStore for SqliteStore {
    async fn insert(&self, task: &Task) -> Result<Task, sqlx::Error> {
        sqlx::query(
            "INSERT INTO tasks (id, title, description, completed, user_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.completed)
        .bind(&task.user_id)
        .bind(task.created_at)
        .execute(&self.pool)
        .await?;

        TaskStore::find(self, &task.id, Preload::Owner)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    async fn find(&self, id: &str, preload: Preload) -> Result<Option<Task>, sqlx::Error> {
        let row = sqlx::query_as::<_, TaskRow>(&format!("{TASK_COLUMNS} WHERE t.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|row| row.into_task(preload)))
    }

    async fn list(&self, preload: Preload) -> Result<Vec<Task>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!("{TASK_COLUMNS} ORDER BY t.rowid"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|row| row.into_task(preload)).collect())
    }

    async fn update(&self, task: &Task) -> Result<Task, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tasks SET title = ?, description = ?, completed = ? WHERE id = ?",
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.completed)
        .bind(&task.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        TaskStore::find(self, &task.id, Preload::Owner)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    async fn delete(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
