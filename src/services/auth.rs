use std::sync::Arc;

use tokio::task;

use crate::auth::{Credentials, LoginRequest, RegisterRequest};
use crate::error::AppError;
use crate::models::User;
use crate::store::UserStore;
use crate::validation;

/// Registration and login.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    credentials: Arc<Credentials>,
}

fn duplicate_name() -> AppError {
    AppError::DuplicateName("user name is already registered".into())
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, credentials: Arc<Credentials>) -> Self {
        Self { users, credentials }
    }

    /// Creates a new identity. The returned user never exposes the password digest.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, AppError> {
        validation::check(&request)?;

        if self.users.find_by_name(&request.name).await?.is_some() {
            return Err(duplicate_name());
        }

        let credentials = self.credentials.clone();
        let password = request.password;
        let digest = task::spawn_blocking(move || credentials.hash(&password))
            .await
            .map_err(|e| {
                log::error!("password hashing task failed: {}", e);
                AppError::Hash("failed to hash password".into())
            })??;

        let user = User::new(request.name, digest);
        validation::check(&user)?;

        let stored = self.users.insert(&user).await.map_err(|e| match e {
            // Lost a race against a concurrent registration of the same name.
            sqlx::Error::Database(db) if db.is_unique_violation() => duplicate_name(),
            other => AppError::from(other),
        })?;
        log::info!("registered user {} ({})", stored.name, stored.id);
        Ok(stored)
    }

    /// Verifies the credentials and returns a session token with the identity.
    pub async fn login(&self, request: LoginRequest) -> Result<(String, User), AppError> {
        let user = self
            .users
            .find_by_name(&request.name)
            .await?
            .ok_or_else(|| {
                log::warn!("login attempt for unknown user {:?}", request.name);
                AppError::InvalidCredentials("user not found".into())
            })?;

        let credentials = self.credentials.clone();
        let digest = user.password.clone();
        let candidate = request.password;
        let matches = task::spawn_blocking(move || credentials.verify(&digest, &candidate))
            .await
            .map_err(|e| {
                log::error!("password verification task failed: {}", e);
                AppError::Hash("failed to verify password".into())
            })?;

        if !matches {
            log::warn!("wrong password for user {}", user.id);
            return Err(AppError::InvalidCredentials("incorrect password".into()));
        }

        let token = self.credentials.issue_token(&user.id, &user.name)?;
        log::info!("user {} logged in", user.id);
        Ok((token, user))
    }
}
