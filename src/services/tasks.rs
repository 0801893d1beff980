use std::sync::Arc;

use crate::error::AppError;
use crate::models::{Task, TaskInput, TaskPatch};
use crate::store::{Preload, TaskStore};
use crate::validation;

/// Create/read/update/delete over tasks.
///
/// Reads are public. Creation binds the caller as owner; update and delete are
/// reserved to that owner.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Lists every task with its owner snapshot, in insertion order.
    ///
    /// # Returns
    /// The tasks, possibly empty, or `AppError::Persistence` on a store failure.
    pub async fn list_all(&self) -> Result<Vec<Task>, AppError> {
        Ok(self.store.list(Preload::Owner).await?)
    }

    /// Creates a task owned by the caller.
    ///
    /// # Arguments
    /// * `input` - Title, description and completion flag from the request body.
    /// * `caller_id` - Identifier of the authenticated user, bound as owner.
    ///
    /// # Returns
    /// The stored task, or `AppError::Validation` if a field constraint is violated.
    pub async fn create(&self, input: TaskInput, caller_id: &str) -> Result<Task, AppError> {
        let task = Task::new(input, caller_id);
        validation::check(&task)?;

        let stored = self.store.insert(&task).await?;
        log::info!("task {} created by {}", stored.id, caller_id);
        Ok(stored)
    }

    /// Fetches one task with its owner snapshot.
    ///
    /// # Arguments
    /// * `id` - The task identifier.
    ///
    /// # Returns
    /// The task, or `AppError::NotFound` if no task has this id.
    pub async fn get_by_id(&self, id: &str) -> Result<Task, AppError> {
        self.store
            .find(id, Preload::Owner)
            .await?
            .ok_or_else(|| AppError::NotFound("task not found".into()))
    }

    /// Overlays the supplied fields onto a task the caller owns.
    ///
    /// # Arguments
    /// * `id` - The task identifier.
    /// * `patch` - Fields to replace. Absent fields keep their stored value.
    /// * `caller_id` - Identifier of the authenticated user.
    ///
    /// # Returns
    /// The updated task. `AppError::NotFound` for an unknown id, `AppError::Forbidden`
    /// if the caller is not the owner, `AppError::Validation` if the result breaks a
    /// field constraint.
    pub async fn update(
        &self,
        id: &str,
        patch: TaskPatch,
        caller_id: &str,
    ) -> Result<Task, AppError> {
        let mut task = self.owned_by(id, caller_id).await?;
        task.apply(patch);
        validation::check(&task)?;

        let stored = self.store.update(&task).await?;
        log::info!("task {} updated by {}", id, caller_id);
        Ok(stored)
    }

    /// Removes the task and returns its last known state.
    pub async fn delete(&self, id: &str, caller_id: &str) -> Result<Task, AppError> {
        let task = self.owned_by(id, caller_id).await?;

        if !self.store.delete(id).await? {
            return Err(AppError::NotFound("task not found".into()));
        }
        log::info!("task {} deleted by {}", id, caller_id);
        Ok(task)
    }

    async fn owned_by(&self, id: &str, caller_id: &str) -> Result<Task, AppError> {
        let task = self.get_by_id(id).await?;
        if !task.is_owned_by(caller_id) {
            log::warn!(
                "user {} attempted to modify task {} owned by {}",
                caller_id,
                id,
                task.user_id
            );
            return Err(AppError::Forbidden(
                "only the task owner can modify this task".into(),
            ));
        }
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::store::{connect, migrate, SqliteStore, UserStore};
    use pretty_assertions::assert_eq;

    async fn setup() -> (TaskService, User, User) {
        let pool = connect("sqlite::memory:", 1).await.unwrap();
        migrate(&pool).await.unwrap();
        let store = SqliteStore::new(pool);

        let alice = UserStore::insert(&store, &User::new("alice".into(), "digest".into()))
            .await
            .unwrap();
        let bob = UserStore::insert(&store, &User::new("bob".into(), "digest".into()))
            .await
            .unwrap();
        (TaskService::new(Arc::new(store)), alice, bob)
    }

    fn input(title: &str, description: &str) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: description.to_string(),
            completed: false,
        }
    }

    #[actix_rt::test]
    async fn test_create_then_get_returns_same_record() {
        let (service, alice, _) = setup().await;

        let created = service.create(input("t", "d"), &alice.id).await.unwrap();
        let fetched = service.get_by_id(&created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.title, "t");
        assert_eq!(fetched.description, "d");
        assert!(!fetched.completed);
        assert_eq!(fetched.user_id, alice.id);
        assert_eq!(fetched.user.as_ref().map(|u| u.name.as_str()), Some("alice"));
    }

    #[actix_rt::test]
    async fn test_create_rejects_invalid_input() {
        let (service, alice, _) = setup().await;

        match service.create(input("", "d"), &alice.id).await {
            Err(AppError::Validation(msg)) => {
                assert_eq!(msg, "validation error on field 'title': required")
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(service.list_all().await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn test_violations_follow_field_order() {
        let (service, alice, _) = setup().await;

        assert_eq!(
            service.create(input("", ""), &alice.id).await.unwrap_err(),
            AppError::Validation(
                "validation error on field 'title': required \
                 validation error on field 'description': required"
                    .into()
            )
        );
    }

    #[actix_rt::test]
    async fn test_get_missing_task() {
        let (service, _, _) = setup().await;
        assert!(matches!(
            service.get_by_id("does-not-exist").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[actix_rt::test]
    async fn test_update_overlays_fields() {
        let (service, alice, _) = setup().await;
        let created = service.create(input("t", "d"), &alice.id).await.unwrap();

        let patch = TaskPatch {
            title: None,
            description: Some("new description".to_string()),
            completed: Some(true),
        };
        let updated = service.update(&created.id, patch, &alice.id).await.unwrap();

        assert_eq!(updated.title, "t");
        assert_eq!(updated.description, "new description");
        assert!(updated.completed);
        assert_eq!(updated.user_id, alice.id);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[actix_rt::test]
    async fn test_update_validates_merged_record() {
        let (service, alice, _) = setup().await;
        let created = service.create(input("t", "d"), &alice.id).await.unwrap();

        let patch = TaskPatch {
            title: Some("x".repeat(256)),
            ..TaskPatch::default()
        };
        assert!(matches!(
            service.update(&created.id, patch, &alice.id).await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(service.get_by_id(&created.id).await.unwrap().title, "t");
    }

    #[actix_rt::test]
    async fn test_only_owner_can_mutate() {
        let (service, alice, bob) = setup().await;
        let created = service.create(input("t", "d"), &alice.id).await.unwrap();

        assert!(matches!(
            service
                .update(&created.id, TaskPatch::default(), &bob.id)
                .await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            service.delete(&created.id, &bob.id).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(service.get_by_id(&created.id).await.is_ok());
    }

    #[actix_rt::test]
    async fn test_delete_returns_last_state() {
        let (service, alice, _) = setup().await;
        let created = service.create(input("t", "d"), &alice.id).await.unwrap();

        let deleted = service.delete(&created.id, &alice.id).await.unwrap();
        assert_eq!(deleted, created);
        assert!(matches!(
            service.get_by_id(&created.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(&created.id, &alice.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
