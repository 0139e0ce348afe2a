use async_trait::async_trait;
use uuid::Uuid;

use super::model::Task;
use crate::Result;

/// Storage seam for tasks
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Fails when a task with the same id is already stored
    async fn create(&self, task: Task) -> Result<Task>;

    async fn get(&self, id: Uuid) -> Result<Option<Task>>;

    /// All tasks ordered by `created_at`, oldest first
    async fn list(&self) -> Result<Vec<Task>>;

    /// Replace a stored task and refresh its `updated_at`
    async fn update(&self, task: Task) -> Result<Task>;

    /// Returns false when nothing was stored under `id`
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Remove every task of a project, returning how many were removed
    async fn delete_by_project(&self, project_id: Uuid) -> Result<usize>;
}
