use async_trait::async_trait;
use thiserror::Error;

use crate::entities::task::{NewTask, Task, TaskId};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TaskStoreError {
    #[error("invalid task data: {0}")]
    InvalidData(String),
    #[error("task store failure: {0}")]
    Store(String),
}

#[async_trait]
pub trait TaskRepositoryInterface: Send + Sync {
    async fn get_task(&self, task_id: &TaskId) -> Result<Option<Task>, TaskStoreError>;
    /// Inserts an active task and returns its fresh id.
    async fn create_task(&self, task: NewTask) -> Result<TaskId, TaskStoreError>;
    /// Active tasks only, newest first, at most `limit`.
    async fn list_active(&self, limit: usize) -> Result<Vec<Task>, TaskStoreError>;
}
