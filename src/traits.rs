use async_trait::async_trait;

use crate::error::StoreError;
use crate::task::{NewTask, Task, TaskId};

/// A remote collection of tasks.
///
/// Every call is a single attempt: there are no retries and no timeouts at this level.
/// Callers must only update their own state once a call has returned `Ok`.
///
/// Updates and deletions target rows by id, and an id that matches no row is not an error: the call
/// succeeds and changes nothing. This happens when a toggle reaches the store after a delete of the same task.
#[async_trait]
pub trait TaskGateway: Send + Sync {
    /// Returns every task of the collection, sorted by ascending deadline
    async fn list_all(&self) -> Result<Vec<Task>, StoreError>;

    /// Persist a new task, and return it as stored (i.e. with the id the store has assigned)
    async fn insert(&self, task: NewTask) -> Result<Task, StoreError>;

    /// Change the completion status of a task. Does nothing if there is no such task
    async fn set_completed(&self, id: &TaskId, completed: bool) -> Result<(), StoreError>;

    /// Delete a single task. Does nothing if there is no such task
    async fn delete_by_id(&self, id: &TaskId) -> Result<(), StoreError>;

    /// Delete every task in `ids`, in a single request
    async fn delete_by_ids(&self, ids: &[TaskId]) -> Result<(), StoreError>;
}

/// Lets several owners (e.g. a board and a test, or a board and background tasks) share one gateway
#[async_trait]
impl<G: TaskGateway + ?Sized> TaskGateway for std::sync::Arc<G> {
    async fn list_all(&self) -> Result<Vec<Task>, StoreError> {
        (**self).list_all().await
    }
    async fn insert(&self, task: NewTask) -> Result<Task, StoreError> {
        (**self).insert(task).await
    }
    async fn set_completed(&self, id: &TaskId, completed: bool) -> Result<(), StoreError> {
        (**self).set_completed(id, completed).await
    }
    async fn delete_by_id(&self, id: &TaskId) -> Result<(), StoreError> {
        (**self).delete_by_id(id).await
    }
    async fn delete_by_ids(&self, ids: &[TaskId]) -> Result<(), StoreError> {
        (**self).delete_by_ids(ids).await
    }
}
