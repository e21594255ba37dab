use async_trait::async_trait;

use crate::domain::{Column, NewTask, Task, TaskId};
use crate::error::TaskServiceError;

/// Remote task store, as seen through its REST contract.
///
/// Implementations do column filtering and pagination on their side; search
/// filtering is applied by [`TaskClient`](super::TaskClient) afterwards.
#[async_trait]
pub trait TaskService: Send + Sync {
    fn name(&self) -> &str;

    /// One page of `column`, in service order. `page` starts at 1.
    async fn fetch_page(
        &self,
        column: Column,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Task>, TaskServiceError>;

    async fn create_task(&self, draft: NewTask) -> Result<Task, TaskServiceError>;

    /// Full replace of every mutable field, by id.
    async fn update_task(&self, task: Task) -> Result<Task, TaskServiceError>;

    async fn delete_task(&self, id: TaskId) -> Result<(), TaskServiceError>;
}
