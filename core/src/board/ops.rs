use crate::cache::{CacheKey, ColumnCache, LoadMore};
use crate::dnd::DropOutcome;
use crate::domain::{Column, NewTask, Task};
use crate::error::TaskServiceError;
use crate::service::TaskClient;

use super::FormSubmission;

/// Task mutations paired with the cache invalidations they require.
#[derive(Clone)]
pub struct TaskOps {
    client: TaskClient,
    cache: ColumnCache,
}

impl TaskOps {
    pub fn new(cache: ColumnCache) -> Self {
        Self {
            client: cache.client().clone(),
            cache,
        }
    }

    pub fn client(&self) -> &TaskClient {
        &self.client
    }

    pub fn cache(&self) -> &ColumnCache {
        &self.cache
    }

    pub async fn create_task(&self, draft: NewTask) -> Result<Task, TaskServiceError> {
        let created = self.client.create_task(draft).await?;
        self.cache.invalidate(created.column);
        Ok(created)
    }

    /// Replace `task` on the service. `previous` is its column before the edit.
    pub async fn update_task(
        &self,
        previous: Column,
        task: Task,
    ) -> Result<Task, TaskServiceError> {
        let updated = self.client.update_task(task).await?;
        if previous != updated.column {
            self.cache.invalidate(previous);
        }
        self.cache.invalidate(updated.column);
        Ok(updated)
    }

    pub async fn delete_task(&self, task: &Task) -> Result<(), TaskServiceError> {
        self.client.delete_task(task.id).await?;
        self.cache.invalidate(task.column);
        Ok(())
    }

    /// Move `task` to `to`.
    ///
    /// A move to the task's own column issues nothing and returns `Ok(None)`.
    /// Failures are logged here; callers may ignore the error.
    pub async fn move_task(
        &self,
        task: &Task,
        to: Column,
    ) -> Result<Option<Task>, TaskServiceError> {
        let from = task.column;
        if from == to {
            tracing::debug!(target: "kanban.board", task_id = task.id, column = %to, "move skipped: same column");
            return Ok(None);
        }
        match self.client.update_task(task.moved_to(to)).await {
            Ok(updated) => {
                self.cache.invalidate(from);
                self.cache.invalidate(to);
                tracing::info!(
                    target: "kanban.board",
                    stage = "board.move.out",
                    task_id = updated.id,
                    from = %from,
                    to = %to
                );
                Ok(Some(updated))
            }
            Err(err) => {
                tracing::error!(
                    target: "kanban.board",
                    task_id = task.id,
                    from = %from,
                    to = %to,
                    error = %err,
                    "failed to move task"
                );
                Err(err)
            }
        }
    }

    /// Act on a released drag. Only `Move` reaches the service.
    pub async fn apply_drop(
        &self,
        outcome: &DropOutcome,
    ) -> Result<Option<Task>, TaskServiceError> {
        match outcome {
            DropOutcome::Move { task, to, .. } => self.move_task(task, *to).await,
            _ => Ok(None),
        }
    }

    pub async fn submit(&self, submission: FormSubmission) -> Result<Task, TaskServiceError> {
        match submission {
            FormSubmission::Create(draft) => self.create_task(draft).await,
            FormSubmission::Edit { previous, task } => self.update_task(previous, task).await,
        }
    }

    pub async fn load_more(&self, key: &CacheKey) -> LoadMore {
        self.cache.load_more(key).await
    }
}
