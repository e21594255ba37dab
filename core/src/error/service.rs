use thiserror::Error;

use crate::domain::TaskId;

/// Failure of a task service operation.
///
/// None of these are fatal: each is scoped to the operation that raised it.
/// `Clone` so cache outcomes can hand the same error to every waiter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskServiceError {
    /// Rejected payload: blank title on the client, or a 400/422 from the service.
    #[error("validation failed: {0}")]
    Validation(String),
    /// The id no longer exists on the service.
    #[error("task {0} not found")]
    NotFound(TaskId),
    /// Transport, timeout, unexpected status or undecodable body.
    #[error("network error: {0}")]
    Network(String),
}

impl TaskServiceError {
    pub fn is_validation(&self) -> bool {
        matches!(self, TaskServiceError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TaskServiceError::NotFound(_))
    }

    /// Short text for inline notices next to a form or column.
    pub fn user_message(&self) -> String {
        match self {
            TaskServiceError::Validation(msg) => msg.clone(),
            TaskServiceError::NotFound(_) => "This task no longer exists.".to_string(),
            TaskServiceError::Network(_) => "Something went wrong".to_string(),
        }
    }
}
