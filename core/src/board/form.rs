use crate::domain::{Column, NewTask, Task};
use crate::error::TaskServiceError;

use super::TaskOps;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    /// Editing this task, as loaded when the form opened.
    Edit(Task),
}

/// Validated, owned payload of a form, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormSubmission {
    Create(NewTask),
    Edit { previous: Column, task: Task },
}

/// State of the create / edit dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub mode: FormMode,
    pub title: String,
    pub description: String,
    pub column: Column,
    /// Inline message under the title field.
    pub field_error: Option<String>,
    /// Generic notice for a failed submit.
    pub submit_error: Option<String>,
    pub submitting: bool,
}

impl TaskForm {
    pub fn create(column: Column) -> Self {
        Self {
            mode: FormMode::Create,
            title: String::new(),
            description: String::new(),
            column,
            field_error: None,
            submit_error: None,
            submitting: false,
        }
    }

    pub fn edit(task: &Task) -> Self {
        Self {
            mode: FormMode::Edit(task.clone()),
            title: task.title.clone(),
            description: task.description.clone(),
            column: task.column,
            field_error: None,
            submit_error: None,
            submitting: false,
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    /// Validate and build the payload. On a blank title the inline error is
    /// set and nothing is returned, so no request goes out.
    pub fn submission(&mut self) -> Option<FormSubmission> {
        self.submit_error = None;
        let draft = NewTask::new(self.title.trim(), self.description.as_str(), self.column);
        if let Err(err) = draft.validate() {
            self.field_error = Some(err.user_message());
            return None;
        }
        self.field_error = None;
        self.submitting = true;
        Some(match &self.mode {
            FormMode::Create => FormSubmission::Create(draft),
            FormMode::Edit(original) => FormSubmission::Edit {
                previous: original.column,
                task: draft.with_id(original.id),
            },
        })
    }

    /// Record the service's answer. Returns true when the dialog can close.
    pub fn finish(&mut self, result: &Result<Task, TaskServiceError>) -> bool {
        self.submitting = false;
        match result {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(target: "kanban.board", error = %err, "task form submit failed");
                if err.is_validation() {
                    self.field_error = Some(err.user_message());
                } else {
                    self.submit_error = Some("Something went wrong".to_string());
                }
                false
            }
        }
    }

    /// Validate, send and record the answer in one go.
    pub async fn submit(&mut self, ops: &TaskOps) -> Result<Task, TaskServiceError> {
        let Some(submission) = self.submission() else {
            let msg = self
                .field_error
                .clone()
                .unwrap_or_else(|| "Title is required.".to_string());
            return Err(TaskServiceError::Validation(msg));
        };
        let result = ops.submit(submission).await;
        self.finish(&result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ColumnCache;
    use crate::config::BoardConfig;
    use crate::service::{InMemoryTaskService, Op, TaskClient};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn ops(svc: &Arc<InMemoryTaskService>) -> TaskOps {
        TaskOps::new(ColumnCache::new(
            TaskClient::new(svc.clone()),
            &BoardConfig::default(),
        ))
    }

    #[test]
    fn blank_title_blocks_submission() {
        let mut form = TaskForm::create(Column::Todo);
        form.title = "   ".into();
        assert_eq!(form.submission(), None);
        assert_eq!(form.field_error.as_deref(), Some("Title is required."));
        assert!(!form.submitting);
    }

    #[test]
    fn edit_submission_keeps_id_and_previous_column() {
        let task = NewTask::new("a", "d", Column::Todo).with_id(9);
        let mut form = TaskForm::edit(&task);
        form.title = " b ".into();
        form.column = Column::Done;
        assert_eq!(
            form.submission(),
            Some(FormSubmission::Edit {
                previous: Column::Todo,
                task: NewTask::new("b", "d", Column::Done).with_id(9),
            })
        );
    }

    #[test]
    fn description_is_sent_as_typed() {
        let mut form = TaskForm::create(Column::Todo);
        form.title = "  Plan  ".into();
        form.description = "  indented\n- item  ".into();
        assert_eq!(
            form.submission(),
            Some(FormSubmission::Create(NewTask::new(
                "Plan",
                "  indented\n- item  ",
                Column::Todo
            )))
        );
    }

    #[tokio::test]
    async fn create_via_form_reaches_service() {
        let svc = Arc::new(InMemoryTaskService::new());
        let ops = ops(&svc);
        let mut form = TaskForm::create(Column::Review);
        form.title = "Write report".into();
        let created = form.submit(&ops).await.unwrap();
        assert_eq!(created.column, Column::Review);
        assert_eq!(svc.tasks_in(Column::Review), vec![created]);
        assert_eq!(form.submit_error, None);
    }

    #[tokio::test]
    async fn network_failure_shows_generic_notice() {
        let svc = Arc::new(InMemoryTaskService::new());
        svc.fail_next(Op::Create, TaskServiceError::Network("refused".into()));
        let ops = ops(&svc);
        let mut form = TaskForm::create(Column::Todo);
        form.title = "x".into();
        assert!(form.submit(&ops).await.is_err());
        assert_eq!(form.submit_error.as_deref(), Some("Something went wrong"));
        assert!(!form.submitting);
    }

    #[tokio::test]
    async fn blank_edit_never_reaches_service() {
        let svc = Arc::new(InMemoryTaskService::new());
        let task = svc.seed(NewTask::new("a", "", Column::Todo));
        let ops = ops(&svc);
        let mut form = TaskForm::edit(&task);
        form.title.clear();
        let err = form.submit(&ops).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(svc.calls(Op::Update), 0);
    }
}
