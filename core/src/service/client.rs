use std::sync::Arc;

use serde_json::json;

use super::filter::filter_tasks;
use super::TaskService;
use crate::diagnostics::{DiagnosticEvent, DiagnosticsTx};
use crate::domain::{validate_title, Column, NewTask, Task, TaskId};
use crate::error::TaskServiceError;

/// Upper bound on pages scanned per column by [`TaskClient::find_task`].
const MAX_SCAN_PAGES: u32 = 1_000;

/// Parameters of one `list_tasks` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub column: Column,
    pub page: u32,
    pub page_size: u32,
    pub search: Option<String>,
}

impl ListQuery {
    pub fn new(column: Column, page: u32, page_size: u32) -> Self {
        Self {
            column,
            page,
            page_size,
            search: None,
        }
    }

    /// Empty terms are stored as "no search".
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let s = search.into();
        self.search = if s.is_empty() { None } else { Some(s) };
        self
    }
}

/// One fetched page after local search filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPage {
    pub tasks: Vec<Task>,
    /// True when the raw page came back full-sized. A heuristic: a column
    /// whose last page is exactly full reports one extra, empty page.
    pub has_more: bool,
}

/// Typed entry point for task operations.
///
/// Wraps a [`TaskService`] with argument checks, client-side validation,
/// local search filtering and the best-effort diagnostics side-channel.
#[derive(Clone)]
pub struct TaskClient {
    service: Arc<dyn TaskService>,
    diagnostics: Option<DiagnosticsTx>,
}

impl TaskClient {
    pub fn new(service: Arc<dyn TaskService>) -> Self {
        Self {
            service,
            diagnostics: None,
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Option<DiagnosticsTx>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn service_name(&self) -> &str {
        self.service.name()
    }

    pub async fn list_tasks(&self, query: &ListQuery) -> Result<TaskPage, TaskServiceError> {
        if query.page == 0 {
            return Err(TaskServiceError::Validation(
                "page must be >= 1".to_string(),
            ));
        }
        if query.page_size == 0 {
            return Err(TaskServiceError::Validation(
                "page size must be >= 1".to_string(),
            ));
        }

        tracing::debug!(
            target: "kanban.client",
            stage = "client.list.in",
            column = %query.column,
            page = query.page,
            page_size = query.page_size,
            search = query.search.as_deref().unwrap_or("")
        );
        let raw = self
            .service
            .fetch_page(query.column, query.page, query.page_size)
            .await?;
        let has_more = raw.len() as u64 >= u64::from(query.page_size);
        let fetched = raw.len();
        let tasks = match query.search.as_deref() {
            Some(term) => filter_tasks(raw, term),
            None => raw,
        };
        tracing::debug!(
            target: "kanban.client",
            stage = "client.list.out",
            column = %query.column,
            page = query.page,
            fetched = fetched,
            kept = tasks.len(),
            has_more = has_more
        );
        Ok(TaskPage { tasks, has_more })
    }

    pub async fn create_task(&self, draft: NewTask) -> Result<Task, TaskServiceError> {
        draft.validate()?;
        let created = self.service.create_task(draft).await?;
        tracing::info!(
            target: "kanban.client",
            stage = "client.create.out",
            id = created.id,
            column = %created.column
        );
        self.emit(
            "task_client.create",
            "Task created",
            json!({ "mode": "create", "title": created.title, "column": created.column }),
        );
        Ok(created)
    }

    pub async fn update_task(&self, task: Task) -> Result<Task, TaskServiceError> {
        validate_title(&task.title)?;
        let id = task.id;
        let updated = self.service.update_task(task).await?;
        tracing::info!(
            target: "kanban.client",
            stage = "client.update.out",
            id = id,
            column = %updated.column
        );
        self.emit(
            "task_client.update",
            "Task updated",
            json!({ "mode": "edit", "title": updated.title, "column": updated.column }),
        );
        Ok(updated)
    }

    pub async fn delete_task(&self, id: TaskId) -> Result<(), TaskServiceError> {
        self.service.delete_task(id).await?;
        tracing::info!(target: "kanban.client", stage = "client.delete.out", id = id);
        Ok(())
    }

    /// Locate a task by id by paging through every column.
    ///
    /// The REST contract has no single-task read, so this is O(board size).
    pub async fn find_task(&self, id: TaskId, page_size: u32) -> Result<Task, TaskServiceError> {
        for column in Column::ALL {
            for page in 1..=MAX_SCAN_PAGES {
                let res = self
                    .list_tasks(&ListQuery::new(column, page, page_size))
                    .await?;
                if let Some(task) = res.tasks.into_iter().find(|t| t.id == id) {
                    return Ok(task);
                }
                if !res.has_more {
                    break;
                }
            }
        }
        Err(TaskServiceError::NotFound(id))
    }

    fn emit(&self, location: &str, message: &str, data: serde_json::Value) {
        if let Some(tx) = &self.diagnostics {
            tx.emit(DiagnosticEvent::new(location, message, data));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{InMemoryTaskService, Op};

    fn seeded(titles: &[(&str, Column)]) -> Arc<InMemoryTaskService> {
        let svc = InMemoryTaskService::new();
        for (title, column) in titles {
            svc.seed(NewTask::new(*title, "", *column));
        }
        Arc::new(svc)
    }

    #[tokio::test]
    async fn list_rejects_zero_page_and_size() {
        let client = TaskClient::new(seeded(&[]));
        let err = client
            .list_tasks(&ListQuery::new(Column::Todo, 0, 4))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        let err = client
            .list_tasks(&ListQuery::new(Column::Todo, 1, 0))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn search_filters_after_fetch_and_keeps_has_more_from_raw_page() {
        let svc = seeded(&[
            ("Buy milk", Column::Todo),
            ("Walk dog", Column::Todo),
            ("Call mom", Column::Todo),
            ("Pay rent", Column::Todo),
            ("Milk the cow", Column::Todo),
        ]);
        let client = TaskClient::new(svc);
        let page1 = client
            .list_tasks(&ListQuery::new(Column::Todo, 1, 4).with_search("MILK"))
            .await
            .unwrap();
        // Only page 1 is searched: "Milk the cow" sits on page 2.
        assert_eq!(page1.tasks.len(), 1);
        assert_eq!(page1.tasks[0].title, "Buy milk");
        assert!(page1.has_more);

        let page2 = client
            .list_tasks(&ListQuery::new(Column::Todo, 2, 4).with_search("milk"))
            .await
            .unwrap();
        assert_eq!(page2.tasks.len(), 1);
        assert!(!page2.has_more);
    }

    #[tokio::test]
    async fn create_with_blank_title_never_reaches_service() {
        let svc = seeded(&[]);
        let client = TaskClient::new(svc.clone());
        let err = client
            .create_task(NewTask::new("  ", "", Column::Todo))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(svc.calls(Op::Create), 0);
    }

    #[tokio::test]
    async fn update_with_blank_title_never_reaches_service() {
        let svc = seeded(&[("a", Column::Todo)]);
        let client = TaskClient::new(svc.clone());
        let task = Task {
            id: 1,
            title: String::new(),
            description: String::new(),
            column: Column::Todo,
        };
        assert!(client.update_task(task).await.unwrap_err().is_validation());
        assert_eq!(svc.calls(Op::Update), 0);
    }

    #[tokio::test]
    async fn find_task_scans_pages_and_columns() {
        let svc = seeded(&[
            ("a", Column::Todo),
            ("b", Column::Todo),
            ("c", Column::Todo),
            ("d", Column::Review),
        ]);
        let client = TaskClient::new(svc);
        let found = client.find_task(4, 2).await.unwrap();
        assert_eq!(found.title, "d");
        assert_eq!(found.column, Column::Review);
        assert_eq!(
            client.find_task(99, 2).await.unwrap_err(),
            TaskServiceError::NotFound(99)
        );
    }

    #[tokio::test]
    async fn stalled_diagnostics_sink_never_holds_up_writes() {
        use crate::config::DiagnosticsConfig;
        use crate::diagnostics::{start_diagnostics, DiagnosticEvent, DiagnosticSink};
        use std::time::Duration;

        struct Stalled;

        #[async_trait::async_trait]
        impl DiagnosticSink for Stalled {
            fn name(&self) -> &str {
                "stalled"
            }

            async fn deliver(&self, _event: &DiagnosticEvent) -> anyhow::Result<()> {
                futures::future::pending::<()>().await;
                Ok(())
            }
        }

        let cfg = DiagnosticsConfig {
            enabled: true,
            channel_capacity: 1,
            ..DiagnosticsConfig::default()
        };
        let tx = start_diagnostics(&cfg, Arc::new(Stalled));
        let svc = seeded(&[]);
        let client = TaskClient::new(svc.clone()).with_diagnostics(tx);

        for i in 0..4 {
            let created = tokio::time::timeout(
                Duration::from_secs(2),
                client.create_task(NewTask::new(format!("t{i}"), "", Column::Todo)),
            )
            .await
            .expect("create returned")
            .unwrap();
            let mut edited = created.clone();
            edited.title = format!("t{i}!");
            tokio::time::timeout(Duration::from_secs(2), client.update_task(edited))
                .await
                .expect("update returned")
                .unwrap();
        }
        assert_eq!(svc.tasks_in(Column::Todo).len(), 4);
    }
}
