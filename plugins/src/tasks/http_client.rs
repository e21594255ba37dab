use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use kanban_core::api::{
    ApiConfig, Column, NewTask, PaginationStyle, Task, TaskId, TaskService, TaskServiceError,
};

use super::error::HttpError;

/// List responses come either as a bare array or as a paginated envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody {
    Plain(Vec<Task>),
    Envelope { data: Vec<Task> },
}

impl ListBody {
    fn into_tasks(self) -> Vec<Task> {
        match self {
            ListBody::Plain(tasks) => tasks,
            ListBody::Envelope { data, .. } => data,
        }
    }
}

/// [`TaskService`] over the json-server style REST contract.
#[derive(Clone)]
pub struct HttpTaskService {
    http: reqwest::Client,
    url_tasks: String,
    pagination: PaginationStyle,
}

impl HttpTaskService {
    pub fn new(
        base_url: &str,
        timeout_ms: u64,
        pagination: PaginationStyle,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()?;
        let normalized = base_url.trim().trim_end_matches('/');
        Ok(Self {
            http,
            url_tasks: format!("{}/tasks", normalized),
            pagination,
        })
    }

    pub fn from_config(cfg: &ApiConfig) -> anyhow::Result<Self> {
        Self::new(&cfg.base_url, cfg.timeout_ms, cfg.pagination)
    }

    fn task_url(&self, id: TaskId) -> String {
        format!("{}/{}", self.url_tasks, id)
    }

    /// Send and read the whole body; non-2xx becomes a status error.
    async fn execute(
        &self,
        req: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<(StatusCode, String), HttpError> {
        let resp = req
            .send()
            .await
            .map_err(|err| HttpError::from_reqwest(err, url))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|err| HttpError::from_reqwest(err, url))?;
        if !status.is_success() {
            return Err(HttpError::status_error(status.as_u16(), url, &body));
        }
        Ok((status, body))
    }
}

fn decode<T: DeserializeOwned>(status: StatusCode, url: &str, body: &str) -> Result<T, HttpError> {
    serde_json::from_str::<T>(body)
        .map_err(|err| HttpError::decode_error(status.as_u16(), url, err, body))
}

#[async_trait]
impl TaskService for HttpTaskService {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_page(
        &self,
        column: Column,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Task>, TaskServiceError> {
        let url = &self.url_tasks;
        tracing::debug!(
            target: "kanban.http",
            stage = "http.list.in",
            url = %url,
            column = %column,
            page = page,
            per_page = per_page
        );
        let page_s = page.to_string();
        let size_s = per_page.to_string();
        let req = self.http.get(url).query(&[
            ("column", column.as_str()),
            ("_page", page_s.as_str()),
            (self.pagination.size_param(), size_s.as_str()),
        ]);
        let (status, body) = self
            .execute(req, url)
            .await
            .map_err(|e| e.into_service_error(None))?;
        let tasks = decode::<ListBody>(status, url, &body)
            .map_err(|e| e.into_service_error(None))?
            .into_tasks();
        tracing::debug!(
            target: "kanban.http",
            stage = "http.list.out",
            status = %status,
            count = tasks.len()
        );
        Ok(tasks)
    }

    async fn create_task(&self, draft: NewTask) -> Result<Task, TaskServiceError> {
        let url = &self.url_tasks;
        tracing::debug!(target: "kanban.http", stage = "http.create.in", url = %url, column = %draft.column);
        let req = self.http.post(url).json(&draft);
        let (status, body) = self
            .execute(req, url)
            .await
            .map_err(|e| e.into_service_error(None))?;
        let created =
            decode::<Task>(status, url, &body).map_err(|e| e.into_service_error(None))?;
        tracing::debug!(target: "kanban.http", stage = "http.create.out", status = %status, id = created.id);
        Ok(created)
    }

    async fn update_task(&self, task: Task) -> Result<Task, TaskServiceError> {
        let url = self.task_url(task.id);
        tracing::debug!(target: "kanban.http", stage = "http.update.in", url = %url, column = %task.column);
        let req = self.http.put(&url).json(&task.body());
        let (status, body) = self
            .execute(req, &url)
            .await
            .map_err(|e| e.into_service_error(Some(task.id)))?;
        // Some servers answer 204; the sent state is then authoritative.
        let updated = if body.trim().is_empty() {
            task
        } else {
            decode::<Task>(status, &url, &body).map_err(|e| e.into_service_error(Some(task.id)))?
        };
        tracing::debug!(target: "kanban.http", stage = "http.update.out", status = %status, id = updated.id);
        Ok(updated)
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), TaskServiceError> {
        let url = self.task_url(id);
        tracing::debug!(target: "kanban.http", stage = "http.delete.in", url = %url);
        let (status, _) = self
            .execute(self.http.delete(&url), &url)
            .await
            .map_err(|e| e.into_service_error(Some(id)))?;
        tracing::debug!(target: "kanban.http", stage = "http.delete.out", status = %status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use pretty_assertions::assert_eq;

    fn service(url: &str) -> HttpTaskService {
        HttpTaskService::new(url, 1_000, PaginationStyle::PerPage).unwrap()
    }

    #[tokio::test]
    async fn list_sends_column_and_paging_and_reads_plain_array() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/tasks")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("column".into(), "in_progress".into()),
                Matcher::UrlEncoded("_page".into(), "2".into()),
                Matcher::UrlEncoded("_per_page".into(), "4".into()),
            ]))
            .with_status(200)
            .with_body(r#"[{"id":5,"title":"Ship","description":"","column":"in_progress"}]"#)
            .create_async()
            .await;

        let tasks = service(&server.url())
            .fetch_page(Column::InProgress, 2, 4)
            .await
            .unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, 5);
        assert_eq!(tasks[0].column, Column::InProgress);
    }

    #[tokio::test]
    async fn list_reads_envelope_with_string_ids() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/tasks")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"first":1,"next":2,"data":[{"id":"7","title":"a","description":"d","column":"todo"}]}"#,
            )
            .create_async()
            .await;

        let tasks = service(&server.url())
            .fetch_page(Column::Todo, 1, 4)
            .await
            .unwrap();
        assert_eq!(tasks[0].id, 7);
        assert_eq!(tasks[0].description, "d");
    }

    #[tokio::test]
    async fn limit_style_uses_limit_param() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/tasks")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("_page".into(), "1".into()),
                Matcher::UrlEncoded("_limit".into(), "4".into()),
            ]))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let svc = HttpTaskService::new(&server.url(), 1_000, PaginationStyle::Limit).unwrap();
        assert!(svc.fetch_page(Column::Done, 1, 4).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_posts_body_without_id() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/tasks")
            .match_body(Matcher::Json(serde_json::json!({
                "title": "Buy milk",
                "description": "",
                "column": "todo"
            })))
            .with_status(201)
            .with_body(r#"{"id":1,"title":"Buy milk","description":"","column":"todo"}"#)
            .create_async()
            .await;

        let created = service(&server.url())
            .create_task(NewTask::new("Buy milk", "", Column::Todo))
            .await
            .unwrap();
        assert_eq!(created.id, 1);
    }

    #[tokio::test]
    async fn update_puts_full_body_to_task_path() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("PUT", "/tasks/3")
            .match_body(Matcher::Json(serde_json::json!({
                "title": "a",
                "description": "b",
                "column": "review"
            })))
            .with_status(200)
            .with_body(r#"{"id":3,"title":"a","description":"b","column":"review"}"#)
            .create_async()
            .await;

        let task = NewTask::new("a", "b", Column::Review).with_id(3);
        let updated = service(&server.url()).update_task(task.clone()).await.unwrap();
        assert_eq!(updated, task);
    }

    #[tokio::test]
    async fn update_of_missing_task_is_not_found() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("PUT", "/tasks/9")
            .with_status(404)
            .with_body("{}")
            .create_async()
            .await;

        let task = NewTask::new("a", "", Column::Todo).with_id(9);
        assert_eq!(
            service(&server.url()).update_task(task).await.unwrap_err(),
            TaskServiceError::NotFound(9)
        );
    }

    #[tokio::test]
    async fn delete_accepts_empty_body_and_maps_404() {
        let mut server = Server::new_async().await;
        let _ok = server
            .mock("DELETE", "/tasks/1")
            .with_status(200)
            .create_async()
            .await;
        let _gone = server
            .mock("DELETE", "/tasks/2")
            .with_status(404)
            .create_async()
            .await;

        let svc = service(&server.url());
        svc.delete_task(1).await.unwrap();
        assert_eq!(
            svc.delete_task(2).await.unwrap_err(),
            TaskServiceError::NotFound(2)
        );
    }

    #[tokio::test]
    async fn rejected_payload_is_validation_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/tasks")
            .with_status(422)
            .with_body("title must not be empty")
            .create_async()
            .await;

        let err = service(&server.url())
            .create_task(NewTask::new("x", "", Column::Todo))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            TaskServiceError::Validation("title must not be empty".to_string())
        );
    }

    #[tokio::test]
    async fn server_error_and_bad_json_are_network_errors() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/tasks")
            .match_query(Matcher::UrlEncoded("column".into(), "todo".into()))
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;
        let _n = server
            .mock("GET", "/tasks")
            .match_query(Matcher::UrlEncoded("column".into(), "done".into()))
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let svc = service(&server.url());
        match svc.fetch_page(Column::Todo, 1, 4).await.unwrap_err() {
            TaskServiceError::Network(msg) => assert!(msg.contains("status=502")),
            other => panic!("unexpected {other:?}"),
        }
        match svc.fetch_page(Column::Done, 1, 4).await.unwrap_err() {
            TaskServiceError::Network(msg) => assert!(msg.contains("decode")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let svc = HttpTaskService::new("http://127.0.0.1:1", 500, PaginationStyle::PerPage).unwrap();
        assert!(matches!(
            svc.fetch_page(Column::Todo, 1, 4).await.unwrap_err(),
            TaskServiceError::Network(_)
        ));
    }
}
