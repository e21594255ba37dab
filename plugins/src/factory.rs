use std::sync::Arc;

use anyhow::Result;

use kanban_core::api::{
    start_diagnostics, AppConfig, DiagnosticSink, JsonlFileSink, TaskClient, TaskService,
};

use crate::diagnostics::HttpIngestSink;
use crate::tasks::HttpTaskService;

pub fn build_task_service(cfg: &AppConfig) -> Result<Arc<dyn TaskService>> {
    Ok(Arc::new(HttpTaskService::from_config(&cfg.api)?))
}

/// Endpoint wins over path; `None` when diagnostics are off, unrouted, or the
/// file cannot be opened.
pub async fn build_diagnostics_sink(cfg: &AppConfig) -> Result<Option<Arc<dyn DiagnosticSink>>> {
    let diag = &cfg.diagnostics;
    if !diag.enabled {
        return Ok(None);
    }
    if let Some(endpoint) = diag.endpoint.as_deref().filter(|s| !s.trim().is_empty()) {
        return Ok(Some(Arc::new(HttpIngestSink::new(
            endpoint,
            cfg.api.timeout_ms,
        )?)));
    }
    if let Some(path) = diag.path.as_deref().filter(|s| !s.trim().is_empty()) {
        return match JsonlFileSink::open(path.trim()).await {
            Ok(sink) => Ok(Some(Arc::new(sink))),
            Err(err) => {
                tracing::warn!(
                    target: "kanban.diagnostics",
                    path = path.trim(),
                    error = %err,
                    "diagnostics file unavailable; events are discarded"
                );
                Ok(None)
            }
        };
    }
    tracing::warn!(
        target: "kanban.diagnostics",
        "diagnostics enabled without endpoint or path; events are discarded"
    );
    Ok(None)
}

/// Task client over REST, with the diagnostics side-channel attached when
/// configured. Must be called inside a tokio runtime.
pub async fn build_task_client(cfg: &AppConfig) -> Result<TaskClient> {
    let service = build_task_service(cfg)?;
    let diagnostics = build_diagnostics_sink(cfg)
        .await?
        .and_then(|sink| start_diagnostics(&cfg.diagnostics, sink));
    Ok(TaskClient::new(service).with_diagnostics(diagnostics))
}
