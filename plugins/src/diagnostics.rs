use async_trait::async_trait;

use kanban_core::api::{DiagnosticEvent, DiagnosticSink};

use crate::tasks::HttpError;

/// POSTs each diagnostic event as JSON to a log-ingestion endpoint.
pub struct HttpIngestSink {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpIngestSink {
    pub fn new(endpoint: &str, timeout_ms: u64) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.trim().to_string(),
        })
    }
}

#[async_trait]
impl DiagnosticSink for HttpIngestSink {
    fn name(&self) -> &str {
        &self.endpoint
    }

    async fn deliver(&self, event: &DiagnosticEvent) -> anyhow::Result<()> {
        let url = &self.endpoint;
        let resp = self
            .http
            .post(url)
            .json(event)
            .send()
            .await
            .map_err(|err| HttpError::from_reqwest(err, url))?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp
            .text()
            .await
            .map_err(|err| HttpError::from_reqwest(err, url))?;
        Err(HttpError::status_error(status.as_u16(), url, &body).into())
    }
}
