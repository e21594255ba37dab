use std::{error::Error as StdError, fmt};

use kanban_core::api::{TaskId, TaskServiceError};

const BODY_PREVIEW_LIMIT: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpErrorKind {
    Timeout,
    Connect,
    Request,
    Body,
    Decode,
    Status,
    Unknown,
}

impl HttpErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Request => "request",
            Self::Body => "body",
            Self::Decode => "decode",
            Self::Status => "status",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for HttpErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport-level failure talking to the task API or the ingest endpoint.
#[derive(Debug)]
pub struct HttpError {
    kind: HttpErrorKind,
    status: Option<u16>,
    url: Option<String>,
    message: String,
    source: Option<anyhow::Error>,
}

impl HttpError {
    pub fn kind(&self) -> HttpErrorKind {
        self.kind
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub(crate) fn from_reqwest(err: reqwest::Error, url: &str) -> Self {
        let kind = if err.is_timeout() {
            HttpErrorKind::Timeout
        } else if err.is_connect() {
            HttpErrorKind::Connect
        } else if err.is_request() {
            HttpErrorKind::Request
        } else if err.is_body() {
            HttpErrorKind::Body
        } else if err.is_decode() {
            HttpErrorKind::Decode
        } else {
            HttpErrorKind::Unknown
        };
        HttpError {
            kind,
            status: err.status().map(|s| s.as_u16()),
            url: Some(url.to_string()),
            message: err.to_string(),
            source: Some(anyhow::Error::new(err)),
        }
    }

    pub(crate) fn status_error(status: u16, url: &str, body: &str) -> Self {
        HttpError {
            kind: HttpErrorKind::Status,
            status: Some(status),
            url: Some(url.to_string()),
            message: preview_body(body),
            source: None,
        }
    }

    pub(crate) fn decode_error(status: u16, url: &str, err: serde_json::Error, body: &str) -> Self {
        HttpError {
            kind: HttpErrorKind::Decode,
            status: Some(status),
            url: Some(url.to_string()),
            message: format!(
                "failed to decode response body: {} | body={}",
                err,
                preview_body(body)
            ),
            source: Some(anyhow::Error::new(err)),
        }
    }

    /// Map onto the task error taxonomy. `id` is the task the request was
    /// about, if any; only then does a 404 mean `NotFound`.
    pub fn into_service_error(self, id: Option<TaskId>) -> TaskServiceError {
        match (self.kind, self.status, id) {
            (HttpErrorKind::Status, Some(404), Some(id)) => TaskServiceError::NotFound(id),
            (HttpErrorKind::Status, Some(400 | 422), _) => {
                TaskServiceError::Validation(self.message)
            }
            _ => TaskServiceError::Network(self.to_string()),
        }
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "http error kind={}", self.kind)?;
        if let Some(status) = self.status {
            write!(f, " status={}", status)?;
        }
        if let Some(url) = &self.url {
            write!(f, " url={}", url)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl StdError for HttpError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}

pub(crate) fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    let mut out: String = trimmed.chars().take(BODY_PREVIEW_LIMIT).collect();
    if trimmed.chars().nth(BODY_PREVIEW_LIMIT).is_some() {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_task_taxonomy() {
        let e = HttpError::status_error(404, "http://x/tasks/3", "");
        assert_eq!(e.into_service_error(Some(3)), TaskServiceError::NotFound(3));

        let e = HttpError::status_error(404, "http://x/tasks", "");
        assert!(matches!(
            e.into_service_error(None),
            TaskServiceError::Network(_)
        ));

        let e = HttpError::status_error(422, "http://x/tasks", "title missing");
        assert_eq!(
            e.into_service_error(None),
            TaskServiceError::Validation("title missing".to_string())
        );

        let e = HttpError::status_error(503, "http://x/tasks", "busy");
        match e.into_service_error(Some(1)) {
            TaskServiceError::Network(msg) => assert!(msg.contains("status=503")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn preview_is_bounded() {
        let long = "x".repeat(BODY_PREVIEW_LIMIT + 10);
        let p = preview_body(&long);
        assert_eq!(p.len(), BODY_PREVIEW_LIMIT + 3);
        assert!(p.ends_with("..."));
        assert_eq!(preview_body("  "), "<empty body>");
    }
}
