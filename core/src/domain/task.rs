use serde::{Deserialize, Deserializer, Serialize};

use super::Column;
use crate::error::TaskServiceError;

/// Service-assigned, immutable task id.
pub type TaskId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(deserialize_with = "de_task_id")]
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub column: Column,
}

/// Task minus id: the body of create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub column: Column,
}

impl Task {
    pub fn body(&self) -> NewTask {
        NewTask {
            title: self.title.clone(),
            description: self.description.clone(),
            column: self.column,
        }
    }

    /// Same task, different column. Every other field is carried over.
    pub fn moved_to(&self, column: Column) -> Task {
        Task {
            column,
            ..self.clone()
        }
    }
}

impl NewTask {
    pub fn new(title: impl Into<String>, description: impl Into<String>, column: Column) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            column,
        }
    }

    pub fn validate(&self) -> Result<(), TaskServiceError> {
        validate_title(&self.title)
    }

    pub fn with_id(self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            column: self.column,
        }
    }
}

pub(crate) fn validate_title(title: &str) -> Result<(), TaskServiceError> {
    if title.trim().is_empty() {
        return Err(TaskServiceError::Validation("Title is required.".to_string()));
    }
    Ok(())
}

/// Accepts `7` as well as `"7"`; mock REST servers often emit string ids.
fn de_task_id<'de, D>(deserializer: D) -> Result<TaskId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Num(u64),
        Str(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Num(n) => Ok(n),
        RawId::Str(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| serde::de::Error::custom(format!("task id is not numeric: {s:?}"))),
    }
}
