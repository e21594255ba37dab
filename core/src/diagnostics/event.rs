use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticEvent {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Source location tag, e.g. `task_client.create`.
    pub location: String,
    pub message: String,
    #[serde(default)]
    pub data: Value,
}

impl DiagnosticEvent {
    pub fn new(location: impl Into<String>, message: impl Into<String>, data: Value) -> Self {
        let timestamp = Utc::now().timestamp_millis();
        Self {
            id: format!("log_{}_{}", timestamp, uuid::Uuid::new_v4().simple()),
            timestamp,
            location: location.into(),
            message: message.into(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_prefixed() {
        let a = DiagnosticEvent::new("x", "m", Value::Null);
        let b = DiagnosticEvent::new("x", "m", Value::Null);
        assert!(a.id.starts_with("log_"));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn serializes_flat_shape() {
        let ev = DiagnosticEvent::new(
            "task_client.create",
            "Task created",
            serde_json::json!({"column": "todo"}),
        );
        let v = serde_json::to_value(&ev).unwrap();
        for key in ["id", "timestamp", "location", "message", "data"] {
            assert!(v.get(key).is_some(), "missing {key}");
        }
        assert_eq!(v["data"]["column"], "todo");
    }
}
