use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::DiagnosticEvent;
use crate::config::DiagnosticsConfig;

/// Destination of diagnostic events (HTTP ingestion endpoint, file, ...).
#[async_trait]
pub trait DiagnosticSink: Send + Sync {
    fn name(&self) -> &str;
    async fn deliver(&self, event: &DiagnosticEvent) -> anyhow::Result<()>;
}

/// Sending half of the diagnostics channel. Cheap to clone.
#[derive(Clone)]
pub struct DiagnosticsTx {
    tx: mpsc::Sender<DiagnosticEvent>,
    dropped: Arc<AtomicU64>,
}

impl DiagnosticsTx {
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Queue `event` for delivery. Never waits: a full or closed channel
    /// drops the event and bumps the counter.
    pub fn emit(&self, event: DiagnosticEvent) {
        if self.tx.try_send(event).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Spawn the delivery worker. Returns `None` when diagnostics are disabled.
pub fn start_diagnostics(
    cfg: &DiagnosticsConfig,
    sink: Arc<dyn DiagnosticSink>,
) -> Option<DiagnosticsTx> {
    if !cfg.enabled {
        return None;
    }

    let (tx, mut rx) = mpsc::channel::<DiagnosticEvent>(cfg.channel_capacity.max(1));
    let dropped = Arc::new(AtomicU64::new(0));

    tokio::spawn(async move {
        tracing::debug!(target: "kanban.diagnostics", sink = sink.name(), "diagnostics worker started");
        while let Some(event) = rx.recv().await {
            if let Err(err) = sink.deliver(&event).await {
                tracing::debug!(
                    target: "kanban.diagnostics",
                    sink = sink.name(),
                    event_id = %event.id,
                    error = %err,
                    "diagnostic event dropped"
                );
            }
        }
    });

    Some(DiagnosticsTx { tx, dropped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Recording {
        seen: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl DiagnosticSink for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        async fn deliver(&self, event: &DiagnosticEvent) -> anyhow::Result<()> {
            self.seen.lock().unwrap().push(event.message.clone());
            if self.fail {
                anyhow::bail!("sink offline");
            }
            Ok(())
        }
    }

    /// Accepts one event and never finishes delivering it.
    struct Stuck;

    #[async_trait]
    impl DiagnosticSink for Stuck {
        fn name(&self) -> &str {
            "stuck"
        }

        async fn deliver(&self, _event: &DiagnosticEvent) -> anyhow::Result<()> {
            futures::future::pending::<()>().await;
            Ok(())
        }
    }

    fn enabled() -> DiagnosticsConfig {
        DiagnosticsConfig {
            enabled: true,
            ..DiagnosticsConfig::default()
        }
    }

    #[tokio::test]
    async fn disabled_config_starts_nothing() {
        let sink = Arc::new(Recording::default());
        assert!(start_diagnostics(&DiagnosticsConfig::default(), sink).is_none());
    }

    #[tokio::test]
    async fn events_reach_sink() {
        let sink = Arc::new(Recording::default());
        let tx = start_diagnostics(&enabled(), sink.clone()).unwrap();
        tx.emit(DiagnosticEvent::new("here", "one", serde_json::Value::Null));
        tx.emit(DiagnosticEvent::new("here", "two", serde_json::Value::Null));
        for _ in 0..50 {
            if sink.seen.lock().unwrap().len() == 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(*sink.seen.lock().unwrap(), vec!["one", "two"]);
    }

    #[tokio::test]
    async fn failing_sink_keeps_worker_alive() {
        let sink = Arc::new(Recording {
            fail: true,
            ..Recording::default()
        });
        let tx = start_diagnostics(&enabled(), sink.clone()).unwrap();
        for i in 0..3 {
            tx.emit(DiagnosticEvent::new("here", format!("m{i}"), serde_json::Value::Null));
        }
        for _ in 0..50 {
            if sink.seen.lock().unwrap().len() == 3 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(sink.seen.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn full_channel_drops_instead_of_blocking() {
        let cfg = DiagnosticsConfig {
            enabled: true,
            channel_capacity: 1,
            ..DiagnosticsConfig::default()
        };
        let tx = start_diagnostics(&cfg, Arc::new(Stuck)).unwrap();
        for i in 0..5 {
            tx.emit(DiagnosticEvent::new("here", format!("m{i}"), serde_json::Value::Null));
        }
        assert!(tx.dropped_count() >= 3);
    }

    #[tokio::test]
    async fn closed_worker_counts_drops() {
        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        let tx = DiagnosticsTx {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
        };
        tx.emit(DiagnosticEvent::new("here", "late", serde_json::Value::Null));
        assert_eq!(tx.dropped_count(), 1);
    }
}
