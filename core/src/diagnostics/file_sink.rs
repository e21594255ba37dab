use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::{DiagnosticEvent, DiagnosticSink};

type BoxWriter = Box<dyn tokio::io::AsyncWrite + Unpin + Send>;

/// Appends events as JSON lines to a file, or to stdout for `stdout:`.
pub struct JsonlFileSink {
    path: String,
    writer: Mutex<BoxWriter>,
}

impl JsonlFileSink {
    pub async fn open(path: &str) -> std::io::Result<Self> {
        let writer: BoxWriter = if path == "stdout:" {
            Box::new(tokio::io::stdout())
        } else {
            let file = tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .await?;
            Box::new(file)
        };
        Ok(Self {
            path: path.to_string(),
            writer: Mutex::new(writer),
        })
    }
}

#[async_trait]
impl DiagnosticSink for JsonlFileSink {
    fn name(&self) -> &str {
        &self.path
    }

    async fn deliver(&self, event: &DiagnosticEvent) -> anyhow::Result<()> {
        let mut line = serde_json::to_string(event)?;
        line.push('\n');
        let mut writer = self.writer.lock().await;
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }
}
