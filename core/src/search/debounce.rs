use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Duration, Instant};

/// Holds keystrokes back until the input has been quiet for `quiet`.
///
/// Only the last value of a burst is published. Clearing the input publishes
/// the empty term at once and cancels anything pending. Dropping the
/// debouncer stops the worker without flushing.
pub struct SearchDebouncer {
    input: mpsc::UnboundedSender<String>,
    worker: JoinHandle<()>,
}

impl SearchDebouncer {
    /// Must be called inside a tokio runtime.
    pub fn new(quiet: Duration) -> (Self, watch::Receiver<String>) {
        let (input, rx) = mpsc::unbounded_channel();
        let (out, out_rx) = watch::channel(String::new());
        let worker = tokio::spawn(run(rx, out, quiet));
        (Self { input, worker }, out_rx)
    }

    /// Feed the raw text after a keystroke.
    pub fn push(&self, raw: impl Into<String>) {
        let _ = self.input.send(raw.into());
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

async fn run(mut rx: mpsc::UnboundedReceiver<String>, out: watch::Sender<String>, quiet: Duration) {
    let mut pending: Option<(String, Instant)> = None;
    loop {
        let deadline = pending.as_ref().map(|(_, at)| *at);
        tokio::select! {
            msg = rx.recv() => match msg {
                None => break,
                Some(value) if value.is_empty() => {
                    pending = None;
                    publish(&out, value);
                }
                Some(value) => pending = Some((value, Instant::now() + quiet)),
            },
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if let Some((value, _)) = pending.take() {
                    publish(&out, value);
                }
            }
        }
    }
}

fn publish(out: &watch::Sender<String>, value: String) {
    let changed = out.send_if_modified(|current| {
        if *current == value {
            return false;
        }
        *current = value;
        true
    });
    if changed {
        tracing::debug!(target: "kanban.search", stage = "search.propagate", term = %out.borrow().as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, timeout};

    const QUIET: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn burst_propagates_only_last_value_after_quiet_period() {
        let (debouncer, mut rx) = SearchDebouncer::new(QUIET);
        let start = Instant::now();
        for term in ["m", "mi", "mil"] {
            debouncer.push(term);
            sleep(Duration::from_millis(50)).await;
        }
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), "mil");
        // Last keystroke at t=100ms.
        assert!(start.elapsed() >= Duration::from_millis(400));

        assert!(timeout(Duration::from_secs(1), rx.changed()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn clear_propagates_immediately_and_cancels_pending() {
        let (debouncer, mut rx) = SearchDebouncer::new(QUIET);
        debouncer.push("milk");
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), "milk");

        debouncer.push("milkshake");
        sleep(Duration::from_millis(10)).await;
        let cleared_at = Instant::now();
        debouncer.push("");
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), "");
        assert!(cleared_at.elapsed() < QUIET);

        assert!(timeout(Duration::from_secs(1), rx.changed()).await.is_err());
        assert_eq!(*rx.borrow(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn drop_does_not_flush_pending_value() {
        let (debouncer, mut rx) = SearchDebouncer::new(QUIET);
        debouncer.push("milk");
        sleep(Duration::from_millis(10)).await;
        drop(debouncer);
        // Sender side is gone once the worker is aborted.
        assert!(rx.changed().await.is_err());
        assert_eq!(*rx.borrow(), "");
    }
}
