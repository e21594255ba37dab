use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

/// Blocking crossterm reader on its own thread, forwarding into the async loop.
pub struct InputReader {
    running: Arc<AtomicBool>,
    handle: Option<std::thread::JoinHandle<()>>,
}

impl InputReader {
    pub fn start() -> (Self, mpsc::UnboundedReceiver<InputEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let running = Arc::new(AtomicBool::new(true));
        let thread_running = Arc::clone(&running);
        let handle = std::thread::spawn(move || {
            while thread_running.load(Ordering::SeqCst) {
                if !event::poll(Duration::from_millis(100)).unwrap_or(false) {
                    continue;
                }
                let forwarded = match event::read() {
                    // Only presses; release and repeat would double keystrokes on Windows.
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        Some(InputEvent::Key(key))
                    }
                    Ok(Event::Mouse(mouse)) if wanted_mouse(&mouse) => {
                        tracing::trace!(target: "kanban.tui", mouse = ?mouse.kind, col = mouse.column, row = mouse.row);
                        Some(InputEvent::Mouse(mouse))
                    }
                    Ok(Event::Resize(w, h)) => Some(InputEvent::Resize(w, h)),
                    Ok(_) => None,
                    Err(e) => {
                        tracing::debug!(target: "kanban.tui", error = %e, "input read failed");
                        None
                    }
                };
                if let Some(ev) = forwarded {
                    if tx.send(ev).is_err() {
                        break;
                    }
                }
            }
        });
        (
            Self {
                running,
                handle: Some(handle),
            },
            rx,
        )
    }

    pub fn stop(mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Plain pointer motion arrives on every cell crossed and is never acted on.
fn wanted_mouse(mouse: &MouseEvent) -> bool {
    !matches!(mouse.kind, MouseEventKind::Moved)
}
