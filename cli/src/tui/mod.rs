mod app;
mod events;
mod layout;
mod terminal;
mod ui;

use std::time::Duration;

use kanban_core::api::{AppConfig, Board, CliError, TaskOps};
use tokio::sync::mpsc;

pub use app::{AppMsg, BoardApp, FormField, Mode};
pub use layout::{BoardLayout, CellScale, Hit};
pub use terminal::{check_tui_support, restore_terminal, setup_terminal, BoardTerminal};

/// Full-screen board until the user quits. Returns the process exit code.
pub async fn run_board(cfg: &AppConfig, ops: TaskOps) -> Result<i32, CliError> {
    let board = Board::new(ops, &cfg.board);
    let (msg_tx, msg_rx) = mpsc::unbounded_channel();
    let mut app = BoardApp::new(cfg.tui.clone(), board, msg_tx);

    let mut terminal = setup_terminal().map_err(CliError::Command)?;
    tracing::info!(target: "kanban.tui", base_url = %cfg.api.base_url, "board opened");
    let result = run_board_on_terminal(&mut terminal, &mut app, msg_rx).await;
    restore_terminal(&mut terminal);
    tracing::info!(target: "kanban.tui", "board closed");
    result
}

pub async fn run_board_on_terminal(
    terminal: &mut BoardTerminal,
    app: &mut BoardApp,
    mut msg_rx: mpsc::UnboundedReceiver<AppMsg>,
) -> Result<i32, CliError> {
    let (input_reader, mut input_rx) = events::InputReader::start();
    let mut cache_rx = app.board.ops().cache().events();
    let mut tick =
        tokio::time::interval(Duration::from_millis(app.config.update_interval_ms.max(16)));

    let result = loop {
        let mut exit_requested = false;
        tokio::select! {
            Some(input) = input_rx.recv() => match input {
                events::InputEvent::Key(key) => exit_requested = app.handle_key(key),
                events::InputEvent::Mouse(mouse) => app.handle_mouse(mouse),
                events::InputEvent::Resize(..) => {}
            },
            Some(msg) = msg_rx.recv() => app.handle_msg(msg),
            Ok(event) = cache_rx.recv() => {
                tracing::trace!(target: "kanban.tui", event = ?event, "cache changed");
            }
            _ = tick.tick() => {}
        }
        if exit_requested {
            break Ok(0);
        }

        app.board.sync_search();
        if let Err(e) = terminal.draw(|f| {
            app.refresh(f.area());
            ui::draw(f, app);
        }) {
            break Err(CliError::Io(e));
        }
    };

    input_reader.stop();
    result
}
