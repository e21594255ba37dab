use std::io;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

pub type BoardTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Four columns of readable cards need at least this much room.
const MIN_WIDTH: u16 = 80;
const MIN_HEIGHT: u16 = 24;

pub fn check_tui_support() -> Result<(), String> {
    if !atty::is(atty::Stream::Stdout) {
        return Err("stdout is not a terminal; use a subcommand such as `kanban list`".to_string());
    }
    if !cfg!(windows) && std::env::var("TERM").is_err() {
        return Err("TERM environment variable not set".to_string());
    }
    let (width, height) = terminal::size().map_err(|e| format!("terminal size failed: {e}"))?;
    if width < MIN_WIDTH || height < MIN_HEIGHT {
        return Err(format!(
            "terminal too small ({}x{}), need at least {}x{}",
            width, height, MIN_WIDTH, MIN_HEIGHT
        ));
    }
    Ok(())
}

/// Raw mode, alternate screen and mouse capture (press, drag, release, wheel).
pub fn setup_terminal() -> Result<BoardTerminal, String> {
    enable_raw_mode().map_err(|e| format!("enable raw mode failed: {e}"))?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, terminal::EnterAlternateScreen, EnableMouseCapture) {
        let _ = disable_raw_mode();
        return Err(format!("enter alternate screen failed: {e}"));
    }
    let backend = CrosstermBackend::new(stdout);
    let mut term = Terminal::new(backend).map_err(|e| e.to_string())?;
    term.hide_cursor().map_err(|e| e.to_string())?;
    Ok(term)
}

pub fn restore_terminal(terminal: &mut BoardTerminal) {
    let _ = disable_raw_mode();
    let _ = execute!(
        terminal.backend_mut(),
        terminal::LeaveAlternateScreen,
        DisableMouseCapture
    );
    let _ = terminal.show_cursor();
}
