use clap::Parser;
use kanban_cli::commands::{cli, tasks};
use kanban_cli::tui;
use kanban_core::api::{AppConfig, CliError, LoggingConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            e.exit_code()
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    let mut args = cli::Args::parse();
    let mut cfg = kanban_core::api::load_default().map_err(|e| CliError::Config(e.to_string()))?;
    if let Some(url) = args.api_url.take().filter(|s| !s.trim().is_empty()) {
        cfg.api.base_url = url.trim().to_string();
    }

    let cmd = args.command.take().unwrap_or(cli::Commands::Board);
    let full_screen = matches!(cmd, cli::Commands::Board);
    init_tracing(&cfg.logging, full_screen).map_err(CliError::Command)?;
    tracing::debug!(
        target: "kanban.cli",
        base_url = %cfg.api.base_url,
        page_size = cfg.board.page_size,
        "config loaded"
    );

    dispatch(cmd, cfg).await
}

async fn dispatch(cmd: cli::Commands, cfg: AppConfig) -> Result<i32, CliError> {
    let client = kanban_plugins::factory::build_task_client(&cfg).await?;
    let page_size = cfg.board.page_size;
    let ops = tasks::task_ops(client, &cfg);

    let out = match cmd {
        cli::Commands::Board => {
            tui::check_tui_support().map_err(CliError::Command)?;
            return tui::run_board(&cfg, ops).await;
        }
        cli::Commands::List(a) => tasks::list(ops.client(), &a, page_size).await?,
        cli::Commands::Add(a) => tasks::add(&ops, &a).await?,
        cli::Commands::Edit(a) => tasks::edit(&ops, &a, page_size).await?,
        cli::Commands::Move(a) => tasks::move_task(&ops, &a, page_size).await?,
        cli::Commands::Rm(a) => tasks::remove(&ops, &a, page_size).await?,
    };
    println!("{}", out.trim_end());
    Ok(0)
}

/// `full_screen` drops the console layer so log lines do not tear the board.
fn init_tracing(logging: &LoggingConfig, full_screen: bool) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(logging.level.clone()).map_err(|e| e.to_string())?,
    };

    let mut maybe_writer = None;

    if logging.file {
        let dir = match logging
            .directory
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(d) => std::path::PathBuf::from(d),
            None => std::env::temp_dir().join("kanban"),
        };

        std::fs::create_dir_all(&dir).map_err(|e| format!("create log dir failed: {e}"))?;
        let file_name = format!("kanban.{}.log", std::process::id());
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        maybe_writer = Some(non_blocking);
    }

    let console = logging.console && !full_screen;
    if !console && maybe_writer.is_none() {
        if full_screen {
            return Ok(());
        }
        return Err("logging disabled for both console and file".to_string());
    }

    let console_layer = console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    let file_layer = maybe_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
