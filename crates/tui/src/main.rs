use anyhow::{Context, Result};
use clap::Parser;
use sessionlens_tui::{RunOptions, log_dir, resolve_config_dir};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "SESSIONLENS_LOG";

#[derive(Parser)]
#[command(
    name = "sessionlens",
    version,
    about = "Browse recorded agent sessions in the terminal"
)]
struct Cli {
    /// Server URL (overrides the config file)
    #[arg(long)]
    server: Option<String>,

    /// Bearer token for the server
    #[arg(long)]
    api_key: Option<String>,

    /// Directory holding sessionlens.toml and logs
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Open this session right away
    #[arg(long)]
    session: Option<String>,

    /// Show the newest messages first
    #[arg(long)]
    newest_first: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_dir = resolve_config_dir(cli.config_dir.as_deref())?;
    // The guard flushes buffered log lines on drop; keep it for the whole run.
    let _guard = init_tracing(&log_dir(&config_dir))?;

    sessionlens_tui::run(RunOptions {
        config_dir: Some(config_dir),
        server: cli.server,
        api_key: cli.api_key,
        session: cli.session,
        newest_first: cli.newest_first,
    })
}

/// Log to `<dir>/sessionlens.log`; the terminal belongs to the UI.
fn init_tracing(dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("sessionlens=info"));
    let (writer, guard) = tracing_appender::non_blocking(rolling::never(dir, "sessionlens.log"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    tracing::debug!(path = %dir.display(), "tracing initialized");
    Ok(guard)
}
