mod app;
mod async_ops;
mod config;
mod live;
mod theme;
mod ui;
mod views;

#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use app::App;
use crossterm::{
    ExecutableCommand,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use sessionlens_api_client::{ApiClient, SessionBackend};
use std::io::stdout;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub use config::{CONFIG_DIR_ENV, log_dir, resolve_config_dir};

/// Disables mouse capture (terminal-native text selection keeps working).
pub const NO_MOUSE_ENV: &str = "SESSIONLENS_NO_MOUSE";

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config_dir: Option<PathBuf>,
    /// Server URL, overriding the config file.
    pub server: Option<String>,
    pub api_key: Option<String>,
    /// Session to open right after startup.
    pub session: Option<String>,
    pub newest_first: bool,
}

/// Launch the viewer.
pub fn run(options: RunOptions) -> Result<()> {
    let config_dir = config::resolve_config_dir(options.config_dir.as_deref())?;
    let mut viewer_config = config::load_config(&config_dir);
    if !config_dir.join(config::CONFIG_FILE_NAME).exists() {
        // Leave an editable copy of the defaults behind.
        if let Err(err) = config::save_config(&config_dir, &viewer_config) {
            warn!("{err:#}");
        }
    }
    config::apply_overrides(&mut viewer_config, &options);

    let mut client = ApiClient::new(
        &viewer_config.server.url,
        Duration::from_secs(viewer_config.server.timeout_secs.max(1)),
    )
    .context("Failed to build API client")?;
    if !viewer_config.server.api_key.is_empty() {
        client.set_auth(viewer_config.server.api_key.clone());
    }

    let mut app = App::new(&viewer_config);
    app.startup(options.session.clone());
    info!(server = %viewer_config.server.url, "starting viewer");

    let frame_interval = Duration::from_millis(viewer_config.viewer.frame_interval_ms.max(1));
    let mouse_capture_enabled = !env_flag_enabled(NO_MOUSE_ENV);
    let rt = tokio::runtime::Runtime::new()?;

    // Terminal setup
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    if mouse_capture_enabled {
        stdout().execute(EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(
        &mut terminal,
        &mut app,
        &client,
        &rt,
        frame_interval,
        mouse_capture_enabled,
    );

    // Restore terminal
    disable_raw_mode()?;
    if mouse_capture_enabled {
        stdout().execute(DisableMouseCapture)?;
    }
    stdout().execute(LeaveAlternateScreen)?;

    info!("viewer closed");
    result
}

fn event_loop<B: SessionBackend>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    backend: &B,
    rt: &tokio::runtime::Runtime,
    frame_interval: Duration,
    mouse_capture_enabled: bool,
) -> Result<()> {
    loop {
        // ── Handle pending async commands ─────────────────────────────
        while let Some(cmd) = app.pending_commands.pop_front() {
            debug!(?cmd, "executing");
            let result = rt.block_on(async_ops::execute(cmd, backend));
            app.apply_command_result(result);
        }

        app.tick(Instant::now());
        terminal.draw(|frame| ui::render(frame, app))?;

        // Wait up to one frame for input, then drain whatever else queued up
        // so a burst of wheel events lands in a single frame.
        let mut timeout = frame_interval;
        while event::poll(timeout)? {
            timeout = Duration::ZERO;
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if app.handle_key(key.code) {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => {
                    if !mouse_capture_enabled {
                        continue;
                    }
                    if app.handle_mouse(mouse) {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
    }
}

fn env_flag_enabled(name: &str) -> bool {
    flag_value_enabled(std::env::var(name).ok().as_deref())
}

fn flag_value_enabled(value: Option<&str>) -> bool {
    value
        .map(|value| {
            let normalized = value.trim().to_ascii_lowercase();
            matches!(normalized.as_str(), "1" | "true" | "yes" | "on")
        })
        .unwrap_or(false)
}
