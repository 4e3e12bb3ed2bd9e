//! OPD claims review console: a five-panel terminal interface over the
//! adjudication backend.
//!
//! Panels:
//! 1. Overview: dashboard statistics and status distribution
//! 2. New Claim: upload a bill and view the adjudication
//! 3. Claim History: searchable list with a detail overlay
//! 4. Policy Rules: the active ruleset
//! 5. Help: keyboard shortcuts

mod app;
mod input;
mod theme;
mod ui;
mod worker;

use std::fs::OpenOptions;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use opd_core::api::HttpClaimsApi;
use opd_core::config::ConsoleConfig;
use opd_core::document::PreviewPool;

use crate::app::{AppState, ErrorCategory};
use crate::worker::{WorkerCommand, WorkerResponse};

const SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

#[derive(Debug, Parser)]
#[command(name = "opd-console", version, about = "Review console for OPD claim adjudication")]
struct Cli {
    /// Config file (defaults to <config dir>/opd-console/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend base URL, overriding the config file.
    #[arg(long)]
    base_url: Option<String>,

    /// Log file, overriding the config file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(ConsoleConfig::default_path);
    let mut config = ConsoleConfig::load(&config_path)?;
    if let Some(url) = cli.base_url.as_deref() {
        config = config.with_base_url(url)?;
    }
    if let Some(log_file) = cli.log_file {
        config.log_file = log_file;
    }

    init_logging(&config.log_file, &config.log_level)?;
    info!(
        config = %config_path.display(),
        base_url = %config.base_url,
        "starting opd-console"
    );

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let api = HttpClaimsApi::new(&config.base_url, config.request_timeout())
        .context("building HTTP client")?;

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let worker_handle =
        worker::spawn_worker(Arc::new(api), cmd_rx, resp_tx).context("spawning worker thread")?;

    let mut app = AppState::new(config, PreviewPool::new(), cmd_tx.clone(), resp_rx);
    app.start();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Cancel everything queued, then give the worker a moment to exit. A
    // request already on the wire is left to finish on a detached thread.
    app.shutdown();
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let deadline = Instant::now() + SHUTDOWN_GRACE;
    while !worker_handle.is_finished() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(10));
    }
    if worker_handle.is_finished() {
        let _ = worker_handle.join();
    } else {
        info!("worker still waiting on the backend; detaching");
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("opd-console stopped");
    result
}

/// Logs go to a file; the terminal belongs to the UI.
fn init_logging(path: &Path, level: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            handle_worker_response(app, resp);
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}

fn handle_worker_response(app: &mut AppState, resp: WorkerResponse) {
    match resp {
        WorkerResponse::Submitted { token, result } => {
            let outcome = result
                .as_ref()
                .map(|claim| claim.status.to_string())
                .map_err(Clone::clone);
            if !app.upload.complete(&token, result) {
                return;
            }
            app.detail_scroll.reset();
            match outcome {
                Ok(status) => app.set_status(format!("Claim processed: {status}")),
                Err(err) => {
                    app.push_api_error(&err, "submit claim");
                    app.surface_failure_notice();
                }
            }
        }
        WorkerResponse::Claims { token, result } => {
            let error = result.as_ref().err().cloned();
            if app.history.on_loaded(&token, result) {
                if let Some(err) = error {
                    app.push_api_error(&err, "load claims");
                }
            }
        }
        WorkerResponse::Stats { token, result } => {
            let error = result.as_ref().err().cloned();
            if app.dashboard.on_loaded(&token, result) {
                if let Some(err) = error {
                    app.push_api_error(&err, "load dashboard statistics");
                }
            }
        }
        WorkerResponse::DocumentSaved { token, result } => {
            if !app.download.owns(&token) {
                debug!("discarding stale download result");
                return;
            }
            match result {
                Ok(path) => app.set_status(format!("Saved to {}", path.display())),
                Err(e) => app.push_error(ErrorCategory::File, e, "download document".into()),
            }
        }
    }
}
