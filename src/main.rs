//! userdeck binary entry point.
//!
//! Parses flags, sets up file logging, initializes the terminal in raw
//! mode, runs the TUI event loop and restores the terminal state on exit.
//!
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use crossterm::event::{DisableFocusChange, EnableFocusChange};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::{EnvFilter, fmt};

use userdeck::api::HttpUserSource;
use userdeck::app::{self, AppState};
use userdeck::cli::Args;

/// Log to a file; the terminal belongs to the TUI.
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("userdeck=info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("init logging: {e}"))
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableFocusChange
    )
    .ok();
    terminal.show_cursor().ok();
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let args = Args::parse();
    let config_dir = args
        .resolve_config_dir()
        .map_err(|e| anyhow!("config dir: {e}"))?;
    init_logging(&args.log_path(&config_dir))?;

    let source = HttpUserSource::new(&args.endpoint, args.timeout())
        .context("build http client")?;
    tracing::info!(url = source.url(), "starting");
    let mut state = AppState::new(args.app_config(config_dir), Arc::new(source));

    let mut terminal = init_terminal().context("init terminal")?;
    let res = app::run(&mut terminal, &mut state);
    restore_terminal(&mut terminal);

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err:#}");
    }
    tracing::info!("exiting");
    Ok(())
}
