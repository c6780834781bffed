//! `mainframe-tui`: full-screen status dashboard for a mainframe backend.
//!
//! Shows live CPU and RAM gauges, the backend-defined widget grid, and
//! online badges for widgets that declare a status check. The theme is
//! shared with the `mainframe` CLI through the state file.
//!
//! Logs go to a file (see `--log-file`) so they never draw over the UI.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screens;
mod theme;
mod tui;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use mainframe_config::FilePreferenceStore;
use mainframe_core::{Dashboard, PreferenceStore, SystemLauncher};

use crate::app::App;

/// Terminal dashboard for a mainframe status backend.
#[derive(Parser, Debug)]
#[command(name = "mainframe-tui", version, about)]
struct Cli {
    /// Backend URL (e.g., http://raspberrypi.local:3000)
    #[arg(short = 'u', long, env = "MAINFRAME_URL")]
    url: Option<String>,

    /// Path to config file
    #[arg(long, env = "MAINFRAME_CONFIG")]
    config: Option<PathBuf>,

    /// Accept self-signed TLS certificates
    #[arg(short = 'k', long, env = "MAINFRAME_INSECURE")]
    insecure: bool,

    /// Log file path
    #[arg(long, default_value_os_t = mainframe_config::log_path())]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. Hold the guard for the app's lifetime so buffered
/// lines are flushed on exit.
fn setup_tracing(cli: &Cli) -> Result<WorkerGuard> {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("mainframe_tui={log_level},mainframe_core={log_level}"))
    });

    let log_dir = cli
        .log_file
        .parent()
        .map_or_else(std::env::temp_dir, std::path::Path::to_path_buf);
    std::fs::create_dir_all(&log_dir)?;
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("mainframe-tui.log"));

    let file_appender = tracing_appender::rolling::never(&log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}

/// Config file + environment, then command-line overrides.
fn build_dashboard(cli: &Cli) -> Result<Dashboard> {
    let mut cfg = match cli.config {
        Some(ref path) => mainframe_config::load_config_from(path)?,
        None => mainframe_config::load_config()?,
    };
    if let Some(ref url) = cli.url {
        cfg.url.clone_from(url);
    }
    if cli.insecure {
        cfg.insecure = true;
    }

    let config = mainframe_config::to_dashboard_config(&cfg)?;
    let preferences: Arc<dyn PreferenceStore> = Arc::new(FilePreferenceStore::default_location());
    Ok(Dashboard::new(config, preferences, Arc::new(SystemLauncher))?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Before entering the terminal, so a panic restores it.
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli)?;

    let dashboard = build_dashboard(&cli)?;
    info!(url = %dashboard.config().base_url, "starting mainframe-tui");

    let mut app = App::new(dashboard);
    app.run().await?;

    Ok(())
}
