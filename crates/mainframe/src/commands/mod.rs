//! Command handlers, one module per top-level command.

pub mod config_cmd;
pub mod status;
pub mod system;
pub mod theme;
pub mod widgets;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use clap::{CommandFactory, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use mainframe_config::{Config, FilePreferenceStore};
use mainframe_core::{Dashboard, Launcher, NotificationLevel, PreferenceStore, SystemLauncher};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

/// Route a parsed command to its handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::System => system::handle(global).await,
        Command::Widgets(args) => widgets::handle(args, global).await,
        Command::Status => status::handle(global).await,
        Command::Theme(args) => theme::handle(&args, global),
        Command::Config(args) => config_cmd::handle(args, global),
        Command::Completions(args) => {
            let mut cmd = Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "mainframe", &mut std::io::stdout());
            Ok(())
        }
    }
}

// ── Shared helpers ───────────────────────────────────────────────────

/// Config file (or `--config`) + environment, then CLI flag overrides.
pub fn resolve_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = match global.config {
        Some(ref path) => mainframe_config::load_config_from(path)?,
        None => mainframe_config::load_config()?,
    };
    if let Some(ref url) = global.url {
        cfg.url.clone_from(url);
    }
    if global.insecure {
        cfg.insecure = true;
    }
    if global.timeout.is_some() {
        cfg.timeout = global.timeout;
    }
    Ok(cfg)
}

/// Fill `--output` / `--color` from the config's `[defaults]` when the
/// flags were not given.
///
/// An unreadable config is skipped here; commands that need it report the
/// error themselves.
pub fn apply_config_defaults(global: &mut GlobalOpts) -> Result<(), CliError> {
    if global.output.is_some() && global.color.is_some() {
        return Ok(());
    }
    let cfg = match resolve_config(global) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::debug!(error = %e, "config defaults unavailable");
            return Ok(());
        }
    };
    if global.output.is_none() {
        global.output = Some(parse_default("defaults.output", &cfg.defaults.output)?);
    }
    if global.color.is_none() {
        global.color = Some(parse_default("defaults.color", &cfg.defaults.color)?);
    }
    Ok(())
}

fn parse_default<T: ValueEnum>(field: &str, value: &str) -> Result<T, CliError> {
    T::from_str(value, true).map_err(|_| {
        let expected: Vec<String> = T::value_variants()
            .iter()
            .filter_map(|v| v.to_possible_value().map(|p| p.get_name().to_owned()))
            .collect();
        CliError::Validation {
            field: field.into(),
            reason: format!("unknown value '{value}', expected one of: {}", expected.join(", ")),
        }
    })
}

/// A dashboard handle that opens redirects with the platform browser.
pub fn connect(global: &GlobalOpts) -> Result<Dashboard, CliError> {
    connect_with(global, Arc::new(SystemLauncher))
}

pub fn connect_with(
    global: &GlobalOpts,
    launcher: Arc<dyn Launcher>,
) -> Result<Dashboard, CliError> {
    let cfg = resolve_config(global)?;
    let dashboard_config = mainframe_config::to_dashboard_config(&cfg)?;
    let preferences: Arc<dyn PreferenceStore> = Arc::new(FilePreferenceStore::default_location());
    tracing::debug!(url = %dashboard_config.base_url, "connecting");
    Ok(Dashboard::new(dashboard_config, preferences, launcher)?)
}

/// Print queued notifications to stderr. Errors are skipped; they come back
/// as the command's `Err` and are rendered by miette.
pub async fn report_notifications(dashboard: &Dashboard, quiet: bool) {
    let Some(mut rx) = dashboard.take_notifications().await else {
        return;
    };
    while let Ok(note) = rx.try_recv() {
        if quiet {
            continue;
        }
        match note.level {
            NotificationLevel::Error => {}
            NotificationLevel::Info => eprintln!("  {}", note.message),
            NotificationLevel::Success => eprintln!("✓ {}", note.message),
            NotificationLevel::Warning => eprintln!("! {}", note.message),
        }
    }
}

/// Run `fut` behind a stderr spinner. Hidden when stderr isn't a terminal.
pub async fn with_spinner<F, T>(message: String, quiet: bool, fut: F) -> T
where
    F: Future<Output = T>,
{
    if quiet {
        return fut.await;
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    let out = fut.await;
    spinner.finish_and_clear();
    out
}

pub fn prompt_err(err: impl std::fmt::Display) -> CliError {
    CliError::Prompt(err.to_string())
}
