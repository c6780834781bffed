//! Clap derive structures for the `mainframe` CLI.
//!
//! Kept free of crate-internal imports so `build.rs` can include it for
//! man page generation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// mainframe -- query and drive a mainframe status dashboard
#[derive(Debug, Parser)]
#[command(
    name = "mainframe",
    version,
    about = "Query and control a mainframe status dashboard from the command line",
    long_about = "Reads host metrics and the configured widget list from a mainframe\n\
        backend, runs actions and toggles, and manages the local theme preference.\n\n\
        Run `mainframe-tui` for the live dashboard.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend URL (overrides the config file)
    #[arg(long, short = 'u', env = "MAINFRAME_URL", global = true)]
    pub url: Option<String>,

    /// Path to an alternate config file
    #[arg(long, env = "MAINFRAME_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format [default: config `defaults.output`, else table]
    #[arg(long, short = 'o', env = "MAINFRAME_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: config `defaults.color`, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "MAINFRAME_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "MAINFRAME_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    pub fn output_format(&self) -> OutputFormat {
        self.output.unwrap_or(OutputFormat::Table)
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color.unwrap_or(ColorMode::Auto)
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show current CPU and RAM utilization
    #[command(alias = "sys")]
    System,

    /// List, inspect and invoke dashboard widgets
    #[command(alias = "w")]
    Widgets(WidgetsArgs),

    /// Probe every widget that declares a status check
    #[command(alias = "st")]
    Status,

    /// Show or change the dashboard theme
    Theme(ThemeArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Widgets ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WidgetsArgs {
    #[command(subcommand)]
    pub command: WidgetsCommand,
}

#[derive(Debug, Subcommand)]
pub enum WidgetsCommand {
    /// List widgets in backend order
    #[command(alias = "ls")]
    List,

    /// Show one widget
    Get {
        /// Widget id
        id: String,
    },

    /// Invoke a widget (action, toggle flip or redirect)
    Run {
        /// Widget id
        id: String,

        /// Print the redirect target instead of opening a browser
        #[arg(long)]
        no_open: bool,
    },

    /// Set a toggle widget's state
    Toggle {
        /// Widget id
        id: String,

        /// Desired state (flips the current state when omitted)
        state: Option<SwitchState>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SwitchState {
    On,
    Off,
}

// ── Theme ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ThemeArgs {
    #[command(subcommand)]
    pub command: ThemeCommand,
}

#[derive(Debug, Subcommand)]
pub enum ThemeCommand {
    /// Print the stored theme
    Get,

    /// Store a theme by name
    Set {
        /// Theme name (see `mainframe theme list`)
        name: String,
    },

    /// Advance to the next theme in the cycle
    Next,

    /// List available themes
    List,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Show the resolved configuration
    Show,

    /// Print config, state and log file paths
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
