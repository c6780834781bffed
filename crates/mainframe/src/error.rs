//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use mainframe_config::ConfigError;
use mainframe_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the dashboard backend at {url}")]
    #[diagnostic(
        code(mainframe::connection_failed),
        help(
            "{reason}\n\
             Check that the backend is running, or point at it with --url.\n\
             Self-signed certificates need --insecure (-k)."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(mainframe::timeout),
        help("Raise the limit with --timeout or check the backend's responsiveness.")
    )]
    Timeout,

    // ── Widgets ──────────────────────────────────────────────────────
    #[error("Widget '{id}' not found")]
    #[diagnostic(
        code(mainframe::not_found),
        help("Run: mainframe widgets list to see available widgets")
    )]
    NotFound { id: String },

    #[error("No endpoint configured for widget '{label}'")]
    #[diagnostic(
        code(mainframe::missing_endpoint),
        help("The backend's widget definition has no endpoint to call.")
    )]
    MissingEndpoint { label: String },

    #[error("Widget '{label}' cannot be invoked")]
    #[diagnostic(
        code(mainframe::not_invocable),
        help("Stat widgets only display a value.")
    )]
    NotInvocable { label: String },

    #[error("Widget '{id}' is a {actual} widget, not a {expected}")]
    #[diagnostic(code(mainframe::wrong_kind))]
    WrongKind {
        id: String,
        expected: String,
        actual: String,
    },

    #[error("Could not open {url}")]
    #[diagnostic(code(mainframe::launch), help("{reason}\nUse --no-open to print the URL instead."))]
    Launch { url: String, reason: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Backend error: {message}")]
    #[diagnostic(code(mainframe::api_error))]
    Api { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(mainframe::validation))]
    Validation { field: String, reason: String },

    // ── Configuration & local state ──────────────────────────────────
    #[error("Configuration could not be loaded")]
    #[diagnostic(
        code(mainframe::config),
        help("{detail}\nInspect it with: mainframe config show")
    )]
    Config { detail: String },

    #[error("Could not update the theme preference: {message}")]
    #[diagnostic(code(mainframe::preference))]
    Preference { message: String },

    #[error("Prompt failed: {0}")]
    #[diagnostic(code(mainframe::prompt))]
    Prompt(String),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render output: {0}")]
    #[diagnostic(code(mainframe::render))]
    Render(String),

    #[error("Internal error: {0}")]
    #[diagnostic(code(mainframe::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::WrongKind { .. } | Self::NotInvocable { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout => Self::Timeout,
            CoreError::WidgetNotFound { id } => Self::NotFound { id },
            CoreError::MissingEndpoint { label, .. } => Self::MissingEndpoint { label },
            CoreError::NotInvocable { label, .. } => Self::NotInvocable { label },
            CoreError::Launch { url, reason } => Self::Launch { url, reason },
            CoreError::Api { message, .. } => Self::Api { message },
            CoreError::Preference { message } => Self::Preference { message },
            CoreError::Config { message } => Self::Config { detail: message },
            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config {
                detail: other.to_string(),
            },
        }
    }
}
