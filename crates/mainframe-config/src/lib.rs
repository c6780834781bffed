//! Shared configuration for the mainframe CLI and TUI.
//!
//! TOML config with environment overrides, platform paths, the file-backed
//! theme preference store, and translation to `mainframe_core::DashboardConfig`.
//! Both binaries depend on this crate.

mod state;

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use mainframe_core::{DashboardConfig, TlsVerification};

pub use state::FilePreferenceStore;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Backend root URL.
    #[serde(default = "default_url")]
    pub url: String,

    /// Prefix for API routes and relative widget endpoints.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Accept self-signed certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds. Unset means no explicit timeout.
    pub timeout: Option<u64>,

    #[serde(default)]
    pub polling: Polling,

    #[serde(default)]
    pub defaults: Defaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: default_url(),
            api_prefix: default_api_prefix(),
            insecure: false,
            ca_cert: None,
            timeout: None,
            polling: Polling::default(),
            defaults: Defaults::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Polling {
    #[serde(default = "default_interval_ms")]
    pub metrics_ms: u64,

    #[serde(default = "default_interval_ms")]
    pub status_ms: u64,
}

impl Default for Polling {
    fn default() -> Self {
        Self {
            metrics_ms: default_interval_ms(),
            status_ms: default_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_url() -> String {
    "http://localhost:5000".into()
}
fn default_api_prefix() -> String {
    "/api".into()
}
fn default_interval_ms() -> u64 {
    5000
}
fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "mainframe", "mainframe")
}

fn dirs_fallback(kind: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(kind);
    p.push("mainframe");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Where client-side state (the theme preference) is kept.
pub fn state_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share").join("state.toml"),
        |dirs| dirs.data_dir().join("state.toml"),
    )
}

/// Default TUI log file.
pub fn log_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".cache").join("mainframe-tui.log"),
        |dirs| dirs.cache_dir().join("mainframe-tui.log"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the config from `path` + environment.
///
/// Layers: built-in defaults, then the TOML file (if present), then
/// `MAINFRAME_*` variables (`__` separates nested keys, e.g.
/// `MAINFRAME_POLLING__METRICS_MS`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("MAINFRAME_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `DashboardConfig` from the loaded config.
pub fn to_dashboard_config(cfg: &Config) -> Result<DashboardConfig, ConfigError> {
    let base_url: url::Url = cfg.url.parse().map_err(|_| ConfigError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {}", cfg.url),
    })?;
    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "url".into(),
            reason: format!("expected http or https, got '{}'", base_url.scheme()),
        });
    }

    for (field, ms) in [
        ("polling.metrics_ms", cfg.polling.metrics_ms),
        ("polling.status_ms", cfg.polling.status_ms),
    ] {
        if ms == 0 {
            return Err(ConfigError::Validation {
                field: field.into(),
                reason: "interval must be greater than zero".into(),
            });
        }
    }

    let tls = if cfg.insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = cfg.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let mut dashboard = DashboardConfig::new(base_url);
    dashboard.api_prefix.clone_from(&cfg.api_prefix);
    dashboard.tls = tls;
    dashboard.timeout = cfg.timeout.map(Duration::from_secs);
    dashboard.metrics_interval = Duration::from_millis(cfg.polling.metrics_ms);
    dashboard.status_interval = Duration::from_millis(cfg.polling.status_ms);
    Ok(dashboard)
}
