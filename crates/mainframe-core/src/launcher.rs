// Opening redirect targets outside the dashboard.

use std::process::{Command, Stdio};
use std::sync::Mutex;

use tracing::info;

use crate::error::CoreError;

/// Opens a URL in a new browsing context.
pub trait Launcher: Send + Sync {
    fn open(&self, url: &str) -> Result<(), CoreError>;
}

/// Hands the URL to the platform's default opener.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn open(&self, url: &str) -> Result<(), CoreError> {
        info!(url, "opening redirect target");
        opener_command(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(drop)
            .map_err(|e| CoreError::Launch {
                url: url.to_owned(),
                reason: e.to_string(),
            })
    }
}

#[cfg(target_os = "macos")]
fn opener_command(url: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    cmd
}

#[cfg(target_os = "windows")]
fn opener_command(url: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", "", url]);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command(url: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    cmd
}

/// Records URLs instead of opening them (`--no-open`, tests).
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    opened: Mutex<Vec<String>>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// URLs "opened" so far, oldest first.
    pub fn opened(&self) -> Vec<String> {
        self.opened
            .lock()
            .map(|urls| urls.clone())
            .unwrap_or_default()
    }
}

impl Launcher for RecordingLauncher {
    fn open(&self, url: &str) -> Result<(), CoreError> {
        self.opened
            .lock()
            .map_err(|e| CoreError::Internal(e.to_string()))?
            .push(url.to_owned());
        Ok(())
    }
}
