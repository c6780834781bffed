// ── File-backed client state ──
//
// A flat TOML table of string values (currently just `theme`). The file is
// re-read on every access, so the CLI and TUI see each other's changes.

use std::path::{Path, PathBuf};

use tracing::debug;

use mainframe_core::{CoreError, PreferenceStore};

#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform state path.
    pub fn default_location() -> Self {
        Self::new(crate::state_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<toml::Table, CoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(toml::Table::new()),
            Err(e) => return Err(preference_error(&e)),
        };
        toml::from_str::<toml::Table>(&raw).map_err(|e| preference_error(&e))
    }
}

fn preference_error(err: &impl std::fmt::Display) -> CoreError {
    CoreError::Preference {
        message: err.to_string(),
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let table = self.read_table()?;
        Ok(table
            .get(key)
            .and_then(toml::Value::as_str)
            .map(str::to_owned))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        // A corrupt file is replaced rather than blocking the write.
        let mut table = self.read_table().unwrap_or_else(|e| {
            debug!(error = %e, path = %self.path.display(), "discarding unreadable state file");
            toml::Table::new()
        });
        table.insert(key.to_owned(), toml::Value::String(value.to_owned()));

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| preference_error(&e))?;
        }
        let rendered = toml::to_string_pretty(&table).map_err(|e| preference_error(&e))?;
        std::fs::write(&self.path, rendered).map_err(|e| preference_error(&e))
    }
}
