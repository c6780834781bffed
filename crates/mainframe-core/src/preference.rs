// ── Client-side preferences ──
//
// A narrow key/value interface for the one persisted setting (the theme).
// Read and write failures never escape `load_theme` / `save_theme`.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use crate::error::CoreError;
use crate::model::Theme;

/// Key the selected theme is stored under.
pub const THEME_KEY: &str = "theme";

pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;
}

/// Read the persisted theme, falling back to the default on a missing,
/// unreadable or unrecognized value.
pub fn load_theme(store: &dyn PreferenceStore) -> Theme {
    match store.get(THEME_KEY) {
        Ok(Some(raw)) => Theme::from_stored(&raw).unwrap_or_else(|| {
            debug!(value = %raw, "ignoring unrecognized stored theme");
            Theme::default()
        }),
        Ok(None) => Theme::default(),
        Err(e) => {
            debug!(error = %e, "theme preference unreadable");
            Theme::default()
        }
    }
}

/// Persist the theme. Errors are logged and dropped.
pub fn save_theme(store: &dyn PreferenceStore, theme: Theme) {
    if let Err(e) = store.set(THEME_KEY, theme.as_ref()) {
        debug!(error = %e, "failed to persist theme preference");
    }
}

/// In-process store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let values = self.values.lock().map_err(|e| CoreError::Preference {
            message: e.to_string(),
        })?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.values
            .lock()
            .map_err(|e| CoreError::Preference {
                message: e.to_string(),
            })?
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
