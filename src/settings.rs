//! Persistent editor preferences
//!
//! Stored as JSON under the user config directory. Missing fields take
//! their defaults, and an unreadable file falls back to defaults entirely.

use crate::constants::{
    PREVIEW_DEBOUNCE_MS, PREVIEW_MAX_COLUMNS, PREVIEW_MAX_LINES, PREVIEW_MAX_ROWS,
    SEARCH_DEBOUNCE_MS,
};
use crate::data::DataResult;
use crate::types::{DelimiterSelector, EncodingSelector, ImportSettings, TimeUnit};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "welltest-editor";
const SETTINGS_FILE: &str = "settings.json";

/// Defaults applied to new imports and editor timing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub encoding: EncodingSelector,
    pub delimiter: DelimiterSelector,
    pub start_row: usize,
    pub header_row: usize,
    pub use_header: bool,
    pub time_unit: TimeUnit,
    pub preview_debounce_ms: u64,
    pub search_debounce_ms: u64,
    pub preview_max_lines: usize,
    pub preview_max_rows: usize,
    pub preview_max_columns: usize,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            encoding: EncodingSelector::Auto,
            delimiter: DelimiterSelector::Auto,
            start_row: 1,
            header_row: 1,
            use_header: true,
            time_unit: TimeUnit::Hours,
            preview_debounce_ms: PREVIEW_DEBOUNCE_MS,
            search_debounce_ms: SEARCH_DEBOUNCE_MS,
            preview_max_lines: PREVIEW_MAX_LINES,
            preview_max_rows: PREVIEW_MAX_ROWS,
            preview_max_columns: PREVIEW_MAX_COLUMNS,
        }
    }
}

impl EditorSettings {
    /// Import settings for `path` seeded from these preferences
    pub fn import_settings(&self, path: impl Into<PathBuf>) -> ImportSettings {
        ImportSettings {
            encoding: self.encoding,
            delimiter: self.delimiter,
            start_row: self.start_row,
            header_row: self.header_row,
            use_header: self.use_header,
            ..ImportSettings::for_path(path)
        }
    }

    /// Load from `path`; a missing or malformed file yields defaults
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No settings file; using defaults");
                return Self::default();
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read settings");
                return Self::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Malformed settings; using defaults");
                Self::default()
            }
        }
    }

    /// Load from [`default_settings_path`], or defaults when there is none
    pub fn load_default() -> Self {
        default_settings_path()
            .map(|path| Self::load(&path))
            .unwrap_or_default()
    }

    /// Write as pretty JSON, creating the parent directory
    pub fn save(&self, path: &Path) -> DataResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        tracing::info!(path = %path.display(), "Saved settings");
        Ok(())
    }
}

/// `<config dir>/welltest-editor/settings.json`, if the platform has one
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
}
