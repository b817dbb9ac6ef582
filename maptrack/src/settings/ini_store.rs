//! INI-file-backed settings store.
//!
//! Values live in the file's general section under their flat key names.
//! Writes go through to disk immediately; a write failure is logged and
//! the in-memory value kept, so a read-only disk degrades to session-only
//! settings rather than an error path in every caller.

use std::path::{Path, PathBuf};

use ini::Ini;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::warn;

use super::SettingsStore;

/// Settings file name under the config directory.
const SETTINGS_FILE: &str = "settings.ini";

/// Application directory under the platform config root.
const APP_DIR: &str = "maptrack";

/// Errors opening the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The file exists but could not be parsed.
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        /// Offending file.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: ini::ParseError,
    },

    /// The file could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Io {
        /// Offending file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// No platform config directory is available.
    #[error("no config directory available for settings")]
    NoConfigDir,
}

/// Persistent settings store backed by an INI file.
pub struct IniSettingsStore {
    path: PathBuf,
    doc: Mutex<Ini>,
}

impl IniSettingsStore {
    /// Open the store at `path`, starting empty when the file is absent.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let doc = match Ini::load_from_file(&path) {
            Ok(doc) => doc,
            Err(ini::Error::Io(source)) if source.kind() == std::io::ErrorKind::NotFound => {
                Ini::new()
            }
            Err(ini::Error::Io(source)) => {
                return Err(SettingsError::Io { path, source });
            }
            Err(ini::Error::Parse(source)) => {
                return Err(SettingsError::Parse { path, source });
            }
        };

        Ok(Self {
            path,
            doc: Mutex::new(doc),
        })
    }

    /// Open the store at the platform default path, creating the
    /// application directory when needed.
    pub fn open_default() -> Result<Self, SettingsError> {
        let dir = dirs::config_dir()
            .ok_or(SettingsError::NoConfigDir)?
            .join(APP_DIR);
        if let Err(source) = std::fs::create_dir_all(&dir) {
            return Err(SettingsError::Io { path: dir, source });
        }
        Self::open(dir.join(SETTINGS_FILE))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_through(&self, doc: &Ini) {
        if let Err(error) = doc.write_to_file(&self.path) {
            warn!(
                path = %self.path.display(),
                error = %error,
                "Failed to persist settings, keeping in-memory value"
            );
        }
    }
}

impl SettingsStore for IniSettingsStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.doc
            .lock()
            .get_from(None::<String>, key)
            .map(str::to_string)
    }

    fn set_string(&self, key: &str, value: &str) {
        let mut doc = self.doc.lock();
        doc.set_to(None::<String>, key.to_string(), value.to_string());
        self.write_through(&doc);
    }

    fn contains(&self, key: &str) -> bool {
        self.doc.lock().get_from(None::<String>, key).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = IniSettingsStore::open(dir.path().join("settings.ini")).expect("open");
        assert_eq!(store.get_string("anything"), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.ini");

        {
            let store = IniSettingsStore::open(&path).expect("open");
            store.set_string("current.map_style", "hybrid");
            store.set_integer("current.zoom_index", 3);
            store.set_bool("display.show_speed", true);
        }

        let store = IniSettingsStore::open(&path).expect("reopen");
        assert_eq!(
            store.get_string("current.map_style").as_deref(),
            Some("hybrid")
        );
        assert_eq!(store.get_integer("current.zoom_index"), Some(3));
        assert_eq!(store.get_bool("display.show_speed"), Some(true));
    }

    #[test]
    fn test_contains_reflects_writes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = IniSettingsStore::open(dir.path().join("settings.ini")).expect("open");

        assert!(!store.contains("current.zoom_index"));
        store.set_integer("current.zoom_index", 5);
        assert!(store.contains("current.zoom_index"));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.ini");
        std::fs::write(&path, "[unclosed\n").expect("write");

        let result = IniSettingsStore::open(&path);
        assert!(matches!(result, Err(SettingsError::Parse { .. })));
    }
}
