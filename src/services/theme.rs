use crate::services::api::Theme;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeMode::Light => write!(f, "light"),
            ThemeMode::Dark => write!(f, "dark"),
        }
    }
}

/// Persists the active theme per mode. Reading never fails: a mode with
/// nothing usable stored yields [`Theme::default`].
pub trait ThemeStore: Send + Sync {
    fn get_theme(&self, mode: ThemeMode) -> Theme;
    fn set_theme(&self, mode: ThemeMode, theme: &Theme) -> Result<(), ThemeStoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryThemeStore {
    inner: Mutex<HashMap<ThemeMode, Theme>>,
}

impl ThemeStore for MemoryThemeStore {
    fn get_theme(&self, mode: ThemeMode) -> Theme {
        self.inner
            .lock()
            .ok()
            .and_then(|inner| inner.get(&mode).cloned())
            .unwrap_or_default()
    }

    fn set_theme(&self, mode: ThemeMode, theme: &Theme) -> Result<(), ThemeStoreError> {
        let mut inner = self.inner.lock().map_err(|_| ThemeStoreError::Poisoned)?;
        inner.insert(mode, theme.clone());
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedThemes {
    #[serde(default)]
    light: Option<Theme>,
    #[serde(default)]
    dark: Option<Theme>,
}

impl PersistedThemes {
    fn slot(&mut self, mode: ThemeMode) -> &mut Option<Theme> {
        match mode {
            ThemeMode::Light => &mut self.light,
            ThemeMode::Dark => &mut self.dark,
        }
    }
}

/// Keeps both modes in one JSON document on disk.
#[derive(Debug, Clone)]
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `theme.json` in the platform data directory.
    pub fn with_default_location() -> Result<Self, ThemeStoreError> {
        ProjectDirs::from("lan", "homedash", "homedash")
            .map(|dirs| Self::new(dirs.data_dir().join("theme.json")))
            .ok_or(ThemeStoreError::NoDataDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<PersistedThemes, ThemeStoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(PersistedThemes::default()),
            Err(err) => Err(err.into()),
        }
    }
}

impl ThemeStore for FileThemeStore {
    fn get_theme(&self, mode: ThemeMode) -> Theme {
        match self.read() {
            Ok(mut persisted) => persisted.slot(mode).take().unwrap_or_default(),
            Err(err) => {
                log::warn!(
                    "Ignoring unreadable theme file {}: {err}",
                    self.path.display()
                );
                Theme::default()
            }
        }
    }

    fn set_theme(&self, mode: ThemeMode, theme: &Theme) -> Result<(), ThemeStoreError> {
        let mut persisted = self.read().unwrap_or_else(|err| {
            log::warn!(
                "Replacing unreadable theme file {}: {err}",
                self.path.display()
            );
            PersistedThemes::default()
        });
        *persisted.slot(mode) = Some(theme.clone());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&persisted)?)?;
        log::debug!("Stored {mode} theme {} in {}", theme.label, self.path.display());
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ThemeStoreError {
    #[error("theme storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("theme serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("no platform data directory available for theme storage")]
    NoDataDir,
    #[error("theme store lock poisoned")]
    Poisoned,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn midnight() -> Theme {
        Theme {
            label: "Midnight".into(),
            value: 1,
            main_color: "#f5f6fa".into(),
            accent_color: "#4b7bec".into(),
            background_color: "#1e272e".into(),
        }
    }

    #[test]
    fn memory_store_defaults_until_set() {
        let store = MemoryThemeStore::default();
        assert_eq!(store.get_theme(ThemeMode::Dark), Theme::default());

        store.set_theme(ThemeMode::Dark, &midnight()).unwrap();
        assert_eq!(store.get_theme(ThemeMode::Dark), midnight());
        assert_eq!(store.get_theme(ThemeMode::Light), Theme::default());
    }

    #[test]
    fn file_store_keeps_modes_apart() {
        let dir = tempdir().unwrap();
        let store = FileThemeStore::new(dir.path().join("nested").join("theme.json"));

        store.set_theme(ThemeMode::Dark, &midnight()).unwrap();
        store.set_theme(ThemeMode::Light, &Theme::default()).unwrap();

        let reopened = FileThemeStore::new(store.path());
        assert_eq!(reopened.get_theme(ThemeMode::Dark), midnight());
        assert_eq!(reopened.get_theme(ThemeMode::Light), Theme::default());
    }

    #[test]
    fn corrupt_file_reads_as_default_and_is_replaced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("theme.json");
        fs::write(&path, "not json").unwrap();
        let store = FileThemeStore::new(&path);

        assert_eq!(store.get_theme(ThemeMode::Light), Theme::default());

        store.set_theme(ThemeMode::Light, &midnight()).unwrap();
        assert_eq!(store.get_theme(ThemeMode::Light), midnight());
    }
}
