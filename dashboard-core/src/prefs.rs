//! The one value remembered between sessions: the last city searched successfully.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use crate::config::project_dirs;

pub trait PreferenceStore: Send + std::fmt::Debug {
    fn last_city(&self) -> Result<Option<String>>;
    fn set_last_city(&mut self, city: &str) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredPreferences {
    #[serde(rename = "lastSearchedCity", skip_serializing_if = "Option::is_none")]
    last_searched_city: Option<String>,
}

/// JSON file in the platform data directory. No expiry.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn at_default_location() -> Result<Self> {
        Ok(Self::new(project_dirs()?.data_dir().join("preferences.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<StoredPreferences> {
        if !self.path.exists() {
            return Ok(StoredPreferences::default());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read preferences: {}", self.path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse preferences: {}", self.path.display()))
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn last_city(&self) -> Result<Option<String>> {
        Ok(self
            .read()?
            .last_searched_city
            .filter(|c| !c.trim().is_empty()))
    }

    fn set_last_city(&mut self, city: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }
        let prefs = StoredPreferences { last_searched_city: Some(city.to_string()) };
        let json = serde_json::to_string_pretty(&prefs).context("Failed to serialize preferences")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write preferences: {}", self.path.display()))
    }
}

/// Process-local store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    last_city: Arc<Mutex<Option<String>>>,
}

impl MemoryPreferenceStore {
    pub fn with_last_city(city: &str) -> Self {
        Self { last_city: Arc::new(Mutex::new(Some(city.to_string()))) }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn last_city(&self) -> Result<Option<String>> {
        let guard = self
            .last_city
            .lock()
            .map_err(|_| anyhow::anyhow!("preference store lock poisoned"))?;
        Ok(guard.clone())
    }

    fn set_last_city(&mut self, city: &str) -> Result<()> {
        let mut guard = self
            .last_city
            .lock()
            .map_err(|_| anyhow::anyhow!("preference store lock poisoned"))?;
        *guard = Some(city.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePreferenceStore::new(dir.path().join("prefs.json"));
        assert_eq!(store.last_city().unwrap(), None);
    }

    #[test]
    fn file_store_persists_under_last_searched_city_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("prefs.json");

        let mut store = FilePreferenceStore::new(&path);
        store.set_last_city("Paris").unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["lastSearchedCity"], "Paris");

        let reopened = FilePreferenceStore::new(&path);
        assert_eq!(reopened.last_city().unwrap().as_deref(), Some("Paris"));
    }

    #[test]
    fn file_store_overwrites_previous_city() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FilePreferenceStore::new(dir.path().join("prefs.json"));
        store.set_last_city("Paris").unwrap();
        store.set_last_city("Oslo").unwrap();
        assert_eq!(store.last_city().unwrap().as_deref(), Some("Oslo"));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{not json").unwrap();

        let err = FilePreferenceStore::new(&path).last_city().unwrap_err();
        assert!(err.to_string().contains("Failed to parse preferences"));
    }

    #[test]
    fn memory_store_clones_share_state() {
        let store = MemoryPreferenceStore::default();
        let mut writer = store.clone();
        writer.set_last_city("Rome").unwrap();
        assert_eq!(store.last_city().unwrap().as_deref(), Some("Rome"));
    }
}
