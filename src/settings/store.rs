//! Key-value persistence for settings
//!
//! Settings live as one JSON blob under a single key. The store is the
//! host's business; [`FileStore`] keeps every key in one JSON object file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::Result;
use crate::settings::user::UserSettings;

/// Key the settings blob is stored under
pub const SETTINGS_KEY: &str = "qatra.userSettings";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: String) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Store kept in memory for the session only
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store backed by a JSON object file; a missing file is an empty store
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value);
        self.write_all(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// Loads and saves [`UserSettings`] through a [`KeyValueStore`]
#[derive(Debug, Clone)]
pub struct SettingsRepository<S> {
    store: S,
}

impl<S: KeyValueStore> SettingsRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// `None` until onboarding has saved settings
    pub fn load(&self) -> Result<Option<UserSettings>> {
        match self.store.get(SETTINGS_KEY)? {
            Some(blob) => Ok(Some(serde_json::from_str(&blob)?)),
            None => Ok(None),
        }
    }

    pub fn save(&mut self, settings: &UserSettings) -> Result<()> {
        settings.validate()?;
        self.store
            .set(SETTINGS_KEY, serde_json::to_string(settings)?)?;
        tracing::debug!(name = %settings.name, "settings saved");
        Ok(())
    }

    /// Forget the saved settings (log out)
    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(SETTINGS_KEY)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::QatraError;
    use crate::settings::user::Weekday;

    #[test]
    fn test_empty_store_has_no_settings() {
        let repo = SettingsRepository::new(MemoryStore::new());
        assert_eq!(repo.load().unwrap(), None);
    }

    #[test]
    fn test_save_then_load() {
        let mut repo = SettingsRepository::new(MemoryStore::new());
        let settings = UserSettings::new("Omar", 2, Weekday::Tuesday);

        repo.save(&settings).unwrap();
        assert_eq!(repo.load().unwrap(), Some(settings));
    }

    #[test]
    fn test_invalid_settings_not_saved() {
        let mut repo = SettingsRepository::new(MemoryStore::new());
        let result = repo.save(&UserSettings::new("Omar", 0, Weekday::Tuesday));

        assert!(matches!(result, Err(QatraError::InvalidSettings(_))));
        assert_eq!(repo.load().unwrap(), None);
    }

    #[test]
    fn test_clear_removes_blob() {
        let mut repo = SettingsRepository::new(MemoryStore::new());
        repo.save(&UserSettings::new("Omar", 1, Weekday::Friday)).unwrap();
        repo.clear().unwrap();
        assert_eq!(repo.load().unwrap(), None);
    }

    #[test]
    fn test_corrupt_blob_is_an_error() {
        let mut store = MemoryStore::new();
        store.set(SETTINGS_KEY, "{not json".into()).unwrap();
        let repo = SettingsRepository::new(store);
        assert!(matches!(repo.load(), Err(QatraError::Serde(_))));
    }
}
