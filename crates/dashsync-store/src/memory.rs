//! In-memory implementation of the SettingsStore trait.
//!
//! Primarily for tests and embedding. Same semantics as SQLite, no
//! persistence.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use dashsync_core::Settings;

use crate::error::{Result, StoreError};
use crate::traits::{known_key, SettingsStore};

/// In-memory settings store. Thread-safe via RwLock.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    inner: RwLock<BTreeMap<&'static str, String>>,
}

impl MemorySettingsStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated from a settings record.
    pub fn with_settings(settings: &Settings) -> Self {
        let store = Self::new();
        if let Ok(mut map) = store.inner.write() {
            for key in dashsync_core::settings::keys::ALL {
                if let Some(value) = settings.get(key).filter(|v| !v.trim().is_empty()) {
                    map.insert(key, value.to_owned());
                }
            }
        }
        store
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Task(format!("lock poisoned: {e}"))
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = known_key(key)?;
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let key = known_key(key)?;
        let mut map = self.inner.write().map_err(poisoned)?;
        map.insert(key, value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = known_key(key)?;
        let mut map = self.inner.write().map_err(poisoned)?;
        map.remove(key);
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<(String, String)>> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::SettingsStoreExt;
    use dashsync_core::settings::keys;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemorySettingsStore::new();
        assert_eq!(store.get(keys::BRANCH).await.unwrap(), None);

        store.set(keys::BRANCH, "main").await.unwrap();
        assert_eq!(store.get(keys::BRANCH).await.unwrap().as_deref(), Some("main"));

        store.remove(keys::BRANCH).await.unwrap();
        assert_eq!(store.get(keys::BRANCH).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unknown_key_rejected() {
        let store = MemorySettingsStore::new();
        let err = store.set("colour", "blue").await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownKey(k) if k == "colour"));
    }

    #[tokio::test]
    async fn test_load_save_roundtrip() {
        let store = MemorySettingsStore::new();
        let mut settings = Settings::default();
        settings.set(keys::API_KEY, "k").unwrap();
        settings.set(keys::FILE_PATH, "d.json").unwrap();

        store.save(&settings).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(store.entries().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_save_removes_blank_fields() {
        let store = MemorySettingsStore::new();
        store.set(keys::REPO_TOKEN, "old").await.unwrap();

        store.save(&Settings::default()).await.unwrap();
        assert!(store.entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_with_settings() {
        let mut settings = Settings::default();
        settings.set(keys::REPO_OWNER, "acme").unwrap();
        let store = MemorySettingsStore::with_settings(&settings);
        assert_eq!(store.load().await.unwrap(), settings);
    }
}
