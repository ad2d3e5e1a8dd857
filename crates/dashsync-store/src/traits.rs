//! SettingsStore trait: the abstract interface for settings persistence.
//!
//! Settings are a flat key-value record (see [`dashsync_core::settings::keys`]).
//! Implementations include SQLite (primary) and in-memory (for tests).

use std::sync::Arc;

use async_trait::async_trait;
use dashsync_core::settings::keys;
use dashsync_core::Settings;

use crate::error::{Result, StoreError};

/// Async key-value interface for persisted settings.
///
/// # Design Notes
///
/// - **Closed key set**: only the keys in `settings::keys::ALL` are accepted;
///   anything else is `StoreError::UnknownKey`.
/// - **Absent vs empty**: `remove` deletes a key; readers treat a missing key
///   and an empty value the same way.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read one value.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write one value, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete one value. Deleting an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// All stored entries, ordered by key.
    async fn entries(&self) -> Result<Vec<(String, String)>>;
}

#[async_trait]
impl<S: SettingsStore + ?Sized> SettingsStore for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key).await
    }

    async fn entries(&self) -> Result<Vec<(String, String)>> {
        (**self).entries().await
    }
}

/// Extension trait for whole-record access.
pub trait SettingsStoreExt: SettingsStore {
    /// Assemble a [`Settings`] record from the stored entries.
    fn load(&self) -> impl std::future::Future<Output = Result<Settings>> + Send;

    /// Persist every field of `settings`; blank fields are removed.
    fn save(&self, settings: &Settings) -> impl std::future::Future<Output = Result<()>> + Send;
}

impl<S: SettingsStore + ?Sized> SettingsStoreExt for S {
    async fn load(&self) -> Result<Settings> {
        let mut settings = Settings::default();
        for (key, value) in self.entries().await? {
            if settings.set(&key, value).is_err() {
                tracing::warn!(key = %key, "ignoring unknown settings key in store");
            }
        }
        Ok(settings)
    }

    async fn save(&self, settings: &Settings) -> Result<()> {
        for key in keys::ALL {
            match settings.get(key) {
                Some(value) if !value.trim().is_empty() => self.set(key, value).await?,
                _ => self.remove(key).await?,
            }
        }
        Ok(())
    }
}

/// Resolve `key` to its canonical static name, rejecting unknown keys.
pub(crate) fn known_key(key: &str) -> Result<&'static str> {
    keys::ALL
        .into_iter()
        .find(|known| *known == key)
        .ok_or_else(|| StoreError::UnknownKey(key.to_owned()))
}
