//! # Dashsync Store
//!
//! Persistence for the user's sync settings (API key, repository token and
//! coordinates). The pipeline only reads settings; this crate is where they
//! are written.
//!
//! ## Key Types
//!
//! - [`SettingsStore`] - The async key-value trait
//! - [`SettingsStoreExt`] - Whole-record `load` / `save`
//! - [`SqliteSettingsStore`] - SQLite-based persistent storage
//! - [`MemorySettingsStore`] - In-memory storage for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dashsync_store::{SettingsStore, SettingsStoreExt, SqliteSettingsStore};
//!
//! async fn example() {
//!     let store = SqliteSettingsStore::open("dashsync.db").unwrap();
//!     store.set("branch", "main").await.unwrap();
//!     let settings = store.load().await.unwrap();
//!     println!("missing: {:?}", settings.missing_fields());
//! }
//! ```

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemorySettingsStore;
pub use sqlite::SqliteSettingsStore;
pub use traits::{SettingsStore, SettingsStoreExt};
