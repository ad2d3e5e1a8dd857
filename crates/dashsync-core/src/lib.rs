//! # Dashsync Core
//!
//! Pure primitives for dashboard sync: canonicalization, structural
//! comparison, settings and verdicts.
//!
//! This crate contains no I/O, no storage, no networking.
//!
//! ## Key Types
//!
//! - [`CanonicalDocument`] - A JSON value with sorted keys and volatile keys removed
//! - [`VolatileKeys`] - Keys stripped before comparison
//! - [`DashboardGuid`] - Identifier of a dashboard entity
//! - [`Settings`] - Credentials and repository coordinates
//! - [`SyncVerdict`] - In sync, out of sync, or error
//!
//! ## Comparison
//!
//! ```rust
//! use dashsync_core::{canonicalize, VolatileKeys};
//! use serde_json::json;
//!
//! let live = json!({"name": "D", "pages": []});
//! let stored = json!({"pages": [], "name": "D", "linkedEntityGuids": ["x"]});
//!
//! let live = canonicalize(&live, &VolatileKeys::none());
//! let stored = canonicalize(&stored, &VolatileKeys::repository());
//! assert!(live.matches(&stored));
//! ```

pub mod canonical;
pub mod compare;
pub mod error;
pub mod settings;
pub mod types;
pub mod verdict;

pub use canonical::{
    canonicalize, transform, CanonicalDocument, CanonicalPolicy, KeyPolicy, VolatileKeys,
    LINKED_ENTITY_GUIDS,
};
pub use compare::{first_divergence, structurally_equal, Divergence, DivergenceKind, Side};
pub use error::{ConfigError, CoreError};
pub use settings::{mask_secret, RepoLocation, Settings};
pub use types::{DashboardGuid, Digest};
pub use verdict::{SyncVerdict, VerdictResponse};
