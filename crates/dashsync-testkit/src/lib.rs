//! # Dashsync Testkit
//!
//! Testing utilities for dashsync.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Pinned canonical serializations
//! - **Generators**: Proptest strategies for arbitrary JSON documents
//! - **Fixtures**: Sample dashboards, settings, and a wired in-memory service
//! - **Canned HTTP server**: Scripted responses for the HTTP sources
//!
//! ## Golden Vectors
//!
//! ```rust
//! use dashsync_core::canonicalize;
//! use dashsync_testkit::vectors::all_vectors;
//!
//! for vector in all_vectors() {
//!     let input: serde_json::Value = serde_json::from_str(vector.input).unwrap();
//!     let canonical = canonicalize(&input, &vector.policy.volatile_keys());
//!     assert_eq!(canonical.to_canonical_bytes(), vector.expected.as_bytes());
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use dashsync_testkit::fixtures::{sample_guid, TestFixture};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let fixture = TestFixture::new();
//! let verdict = fixture.service().compare(&sample_guid()).await;
//! assert!(verdict.is_in_sync());
//! # });
//! ```

pub mod fixtures;
pub mod generators;
pub mod http;
pub mod vectors;

pub use fixtures::{complete_settings, live_dashboard, sample_guid, stored_dashboard, TestFixture};
pub use http::{CannedResponse, CannedServer, RecordedRequest};
