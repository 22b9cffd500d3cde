//! Client-side preference storage for ClosetSwap
//!
//! Per-user wishlists and search histories that survive across sessions.
//! The marketplace core never depends on this crate; callers read
//! [`PreferenceStore::wishlist_counts`] and hand the counts to ranking.
//!
//! # Backends
//!
//! - [`InMemoryPreferenceStore`] for tests and ephemeral sessions
//! - [`JsonFilePreferenceStore`] rewrites one JSON document on every change

pub mod document;
pub mod error;
pub mod store;

pub use document::{PreferenceDocument, DEFAULT_SEARCH_HISTORY_LIMIT};
pub use error::StorageError;
pub use store::file::JsonFilePreferenceStore;
pub use store::memory::InMemoryPreferenceStore;
pub use store::traits::PreferenceStore;

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;
