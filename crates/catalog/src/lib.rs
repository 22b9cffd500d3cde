//! Catalog store and marketplace service for ClosetSwap
//!
//! The catalog exclusively owns users, listings, purchase requests and
//! transactions. [`CatalogService`] is the only writer: every mutation
//! reads a consistent snapshot, runs the pure visibility / settlement /
//! moderation rules against it, and commits the resulting [`ChangeSet`] in
//! one step. A failed mutation commits nothing.
//!
//! # Modules
//!
//! - [`store`] - Storage trait and in-memory implementation
//! - [`service`] - Accounts, listings, bids, settlement, reviews, moderation, reads
//! - [`seed`] - Demo marketplace data

pub mod seed;
pub mod service;
pub mod store;

pub use service::{BrowseQuery, CatalogService, CatalogSettings, ModerationQueue, NewListing};
pub use store::memory::InMemoryCatalogStore;
pub use store::traits::{CatalogSnapshot, CatalogStore, ChangeSet};
