//! PreferenceStore trait definition

use async_trait::async_trait;
use common::{ProductId, UserId};
use std::collections::HashMap;

use crate::Result;

/// Per-user wishlist and search history
///
/// Implementations are interchangeable; the in-memory and JSON-file
/// backends share their update rules through
/// [`PreferenceDocument`](crate::PreferenceDocument).
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Wishlisted product ids in insertion order
    async fn wishlist(&self, user: UserId) -> Result<Vec<ProductId>>;

    /// Add a product; adding twice is a no-op that returns `false`
    async fn add_to_wishlist(&self, user: UserId, product: ProductId) -> Result<bool>;

    async fn remove_from_wishlist(&self, user: UserId, product: ProductId) -> Result<bool>;

    /// Distinct users per wishlisted product, across all users
    async fn wishlist_counts(&self) -> Result<HashMap<ProductId, usize>>;

    /// Most recent first
    async fn search_history(&self, user: UserId) -> Result<Vec<String>>;

    /// Record a query and return the updated history
    async fn record_search(&self, user: UserId, query: &str) -> Result<Vec<String>>;

    async fn clear_search_history(&self, user: UserId) -> Result<()>;
}
