//! In-memory preference store

use async_trait::async_trait;
use common::{ProductId, UserId};
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::document::{PreferenceDocument, DEFAULT_SEARCH_HISTORY_LIMIT};
use crate::store::traits::PreferenceStore;
use crate::Result;

/// In-memory preference store for tests and ephemeral sessions
pub struct InMemoryPreferenceStore {
    document: RwLock<PreferenceDocument>,
    history_limit: usize,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_SEARCH_HISTORY_LIMIT)
    }

    pub fn with_history_limit(history_limit: usize) -> Self {
        Self {
            document: RwLock::new(PreferenceDocument::default()),
            history_limit,
        }
    }

    /// Copy of the current document
    pub fn snapshot(&self) -> PreferenceDocument {
        self.document.read().clone()
    }
}

impl Default for InMemoryPreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn wishlist(&self, user: UserId) -> Result<Vec<ProductId>> {
        Ok(self.document.read().wishlist(&user))
    }

    async fn add_to_wishlist(&self, user: UserId, product: ProductId) -> Result<bool> {
        Ok(self.document.write().add_to_wishlist(user, product))
    }

    async fn remove_from_wishlist(&self, user: UserId, product: ProductId) -> Result<bool> {
        Ok(self.document.write().remove_from_wishlist(&user, &product))
    }

    async fn wishlist_counts(&self) -> Result<HashMap<ProductId, usize>> {
        Ok(self.document.read().wishlist_counts())
    }

    async fn search_history(&self, user: UserId) -> Result<Vec<String>> {
        Ok(self.document.read().search_history(&user))
    }

    async fn record_search(&self, user: UserId, query: &str) -> Result<Vec<String>> {
        let mut doc = self.document.write();
        doc.record_search(user, query, self.history_limit);
        Ok(doc.search_history(&user))
    }

    async fn clear_search_history(&self, user: UserId) -> Result<()> {
        self.document.write().clear_search_history(&user);
        Ok(())
    }
}
