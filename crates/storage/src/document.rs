//! The persisted preference document and its update rules

use common::{ProductId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_SEARCH_HISTORY_LIMIT: usize = 5;

/// Everything a preference backend persists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceDocument {
    /// Product ids in the order they were added
    #[serde(default)]
    pub wishlists: HashMap<UserId, Vec<ProductId>>,
    /// Most recent first
    #[serde(default)]
    pub search_history: HashMap<UserId, Vec<String>>,
}

impl PreferenceDocument {
    pub fn wishlist(&self, user: &UserId) -> Vec<ProductId> {
        self.wishlists.get(user).cloned().unwrap_or_default()
    }

    /// Returns `false` if the product was already wishlisted
    pub fn add_to_wishlist(&mut self, user: UserId, product: ProductId) -> bool {
        let list = self.wishlists.entry(user).or_default();
        if list.contains(&product) {
            return false;
        }
        list.push(product);
        true
    }

    /// Returns `false` if the product was not wishlisted
    pub fn remove_from_wishlist(&mut self, user: &UserId, product: &ProductId) -> bool {
        let Some(list) = self.wishlists.get_mut(user) else {
            return false;
        };
        let before = list.len();
        list.retain(|p| p != product);
        before != list.len()
    }

    /// Number of distinct users wishlisting each product
    pub fn wishlist_counts(&self) -> HashMap<ProductId, usize> {
        let mut counts = HashMap::new();
        for list in self.wishlists.values() {
            for product in list {
                *counts.entry(*product).or_insert(0) += 1;
            }
        }
        counts
    }

    pub fn search_history(&self, user: &UserId) -> Vec<String> {
        self.search_history.get(user).cloned().unwrap_or_default()
    }

    /// Push `query` to the front, dropping any case-insensitive duplicate
    /// and truncating to `limit`. Blank queries are ignored.
    ///
    /// Returns `true` if the history changed.
    pub fn record_search(&mut self, user: UserId, query: &str, limit: usize) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return false;
        }
        let history = self.search_history.entry(user).or_default();
        if history.first().is_some_and(|q| q == query) {
            return false;
        }
        let needle = query.to_lowercase();
        history.retain(|q| q.to_lowercase() != needle);
        history.insert(0, query.to_string());
        history.truncate(limit);
        true
    }

    pub fn clear_search_history(&mut self, user: &UserId) -> bool {
        self.search_history.remove(user).is_some_and(|h| !h.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_history_most_recent_first_and_bounded() {
        let mut doc = PreferenceDocument::default();
        let user = UserId::new();
        for q in ["boots", "jacket", "scarf", "corset", "necklace", "dress"] {
            doc.record_search(user, q, 5);
        }
        assert_eq!(
            doc.search_history(&user),
            vec!["dress", "necklace", "corset", "scarf", "jacket"]
        );
    }

    #[test]
    fn test_search_history_dedups_case_insensitively() {
        let mut doc = PreferenceDocument::default();
        let user = UserId::new();
        doc.record_search(user, "Denim Jacket", 5);
        doc.record_search(user, "boots", 5);
        assert!(doc.record_search(user, "denim jacket", 5));
        assert_eq!(doc.search_history(&user), vec!["denim jacket", "boots"]);
        assert!(!doc.record_search(user, "denim jacket", 5));
    }

    #[test]
    fn test_blank_queries_ignored() {
        let mut doc = PreferenceDocument::default();
        let user = UserId::new();
        assert!(!doc.record_search(user, "   ", 5));
        assert!(doc.search_history(&user).is_empty());
    }

    #[test]
    fn test_wishlist_counts_distinct_users() {
        let mut doc = PreferenceDocument::default();
        let (alice, bob) = (UserId::new(), UserId::new());
        let (jacket, boots) = (ProductId::new(), ProductId::new());

        assert!(doc.add_to_wishlist(alice, jacket));
        assert!(!doc.add_to_wishlist(alice, jacket));
        doc.add_to_wishlist(bob, jacket);
        doc.add_to_wishlist(bob, boots);

        let counts = doc.wishlist_counts();
        assert_eq!(counts[&jacket], 2);
        assert_eq!(counts[&boots], 1);

        assert!(doc.remove_from_wishlist(&bob, &jacket));
        assert!(!doc.remove_from_wishlist(&bob, &jacket));
        assert_eq!(doc.wishlist_counts()[&jacket], 1);
    }
}
