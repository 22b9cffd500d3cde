//! Read queries
//!
//! Visibility is evaluated on every call against the current snapshot.
//! Listings a viewer may not see surface as `NotFound`.

use common::{MarketError, Product, ProductId, Result, Transaction, User, UserId};
use ranking::{rank, BrowseFilter, RankingContext, SortMode};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;
use visibility::{effective_visibility, user_visibility};

use super::{redact, CatalogService};
use crate::store::traits::CatalogSnapshot;

/// Browse request: optional search result, filter bar, sort mode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrowseQuery {
    #[serde(default)]
    pub sort: SortMode,
    #[serde(default)]
    pub filter: BrowseFilter,
    /// Ordered ids from a catalog search; `None` browses everything
    #[serde(default)]
    pub search_ids: Option<Vec<ProductId>>,
}

/// Everything waiting for a moderator
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModerationQueue {
    pub products: Vec<Product>,
    pub users: Vec<User>,
}

fn is_visible_in(snapshot: &CatalogSnapshot, product: &Product, viewer: Option<&User>) -> bool {
    let seller = snapshot.users.get(&product.seller_id);
    effective_visibility(product, seller, viewer).is_visible()
}

/// Other users see a profile without its private fields
fn public_profile(mut user: User, viewer: Option<&User>) -> User {
    let privileged = viewer.is_some_and(|v| v.id == user.id || v.is_administrator());
    if !privileged {
        user.payment_methods = None;
        user.fees_owed = 0.0;
    }
    user
}

impl CatalogService {
    fn visible_listings(&self, viewer: Option<&User>) -> Vec<Product> {
        let snapshot = self.store.snapshot();
        let mut products: Vec<Product> = snapshot
            .products
            .values()
            .filter(|p| is_visible_in(&snapshot, p, viewer))
            .cloned()
            .collect();
        products.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        products
    }

    /// Every listing `viewer` may see, any status
    pub fn visible_products(&self, viewer: Option<&UserId>) -> Result<Vec<Product>> {
        let viewer = self.viewer(viewer)?;
        Ok(self
            .visible_listings(viewer.as_ref())
            .into_iter()
            .map(|p| redact(p, viewer.as_ref()))
            .collect())
    }

    pub fn product(&self, viewer: Option<&UserId>, id: &ProductId) -> Result<Product> {
        let viewer = self.viewer(viewer)?;
        let product = self
            .store
            .product(id)
            .ok_or_else(|| MarketError::not_found(format!("product {}", id)))?;
        let seller = self.store.user(&product.seller_id);
        if !effective_visibility(&product, seller.as_ref(), viewer.as_ref()).is_visible() {
            return Err(MarketError::not_found(format!("product {}", id)));
        }
        Ok(redact(product, viewer.as_ref()))
    }

    pub fn user_profile(&self, viewer: Option<&UserId>, id: &UserId) -> Result<User> {
        let viewer = self.viewer(viewer)?;
        let user = self.require_user(id)?;
        if !user_visibility(&user, viewer.as_ref()).is_visible() {
            return Err(MarketError::not_found(format!("user {}", id)));
        }
        Ok(public_profile(user, viewer.as_ref()))
    }

    /// A seller's listings as `viewer` sees them, newest first
    pub fn listings_by_seller(
        &self,
        viewer: Option<&UserId>,
        seller_id: &UserId,
    ) -> Result<Vec<Product>> {
        let viewer = self.viewer(viewer)?;
        self.require_user(seller_id)?;
        let mut listings: Vec<Product> = self
            .visible_listings(viewer.as_ref())
            .into_iter()
            .filter(|p| p.seller_id == *seller_id)
            .map(|p| redact(p, viewer.as_ref()))
            .collect();
        listings.reverse();
        Ok(listings)
    }

    /// Sales the caller took part in, newest first
    pub fn transactions_for(&self, caller: &UserId) -> Result<Vec<Transaction>> {
        let user = self.require_user(caller)?;
        Ok(self.store.transactions_for_user(&user.id))
    }

    pub fn moderation_queue(&self, caller: &UserId) -> Result<ModerationQueue> {
        self.require_admin(caller)?;
        Ok(ModerationQueue {
            products: self
                .store
                .products()
                .into_iter()
                .filter(|p| p.reported_nsfw)
                .collect(),
            users: self
                .store
                .users()
                .into_iter()
                .filter(|u| u.reported_nsfw)
                .collect(),
        })
    }

    /// Every listing regardless of visibility; admin only
    pub fn all_products(&self, caller: &UserId) -> Result<Vec<Product>> {
        self.require_admin(caller)?;
        Ok(self.store.products())
    }

    /// Visible, available listings: the candidate set for catalog search
    pub fn searchable_products(&self, viewer: Option<&UserId>) -> Result<Vec<Product>> {
        let viewer = self.viewer(viewer)?;
        Ok(self
            .visible_listings(viewer.as_ref())
            .into_iter()
            .filter(Product::is_available)
            .map(|p| redact(p, viewer.as_ref()))
            .collect())
    }

    /// Visible available listings, optionally narrowed to a search result,
    /// filtered and ranked
    pub fn browse(
        &self,
        viewer: Option<&UserId>,
        query: &BrowseQuery,
        wishlist_counts: HashMap<ProductId, usize>,
    ) -> Result<Vec<Product>> {
        let viewer = self.viewer(viewer)?;
        let snapshot = self.store.snapshot();

        let eligible = |p: &Product| p.is_available() && is_visible_in(&snapshot, p, viewer.as_ref());
        let base: Vec<Product> = match &query.search_ids {
            Some(ids) => {
                let mut seen = HashSet::new();
                ids.iter()
                    .filter(|id| seen.insert(**id))
                    .filter_map(|id| snapshot.products.get(id))
                    .filter(|p| eligible(*p))
                    .cloned()
                    .collect()
            }
            None => self
                .visible_listings(viewer.as_ref())
                .into_iter()
                .filter(Product::is_available)
                .collect(),
        };
        let candidates = query.filter.apply(base);

        let mut pending_bids: HashMap<ProductId, usize> = HashMap::new();
        for request in snapshot.requests.values().filter(|r| r.is_pending()) {
            *pending_bids.entry(request.product_id).or_insert(0) += 1;
        }
        let seller_ratings: HashMap<UserId, f64> = snapshot
            .users
            .values()
            .filter_map(|u| u.average_rating().map(|r| (u.id, r)))
            .collect();

        let ctx = RankingContext::new(self.clock.now())
            .with_wishlist_counts(wishlist_counts)
            .with_pending_bids(pending_bids)
            .with_seller_ratings(seller_ratings);

        let sort = match (&query.search_ids, query.sort) {
            (None, SortMode::Relevance) => SortMode::Newest,
            (_, mode) => mode,
        };
        debug!(candidates = candidates.len(), sort = %sort, "Browsing listings");

        Ok(rank(candidates, sort, &ctx)
            .into_iter()
            .map(|p| redact(p, viewer.as_ref()))
            .collect())
    }
}
