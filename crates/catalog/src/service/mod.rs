//! Catalog service - the single writer over a [`CatalogStore`]
//!
//! Every mutation runs under one write lock, so a settlement always reads a
//! consistent set of pending requests and no caller ever observes a partial
//! update.

mod accounts;
mod bids;
mod listings;
mod moderation;
mod reads;
mod reviews;

#[cfg(test)]
mod fixtures;

pub use listings::NewListing;
pub use reads::{BrowseQuery, ModerationQueue};

use chrono::{DateTime, Utc};
use common::{MarketError, Product, Result, TimeProvider, User, UserId};
use observability::MarketplaceMetrics;
use parking_lot::{Mutex, MutexGuard};
use settlement::{SettlementEngine, SettlementPolicy};
use std::sync::Arc;

use crate::store::traits::CatalogStore;

/// Business rules the service enforces
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSettings {
    pub policy: SettlementPolicy,
    pub default_duration_days: u32,
    pub min_duration_days: u32,
    pub max_duration_days: u32,
    /// Listing categories, matched case-insensitively
    pub categories: Vec<String>,
    /// Promoted to admin on provider login
    pub admin_emails: Vec<String>,
    /// Age assigned to provider-provisioned accounts
    pub default_age: u32,
    pub age_of_majority: u32,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            policy: SettlementPolicy::default(),
            default_duration_days: 90,
            min_duration_days: 1,
            max_duration_days: 365,
            categories: ["Tops", "Bottoms", "Dresses", "Outerwear", "Shoes", "Accessories", "NSFW"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            admin_emails: Vec::new(),
            default_age: 30,
            age_of_majority: 18,
        }
    }
}

/// Marketplace service over a catalog store
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    clock: Arc<dyn TimeProvider>,
    settings: CatalogSettings,
    engine: SettlementEngine,
    metrics: MarketplaceMetrics,
    write_lock: Mutex<()>,
}

impl CatalogService {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        clock: Arc<dyn TimeProvider>,
        settings: CatalogSettings,
    ) -> Self {
        Self {
            engine: SettlementEngine::new(settings.policy),
            store,
            clock,
            settings,
            metrics: MarketplaceMetrics::new(),
            write_lock: Mutex::new(()),
        }
    }

    /// Replace the metrics handles (e.g. after installing an exporter)
    pub fn with_metrics(mut self, metrics: MarketplaceMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn store(&self) -> &Arc<dyn CatalogStore> {
        &self.store
    }

    fn begin(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock()
    }

    fn require_user(&self, id: &UserId) -> Result<User> {
        self.store
            .user(id)
            .ok_or_else(|| MarketError::not_found(format!("user {}", id)))
    }

    fn require_admin(&self, id: &UserId) -> Result<User> {
        let user = self.require_user(id)?;
        if !user.is_administrator() {
            return Err(MarketError::unauthorized("admin rights required"));
        }
        Ok(user)
    }

    /// Resolve an optional viewer id
    fn viewer(&self, id: Option<&UserId>) -> Result<Option<User>> {
        id.map(|id| self.require_user(id)).transpose()
    }

    fn require_active(user: &User) -> Result<()> {
        if user.is_suspended {
            return Err(MarketError::unauthorized(format!(
                "user {} is suspended",
                user.id
            )));
        }
        Ok(())
    }
}

/// What a viewer may see of a listing: the reserve stays with its seller
/// and admins
fn redact(product: Product, viewer: Option<&User>) -> Product {
    let privileged =
        viewer.is_some_and(|v| v.is_administrator() || product.is_owned_by(&v.id));
    if privileged {
        product
    } else {
        product.without_reserve()
    }
}
