//! Listing creation and expiry

use chrono::Duration;
use common::error::ensure_amount;
use common::{
    DamageReport, MarketError, Product, ProductCondition, ProductId, ProductStatus, Result,
    UserId,
};
use observability::SweepTimer;
use serde::{Deserialize, Serialize};
use settlement::apply_expiry;
use tracing::{info, warn};

use super::CatalogService;
use crate::store::traits::ChangeSet;

/// Seller-supplied fields of a new listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub reserve_price: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub category: String,
    pub condition: ProductCondition,
    pub shipping_cost: f64,
    #[serde(default)]
    pub is_nsfw: bool,
    #[serde(default)]
    pub documented_damage: Vec<DamageReport>,
    /// Falls back to the configured default
    #[serde(default)]
    pub duration_days: Option<u32>,
}

impl CatalogService {
    fn validate_listing(&self, listing: &NewListing) -> Result<u32> {
        if listing.title.trim().is_empty() {
            return Err(MarketError::invalid_input("title is required"));
        }
        ensure_amount("price", listing.price)?;
        if listing.price <= 0.0 {
            return Err(MarketError::invalid_input("price must be greater than zero"));
        }
        if let Some(reserve) = listing.reserve_price {
            ensure_amount("reserve price", reserve)?;
        }
        ensure_amount("shipping cost", listing.shipping_cost)?;

        if !self
            .settings
            .categories
            .iter()
            .any(|c| c.eq_ignore_ascii_case(listing.category.trim()))
        {
            return Err(MarketError::invalid_input(format!(
                "unknown category: {}",
                listing.category
            )));
        }

        if listing
            .documented_damage
            .iter()
            .any(|d| d.description.trim().is_empty())
        {
            return Err(MarketError::invalid_input("damage reports need a description"));
        }

        let days = listing
            .duration_days
            .unwrap_or(self.settings.default_duration_days);
        if days < self.settings.min_duration_days || days > self.settings.max_duration_days {
            return Err(MarketError::invalid_input(format!(
                "duration must be between {} and {} days",
                self.settings.min_duration_days, self.settings.max_duration_days
            )));
        }
        Ok(days)
    }

    /// Publish a listing for `caller`.
    ///
    /// `flagged_by_screen` is the moderation pre-screen verdict. A flagged
    /// listing must be declared NSFW and enters the moderation queue.
    pub fn add_listing(
        &self,
        caller: &UserId,
        listing: NewListing,
        flagged_by_screen: bool,
    ) -> Result<Product> {
        let days = self.validate_listing(&listing)?;
        if flagged_by_screen && !listing.is_nsfw {
            return Err(MarketError::invalid_input(
                "listing was flagged as mature content and must be marked NSFW",
            ));
        }

        let _guard = self.begin();
        let seller = self.require_user(caller)?;
        if !seller.is_seller() {
            return Err(MarketError::unauthorized("only sellers can list items"));
        }
        Self::require_active(&seller)?;

        let category = self
            .settings
            .categories
            .iter()
            .find(|c| c.eq_ignore_ascii_case(listing.category.trim()))
            .cloned()
            .unwrap_or(listing.category);

        let now = self.clock.now();
        let product = Product {
            id: ProductId::new(),
            title: listing.title.trim().to_string(),
            description: listing.description,
            price: listing.price,
            reserve_price: listing.reserve_price,
            image_url: listing.image_url,
            category,
            condition: listing.condition,
            seller_id: seller.id,
            shipping_cost: listing.shipping_cost,
            status: ProductStatus::Available,
            is_nsfw: listing.is_nsfw,
            reported_nsfw: flagged_by_screen,
            documented_damage: listing.documented_damage,
            created_at: now,
            expires_at: now + Duration::days(i64::from(days)),
        };

        self.store.commit(ChangeSet::new().product(product.clone()))?;
        self.metrics.listing_created();
        if flagged_by_screen {
            warn!(product_id = %product.id, "Listing flagged by pre-screen, queued for review");
        }
        info!(
            product_id = %product.id,
            seller_id = %seller.id,
            price = product.price,
            expires_at = %product.expires_at,
            "Listing created"
        );
        Ok(product)
    }

    /// Expire every available listing whose `expires_at` has passed at `now`
    pub fn expire_listings(&self, now: chrono::DateTime<chrono::Utc>) -> Result<Vec<ProductId>> {
        let _timer = SweepTimer::new(&self.metrics);
        let _guard = self.begin();

        let outcome = apply_expiry(self.store.products(), now);
        if outcome.expired.is_empty() {
            return Ok(Vec::new());
        }

        let changes = outcome
            .products
            .into_iter()
            .filter(|p| outcome.expired.contains(&p.id))
            .fold(ChangeSet::new(), ChangeSet::product);
        self.store.commit(changes)?;

        self.metrics.listings_expired(outcome.expired.len());
        info!(count = outcome.expired.len(), "Listings expired");
        Ok(outcome.expired)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{harness, sample_listing};
    use super::*;
    use common::User;
    use common::UserRole;

    #[test]
    fn test_add_listing_defaults() {
        let h = harness();
        let jane = h.jane();
        let p = h.service.add_listing(&jane.id, sample_listing(), false).unwrap();

        assert_eq!(p.category, "Dresses");
        assert_eq!(p.status, ProductStatus::Available);
        assert_eq!(p.created_at, h.now());
        assert_eq!(p.expires_at - p.created_at, Duration::days(90));
        assert!(!p.reported_nsfw);
        assert_eq!(h.service.store().product(&p.id), Some(p));
    }

    #[test]
    fn test_only_active_sellers_can_list() {
        let h = harness();
        assert!(matches!(
            h.service.add_listing(&h.alice().id, sample_listing(), false),
            Err(MarketError::Unauthorized(_))
        ));

        let mut jane = h.jane();
        jane.is_suspended = true;
        h.service.store().commit(ChangeSet::new().user(jane.clone())).unwrap();
        assert!(matches!(
            h.service.add_listing(&jane.id, sample_listing(), false),
            Err(MarketError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_listing_validation() {
        let h = harness();
        let jane = h.jane();
        let cases: [fn(&mut NewListing); 9] = [
            |l| l.title = "  ".to_string(),
            |l| l.price = 0.0,
            |l| l.price = f64::NAN,
            |l| l.reserve_price = Some(-1.0),
            |l| l.shipping_cost = -5.0,
            |l| l.category = "Furniture".to_string(),
            |l| l.duration_days = Some(0),
            |l| l.duration_days = Some(400),
            |l| {
                l.documented_damage = vec![DamageReport {
                    description: " ".to_string(),
                    images: vec![],
                }]
            },
        ];
        for mutate in cases {
            let mut listing = sample_listing();
            mutate(&mut listing);
            assert!(matches!(
                h.service.add_listing(&jane.id, listing, false),
                Err(MarketError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_flagged_listing_must_be_nsfw_and_is_queued() {
        let h = harness();
        let jane = h.jane();
        assert!(matches!(
            h.service.add_listing(&jane.id, sample_listing(), true),
            Err(MarketError::InvalidInput(_))
        ));

        let mut listing = sample_listing();
        listing.is_nsfw = true;
        let p = h.service.add_listing(&jane.id, listing, true).unwrap();
        assert!(p.reported_nsfw);
        assert!(p.is_nsfw);
    }

    #[test]
    fn test_expire_listings_sweep() {
        let h = harness();
        let necklace = h.product("Chain Necklace");
        let now = h.now();

        assert!(h.service.expire_listings(now).unwrap().is_empty());

        let later = necklace.expires_at;
        let expired = h.service.expire_listings(later).unwrap();
        assert_eq!(expired, vec![necklace.id]);
        assert_eq!(
            h.service.store().product(&necklace.id).map(|p| p.status),
            Some(ProductStatus::Expired)
        );

        assert!(h.service.expire_listings(later).unwrap().is_empty());
        assert_eq!(h.product("Silk Scarf").status, ProductStatus::Sold);
    }

    #[test]
    fn test_new_seller_can_list_after_upgrade() {
        let h = harness();
        let user = h
            .service
            .register_user(User::new("Sam", "sam@example.com", 22, UserRole::Buyer))
            .unwrap();
        h.service.upgrade_to_seller(&user.id, &user.id).unwrap();
        assert!(h.service.add_listing(&user.id, sample_listing(), false).is_ok());
    }
}
