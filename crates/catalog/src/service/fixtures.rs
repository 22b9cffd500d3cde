//! Shared test fixtures

use chrono::{DateTime, TimeZone, Utc};
use common::{MockTime, Product, ProductCondition, TimeProvider, User};
use std::sync::Arc;

use super::{CatalogService, CatalogSettings, NewListing};
use crate::seed::demo_catalog;
use crate::store::memory::InMemoryCatalogStore;

pub const ADMIN_EMAIL: &str = "moderator@closetswap.test";

pub struct Harness {
    pub service: CatalogService,
    pub clock: MockTime,
}

impl Harness {
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn user(&self, email: &str) -> User {
        self.service.store().user_by_email(email).unwrap()
    }

    pub fn product(&self, title: &str) -> Product {
        self.service
            .store()
            .products()
            .into_iter()
            .find(|p| p.title == title)
            .unwrap()
    }

    pub fn jane(&self) -> User {
        self.user("jane.d@example.com")
    }

    pub fn nsfw_seller(&self) -> User {
        self.user("nsfw.seller@example.com")
    }

    pub fn john(&self) -> User {
        self.user("john.s@example.com")
    }

    pub fn alice(&self) -> User {
        self.user("alice.w@example.com")
    }

    pub fn admin(&self) -> User {
        self.service.login_with_provider(ADMIN_EMAIL).unwrap()
    }
}

pub fn harness() -> Harness {
    let now = Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap();
    let clock = MockTime::new(now);
    let store = Arc::new(InMemoryCatalogStore::with_snapshot(demo_catalog(now).snapshot));
    let settings = CatalogSettings {
        admin_emails: vec![ADMIN_EMAIL.to_string()],
        ..CatalogSettings::default()
    };
    let service = CatalogService::new(store, Arc::new(clock.clone()), settings);
    Harness { service, clock }
}

pub fn sample_listing() -> NewListing {
    NewListing {
        title: "Floral Sundress".to_string(),
        description: "Light cotton, perfect for summer.".to_string(),
        price: 35.0,
        reserve_price: None,
        image_url: None,
        category: "dresses".to_string(),
        condition: ProductCondition::LikeNew,
        shipping_cost: 6.0,
        is_nsfw: false,
        documented_damage: vec![],
        duration_days: None,
    }
}
