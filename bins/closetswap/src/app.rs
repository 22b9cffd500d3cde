//! Wiring from configuration to running services

use anyhow::{Context, Result};
use assistant::{Assistant, AssistantClient, DisabledAssistantClient, HttpAssistantClient};
use catalog::seed::demo_catalog;
use catalog::{CatalogService, CatalogSettings, InMemoryCatalogStore, NewListing};
use common::{Product, TimeProvider, UserId};
use config::MarketplaceConfig;
use observability::MarketplaceMetrics;
use settlement::SettlementPolicy;
use std::sync::Arc;
use std::time::Duration;
use storage::{InMemoryPreferenceStore, JsonFilePreferenceStore, PreferenceStore};
use tracing::info;

pub struct App {
    pub service: Arc<CatalogService>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub assistant: Assistant,
}

impl App {
    /// Demo catalog plus the configured preference store and assistant
    pub async fn demo(
        config: &MarketplaceConfig,
        clock: Arc<dyn TimeProvider>,
        metrics: MarketplaceMetrics,
    ) -> Result<Self> {
        let demo = demo_catalog(clock.now());
        let store = Arc::new(InMemoryCatalogStore::with_snapshot(demo.snapshot));
        let service = Arc::new(
            CatalogService::new(store, clock, catalog_settings(config)).with_metrics(metrics.clone()),
        );

        let preferences = preference_store(config).await?;
        for (user, product) in demo.wishlists {
            preferences
                .add_to_wishlist(user, product)
                .await
                .context("Failed to seed wishlists")?;
        }

        let assistant = assistant(config)?.with_metrics(metrics);

        info!(
            users = service.store().users().len(),
            products = service.store().products().len(),
            "Demo marketplace ready"
        );

        Ok(Self {
            service,
            preferences,
            assistant,
        })
    }

    /// Publish a listing after the assistant's mature-content screen.
    ///
    /// An empty description is drafted by the assistant first so the screen
    /// sees the text buyers will read.
    pub async fn create_listing(
        &self,
        seller: &UserId,
        mut listing: NewListing,
    ) -> common::Result<Product> {
        if listing.description.trim().is_empty() {
            listing.description = self
                .assistant
                .generate_description(&listing.title, &listing.category, listing.condition)
                .await;
        }

        let flagged = self
            .assistant
            .check_content_flag(
                &listing.title,
                &listing.description,
                listing.image_url.as_deref(),
            )
            .await;
        self.service.add_listing(seller, listing, flagged)
    }
}

pub fn catalog_settings(config: &MarketplaceConfig) -> CatalogSettings {
    CatalogSettings {
        policy: SettlementPolicy {
            fee_rate: config.fees.rate,
            bid_increment: config.auction.bid_increment,
        },
        default_duration_days: config.listings.default_duration_days,
        min_duration_days: config.listings.min_duration_days,
        max_duration_days: config.listings.max_duration_days,
        categories: config.listings.categories.clone(),
        admin_emails: config.accounts.admin_emails.clone(),
        default_age: config.accounts.default_age,
        age_of_majority: config.accounts.age_of_majority,
    }
}

async fn preference_store(config: &MarketplaceConfig) -> Result<Arc<dyn PreferenceStore>> {
    let limit = config.preferences.search_history_limit();
    match &config.preferences.storage_path {
        Some(path) => {
            let store = JsonFilePreferenceStore::open(path, limit)
                .await
                .with_context(|| format!("Failed to open preference store at {}", path))?;
            info!(path = %path, "Using JSON file preference store");
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(InMemoryPreferenceStore::with_history_limit(limit))),
    }
}

fn assistant(config: &MarketplaceConfig) -> Result<Assistant> {
    let Some(settings) = &config.assistant else {
        info!("No assistant configured, using fallback values");
        return Ok(Assistant::new(Arc::new(DisabledAssistantClient)));
    };

    let timeout = Duration::from_secs(settings.timeout_seconds());
    let client: Arc<dyn AssistantClient> = Arc::new(
        HttpAssistantClient::new(&settings.endpoint, settings.api_key.clone(), timeout)
            .context("Failed to build assistant client")?,
    );
    info!(endpoint = %settings.endpoint, "Assistant configured");
    Ok(Assistant::new(client).with_timeout(timeout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use assistant::MockAssistantClient;
    use common::{MarketError, MockTime, ProductCondition};
    use config::generate_default_config;

    async fn demo_app() -> App {
        let clock = MockTime::new(Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap());
        App::demo(
            &generate_default_config(),
            Arc::new(clock),
            MarketplaceMetrics::new(),
        )
        .await
        .unwrap()
    }

    fn corset_listing(is_nsfw: bool) -> NewListing {
        NewListing {
            title: "Lace Corset".to_string(),
            description: "Black lace, boned".to_string(),
            price: 55.0,
            reserve_price: None,
            image_url: None,
            category: "Tops".to_string(),
            condition: ProductCondition::LikeNew,
            shipping_cost: 6.0,
            is_nsfw,
            documented_damage: Vec::new(),
            duration_days: None,
        }
    }

    #[test]
    fn test_catalog_settings_follow_config() {
        let mut config = generate_default_config();
        config.fees.rate = 0.05;
        config.auction.bid_increment = 2.0;
        config.listings.max_duration_days = 30;

        let settings = catalog_settings(&config);
        assert_eq!(settings.policy.fee_rate, 0.05);
        assert_eq!(settings.policy.bid_increment, 2.0);
        assert_eq!(settings.max_duration_days, 30);
        assert_eq!(settings.admin_emails, config.accounts.admin_emails);
    }

    #[tokio::test]
    async fn test_demo_app_seeds_wishlists() {
        let app = demo_app().await;

        let counts = app.preferences.wishlist_counts().await.unwrap();
        assert!(!counts.is_empty());
        assert!(!app.service.store().products().is_empty());
    }

    #[tokio::test]
    async fn test_flagged_listing_must_be_declared_nsfw() {
        let mut app = demo_app().await;
        app.assistant = Assistant::new(Arc::new(MockAssistantClient::new().with_content_flag(true)));
        let jane = app.service.store().user_by_email("jane.d@example.com").unwrap();
        let before = app.service.store().products().len();

        let err = app.create_listing(&jane.id, corset_listing(false)).await.unwrap_err();
        assert!(matches!(err, MarketError::InvalidInput(_)));
        assert_eq!(app.service.store().products().len(), before);

        let product = app.create_listing(&jane.id, corset_listing(true)).await.unwrap();
        assert!(product.is_nsfw);
        assert!(product.reported_nsfw);
    }

    #[tokio::test]
    async fn test_unflagged_listing_gets_drafted_description() {
        let mut app = demo_app().await;
        app.assistant = Assistant::new(Arc::new(
            MockAssistantClient::new()
                .with_content_flag(false)
                .with_description("Soft wool, barely worn"),
        ));
        let jane = app.service.store().user_by_email("jane.d@example.com").unwrap();

        let mut listing = corset_listing(false);
        listing.title = "Wool Cardigan".to_string();
        listing.description = String::new();
        let product = app.create_listing(&jane.id, listing).await.unwrap();
        assert_eq!(product.description, "Soft wool, barely worn");
        assert!(!product.reported_nsfw);
    }
}
