//! Fallback boundary around an [`AssistantClient`]
//!
//! Failed or malformed assistant responses are replaced by neutral values so
//! a listing or bid flow is never aborted by the assistant.

use crate::client::AssistantClient;
use crate::error::{AssistantError, Result};
use crate::types::{CandidateProduct, ListingDraft, MarketSample, PriceSuggestion, SearchResult};
use common::ProductCondition;
use observability::MarketplaceMetrics;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub const SEARCH_FALLBACK_SUMMARY: &str =
    "Sorry, I had trouble with that search. Please try rephrasing your query.";

pub const PRICE_FALLBACK_REASONING: &str =
    "Sorry, I couldn't generate a price suggestion at this time.";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Infallible assistant facade
#[derive(Clone)]
pub struct Assistant {
    client: Arc<dyn AssistantClient>,
    metrics: MarketplaceMetrics,
    timeout: Duration,
}

impl Assistant {
    pub fn new(client: Arc<dyn AssistantClient>) -> Self {
        Self {
            client,
            metrics: MarketplaceMetrics::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_metrics(mut self, metrics: MarketplaceMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Calls exceeding `timeout` fall back like any other failure
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn call<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(AssistantError::Timeout(self.timeout.as_secs())),
        }
    }

    fn fall_back(&self, operation: &'static str, err: &AssistantError) {
        warn!(operation, error = %err, "Assistant call failed, using fallback");
        self.metrics.assistant_fallback(operation);
    }

    /// Empty string on failure
    pub async fn generate_description(
        &self,
        title: &str,
        category: &str,
        condition: ProductCondition,
    ) -> String {
        let result = self
            .call(self.client.generate_description(title, category, condition))
            .await;
        match result {
            Ok(text) => text,
            Err(e) => {
                self.fall_back("generate_description", &e);
                String::new()
            }
        }
    }

    /// `false` on failure; the listing then goes live without pre-screening
    pub async fn check_content_flag(
        &self,
        title: &str,
        description: &str,
        image: Option<&str>,
    ) -> bool {
        let result = self
            .call(self.client.check_content_flag(title, description, image))
            .await;
        match result {
            Ok(flagged) => flagged,
            Err(e) => {
                self.fall_back("check_content_flag", &e);
                false
            }
        }
    }

    /// Matched ids are restricted to `candidates`, de-duplicated, in the
    /// order the assistant returned them.
    pub async fn search_catalog(
        &self,
        query: &str,
        candidates: &[CandidateProduct],
    ) -> SearchResult {
        let result = self.call(self.client.search_catalog(query, candidates)).await;
        match result {
            Ok(mut found) => {
                let known: HashSet<_> = candidates.iter().map(|c| c.id).collect();
                let mut seen = HashSet::new();
                let before = found.matched_ids.len();
                found
                    .matched_ids
                    .retain(|id| known.contains(id) && seen.insert(*id));
                if found.matched_ids.len() < before {
                    debug!(
                        dropped = before - found.matched_ids.len(),
                        "Dropped unknown or repeated search matches"
                    );
                }
                found
            }
            Err(e) => {
                self.fall_back("search_catalog", &e);
                SearchResult {
                    summary: SEARCH_FALLBACK_SUMMARY.to_string(),
                    matched_ids: Vec::new(),
                }
            }
        }
    }

    pub async fn suggest_price_range(
        &self,
        title: &str,
        category: &str,
        condition: ProductCondition,
        description: &str,
        market_sample: &[MarketSample],
    ) -> PriceSuggestion {
        let result = self
            .call(self.client.suggest_price_range(
                title,
                category,
                condition,
                description,
                market_sample,
            ))
            .await
            .and_then(|s| {
                let valid = s.low.is_finite()
                    && s.high.is_finite()
                    && s.low >= 0.0
                    && s.low <= s.high;
                if valid {
                    Ok(s)
                } else {
                    Err(AssistantError::Malformed(format!(
                        "price range {}..{}",
                        s.low, s.high
                    )))
                }
            });
        match result {
            Ok(suggestion) => suggestion,
            Err(e) => {
                self.fall_back("suggest_price_range", &e);
                PriceSuggestion {
                    low: 0.0,
                    high: 0.0,
                    reasoning: PRICE_FALLBACK_REASONING.to_string(),
                }
            }
        }
    }

    pub async fn suggest_shipping_cost(&self, title: &str, category: &str, description: &str) -> f64 {
        let result = self
            .call(self.client.suggest_shipping_cost(title, category, description))
            .await
            .and_then(|cost| {
                if cost.is_finite() && cost >= 0.0 {
                    Ok(cost)
                } else {
                    Err(AssistantError::Malformed(format!("shipping cost {}", cost)))
                }
            });
        match result {
            Ok(cost) => cost,
            Err(e) => {
                self.fall_back("suggest_shipping_cost", &e);
                0.0
            }
        }
    }

    /// The returned category is always one of `allowed_categories`
    /// (or empty when that list is empty).
    pub async fn analyze_image(&self, image: &str, allowed_categories: &[String]) -> ListingDraft {
        let first = allowed_categories.first().cloned().unwrap_or_default();
        let result = self
            .call(self.client.analyze_image(image, allowed_categories))
            .await;
        match result {
            Ok(mut draft) => {
                match allowed_categories
                    .iter()
                    .find(|c| c.eq_ignore_ascii_case(draft.category.trim()))
                {
                    Some(allowed) => draft.category = allowed.clone(),
                    None => {
                        debug!(category = %draft.category, "Replacing unknown category");
                        draft.category = first;
                    }
                }
                draft
            }
            Err(e) => {
                self.fall_back("analyze_image", &e);
                ListingDraft {
                    title: String::new(),
                    category: first,
                    description: String::new(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{DisabledAssistantClient, MockAssistantClient};
    use async_trait::async_trait;
    use common::ProductId;

    fn assistant(client: MockAssistantClient) -> Assistant {
        Assistant::new(Arc::new(client))
    }

    fn candidate(title: &str) -> CandidateProduct {
        CandidateProduct {
            id: ProductId::new(),
            title: title.to_string(),
            description: String::new(),
            price: 20.0,
            condition: ProductCondition::Good,
        }
    }

    fn categories() -> Vec<String> {
        ["Tops", "Shoes"].iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_failures_yield_neutral_values() {
        let a = Assistant::new(Arc::new(DisabledAssistantClient));

        assert_eq!(
            a.generate_description("Jacket", "Outerwear", ProductCondition::Good).await,
            ""
        );
        assert!(!a.check_content_flag("Jacket", "", None).await);
        assert_eq!(a.suggest_shipping_cost("Jacket", "Outerwear", "").await, 0.0);

        let search = a.search_catalog("leather jacket", &[candidate("Jacket")]).await;
        assert_eq!(search.summary, SEARCH_FALLBACK_SUMMARY);
        assert!(search.matched_ids.is_empty());

        let price = a
            .suggest_price_range("Jacket", "Outerwear", ProductCondition::Good, "", &[])
            .await;
        assert_eq!(price.low, 0.0);
        assert_eq!(price.high, 0.0);
        assert_eq!(price.reasoning, PRICE_FALLBACK_REASONING);

        let draft = a.analyze_image("https://img.test/1.png", &categories()).await;
        assert_eq!(draft.title, "");
        assert_eq!(draft.category, "Tops");
        assert_eq!(draft.description, "");
    }

    #[tokio::test]
    async fn test_search_drops_unknown_and_repeated_ids() {
        let jacket = candidate("Jacket");
        let boots = candidate("Boots");
        let stranger = ProductId::new();

        let a = assistant(MockAssistantClient::new().with_search(SearchResult {
            summary: "Two matches".to_string(),
            matched_ids: vec![boots.id, stranger, jacket.id, boots.id],
        }));

        let result = a.search_catalog("winter", &[jacket.clone(), boots.clone()]).await;
        assert_eq!(result.summary, "Two matches");
        assert_eq!(result.matched_ids, vec![boots.id, jacket.id]);
    }

    #[tokio::test]
    async fn test_malformed_price_range_falls_back() {
        for (low, high) in [(50.0, 20.0), (-5.0, 10.0), (f64::NAN, 10.0)] {
            let a = assistant(MockAssistantClient::new().with_price(PriceSuggestion {
                low,
                high,
                reasoning: "Comparable items".to_string(),
            }));
            let price = a
                .suggest_price_range("Scarf", "Accessories", ProductCondition::LikeNew, "", &[])
                .await;
            assert_eq!(price.reasoning, PRICE_FALLBACK_REASONING);
            assert_eq!((price.low, price.high), (0.0, 0.0));
        }
    }

    #[tokio::test]
    async fn test_valid_price_range_passes_through() {
        let a = assistant(MockAssistantClient::new().with_price(PriceSuggestion {
            low: 20.0,
            high: 35.0,
            reasoning: "Similar scarves sold for 20-35".to_string(),
        }));
        let price = a
            .suggest_price_range("Scarf", "Accessories", ProductCondition::LikeNew, "", &[])
            .await;
        assert_eq!((price.low, price.high), (20.0, 35.0));
    }

    #[tokio::test]
    async fn test_negative_shipping_falls_back_to_zero() {
        let a = assistant(MockAssistantClient::new().with_shipping(-3.0));
        assert_eq!(a.suggest_shipping_cost("Boots", "Shoes", "").await, 0.0);

        let a = assistant(MockAssistantClient::new().with_shipping(8.5));
        assert_eq!(a.suggest_shipping_cost("Boots", "Shoes", "").await, 8.5);
    }

    #[tokio::test]
    async fn test_image_category_is_restricted_to_allowed_list() {
        let a = assistant(MockAssistantClient::new().with_draft(ListingDraft {
            title: "Canvas sneakers".to_string(),
            category: "Footwear".to_string(),
            description: "White canvas".to_string(),
        }));
        let draft = a.analyze_image("https://img.test/2.png", &categories()).await;
        assert_eq!(draft.title, "Canvas sneakers");
        assert_eq!(draft.category, "Tops");

        let a = assistant(MockAssistantClient::new().with_draft(ListingDraft {
            title: "Canvas sneakers".to_string(),
            category: "shoes".to_string(),
            description: String::new(),
        }));
        let draft = a.analyze_image("https://img.test/2.png", &categories()).await;
        assert_eq!(draft.category, "Shoes");
    }

    struct SlowClient;

    #[async_trait]
    impl AssistantClient for SlowClient {
        async fn generate_description(&self, _: &str, _: &str, _: ProductCondition) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("too late".to_string())
        }

        async fn check_content_flag(&self, _: &str, _: &str, _: Option<&str>) -> Result<bool> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(true)
        }

        async fn search_catalog(&self, _: &str, _: &[CandidateProduct]) -> Result<SearchResult> {
            Err(AssistantError::NotConfigured)
        }

        async fn suggest_price_range(
            &self,
            _: &str,
            _: &str,
            _: ProductCondition,
            _: &str,
            _: &[MarketSample],
        ) -> Result<PriceSuggestion> {
            Err(AssistantError::NotConfigured)
        }

        async fn suggest_shipping_cost(&self, _: &str, _: &str, _: &str) -> Result<f64> {
            Err(AssistantError::NotConfigured)
        }

        async fn analyze_image(&self, _: &str, _: &[String]) -> Result<ListingDraft> {
            Err(AssistantError::NotConfigured)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_calls_time_out_into_fallback() {
        let a = Assistant::new(Arc::new(SlowClient)).with_timeout(Duration::from_secs(5));
        assert_eq!(
            a.generate_description("Dress", "Dresses", ProductCondition::Fair).await,
            ""
        );
        assert!(!a.check_content_flag("Dress", "", None).await);
    }
}
