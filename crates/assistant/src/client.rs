//! Assistant client - trait and implementations

use crate::error::{AssistantError, Result};
use crate::types::{CandidateProduct, ListingDraft, MarketSample, PriceSuggestion, SearchResult};
use async_trait::async_trait;
use common::ProductCondition;

/// Client trait for the assistance service - protocol agnostic
///
/// Every call may fail. Callers that must not fail go through
/// [`Assistant`](crate::Assistant).
#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// Draft a listing description
    async fn generate_description(
        &self,
        title: &str,
        category: &str,
        condition: ProductCondition,
    ) -> Result<String>;

    /// Moderation pre-screen. `true` means the listing looks like mature content.
    async fn check_content_flag(
        &self,
        title: &str,
        description: &str,
        image: Option<&str>,
    ) -> Result<bool>;

    /// Natural-language search over `candidates`
    async fn search_catalog(
        &self,
        query: &str,
        candidates: &[CandidateProduct],
    ) -> Result<SearchResult>;

    async fn suggest_price_range(
        &self,
        title: &str,
        category: &str,
        condition: ProductCondition,
        description: &str,
        market_sample: &[MarketSample],
    ) -> Result<PriceSuggestion>;

    async fn suggest_shipping_cost(
        &self,
        title: &str,
        category: &str,
        description: &str,
    ) -> Result<f64>;

    /// Draft listing fields from a photo. `image` is a URL or data URL.
    async fn analyze_image(&self, image: &str, allowed_categories: &[String])
        -> Result<ListingDraft>;
}

// ==================== Disabled Implementation ====================

/// Used when no assistant endpoint is configured; every call fails with
/// [`AssistantError::NotConfigured`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledAssistantClient;

#[async_trait]
impl AssistantClient for DisabledAssistantClient {
    async fn generate_description(&self, _: &str, _: &str, _: ProductCondition) -> Result<String> {
        Err(AssistantError::NotConfigured)
    }

    async fn check_content_flag(&self, _: &str, _: &str, _: Option<&str>) -> Result<bool> {
        Err(AssistantError::NotConfigured)
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

// ==================== Mock Implementation ====================

/// Mock assistant client for testing
///
/// Operations without a canned response fail with
/// [`AssistantError::Unavailable`].
#[derive(Debug, Clone, Default)]
pub struct MockAssistantClient {
    description: Option<String>,
    content_flag: Option<bool>,
    search: Option<SearchResult>,
    price: Option<PriceSuggestion>,
    shipping: Option<f64>,
    draft: Option<ListingDraft>,
}

impl MockAssistantClient {
    /// Create a mock with no canned responses
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn with_content_flag(mut self, flagged: bool) -> Self {
        self.content_flag = Some(flagged);
        self
    }

    pub fn with_search(mut self, result: SearchResult) -> Self {
        self.search = Some(result);
        self
    }

    pub fn with_price(mut self, suggestion: PriceSuggestion) -> Self {
        self.price = Some(suggestion);
        self
    }

    pub fn with_shipping(mut self, cost: f64) -> Self {
        self.shipping = Some(cost);
        self
    }

    pub fn with_draft(mut self, draft: ListingDraft) -> Self {
        self.draft = Some(draft);
        self
    }

    fn canned<T: Clone>(value: &Option<T>, operation: &str) -> Result<T> {
        value
            .clone()
            .ok_or_else(|| AssistantError::Unavailable(format!("no canned {} response", operation)))
    }
}

#[async_trait]
impl AssistantClient for MockAssistantClient {
    async fn generate_description(&self, _: &str, _: &str, _: ProductCondition) -> Result<String> {
        Self::canned(&self.description, "description")
    }

    async fn check_content_flag(&self, _: &str, _: &str, _: Option<&str>) -> Result<bool> {
        Self::canned(&self.content_flag, "content flag")
    }

    async fn search_catalog(&self, _: &str, _: &[CandidateProduct]) -> Result<SearchResult> {
        Self::canned(&self.search, "search")
    }

    async fn suggest_price_range(
        &self,
        _: &str,
        _: &str,
        _: ProductCondition,
        _: &str,
        _: &[MarketSample],
    ) -> Result<PriceSuggestion> {
        Self::canned(&self.price, "price")
    }

    async fn suggest_shipping_cost(&self, _: &str, _: &str, _: &str) -> Result<f64> {
        Self::canned(&self.shipping, "shipping")
    }

    async fn analyze_image(&self, _: &str, _: &[String]) -> Result<ListingDraft> {
        Self::canned(&self.draft, "image analysis")
    }
}

// ==================== HTTP Implementation ====================

#[cfg(feature = "client")]
pub mod http {
    use super::AssistantClient;
    use crate::error::{AssistantError, Result};
    use crate::types::{
        CandidateProduct, ListingDraft, MarketSample, PriceSuggestion, SearchResult,
    };
    use async_trait::async_trait;
    use common::ProductCondition;
    use reqwest::Client;
    use serde::de::DeserializeOwned;
    use serde::Deserialize;
    use std::time::Duration;

    #[derive(Deserialize)]
    struct DescriptionResponse {
        description: String,
    }

    #[derive(Deserialize)]
    struct FlagResponse {
        flagged: bool,
    }

    #[derive(Deserialize)]
    struct ShippingResponse {
        cost: f64,
    }

    /// HTTP-based assistant client
    ///
    /// Posts JSON to `{endpoint}/v1/<operation>`.
    pub struct HttpAssistantClient {
        client: Client,
        base_url: String,
        api_key: Option<String>,
    }

    impl HttpAssistantClient {
        pub fn new(endpoint: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
            let client = Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| AssistantError::Unavailable(e.to_string()))?;

            Ok(Self {
                client,
                base_url: endpoint.trim_end_matches('/').to_string(),
                api_key,
            })
        }

        async fn post<T: DeserializeOwned>(
            &self,
            operation: &str,
            body: serde_json::Value,
        ) -> Result<T> {
            let url = format!("{}/v1/{}", self.base_url, operation);

            let mut request = self.client.post(&url).json(&body);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }

            let response = request
                .send()
                .await
                .map_err(|e| AssistantError::Unavailable(e.to_string()))?;

            if !response.status().is_success() {
                let status = response.status();
                let error_text = response.text().await.unwrap_or_default();
                return Err(AssistantError::Unavailable(format!(
                    "{}: {}",
                    status, error_text
                )));
            }

            response
                .json::<T>()
                .await
                .map_err(|e| AssistantError::Malformed(e.to_string()))
        }
    }

    #[async_trait]
    impl AssistantClient for HttpAssistantClient {
        async fn generate_description(
            &self,
            title: &str,
            category: &str,
            condition: ProductCondition,
        ) -> Result<String> {
            let response: DescriptionResponse = self
                .post(
                    "generate-description",
                    serde_json::json!({
                        "title": title,
                        "category": category,
                        "condition": condition,
                    }),
                )
                .await?;
            Ok(response.description)
        }

        async fn check_content_flag(
            &self,
            title: &str,
            description: &str,
            image: Option<&str>,
        ) -> Result<bool> {
            let response: FlagResponse = self
                .post(
                    "check-content-flag",
                    serde_json::json!({
                        "title": title,
                        "description": description,
                        "image": image,
                    }),
                )
                .await?;
            Ok(response.flagged)
        }

        async fn search_catalog(
            &self,
            query: &str,
            candidates: &[CandidateProduct],
        ) -> Result<SearchResult> {
            self.post(
                "search-catalog",
                serde_json::json!({
                    "query": query,
                    "candidates": candidates,
                }),
            )
            .await
        }

        async fn suggest_price_range(
            &self,
            title: &str,
            category: &str,
            condition: ProductCondition,
            description: &str,
            market_sample: &[MarketSample],
        ) -> Result<PriceSuggestion> {
            self.post(
                "suggest-price-range",
                serde_json::json!({
                    "title": title,
                    "category": category,
                    "condition": condition,
                    "description": description,
                    "marketSample": market_sample,
                }),
            )
            .await
        }

        async fn suggest_shipping_cost(
            &self,
            title: &str,
            category: &str,
            description: &str,
        ) -> Result<f64> {
            let response: ShippingResponse = self
                .post(
                    "suggest-shipping-cost",
                    serde_json::json!({
                        "title": title,
                        "category": category,
                        "description": description,
                    }),
                )
                .await?;
            Ok(response.cost)
        }

        async fn analyze_image(
            &self,
            image: &str,
            allowed_categories: &[String],
        ) -> Result<ListingDraft> {
            self.post(
                "analyze-image",
                serde_json::json!({
                    "image": image,
                    "allowedCategories": allowed_categories,
                }),
            )
            .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_canned_responses() {
        let client = MockAssistantClient::new()
            .with_description("Soft wool, barely worn.")
            .with_content_flag(true)
            .with_shipping(6.5);

        let text = client
            .generate_description("Jumper", "Tops", ProductCondition::LikeNew)
            .await
            .unwrap();
        assert_eq!(text, "Soft wool, barely worn.");
        assert!(client.check_content_flag("Jumper", "", None).await.unwrap());
        assert_eq!(client.suggest_shipping_cost("Jumper", "Tops", "").await.unwrap(), 6.5);
    }

    #[tokio::test]
    async fn test_mock_without_response_is_unavailable() {
        let client = MockAssistantClient::new();
        let err = client.search_catalog("red dress", &[]).await.unwrap_err();
        assert!(matches!(err, AssistantError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_disabled_client_is_not_configured() {
        let client = DisabledAssistantClient;
        let err = client
            .analyze_image("data:image/png;base64,AAAA", &["Tops".to_string()])
            .await
            .unwrap_err();
        assert_eq!(err, AssistantError::NotConfigured);
    }
}
