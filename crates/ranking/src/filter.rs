//! Browse filter bar

use common::{Product, ProductCondition};
use serde::{Deserialize, Serialize};

/// Category, condition and inclusive price bounds; unset fields match all
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrowseFilter {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub condition: Option<ProductCondition>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
}

impl BrowseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn condition(mut self, condition: ProductCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if !product.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(condition) = self.condition {
            if product.condition != condition {
                return false;
            }
        }
        if self.min_price.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price > max) {
            return false;
        }
        true
    }

    /// Keep matching listings, preserving order
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        products.into_iter().filter(|p| self.matches(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use common::{ProductId, ProductStatus, UserId};

    fn listing(category: &str, condition: ProductCondition, price: f64) -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::new(),
            title: format!("{} item", category),
            description: String::new(),
            price,
            reserve_price: None,
            image_url: None,
            category: category.to_string(),
            condition,
            seller_id: UserId::new(),
            shipping_cost: 0.0,
            status: ProductStatus::Available,
            is_nsfw: false,
            reported_nsfw: false,
            documented_damage: vec![],
            created_at: now,
            expires_at: now + Duration::days(90),
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let p = listing("Shoes", ProductCondition::Fair, 3.0);
        assert!(BrowseFilter::new().matches(&p));
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let filter = BrowseFilter::new().price_range(Some(25.0), Some(75.0));
        assert!(filter.matches(&listing("Tops", ProductCondition::Good, 25.0)));
        assert!(filter.matches(&listing("Tops", ProductCondition::Good, 75.0)));
        assert!(!filter.matches(&listing("Tops", ProductCondition::Good, 75.01)));
        assert!(!filter.matches(&listing("Tops", ProductCondition::Good, 24.99)));
    }

    #[test]
    fn test_category_and_condition() {
        let filter = BrowseFilter::new()
            .category("outerwear")
            .condition(ProductCondition::Good);

        let products = vec![
            listing("Outerwear", ProductCondition::Good, 75.0),
            listing("Outerwear", ProductCondition::LikeNew, 80.0),
            listing("Shoes", ProductCondition::Good, 150.0),
        ];
        let kept = filter.apply(products);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].price, 75.0);
    }
}
