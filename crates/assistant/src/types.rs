//! Request and response shapes

use common::{Product, ProductCondition, ProductId};
use serde::{Deserialize, Serialize};

/// What the search step may see of a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProduct {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub condition: ProductCondition,
}

impl From<&Product> for CandidateProduct {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id,
            title: p.title.clone(),
            description: p.description.clone(),
            price: p.price,
            condition: p.condition,
        }
    }
}

/// Comparable listing used as pricing context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSample {
    pub title: String,
    pub price: f64,
    pub condition: ProductCondition,
}

impl From<&Product> for MarketSample {
    fn from(p: &Product) -> Self {
        Self {
            title: p.title.clone(),
            price: p.price,
            condition: p.condition,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub summary: String,
    /// Best match first
    pub matched_ids: Vec<ProductId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSuggestion {
    pub low: f64,
    pub high: f64,
    pub reasoning: String,
}

/// Listing fields drafted from a photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingDraft {
    pub title: String,
    pub category: String,
    pub description: String,
}
