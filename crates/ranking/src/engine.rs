//! Listing ordering
//!
//! Every mode sorts stably: listings that compare equal keep the relative
//! order they were handed in.

use common::Product;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use tracing::debug;

use crate::mode::SortMode;
use crate::score::{recommended_score, RankingContext};

/// Order `products` for display under `mode`
pub fn rank(mut products: Vec<Product>, mode: SortMode, ctx: &RankingContext) -> Vec<Product> {
    debug!(count = products.len(), mode = %mode, "Ranking listings");

    match mode {
        SortMode::Newest => products.sort_by_key(|p| Reverse(p.created_at)),
        SortMode::PriceAsc => products.sort_by_key(|p| OrderedFloat(p.price)),
        SortMode::PriceDesc => products.sort_by_key(|p| Reverse(OrderedFloat(p.price))),
        SortMode::Relevance => {}
        SortMode::Recommended => {
            let mut scored: Vec<(OrderedFloat<f64>, Product)> = products
                .into_iter()
                .map(|p| (OrderedFloat(recommended_score(&p, ctx)), p))
                .collect();
            scored.sort_by_key(|(score, _)| Reverse(*score));
            products = scored.into_iter().map(|(_, p)| p).collect();
        }
    }

    products
}
