//! The `recommended` composite score
//!
//! Each signal contributes independently and the total is their sum:
//!
//! | Signal     | Contribution                                       |
//! |------------|----------------------------------------------------|
//! | recency    | +50 if created within 24h, +20 within 7 days       |
//! | urgency    | +60 if expiring within (0, 24h], +30 within (24h, 7d] |
//! | popularity | +5 per wishlist entry                              |
//! | demand     | +10 per pending purchase request                   |
//! | reputation | (seller average rating - 3) * 5, average 0 if unrated |

use chrono::{DateTime, Duration, Utc};
use common::{Product, ProductId, UserId};
use serde::Serialize;
use std::collections::HashMap;

const FRESH_BONUS: f64 = 50.0;
const RECENT_BONUS: f64 = 20.0;
const ENDING_SOON_BONUS: f64 = 60.0;
const ENDING_THIS_WEEK_BONUS: f64 = 30.0;
const PER_WISHLIST: f64 = 5.0;
const PER_PENDING_BID: f64 = 10.0;
const NEUTRAL_RATING: f64 = 3.0;
const PER_RATING_POINT: f64 = 5.0;

/// Read-only inputs for ranking
#[derive(Debug, Clone)]
pub struct RankingContext {
    pub now: DateTime<Utc>,
    /// Wishlist count per listing
    pub wishlist_counts: HashMap<ProductId, usize>,
    /// Pending purchase requests per listing
    pub pending_bids: HashMap<ProductId, usize>,
    /// Average review rating per seller; unrated sellers are absent
    pub seller_ratings: HashMap<UserId, f64>,
}

impl RankingContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            wishlist_counts: HashMap::new(),
            pending_bids: HashMap::new(),
            seller_ratings: HashMap::new(),
        }
    }

    pub fn with_wishlist_counts(mut self, counts: HashMap<ProductId, usize>) -> Self {
        self.wishlist_counts = counts;
        self
    }

    pub fn with_pending_bids(mut self, counts: HashMap<ProductId, usize>) -> Self {
        self.pending_bids = counts;
        self
    }

    pub fn with_seller_ratings(mut self, ratings: HashMap<UserId, f64>) -> Self {
        self.seller_ratings = ratings;
        self
    }

    fn wishlist_count(&self, id: &ProductId) -> usize {
        self.wishlist_counts.get(id).copied().unwrap_or(0)
    }

    fn pending_bid_count(&self, id: &ProductId) -> usize {
        self.pending_bids.get(id).copied().unwrap_or(0)
    }

    fn seller_rating(&self, id: &UserId) -> f64 {
        self.seller_ratings.get(id).copied().unwrap_or(0.0)
    }
}

/// Per-signal contributions to the recommended score
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScoreBreakdown {
    pub recency: f64,
    pub urgency: f64,
    pub popularity: f64,
    pub demand: f64,
    pub reputation: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.recency + self.urgency + self.popularity + self.demand + self.reputation
    }
}

fn recency(product: &Product, now: DateTime<Utc>) -> f64 {
    let age = now - product.created_at;
    if age <= Duration::hours(24) {
        FRESH_BONUS
    } else if age <= Duration::days(7) {
        RECENT_BONUS
    } else {
        0.0
    }
}

fn urgency(product: &Product, now: DateTime<Utc>) -> f64 {
    let remaining = product.expires_at - now;
    if remaining <= Duration::zero() {
        0.0
    } else if remaining <= Duration::hours(24) {
        ENDING_SOON_BONUS
    } else if remaining <= Duration::days(7) {
        ENDING_THIS_WEEK_BONUS
    } else {
        0.0
    }
}

/// Break down the recommended score of `product`
pub fn score_breakdown(product: &Product, ctx: &RankingContext) -> ScoreBreakdown {
    ScoreBreakdown {
        recency: recency(product, ctx.now),
        urgency: urgency(product, ctx.now),
        popularity: PER_WISHLIST * ctx.wishlist_count(&product.id) as f64,
        demand: PER_PENDING_BID * ctx.pending_bid_count(&product.id) as f64,
        reputation: (ctx.seller_rating(&product.seller_id) - NEUTRAL_RATING) * PER_RATING_POINT,
    }
}

pub fn recommended_score(product: &Product, ctx: &RankingContext) -> f64 {
    score_breakdown(product, ctx).total()
}
