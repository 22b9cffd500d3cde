//! Listing lifecycle
//!
//! `available -> sold` happens at settlement, `available -> expired` when
//! the clock reaches `expires_at`. Both targets are terminal.

use chrono::{DateTime, Utc};
use common::{MarketError, Product, ProductId, ProductStatus, Result};
use tracing::debug;

/// Move `product` to `next`, refusing any transition out of a terminal state
pub fn transition(product: &mut Product, next: ProductStatus) -> Result<()> {
    if !product.status.can_transition_to(next) {
        return Err(MarketError::invalid_state(format!(
            "product {} cannot move from {} to {}",
            product.id, product.status, next
        )));
    }
    product.status = next;
    Ok(())
}

/// Result of one expiry sweep
#[derive(Debug, Clone, PartialEq)]
pub struct ExpiryOutcome {
    /// All products, expired ones updated in place
    pub products: Vec<Product>,
    /// Ids that moved to `expired` during this sweep
    pub expired: Vec<ProductId>,
}

/// Expire every available product whose `expires_at` is at or before `now`.
///
/// Sold and already expired products pass through untouched, so running the
/// sweep twice with the same `now` expires nothing the second time.
pub fn apply_expiry(mut products: Vec<Product>, now: DateTime<Utc>) -> ExpiryOutcome {
    let mut expired = Vec::new();
    for product in products.iter_mut() {
        if product.is_available() && product.is_past_expiry(now) {
            product.status = ProductStatus::Expired;
            expired.push(product.id);
        }
    }
    if !expired.is_empty() {
        debug!(count = expired.len(), "Expired listings");
    }
    ExpiryOutcome { products, expired }
}
