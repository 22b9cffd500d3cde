//! Auction settlement
//!
//! The seller picks the winning request; the engine prices it. The clearing
//! price is a second-price rule with two floors and a ceiling:
//!
//! ```text
//! clearing = max(winner.min_bid, highest_other_max_bid + increment)
//! clearing = min(clearing, winner.max_bid)
//! clearing = max(clearing, reserve)            // when a reserve is set
//! ```
//!
//! `highest_other_max_bid` is 0 when nobody else is bidding, so a lone
//! bidder clears at their own minimum (or the reserve, if higher).

use chrono::{DateTime, Utc};
use common::error::ensure_amount;
use common::{
    validate_bid_range, MarketError, Product, ProductId, PurchaseRequest, RequestId, Result,
    Transaction, TransactionId, UserId,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Fee rate and bid increment applied at settlement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SettlementPolicy {
    /// Share of the clearing price owed by the seller
    pub fee_rate: f64,
    /// Minimum amount by which the winner beats the runner-up
    pub bid_increment: f64,
}

impl Default for SettlementPolicy {
    fn default() -> Self {
        Self {
            fee_rate: 0.10,
            bid_increment: 1.0,
        }
    }
}

/// A priced sale, ready to be committed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettlementOutcome {
    pub product_id: ProductId,
    pub seller_id: UserId,
    pub buyer_id: UserId,
    pub clearing_price: f64,
    pub fee: f64,
    pub accepted_id: RequestId,
    /// Every other pending request on the product
    pub rejected_ids: Vec<RequestId>,
}

impl SettlementOutcome {
    /// The transaction recording this sale
    pub fn to_transaction(&self, shipping_cost: f64, created_at: DateTime<Utc>) -> Transaction {
        Transaction {
            id: TransactionId::new(),
            product_id: self.product_id,
            buyer_id: self.buyer_id,
            seller_id: self.seller_id,
            price: self.clearing_price,
            shipping_cost,
            fee: self.fee,
            created_at,
            reviewed_by_buyer: false,
            reviewed_by_seller: false,
        }
    }
}

/// Prices purchase requests under a [`SettlementPolicy`]
#[derive(Debug, Clone, Default)]
pub struct SettlementEngine {
    policy: SettlementPolicy,
}

impl SettlementEngine {
    pub fn new(policy: SettlementPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SettlementPolicy {
        &self.policy
    }

    /// Clearing price for `winner` against the best competing ceiling
    pub fn clearing_price(
        &self,
        winner: &PurchaseRequest,
        highest_other_max_bid: f64,
        reserve: Option<f64>,
    ) -> Result<f64> {
        if let Some(reserve) = reserve {
            if winner.max_bid < reserve {
                return Err(MarketError::ReserveNotMet {
                    max_bid: winner.max_bid,
                    reserve,
                });
            }
        }

        let mut clearing = winner
            .min_bid
            .max(highest_other_max_bid + self.policy.bid_increment);
        clearing = clearing.min(winner.max_bid);
        if let Some(reserve) = reserve {
            clearing = clearing.max(reserve);
        }
        Ok(clearing)
    }

    /// Settle `product` in favour of `winning_id`.
    ///
    /// `requests` may contain anything; only pending requests on `product`
    /// form the bid pool. Nothing is mutated: on error the caller commits
    /// nothing, on success it commits the returned outcome.
    pub fn settle(
        &self,
        caller: &UserId,
        product: &Product,
        winning_id: &RequestId,
        requests: &[PurchaseRequest],
    ) -> Result<SettlementOutcome> {
        if !product.is_owned_by(caller) {
            warn!(product_id = %product.id, caller = %caller, "Settlement attempted by non-owner");
            return Err(MarketError::unauthorized(format!(
                "only the seller of product {} may settle it",
                product.id
            )));
        }

        if !product.is_available() {
            return Err(MarketError::invalid_state(format!(
                "product {} is {}",
                product.id, product.status
            )));
        }

        let winner = requests
            .iter()
            .find(|r| r.id == *winning_id && r.product_id == product.id)
            .ok_or_else(|| {
                MarketError::not_found(format!(
                    "purchase request {} for product {}",
                    winning_id, product.id
                ))
            })?;
        if !winner.is_pending() {
            return Err(MarketError::invalid_state(format!(
                "purchase request {} is {}",
                winner.id, winner.status
            )));
        }
        validate_bid_range(winner.min_bid, winner.max_bid)?;

        let reserve = product
            .reserve_price
            .map(|r| ensure_amount("reserve price", r))
            .transpose()?;

        let competitors: Vec<&PurchaseRequest> = requests
            .iter()
            .filter(|r| r.product_id == product.id && r.is_pending() && r.id != winner.id)
            .collect();
        for other in &competitors {
            ensure_amount("max bid", other.max_bid)?;
        }
        let highest_other_max_bid = competitors
            .iter()
            .map(|r| r.max_bid)
            .fold(0.0_f64, f64::max);

        let clearing_price = self.clearing_price(winner, highest_other_max_bid, reserve)?;
        let fee = clearing_price * self.policy.fee_rate;

        debug!(
            product_id = %product.id,
            request_id = %winner.id,
            competitors = competitors.len(),
            highest_other_max_bid,
            clearing_price,
            "Priced settlement"
        );

        Ok(SettlementOutcome {
            product_id: product.id,
            seller_id: product.seller_id,
            buyer_id: winner.buyer_id,
            clearing_price,
            fee,
            accepted_id: winner.id,
            rejected_ids: competitors.iter().map(|r| r.id).collect(),
        })
    }
}
