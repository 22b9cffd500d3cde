//! Purchase requests and settlement

use common::{
    validate_bid_range, MarketError, ProductId, ProductStatus, PurchaseRequest, RequestId,
    RequestStatus, Result, Transaction, UserId,
};
use settlement::transition;
use tracing::{info, warn};
use visibility::effective_visibility;

use super::CatalogService;
use crate::store::traits::ChangeSet;

impl CatalogService {
    /// Place a standing offer on a listing.
    ///
    /// A buyer holding a pending request on the listing cannot place
    /// another one until that request is settled.
    pub fn submit_bid(
        &self,
        caller: &UserId,
        product_id: &ProductId,
        min_bid: f64,
        max_bid: f64,
        comment: &str,
    ) -> Result<PurchaseRequest> {
        validate_bid_range(min_bid, max_bid)?;

        let _guard = self.begin();
        let buyer = self.require_user(caller)?;
        Self::require_active(&buyer)?;

        let product = self
            .store
            .product(product_id)
            .ok_or_else(|| MarketError::not_found(format!("product {}", product_id)))?;
        let seller = self.store.user(&product.seller_id);

        if !effective_visibility(&product, seller.as_ref(), Some(&buyer)).is_visible() {
            return Err(MarketError::not_found(format!("product {}", product_id)));
        }
        if product.is_owned_by(&buyer.id) {
            return Err(MarketError::unauthorized("sellers cannot bid on their own listing"));
        }
        if seller.as_ref().is_some_and(|s| s.is_suspended) {
            return Err(MarketError::unauthorized("the seller of this listing is suspended"));
        }
        if !product.is_available() {
            return Err(MarketError::invalid_state(format!(
                "product {} is {}",
                product.id, product.status
            )));
        }

        if let Some(existing) = self
            .store
            .requests_for_product(&product.id)
            .into_iter()
            .find(|r| r.buyer_id == buyer.id && r.is_pending())
        {
            warn!(
                request_id = %existing.id,
                product_id = %product.id,
                "Buyer already has a pending request on this listing"
            );
            return Err(MarketError::invalid_state(format!(
                "request {} on product {} is still pending",
                existing.id, product.id
            )));
        }

        let request =
            PurchaseRequest::new(product.id, buyer.id, min_bid, max_bid, comment, self.clock.now())?;
        self.store.commit(ChangeSet::new().request(request.clone()))?;

        self.metrics.bid_submitted();
        info!(
            request_id = %request.id,
            product_id = %product.id,
            buyer_id = %buyer.id,
            "Purchase request submitted"
        );
        Ok(request)
    }

    /// Accept `request_id` and sell the listing at the computed clearing
    /// price. On any error nothing changes.
    pub fn accept_bid(&self, caller: &UserId, request_id: &RequestId) -> Result<Transaction> {
        let result = self.accept_bid_locked(caller, request_id);
        match &result {
            Ok(txn) => {
                self.metrics.settlement_completed();
                info!(
                    transaction_id = %txn.id,
                    product_id = %txn.product_id,
                    buyer_id = %txn.buyer_id,
                    price = txn.price,
                    fee = txn.fee,
                    "Sale settled"
                );
            }
            Err(err) => {
                self.metrics.settlement_rejected(err.kind());
                warn!(request_id = %request_id, caller = %caller, error = %err, "Settlement rejected");
            }
        }
        result
    }

    fn accept_bid_locked(&self, caller: &UserId, request_id: &RequestId) -> Result<Transaction> {
        let _guard = self.begin();

        let seller = self.require_user(caller)?;
        let request = self
            .store
            .request(request_id)
            .ok_or_else(|| MarketError::not_found(format!("purchase request {}", request_id)))?;
        let mut product = self
            .store
            .product(&request.product_id)
            .ok_or_else(|| MarketError::not_found(format!("product {}", request.product_id)))?;
        let requests = self.store.requests_for_product(&product.id);

        let outcome = self
            .engine
            .settle(&seller.id, &product, &request.id, &requests)?;

        Self::require_active(&seller)?;
        let buyer = self.require_user(&outcome.buyer_id)?;
        Self::require_active(&buyer)?;

        let now = self.clock.now();
        transition(&mut product, ProductStatus::Sold)?;
        let transaction = outcome.to_transaction(product.shipping_cost, now);

        let mut changes = ChangeSet::new().product(product).transaction(transaction.clone());
        for mut r in requests {
            if r.id == outcome.accepted_id {
                r.status = RequestStatus::Accepted;
                changes = changes.request(r);
            } else if outcome.rejected_ids.contains(&r.id) {
                r.status = RequestStatus::Rejected;
                changes = changes.request(r);
            }
        }

        let mut seller = seller;
        seller.fees_owed += outcome.fee;
        changes = changes.user(seller);

        self.store.commit(changes)?;
        Ok(transaction)
    }

    /// Every pending request on a listing; seller or admin only
    pub fn pending_requests_for_product(
        &self,
        caller: &UserId,
        product_id: &ProductId,
    ) -> Result<Vec<PurchaseRequest>> {
        let user = self.require_user(caller)?;
        let product = self
            .store
            .product(product_id)
            .ok_or_else(|| MarketError::not_found(format!("product {}", product_id)))?;
        if !product.is_owned_by(&user.id) && !user.is_administrator() {
            return Err(MarketError::unauthorized(
                "only the seller can see offers on this listing",
            ));
        }
        Ok(self
            .store
            .requests_for_product(product_id)
            .into_iter()
            .filter(PurchaseRequest::is_pending)
            .collect())
    }

    /// The caller's own requests, newest first
    pub fn requests_by_buyer(&self, caller: &UserId) -> Result<Vec<PurchaseRequest>> {
        let user = self.require_user(caller)?;
        Ok(self.store.requests_by_buyer(&user.id))
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::harness;
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_submit_bid_validates_amounts_first() {
        let h = harness();
        let jacket = h.product("Vintage Denim Jacket");
        let alice = h.alice();

        for (min, max) in [(-1.0, 10.0), (10.0, 5.0), (f64::NAN, 10.0), (1.0, f64::INFINITY)] {
            assert!(matches!(
                h.service.submit_bid(&alice.id, &jacket.id, min, max, ""),
                Err(MarketError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_second_pending_bid_from_same_buyer_is_refused() {
        let h = harness();
        let jacket = h.product("Vintage Denim Jacket");
        let alice = h.alice();
        let jane = h.jane();
        let before = h.service.pending_requests_for_product(&jane.id, &jacket.id).unwrap();
        assert_eq!(before.len(), 1);
        let snapshot = h.service.store().snapshot();

        let err = h
            .service
            .submit_bid(&alice.id, &jacket.id, 65.0, 80.0, "raising my offer")
            .unwrap_err();
        assert!(matches!(err, MarketError::InvalidState(_)));

        let pending = h.service.pending_requests_for_product(&jane.id, &jacket.id).unwrap();
        assert_eq!(pending, before);
        assert_eq!(
            h.service.store().request(&before[0].id).map(|r| r.status),
            Some(RequestStatus::Pending)
        );
        assert_eq!(h.service.store().snapshot().requests, snapshot.requests);
        assert!(h.service.store().product(&jacket.id).unwrap().is_available());
    }

    #[test]
    fn test_bid_rules() {
        let h = harness();
        let jane = h.jane();
        let jacket = h.product("Vintage Denim Jacket");
        let scarf = h.product("Silk Scarf");
        let corset = h.product("Gothic Corset");
        let alice = h.alice();

        assert!(matches!(
            h.service.submit_bid(&jane.id, &jacket.id, 10.0, 20.0, ""),
            Err(MarketError::Unauthorized(_))
        ));
        assert!(matches!(
            h.service.submit_bid(&alice.id, &scarf.id, 10.0, 20.0, ""),
            Err(MarketError::InvalidState(_))
        ));
        // Pending review, hidden from buyers
        assert!(matches!(
            h.service.submit_bid(&alice.id, &corset.id, 10.0, 20.0, ""),
            Err(MarketError::NotFound(_))
        ));
        assert!(matches!(
            h.service.submit_bid(&alice.id, &ProductId::new(), 10.0, 20.0, ""),
            Err(MarketError::NotFound(_))
        ));
    }

    #[test]
    fn test_suspended_parties_cannot_bid() {
        let h = harness();
        let admin = h.admin();
        let jacket = h.product("Vintage Denim Jacket");

        let alice = h.alice();
        h.service.suspend_user(&admin.id, &alice.id).unwrap();
        assert!(matches!(
            h.service.submit_bid(&alice.id, &jacket.id, 10.0, 20.0, ""),
            Err(MarketError::Unauthorized(_))
        ));

        let jane = h.jane();
        h.service.suspend_user(&admin.id, &jane.id).unwrap();
        let outsider = h.service.login_with_provider("outsider@example.com").unwrap();
        assert!(matches!(
            h.service.submit_bid(&outsider.id, &jacket.id, 10.0, 20.0, ""),
            Err(MarketError::NotFound(_))
        ));
    }

    #[test]
    fn test_accept_bid_settles_atomically() {
        let h = harness();
        let jane = h.jane();
        let boots = h.product("Leather Boots");
        let alice = h.alice();
        let requests = h.service.pending_requests_for_product(&jane.id, &boots.id).unwrap();
        let winning = requests.iter().find(|r| r.buyer_id == alice.id).unwrap();
        let losing = requests.iter().find(|r| r.buyer_id != alice.id).unwrap();

        let txn = h.service.accept_bid(&jane.id, &winning.id).unwrap();

        // max(155, 150 + 1) = 155, lifted to the 160 reserve
        assert_eq!(txn.price, 160.0);
        assert!((txn.fee - 16.0).abs() < 1e-9);
        assert_eq!(txn.shipping_cost, 15.0);
        assert_eq!(txn.buyer_id, alice.id);

        let store = h.service.store();
        assert_eq!(store.product(&boots.id).map(|p| p.status), Some(ProductStatus::Sold));
        assert_eq!(
            store.request(&winning.id).map(|r| r.status),
            Some(RequestStatus::Accepted)
        );
        assert_eq!(
            store.request(&losing.id).map(|r| r.status),
            Some(RequestStatus::Rejected)
        );
        let accepted = store
            .requests_for_product(&boots.id)
            .iter()
            .filter(|r| r.status == RequestStatus::Accepted)
            .count();
        assert_eq!(accepted, 1);
        assert!((h.jane().fees_owed - 28.5).abs() < 1e-9);
        assert_eq!(store.transaction(&txn.id), Some(txn));
    }

    #[test]
    fn test_reserve_not_met_leaves_everything_unchanged() {
        let h = harness();
        let jane = h.jane();
        let john = h.john();
        let boots = h.product("Leather Boots");
        let johns = h
            .service
            .requests_by_buyer(&john.id)
            .unwrap()
            .into_iter()
            .find(|r| r.product_id == boots.id)
            .unwrap();
        let before = h.service.store().snapshot();

        let err = h.service.accept_bid(&jane.id, &johns.id).unwrap_err();
        assert_eq!(
            err,
            MarketError::ReserveNotMet {
                max_bid: 150.0,
                reserve: 160.0
            }
        );
        assert_eq!(h.service.store().snapshot(), before);
    }

    #[test]
    fn test_only_seller_can_accept() {
        let h = harness();
        let alice = h.alice();
        let jacket = h.product("Vintage Denim Jacket");
        let req = h
            .service
            .requests_by_buyer(&alice.id)
            .unwrap()
            .into_iter()
            .find(|r| r.product_id == jacket.id)
            .unwrap();
        let before = h.service.store().snapshot();

        assert!(matches!(
            h.service.accept_bid(&alice.id, &req.id),
            Err(MarketError::Unauthorized(_))
        ));
        assert!(matches!(
            h.service.accept_bid(&h.admin().id, &req.id),
            Err(MarketError::Unauthorized(_))
        ));
        let after = h.service.store().snapshot();
        assert_eq!(after.products, before.products);
        assert_eq!(after.requests, before.requests);
        assert_eq!(after.transactions, before.transactions);
    }

    #[test]
    fn test_single_bidder_clears_at_min_bid() {
        let h = harness();
        let jane = h.jane();
        let jacket = h.product("Vintage Denim Jacket");
        let alice = h.alice();
        let req = h
            .service
            .requests_by_buyer(&alice.id)
            .unwrap()
            .into_iter()
            .find(|r| r.product_id == jacket.id)
            .unwrap();

        let txn = h.service.accept_bid(&jane.id, &req.id).unwrap();
        assert_eq!(txn.price, 60.0);
        assert_eq!(txn.created_at, h.now());

        assert!(matches!(
            h.service.accept_bid(&jane.id, &req.id),
            Err(MarketError::InvalidState(_))
        ));
    }

    #[test]
    fn test_cannot_sell_to_suspended_buyer() {
        let h = harness();
        let jane = h.jane();
        let alice = h.alice();
        let jacket = h.product("Vintage Denim Jacket");
        let req = h
            .service
            .requests_by_buyer(&alice.id)
            .unwrap()
            .into_iter()
            .find(|r| r.product_id == jacket.id)
            .unwrap();
        h.service.suspend_user(&h.admin().id, &alice.id).unwrap();

        assert!(matches!(
            h.service.accept_bid(&jane.id, &req.id),
            Err(MarketError::Unauthorized(_))
        ));
        assert_eq!(h.product("Vintage Denim Jacket").status, ProductStatus::Available);
    }

    #[test]
    fn test_expired_listing_cannot_be_settled_or_bid_on() {
        let h = harness();
        let jane = h.jane();
        let alice = h.alice();
        let jacket = h.product("Vintage Denim Jacket");
        h.clock.advance(Duration::days(100));
        h.service.expire_listings(h.now()).unwrap();

        let req = h.service.requests_by_buyer(&alice.id).unwrap()[0].clone();
        assert!(matches!(
            h.service.accept_bid(&jane.id, &req.id),
            Err(MarketError::InvalidState(_))
        ));
        assert!(matches!(
            h.service.submit_bid(&alice.id, &jacket.id, 1.0, 2.0, ""),
            Err(MarketError::InvalidState(_))
        ));
    }
}
