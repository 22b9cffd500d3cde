//! Post-sale reviews

use common::{MarketError, Result, Review, ReviewId, TransactionId, UserId};
use tracing::info;

use super::CatalogService;
use crate::store::traits::ChangeSet;

impl CatalogService {
    /// Review the other party of a sale. Each party reviews at most once;
    /// the review is appended to the counter-party's profile.
    pub fn add_review(
        &self,
        caller: &UserId,
        transaction_id: &TransactionId,
        rating: u8,
        text: &str,
    ) -> Result<Review> {
        if !(1..=5).contains(&rating) {
            return Err(MarketError::invalid_input("rating must be between 1 and 5"));
        }

        let _guard = self.begin();
        let author = self.require_user(caller)?;
        let mut transaction = self
            .store
            .transaction(transaction_id)
            .ok_or_else(|| MarketError::not_found(format!("transaction {}", transaction_id)))?;
        let role = transaction
            .party_role(&author.id)
            .ok_or_else(|| MarketError::unauthorized("only the buyer or seller can review a sale"))?;

        transaction.mark_reviewed(role)?;
        let mut target = self.require_user(&transaction.counterparty(role))?;

        let review = Review {
            id: ReviewId::new(),
            author_id: author.id,
            author_name: author.name.clone(),
            target_id: target.id,
            rating,
            text: text.trim().to_string(),
            transaction_id: transaction.id,
            created_at: self.clock.now(),
        };
        target.reviews.push(review.clone());

        self.store
            .commit(ChangeSet::new().transaction(transaction).user(target))?;
        info!(
            review_id = %review.id,
            transaction_id = %review.transaction_id,
            target_id = %review.target_id,
            rating,
            "Review added"
        );
        Ok(review)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::harness;
    use super::*;

    fn scarf_sale(h: &super::super::fixtures::Harness) -> common::Transaction {
        h.service
            .transactions_for(&h.jane().id)
            .unwrap()
            .into_iter()
            .next()
            .unwrap()
    }

    #[test]
    fn test_seller_reviews_buyer_once() {
        let h = harness();
        let jane = h.jane();
        let john = h.john();
        let sale = scarf_sale(&h);

        let review = h
            .service
            .add_review(&jane.id, &sale.id, 4, " Smooth transaction ")
            .unwrap();
        assert_eq!(review.target_id, john.id);
        assert_eq!(review.author_name, "Jane Doe");
        assert_eq!(review.text, "Smooth transaction");
        assert_eq!(h.john().reviews.len(), 1);
        assert!(h.service.store().transaction(&sale.id).unwrap().reviewed_by_seller);

        let err = h.service.add_review(&jane.id, &sale.id, 5, "again").unwrap_err();
        assert_eq!(err, MarketError::AlreadyReviewed(sale.id));
        assert_eq!(h.john().reviews.len(), 1);
    }

    #[test]
    fn test_buyer_already_reviewed_flags_unchanged() {
        let h = harness();
        let john = h.john();
        let sale = scarf_sale(&h);
        let before = h.service.store().transaction(&sale.id).unwrap();

        assert!(matches!(
            h.service.add_review(&john.id, &sale.id, 5, "again"),
            Err(MarketError::AlreadyReviewed(_))
        ));
        assert_eq!(h.service.store().transaction(&sale.id).unwrap(), before);
        assert_eq!(h.jane().reviews.len(), 1);
    }

    #[test]
    fn test_review_rules() {
        let h = harness();
        let sale = scarf_sale(&h);
        let jane = h.jane();

        assert!(matches!(
            h.service.add_review(&h.alice().id, &sale.id, 3, ""),
            Err(MarketError::Unauthorized(_))
        ));
        for rating in [0, 6] {
            assert!(matches!(
                h.service.add_review(&jane.id, &sale.id, rating, ""),
                Err(MarketError::InvalidInput(_))
            ));
        }
        assert!(matches!(
            h.service.add_review(&jane.id, &TransactionId::new(), 3, ""),
            Err(MarketError::NotFound(_))
        ));
    }
}
