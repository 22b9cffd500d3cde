//! Reports, moderator reviews and suspensions

use common::{MarketError, ModerationAction, ProductId, Result, UserId};
use settlement::moderation;
use tracing::info;

use super::CatalogService;
use crate::store::traits::ChangeSet;

impl CatalogService {
    /// Flag a listing as possibly NSFW; it disappears for non-admins until
    /// a moderator reviews it
    pub fn report_product(&self, caller: &UserId, product_id: &ProductId) -> Result<()> {
        let _guard = self.begin();
        let reporter = self.require_user(caller)?;
        let mut product = self
            .store
            .product(product_id)
            .ok_or_else(|| MarketError::not_found(format!("product {}", product_id)))?;

        if moderation::report_product(&reporter, &mut product)? {
            self.store.commit(ChangeSet::new().product(product))?;
            self.metrics.report_filed("product");
        }
        Ok(())
    }

    pub fn report_user(&self, caller: &UserId, user_id: &UserId) -> Result<()> {
        let _guard = self.begin();
        let reporter = self.require_user(caller)?;
        let mut target = self.require_user(user_id)?;

        if moderation::report_user(&reporter, &mut target)? {
            self.store.commit(ChangeSet::new().user(target))?;
            self.metrics.report_filed("user");
        }
        Ok(())
    }

    pub fn review_reported_product(
        &self,
        caller: &UserId,
        product_id: &ProductId,
        action: ModerationAction,
    ) -> Result<()> {
        let _guard = self.begin();
        let moderator = self.require_admin(caller)?;
        let mut product = self
            .store
            .product(product_id)
            .ok_or_else(|| MarketError::not_found(format!("product {}", product_id)))?;

        moderation::review_reported_product(&moderator, &mut product, action)?;
        self.store.commit(ChangeSet::new().product(product))
    }

    pub fn review_reported_user(
        &self,
        caller: &UserId,
        user_id: &UserId,
        action: ModerationAction,
    ) -> Result<()> {
        let _guard = self.begin();
        let moderator = self.require_admin(caller)?;
        let mut target = self.require_user(user_id)?;

        moderation::review_reported_user(&moderator, &mut target, action)?;
        self.store.commit(ChangeSet::new().user(target))
    }

    pub fn suspend_user(&self, caller: &UserId, user_id: &UserId) -> Result<()> {
        let _guard = self.begin();
        let admin = self.require_admin(caller)?;
        let mut target = self.require_user(user_id)?;

        moderation::suspend_user(&admin, &mut target)?;
        self.store.commit(ChangeSet::new().user(target))
    }

    pub fn reinstate_user(&self, caller: &UserId, user_id: &UserId) -> Result<()> {
        let _guard = self.begin();
        let admin = self.require_admin(caller)?;
        let mut target = self.require_user(user_id)?;

        moderation::reinstate_user(&admin, &mut target)?;
        self.store.commit(ChangeSet::new().user(target))?;
        info!(user_id = %user_id, "Reinstated account is visible again");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::harness;
    use super::*;

    #[test]
    fn test_reported_listing_hidden_until_reviewed() {
        let h = harness();
        let alice = h.alice();
        let jacket = h.product("Vintage Denim Jacket");

        h.service.report_product(&h.john().id, &jacket.id).unwrap();
        assert!(matches!(
            h.service.product(Some(&alice.id), &jacket.id),
            Err(MarketError::NotFound(_))
        ));

        let admin = h.admin();
        let queue = h.service.moderation_queue(&admin.id).unwrap();
        assert!(queue.products.iter().any(|p| p.id == jacket.id));

        h.service
            .review_reported_product(&admin.id, &jacket.id, ModerationAction::Dismiss)
            .unwrap();
        assert!(h.service.product(Some(&alice.id), &jacket.id).is_ok());
    }

    #[test]
    fn test_confirm_hides_from_unverified_viewers() {
        let h = harness();
        let admin = h.admin();
        let jacket = h.product("Vintage Denim Jacket");
        h.service.report_product(&h.alice().id, &jacket.id).unwrap();
        h.service
            .review_reported_product(&admin.id, &jacket.id, ModerationAction::Confirm)
            .unwrap();

        assert!(h.product("Vintage Denim Jacket").is_nsfw);
        assert!(h.service.product(Some(&h.alice().id), &jacket.id).is_ok());
        assert!(h.service.product(Some(&h.john().id), &jacket.id).is_err());
        assert!(h.service.product(None, &jacket.id).is_err());
    }

    #[test]
    fn test_moderation_requires_admin() {
        let h = harness();
        let corset = h.product("Gothic Corset");
        let jane = h.jane();
        assert!(matches!(
            h.service
                .review_reported_product(&jane.id, &corset.id, ModerationAction::Dismiss),
            Err(MarketError::Unauthorized(_))
        ));
        assert!(matches!(
            h.service.suspend_user(&jane.id, &h.john().id),
            Err(MarketError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_suspension_hides_listings_until_reinstated() {
        let h = harness();
        let admin = h.admin();
        let jane = h.jane();
        let alice = h.alice();

        let visible_before = h.service.visible_products(Some(&alice.id)).unwrap();
        assert!(visible_before.iter().any(|p| p.seller_id == jane.id));

        h.service.suspend_user(&admin.id, &jane.id).unwrap();
        let visible = h.service.visible_products(Some(&alice.id)).unwrap();
        assert!(visible.iter().all(|p| p.seller_id != jane.id));
        let own = h.service.listings_by_seller(Some(&jane.id), &jane.id).unwrap();
        assert!(!own.is_empty());

        h.service.reinstate_user(&admin.id, &jane.id).unwrap();
        let visible_after = h.service.visible_products(Some(&alice.id)).unwrap();
        assert_eq!(visible_after.len(), visible_before.len());
    }

    #[test]
    fn test_report_user_flow() {
        let h = harness();
        let admin = h.admin();
        let jane = h.jane();
        let alice = h.alice();

        h.service.report_user(&alice.id, &jane.id).unwrap();
        assert!(h.jane().reported_nsfw);
        assert!(matches!(
            h.service.user_profile(Some(&alice.id), &jane.id),
            Err(MarketError::NotFound(_))
        ));
        assert!(h.service.moderation_queue(&admin.id).unwrap().users.iter().any(|u| u.id == jane.id));

        h.service
            .review_reported_user(&admin.id, &jane.id, ModerationAction::Confirm)
            .unwrap();
        let jane_now = h.jane();
        assert!(jane_now.is_nsfw);
        assert!(!jane_now.reported_nsfw);
        assert!(h.service.user_profile(Some(&h.john().id), &jane.id).is_err());
    }
}
