//! Listing visibility

use common::{Product, User};
use tracing::trace;

use crate::lookup::UserLookup;
use crate::{HiddenReason, Visibility};

/// Listing flag OR the seller's account-level flag
pub fn is_effectively_nsfw(product: &Product, seller: Option<&User>) -> bool {
    product.is_nsfw || seller.is_some_and(|s| s.is_nsfw)
}

/// Apply the product rules in order; the first matching rule decides.
///
/// A missing seller is treated as neither suspended nor NSFW.
pub fn effective_visibility(
    product: &Product,
    seller: Option<&User>,
    viewer: Option<&User>,
) -> Visibility {
    let viewer_is_admin = viewer.is_some_and(User::is_administrator);

    if product.reported_nsfw && !viewer_is_admin {
        return Visibility::Hidden(HiddenReason::PendingReview);
    }

    if seller.is_some_and(|s| s.is_suspended) {
        let viewer_is_owner = viewer.is_some_and(|v| product.is_owned_by(&v.id));
        if !viewer_is_admin && !viewer_is_owner {
            return Visibility::Hidden(HiddenReason::SellerSuspended);
        }
    }

    if is_effectively_nsfw(product, seller) && !viewer.is_some_and(|v| v.age_verified) {
        return Visibility::Hidden(HiddenReason::AgeRestricted);
    }

    Visibility::Visible
}

/// Resolve the seller through `users` and evaluate [`effective_visibility`]
pub fn is_product_visible<L>(product: &Product, viewer: Option<&User>, users: &L) -> bool
where
    L: UserLookup + ?Sized,
{
    let seller = users.find_user(&product.seller_id);
    let decision = effective_visibility(product, seller, viewer);
    if let Visibility::Hidden(reason) = decision {
        trace!(product_id = %product.id, ?reason, "Listing hidden from viewer");
    }
    decision.is_visible()
}

/// Keep the listings `viewer` may see, preserving input order
pub fn filter_visible<'a, I, L>(products: I, viewer: Option<&User>, users: &L) -> Vec<&'a Product>
where
    I: IntoIterator<Item = &'a Product>,
    L: UserLookup + ?Sized,
{
    products
        .into_iter()
        .filter(|p| is_product_visible(p, viewer, users))
        .collect()
}
