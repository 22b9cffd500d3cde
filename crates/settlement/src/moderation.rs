//! Reports, moderator reviews and suspensions
//!
//! The report flag (`reported_nsfw`) and the suspension flag are orthogonal
//! to a listing's status. A report is a request for review, not a verdict:
//! only a moderator's `Confirm` sets the `is_nsfw` classification.

use common::{MarketError, ModerationAction, Product, Result, User};
use tracing::info;

fn require_admin(actor: &User, action: &str) -> Result<()> {
    if actor.is_administrator() {
        Ok(())
    } else {
        Err(MarketError::unauthorized(format!("{} requires an admin", action)))
    }
}

/// Flag a listing for review. Owners cannot report their own listings.
///
/// Returns `false` when the listing was already pending review.
pub fn report_product(reporter: &User, product: &mut Product) -> Result<bool> {
    if product.is_owned_by(&reporter.id) {
        return Err(MarketError::unauthorized("sellers cannot report their own listing"));
    }
    if product.reported_nsfw {
        return Ok(false);
    }
    product.reported_nsfw = true;
    info!(product_id = %product.id, reporter = %reporter.id, "Listing reported");
    Ok(true)
}

/// Flag an account for review. Users cannot report themselves.
pub fn report_user(reporter: &User, target: &mut User) -> Result<bool> {
    if reporter.id == target.id {
        return Err(MarketError::unauthorized("users cannot report themselves"));
    }
    if target.reported_nsfw {
        return Ok(false);
    }
    target.reported_nsfw = true;
    info!(user_id = %target.id, reporter = %reporter.id, "User reported");
    Ok(true)
}

pub fn review_reported_product(
    moderator: &User,
    product: &mut Product,
    action: ModerationAction,
) -> Result<()> {
    require_admin(moderator, "reviewing a reported listing")?;
    if !product.reported_nsfw {
        return Err(MarketError::invalid_state(format!(
            "product {} is not pending review",
            product.id
        )));
    }
    product.reported_nsfw = false;
    if action == ModerationAction::Confirm {
        product.is_nsfw = true;
    }
    info!(product_id = %product.id, action = ?action, "Reported listing reviewed");
    Ok(())
}

pub fn review_reported_user(
    moderator: &User,
    target: &mut User,
    action: ModerationAction,
) -> Result<()> {
    require_admin(moderator, "reviewing a reported user")?;
    if !target.reported_nsfw {
        return Err(MarketError::invalid_state(format!(
            "user {} is not pending review",
            target.id
        )));
    }
    target.reported_nsfw = false;
    if action == ModerationAction::Confirm {
        target.is_nsfw = true;
    }
    info!(user_id = %target.id, action = ?action, "Reported user reviewed");
    Ok(())
}

/// Suspend an account. Admins cannot suspend themselves.
pub fn suspend_user(admin: &User, target: &mut User) -> Result<()> {
    require_admin(admin, "suspending a user")?;
    if admin.id == target.id {
        return Err(MarketError::invalid_input("admins cannot suspend themselves"));
    }
    target.is_suspended = true;
    info!(user_id = %target.id, admin = %admin.id, "User suspended");
    Ok(())
}

pub fn reinstate_user(admin: &User, target: &mut User) -> Result<()> {
    require_admin(admin, "reinstating a user")?;
    target.is_suspended = false;
    info!(user_id = %target.id, admin = %admin.id, "User reinstated");
    Ok(())
}
