//! Profile visibility

use common::User;

use crate::{HiddenReason, Visibility};

/// Decide whether `viewer` may open `user`'s profile.
///
/// Users always see themselves and admins see everyone. Otherwise a
/// reported account is withheld pending review, a suspended account is
/// withheld, and an NSFW account needs an age-verified viewer.
pub fn user_visibility(user: &User, viewer: Option<&User>) -> Visibility {
    if let Some(v) = viewer {
        if v.id == user.id || v.is_administrator() {
            return Visibility::Visible;
        }
    }

    if user.reported_nsfw {
        return Visibility::Hidden(HiddenReason::PendingReview);
    }

    if user.is_suspended {
        return Visibility::Hidden(HiddenReason::AccountSuspended);
    }

    if user.is_nsfw && !viewer.is_some_and(|v| v.age_verified) {
        return Visibility::Hidden(HiddenReason::AgeRestricted);
    }

    Visibility::Visible
}

pub fn is_user_visible(user: &User, viewer: Option<&User>) -> bool {
    user_visibility(user, viewer).is_visible()
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::UserRole;

    #[test]
    fn test_self_and_admin_always_see_profile() {
        let mut user = User::new("Jane", "jane@example.com", 25, UserRole::Seller);
        user.is_suspended = true;
        user.reported_nsfw = true;
        let admin = User::new("Admin", "admin@example.com", 40, UserRole::Admin);

        assert!(is_user_visible(&user, Some(&user)));
        assert!(is_user_visible(&user, Some(&admin)));
        assert!(!is_user_visible(&user, None));
    }

    #[test]
    fn test_hidden_reasons() {
        let viewer = User::new("Bob", "bob@example.com", 30, UserRole::Buyer);

        let mut reported = User::new("R", "r@example.com", 30, UserRole::Seller);
        reported.reported_nsfw = true;
        reported.is_suspended = true;
        assert_eq!(
            user_visibility(&reported, Some(&viewer)),
            Visibility::Hidden(HiddenReason::PendingReview)
        );

        let mut suspended = User::new("S", "s@example.com", 30, UserRole::Seller);
        suspended.is_suspended = true;
        assert_eq!(
            user_visibility(&suspended, Some(&viewer)),
            Visibility::Hidden(HiddenReason::AccountSuspended)
        );
    }

    #[test]
    fn test_nsfw_profile_needs_verified_viewer() {
        let mut nsfw = User::new("N", "n@example.com", 28, UserRole::Seller);
        nsfw.is_nsfw = true;

        let mut verified = User::new("V", "v@example.com", 30, UserRole::Buyer);
        assert!(!is_user_visible(&nsfw, Some(&verified)));
        verified.age_verified = true;
        assert!(is_user_visible(&nsfw, Some(&verified)));
        assert!(!is_user_visible(&nsfw, None));
    }
}
